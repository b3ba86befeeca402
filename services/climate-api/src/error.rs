//! Mapping of query errors onto HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use climate_common::{ClimateError, DateParseError};

pub type ApiResult<T> = Result<T, ApiError>;

/// JSON error body, e.g. `{"error":"Not found."}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug)]
pub struct ApiError(pub ClimateError);

impl From<ClimateError> for ApiError {
    fn from(err: ClimateError) -> Self {
        Self(err)
    }
}

impl From<DateParseError> for ApiError {
    fn from(err: DateParseError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // Storage details stay in the logs.
        let message = match &self.0 {
            ClimateError::StorageUnavailable(_) => {
                tracing::error!(error = %self.0, "Storage unavailable");
                "Storage unavailable.".to_string()
            }
            ClimateError::DatabaseError(_) | ClimateError::InternalError(_) => {
                tracing::error!(error = %self.0, "Request failed");
                "Internal server error.".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_not_found_status() {
        let response = ApiError(ClimateError::NotFound).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_invalid_date_status() {
        let response = ApiError::from(DateParseError::InvalidFormat("x".into())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_database_error_status() {
        let response = ApiError(ClimateError::DatabaseError("disk I/O".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_storage_unavailable_status() {
        let response = ApiError(ClimateError::StorageUnavailable("gone".into())).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_server_error_bodies_hide_details() {
        let response = ApiError(ClimateError::DatabaseError("no such column: tobs".into())).into_response();
        assert_eq!(body_text(response).await, r#"{"error":"Internal server error."}"#);

        let response = ApiError(ClimateError::StorageUnavailable("/data/hawaii.sqlite".into())).into_response();
        assert_eq!(body_text(response).await, r#"{"error":"Storage unavailable."}"#);
    }

    #[tokio::test]
    async fn test_client_error_bodies_carry_message() {
        let response = ApiError(ClimateError::NotFound).into_response();
        assert_eq!(body_text(response).await, r#"{"error":"Not found."}"#);
    }
}
