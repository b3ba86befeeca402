//! Landing page handler.

use axum::Json;
use serde::Serialize;

use crate::routes::API_PREFIX;

#[derive(Debug, Serialize)]
pub struct WelcomeResponse {
    pub message: String,
    pub routes: Vec<String>,
}

impl WelcomeResponse {
    pub fn new() -> Self {
        let routes = ["precipitation", "stations", "tobs", "<start>", "<start>/<end>"]
            .iter()
            .map(|r| format!("{}/{}", API_PREFIX, r))
            .collect();

        Self {
            message: "Welcome to the weather station API!".to_string(),
            routes,
        }
    }
}

impl Default for WelcomeResponse {
    fn default() -> Self {
        Self::new()
    }
}

/// GET / - Lists the available routes
pub async fn landing_handler() -> Json<WelcomeResponse> {
    Json(WelcomeResponse::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_landing_lists_every_route() {
        let Json(welcome) = landing_handler().await;
        assert_eq!(
            welcome.routes,
            vec![
                "/api/v1.0/precipitation",
                "/api/v1.0/stations",
                "/api/v1.0/tobs",
                "/api/v1.0/<start>",
                "/api/v1.0/<start>/<end>",
            ]
        );
    }
}
