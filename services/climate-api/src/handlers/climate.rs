//! Observation query handlers.
//!
//! Each handler runs exactly one catalog operation. A query that yields no
//! rows answers 404 with `{"error":"Not found."}` rather than an empty array.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    Json,
};

use climate_common::{
    ClimateError, DailyTemperatureStats, DateRange, PrecipitationReading, Station,
    TemperatureReading,
};

use crate::error::{ApiError, ApiResult};
use crate::metrics::{record_error, QueryTimer};
use crate::state::AppState;

fn found<T>(rows: Vec<T>) -> ApiResult<Json<Vec<T>>> {
    if rows.is_empty() {
        Err(ClimateError::NotFound.into())
    } else {
        Ok(Json(rows))
    }
}

/// Fallback for unrouted paths, so every 404 carries the JSON error body.
pub async fn not_found_handler() -> ApiError {
    ClimateError::NotFound.into()
}

/// GET /api/v1.0/precipitation - Last 12 months of non-null precipitation
pub async fn precipitation_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> ApiResult<Json<Vec<PrecipitationReading>>> {
    let timer = QueryTimer::start("precipitation");
    let result = state.catalog.latest_year_precipitation().await;
    timer.finish(&result);
    found(result?)
}

/// GET /api/v1.0/stations - All stations
pub async fn stations_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> ApiResult<Json<Vec<Station>>> {
    let timer = QueryTimer::start("stations");
    let result = state.catalog.all_stations().await;
    timer.finish(&result);
    found(result?)
}

/// GET /api/v1.0/tobs - Last 12 months of temperature observations
pub async fn tobs_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> ApiResult<Json<Vec<TemperatureReading>>> {
    let timer = QueryTimer::start("tobs");
    let result = state.catalog.latest_year_temperatures().await;
    timer.finish(&result);
    found(result?)
}

/// GET /api/v1.0/:start - Daily temperature stats from `start` (YYYYMMDD)
pub async fn start_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(start): Path<String>,
) -> ApiResult<Json<Vec<DailyTemperatureStats>>> {
    temperature_stats(state, "start", &start, None).await
}

/// GET /api/v1.0/:start/:end - Daily temperature stats between two dates, inclusive
pub async fn start_end_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path((start, end)): Path<(String, String)>,
) -> ApiResult<Json<Vec<DailyTemperatureStats>>> {
    temperature_stats(state, "start_end", &start, Some(&end)).await
}

async fn temperature_stats(
    state: Arc<AppState>,
    endpoint: &'static str,
    start: &str,
    end: Option<&str>,
) -> ApiResult<Json<Vec<DailyTemperatureStats>>> {
    let range = DateRange::from_compact(start, end).map_err(|e| {
        tracing::debug!(start, end, error = %e, "Rejected date range");
        record_error(endpoint);
        e
    })?;

    let timer = QueryTimer::start(endpoint);
    let result = state.catalog.range_temperature_stats(range).await;
    timer.finish(&result);
    found(result?)
}
