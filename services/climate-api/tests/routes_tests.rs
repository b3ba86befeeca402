//! End-to-end tests for the climate API router.
//!
//! Requests are driven through the real `Router` against fixture databases.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use climate_api::routes::build_router;
use climate_api::state::AppState;
use climate_common::Observation;
use storage::Catalog;
use test_utils::fixtures::stations;
use test_utils::{
    assert_approx_eq, daily_observations, historical_observations, scenario_observations,
    FixtureDatabase, SCENARIO_START,
};

async fn app_for(db: &FixtureDatabase) -> Router {
    let catalog = Catalog::open(db.path()).await.unwrap();
    build_router(Arc::new(AppState::from_catalog(catalog)))
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn not_found() -> Value {
    json!({"error": "Not found."})
}

// ============================================================================
// Landing and health
// ============================================================================

#[tokio::test]
async fn test_landing_page() {
    let db = FixtureDatabase::empty().await;
    let app = app_for(&db).await;

    let (status, body) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    let routes = body["routes"].as_array().unwrap();
    assert_eq!(routes.len(), 5);
    assert!(routes.contains(&json!("/api/v1.0/tobs")));
}

#[tokio::test]
async fn test_health_and_ready() {
    let db = FixtureDatabase::empty().await;
    let app = app_for(&db).await;

    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));

    let (status, body) = get(&app, "/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"ready": true, "database": "ok"}));
}

#[tokio::test]
async fn test_not_ready_when_database_disappears() {
    let db = FixtureDatabase::empty().await;
    let app = app_for(&db).await;
    std::fs::remove_file(db.path()).unwrap();

    let (status, body) = get(&app, "/ready").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["ready"], json!(false));
}

#[tokio::test]
async fn test_metrics_without_recorder_is_empty() {
    let db = FixtureDatabase::empty().await;
    let app = app_for(&db).await;

    let response = app
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(bytes.is_empty());
}

// ============================================================================
// Precipitation and temperatures
// ============================================================================

#[tokio::test]
async fn test_precipitation_pairs() {
    let db = FixtureDatabase::scenario().await;
    let app = app_for(&db).await;

    let (status, body) = get(&app, "/api/v1.0/precipitation").await;
    assert_eq!(status, StatusCode::OK);

    let rows = body.as_array().unwrap();
    let expected = scenario_observations().iter().filter(|o| o.prcp.is_some()).count();
    assert_eq!(rows.len(), expected);
    for row in rows {
        let pair = row.as_array().unwrap();
        assert_eq!(pair.len(), 2);
        assert!(pair[0].is_string());
        assert!(pair[1].is_number());
    }
}

#[tokio::test]
async fn test_tobs_scenario() {
    let mut observations = scenario_observations();
    observations.extend(historical_observations());
    let db = FixtureDatabase::new(&stations::all(), &observations).await;
    let app = app_for(&db).await;

    let (status, body) = get(&app, "/api/v1.0/tobs").await;
    assert_eq!(status, StatusCode::OK);

    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 366);
    assert!(rows
        .iter()
        .all(|r| r[0].as_str().unwrap() >= SCENARIO_START));
    assert_eq!(
        rows[rows.len() - 3..].to_vec(),
        vec![
            json!(["2017-08-21", 77.0]),
            json!(["2017-08-22", 80.0]),
            json!(["2017-08-23", 75.0]),
        ]
    );
}

#[tokio::test]
async fn test_rolling_routes_empty_database_is_not_found() {
    let db = FixtureDatabase::empty().await;
    let app = app_for(&db).await;

    for uri in ["/api/v1.0/precipitation", "/api/v1.0/tobs"] {
        let (status, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body, not_found());
    }
}

#[tokio::test]
async fn test_precipitation_all_null_is_not_found() {
    let db = FixtureDatabase::new(
        &[],
        &[Observation::new(stations::WAIHEE.0, "2017-08-23", None, Some(80.0))],
    )
    .await;
    let app = app_for(&db).await;

    let (status, body) = get(&app, "/api/v1.0/precipitation").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, not_found());

    let (status, _) = get(&app, "/api/v1.0/tobs").await;
    assert_eq!(status, StatusCode::OK);
}

// ============================================================================
// Stations
// ============================================================================

#[tokio::test]
async fn test_stations_tuples() {
    let db = FixtureDatabase::scenario().await;
    let app = app_for(&db).await;

    let (status, body) = get(&app, "/api/v1.0/stations").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 4);
    assert_eq!(
        body[0],
        json!(["USC00519397", "WAIKIKI 717.2, HI US", 21.2716, -157.8168, 3.0])
    );
}

#[tokio::test]
async fn test_empty_station_table_is_not_found() {
    let db = FixtureDatabase::new(&[], &scenario_observations()).await;
    let app = app_for(&db).await;

    let (status, body) = get(&app, "/api/v1.0/stations").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, not_found());
}

// ============================================================================
// Temperature statistics by date
// ============================================================================

#[tokio::test]
async fn test_week_of_daily_stats() {
    let mut observations = scenario_observations();
    observations.extend(daily_observations(stations::KANEOHE.0, "2016-12-30", "2017-01-04"));
    let db = FixtureDatabase::new(&[], &observations).await;
    let app = app_for(&db).await;

    let (status, body) = get(&app, "/api/v1.0/20170101/20170107").await;
    assert_eq!(status, StatusCode::OK);

    let rows = body.as_array().unwrap();
    let dates: Vec<&str> = rows.iter().map(|r| r[0].as_str().unwrap()).collect();
    assert_eq!(
        dates,
        vec![
            "2017-01-01",
            "2017-01-02",
            "2017-01-03",
            "2017-01-04",
            "2017-01-05",
            "2017-01-06",
            "2017-01-07",
        ]
    );

    for row in rows {
        let date = row[0].as_str().unwrap();
        let temps: Vec<f64> = observations
            .iter()
            .filter(|o| o.date == date)
            .filter_map(|o| o.tobs)
            .collect();
        let min = temps.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = temps.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let avg = temps.iter().sum::<f64>() / temps.len() as f64;

        assert_eq!(row[1].as_f64().unwrap(), min, "min on {date}");
        assert_approx_eq!(row[2].as_f64().unwrap(), avg, 1e-9);
        assert_eq!(row[3].as_f64().unwrap(), max, "max on {date}");
    }
}

#[tokio::test]
async fn test_start_only_range() {
    let db = FixtureDatabase::scenario().await;
    let app = app_for(&db).await;

    let (status, body) = get(&app, "/api/v1.0/20170820").await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[3], json!(["2017-08-23", 75.0, 75.0, 75.0]));
}

#[tokio::test]
async fn test_range_after_data_is_not_found() {
    let db = FixtureDatabase::scenario().await;
    let app = app_for(&db).await;

    let (status, body) = get(&app, "/api/v1.0/20180101").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, not_found());
}

#[tokio::test]
async fn test_unparseable_dates_are_bad_requests() {
    let db = FixtureDatabase::scenario().await;
    let app = app_for(&db).await;

    for uri in [
        "/api/v1.0/99999999",
        "/api/v1.0/2017-01-01",
        "/api/v1.0/yesterday",
        "/api/v1.0/20170101/20171332",
        "/api/v1.0/20170107/20170101",
    ] {
        let (status, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert!(body["error"].as_str().unwrap().starts_with("Invalid date"), "{uri}");
    }
}

#[tokio::test]
async fn test_same_request_twice_is_identical() {
    let db = FixtureDatabase::scenario().await;
    let app = app_for(&db).await;

    for uri in [
        "/api/v1.0/precipitation",
        "/api/v1.0/stations",
        "/api/v1.0/tobs",
        "/api/v1.0/20170101/20170131",
    ] {
        let first = get(&app, uri).await;
        let second = get(&app, uri).await;
        assert_eq!(first, second, "{uri}");
    }
}

#[tokio::test]
async fn test_unknown_nested_path_is_not_found() {
    let db = FixtureDatabase::scenario().await;
    let app = app_for(&db).await;

    let (status, body) = get(&app, "/api/v1.0/20170101/20170107/extra").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, not_found());
}

#[tokio::test]
async fn test_unprefixed_route_is_json_not_found() {
    let db = FixtureDatabase::scenario().await;
    let app = app_for(&db).await;

    let (status, body) = get(&app, "/precipitation").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, not_found());
}

// ============================================================================
// Server errors
// ============================================================================

#[tokio::test]
async fn test_missing_database_is_service_unavailable() {
    let db = FixtureDatabase::scenario().await;
    let app = app_for(&db).await;
    std::fs::remove_file(db.path()).unwrap();

    let (status, body) = get(&app, "/api/v1.0/stations").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body, json!({"error": "Storage unavailable."}));
}

#[tokio::test]
async fn test_unparseable_latest_date_is_internal_error() {
    let db = FixtureDatabase::new(
        &[],
        &[Observation::new(stations::WAIHEE.0, "23/08/2017", Some(0.1), Some(70.0))],
    )
    .await;
    let app = app_for(&db).await;

    let (status, body) = get(&app, "/api/v1.0/tobs").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Internal server error."}));

    let text = body.to_string();
    assert!(!text.contains("23/08/2017"));
    assert!(!text.to_lowercase().contains("database"));
}
