//! Request metrics reported through the `metrics` facade.
//!
//! Without an installed recorder (tests, embedding) every call is a no-op.

use std::time::Instant;

use metrics::{counter, histogram};

use climate_common::ClimateResult;

/// Times one query-backed request and records its outcome.
pub struct QueryTimer {
    endpoint: &'static str,
    start: Instant,
}

impl QueryTimer {
    pub fn start(endpoint: &'static str) -> Self {
        counter!("climate_requests_total", "endpoint" => endpoint).increment(1);
        Self {
            endpoint,
            start: Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_micros() as f64 / 1000.0
    }

    pub fn finish<T>(self, result: &ClimateResult<Vec<T>>) {
        histogram!("climate_query_duration_ms", "endpoint" => self.endpoint)
            .record(self.elapsed_ms());

        match result {
            Ok(rows) if rows.is_empty() => {
                counter!("climate_empty_results_total", "endpoint" => self.endpoint).increment(1);
            }
            Ok(_) => {}
            Err(_) => record_error(self.endpoint),
        }
    }
}

/// Count a request that failed before or during its query.
pub fn record_error(endpoint: &'static str) {
    counter!("climate_errors_total", "endpoint" => endpoint).increment(1);
}
