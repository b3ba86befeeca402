//! Generators for synthetic observation data.
//!
//! Values follow simple patterns so tests can recompute what a query should
//! return without hard-coding hundreds of rows.

use chrono::{Duration, NaiveDate};
use climate_common::Observation;

use crate::fixtures::stations::WAIHEE;

/// First date of the scenario dataset.
pub const SCENARIO_START: &str = "2016-08-23";

/// Last (and maximum) date of the scenario dataset.
pub const SCENARIO_END: &str = "2017-08-23";

/// Temperatures recorded on the last three scenario dates.
pub const SCENARIO_FINAL_TOBS: [f64; 3] = [77.0, 80.0, 75.0];

fn ymd(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("generator dates are valid")
}

/// Every date from `start` to `end` inclusive, formatted `YYYY-MM-DD`.
pub fn date_series(start: &str, end: &str) -> Vec<String> {
    let start = ymd(start);
    let end = ymd(end);
    let days = (end - start).num_days();
    (0..=days)
        .map(|i| (start + Duration::days(i)).format("%Y-%m-%d").to_string())
        .collect()
}

/// Daily observations for one station.
///
/// For day index `i`:
/// - `tobs = 70 + (i % 10)`
/// - `prcp` is missing when `i % 4 == 0`, otherwise `(i % 7) / 10`
pub fn daily_observations(station: &str, start: &str, end: &str) -> Vec<Observation> {
    date_series(start, end)
        .into_iter()
        .enumerate()
        .map(|(i, date)| {
            let prcp = if i % 4 == 0 {
                None
            } else {
                Some((i % 7) as f64 / 10.0)
            };
            Observation::new(station, date, prcp, Some(70.0 + (i % 10) as f64))
        })
        .collect()
}

/// One station reporting daily from 2016-08-23 through 2017-08-23, with
/// temperatures 77, 80 and 75 on the final three dates.
pub fn scenario_observations() -> Vec<Observation> {
    let mut observations = daily_observations(WAIHEE.0, SCENARIO_START, SCENARIO_END);
    let n = observations.len();
    for (obs, tobs) in observations[n - 3..].iter_mut().zip(SCENARIO_FINAL_TOBS) {
        obs.tobs = Some(tobs);
    }
    observations
}

/// Observations that predate the scenario's rolling window.
pub fn historical_observations() -> Vec<Observation> {
    vec![
        Observation::new(WAIHEE.0, "2010-01-01", Some(0.08), Some(65.0)),
        Observation::new(WAIHEE.0, "2015-06-30", None, Some(74.0)),
        Observation::new(WAIHEE.0, "2016-08-22", Some(1.2), Some(79.0)),
    ]
}
