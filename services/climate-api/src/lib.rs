//! Climate API Service Library
//!
//! HTTP routes over the daily observation database: the rolling year of
//! precipitation and temperature, station metadata, and per-date
//! temperature statistics for a date range.

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod routes;
pub mod state;
