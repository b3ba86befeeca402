//! Common types and utilities shared across the climate services.

pub mod date;
pub mod error;
pub mod model;

pub use date::{DateParseError, DateRange};
pub use error::{ClimateError, ClimateResult};
pub use model::{DailyTemperatureStats, Observation, PrecipitationReading, Station, TemperatureReading};
