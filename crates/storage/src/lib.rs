//! Storage access for the climate services.
//!
//! Provides read-only queries over the observation SQLite database.

pub mod catalog;
pub mod schema;

pub use catalog::Catalog;
