//! Application state for the climate API.

use std::path::Path;

use metrics_exporter_prometheus::PrometheusHandle;
use storage::Catalog;

use climate_common::ClimateResult;

/// Shared, read-only application state.
pub struct AppState {
    /// Observation database access.
    pub catalog: Catalog,

    /// Renders `/metrics` when a Prometheus recorder is installed.
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    /// Open and validate the database at `database_path`.
    pub async fn new(database_path: &Path) -> ClimateResult<Self> {
        let catalog = Catalog::open(database_path).await?;
        Ok(Self::from_catalog(catalog))
    }

    pub fn from_catalog(catalog: Catalog) -> Self {
        Self {
            catalog,
            prometheus: None,
        }
    }

    pub fn with_prometheus(mut self, handle: PrometheusHandle) -> Self {
        self.prometheus = Some(handle);
        self
    }
}
