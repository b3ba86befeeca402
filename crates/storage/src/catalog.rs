//! Observation catalog backed by a read-only SQLite file.
//!
//! No connection is held between calls: every query opens its own connection
//! and closes it before returning, on the error path as well.

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::NaiveDate;
use futures::future::BoxFuture;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::{ConnectOptions, Connection};
use tracing::{debug, error, info, warn};

use climate_common::date::{format_storage_date, parse_storage_date, rolling_window_start};
use climate_common::{
    ClimateError, ClimateResult, DailyTemperatureStats, DateRange, PrecipitationReading, Station,
    TemperatureReading,
};

use crate::schema::{
    DailyStatsRow, PrecipitationRow, StationRow, TemperatureRow, DAILY_STATS_BETWEEN_SQL,
    DAILY_STATS_FROM_SQL, LATEST_DATE_SQL, LIST_TABLES_SQL, PRECIPITATION_SINCE_SQL,
    REQUIRED_TABLES, STATIONS_SQL, TEMPERATURES_SINCE_SQL,
};

/// Read-only access to the observation database.
#[derive(Debug, Clone)]
pub struct Catalog {
    path: PathBuf,
    options: SqliteConnectOptions,
}

impl Catalog {
    /// Open the catalog and verify the database is usable.
    ///
    /// Fails with `StorageUnavailable` when the file is missing, cannot be
    /// opened, or lacks one of the required tables.
    pub async fn open(path: impl AsRef<Path>) -> ClimateResult<Self> {
        let path = path.as_ref();

        if !path.is_file() {
            return Err(ClimateError::StorageUnavailable(format!(
                "database file not found: {}",
                path.display()
            )));
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .read_only(true)
            .create_if_missing(false);

        let catalog = Self {
            path: path.to_path_buf(),
            options,
        };
        catalog.validate_schema().await?;

        info!(path = %path.display(), "Opened observation database");

        Ok(catalog)
    }

    /// Path of the underlying database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn validate_schema(&self) -> ClimateResult<()> {
        let tables = self
            .with_connection(|conn| {
                Box::pin(async move {
                    sqlx::query_scalar::<_, String>(LIST_TABLES_SQL)
                        .fetch_all(&mut *conn)
                        .await
                        .map_err(query_error)
                })
            })
            .await
            .map_err(|e| match e {
                ClimateError::DatabaseError(msg) => ClimateError::StorageUnavailable(msg),
                other => other,
            })?;

        let missing: Vec<&str> = REQUIRED_TABLES
            .iter()
            .copied()
            .filter(|required| !tables.iter().any(|t| t == required))
            .collect();

        if !missing.is_empty() {
            return Err(ClimateError::StorageUnavailable(format!(
                "{} is missing tables: {}",
                self.path.display(),
                missing.join(", ")
            )));
        }

        Ok(())
    }

    async fn acquire(&self) -> ClimateResult<SqliteConnection> {
        self.options.connect().await.map_err(|e| {
            error!(path = %self.path.display(), error = %e, "Failed to open database");
            ClimateError::StorageUnavailable(format!("Connection failed: {}", e))
        })
    }

    /// Run `op` on a fresh connection, closing it afterwards whatever the outcome.
    async fn with_connection<T, F>(&self, op: F) -> ClimateResult<T>
    where
        T: Send,
        F: for<'c> FnOnce(&'c mut SqliteConnection) -> BoxFuture<'c, ClimateResult<T>> + Send,
    {
        let mut conn = self.acquire().await?;
        let result = op(&mut conn).await;

        if let Err(e) = conn.close().await {
            warn!(error = %e, "Failed to close database connection");
        }

        result
    }

    /// Round trip used by readiness checks.
    pub async fn ping(&self) -> ClimateResult<()> {
        self.with_connection(|conn| {
            Box::pin(async move {
                sqlx::query_scalar::<_, i64>("SELECT 1")
                    .fetch_one(&mut *conn)
                    .await
                    .map(|_| ())
                    .map_err(query_error)
            })
        })
        .await
    }

    /// Lower bound of the rolling 12-month window, or `None` when there are
    /// no observations at all.
    pub async fn rolling_window_start(&self) -> ClimateResult<Option<NaiveDate>> {
        self.with_connection(|conn| Box::pin(async move { window_start(conn).await }))
            .await
    }

    /// Non-null precipitation readings within the rolling window.
    pub async fn latest_year_precipitation(&self) -> ClimateResult<Vec<PrecipitationReading>> {
        let started = Instant::now();

        let rows = self
            .with_connection(|conn| {
                Box::pin(async move {
                    let Some(since) = window_start(conn).await? else {
                        return Ok(Vec::new());
                    };

                    sqlx::query_as::<_, PrecipitationRow>(PRECIPITATION_SINCE_SQL)
                        .bind(format_storage_date(since))
                        .fetch_all(&mut *conn)
                        .await
                        .map_err(query_error)
                })
            })
            .await?;

        debug!(
            rows = rows.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "latest_year_precipitation"
        );

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// All stations, one row each.
    pub async fn all_stations(&self) -> ClimateResult<Vec<Station>> {
        let started = Instant::now();

        let rows = self
            .with_connection(|conn| {
                Box::pin(async move {
                    sqlx::query_as::<_, StationRow>(STATIONS_SQL)
                        .fetch_all(&mut *conn)
                        .await
                        .map_err(query_error)
                })
            })
            .await?;

        debug!(
            rows = rows.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "all_stations"
        );

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Temperature observations within the rolling window, nulls included.
    pub async fn latest_year_temperatures(&self) -> ClimateResult<Vec<TemperatureReading>> {
        let started = Instant::now();

        let rows = self
            .with_connection(|conn| {
                Box::pin(async move {
                    let Some(since) = window_start(conn).await? else {
                        return Ok(Vec::new());
                    };

                    sqlx::query_as::<_, TemperatureRow>(TEMPERATURES_SINCE_SQL)
                        .bind(format_storage_date(since))
                        .fetch_all(&mut *conn)
                        .await
                        .map_err(query_error)
                })
            })
            .await?;

        debug!(
            rows = rows.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "latest_year_temperatures"
        );

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Per-date min/avg/max temperature within `range`, ordered by date.
    pub async fn range_temperature_stats(
        &self,
        range: DateRange,
    ) -> ClimateResult<Vec<DailyTemperatureStats>> {
        let started = Instant::now();
        let start = range.start_key();
        let end = range.end_key();

        let rows = self
            .with_connection(move |conn| {
                Box::pin(async move {
                    let query = match end {
                        Some(end) => sqlx::query_as::<_, DailyStatsRow>(DAILY_STATS_BETWEEN_SQL)
                            .bind(start)
                            .bind(end),
                        None => sqlx::query_as::<_, DailyStatsRow>(DAILY_STATS_FROM_SQL).bind(start),
                    };

                    query.fetch_all(&mut *conn).await.map_err(query_error)
                })
            })
            .await?;

        debug!(
            start = %range.start,
            end = ?range.end,
            rows = rows.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "range_temperature_stats"
        );

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

async fn window_start(conn: &mut SqliteConnection) -> ClimateResult<Option<NaiveDate>> {
    let latest = sqlx::query_scalar::<_, Option<String>>(LATEST_DATE_SQL)
        .fetch_one(&mut *conn)
        .await
        .map_err(query_error)?;

    latest
        .map(|latest| {
            parse_storage_date(&latest).map(rolling_window_start).map_err(|e| {
                ClimateError::DatabaseError(format!("Unreadable latest observation date: {}", e))
            })
        })
        .transpose()
}

fn query_error(e: sqlx::Error) -> ClimateError {
    error!(error = %e, "Query failed");
    ClimateError::DatabaseError(format!("Query failed: {}", e))
}
