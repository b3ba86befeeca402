//! Static declaration of the observation database schema.
//!
//! The database is produced elsewhere; this service only reads it. Tables:
//!
//! ```text
//! measurement(id INTEGER, station TEXT, date TEXT, prcp FLOAT, tobs FLOAT)
//! station(id INTEGER, station TEXT, name TEXT, latitude FLOAT, longitude FLOAT, elevation FLOAT)
//! ```

use sqlx::FromRow;

use climate_common::{DailyTemperatureStats, PrecipitationReading, Station, TemperatureReading};

pub const MEASUREMENT_TABLE: &str = "measurement";
pub const STATION_TABLE: &str = "station";

/// Tables that must exist for the service to start.
pub const REQUIRED_TABLES: [&str; 2] = [MEASUREMENT_TABLE, STATION_TABLE];

pub(crate) const LIST_TABLES_SQL: &str = "SELECT name FROM sqlite_master WHERE type = 'table'";

pub(crate) const LATEST_DATE_SQL: &str = "SELECT MAX(date) FROM measurement";

pub(crate) const PRECIPITATION_SINCE_SQL: &str =
    "SELECT date, prcp FROM measurement WHERE date >= ? AND prcp IS NOT NULL";

pub(crate) const STATIONS_SQL: &str =
    "SELECT station, name, latitude, longitude, elevation FROM station";

pub(crate) const TEMPERATURES_SINCE_SQL: &str =
    "SELECT date, tobs FROM measurement WHERE date >= ?";

pub(crate) const DAILY_STATS_FROM_SQL: &str = "SELECT date, MIN(tobs) AS tmin, AVG(tobs) AS tavg, MAX(tobs) AS tmax \
     FROM measurement WHERE date >= ? \
     GROUP BY date ORDER BY date";

pub(crate) const DAILY_STATS_BETWEEN_SQL: &str = "SELECT date, MIN(tobs) AS tmin, AVG(tobs) AS tavg, MAX(tobs) AS tmax \
     FROM measurement WHERE date >= ? AND date <= ? \
     GROUP BY date ORDER BY date";

#[derive(FromRow)]
pub(crate) struct PrecipitationRow {
    date: String,
    prcp: f64,
}

impl From<PrecipitationRow> for PrecipitationReading {
    fn from(row: PrecipitationRow) -> Self {
        PrecipitationReading {
            date: row.date,
            prcp: row.prcp,
        }
    }
}

#[derive(FromRow)]
pub(crate) struct StationRow {
    station: String,
    name: String,
    latitude: f64,
    longitude: f64,
    elevation: f64,
}

impl From<StationRow> for Station {
    fn from(row: StationRow) -> Self {
        Station {
            station: row.station,
            name: row.name,
            latitude: row.latitude,
            longitude: row.longitude,
            elevation: row.elevation,
        }
    }
}

#[derive(FromRow)]
pub(crate) struct TemperatureRow {
    date: String,
    tobs: Option<f64>,
}

impl From<TemperatureRow> for TemperatureReading {
    fn from(row: TemperatureRow) -> Self {
        TemperatureReading {
            date: row.date,
            tobs: row.tobs,
        }
    }
}

#[derive(FromRow)]
pub(crate) struct DailyStatsRow {
    date: String,
    tmin: Option<f64>,
    tavg: Option<f64>,
    tmax: Option<f64>,
}

impl From<DailyStatsRow> for DailyTemperatureStats {
    fn from(row: DailyStatsRow) -> Self {
        DailyTemperatureStats {
            date: row.date,
            min: row.tmin,
            avg: row.tavg,
            max: row.tmax,
        }
    }
}
