//! Common test fixtures for climate tests.
//!
//! Provides station metadata and throw-away SQLite databases laid out like
//! the production observation file.

use std::path::{Path, PathBuf};

use climate_common::{Observation, Station};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode};
use sqlx::{ConnectOptions, Connection};
use tempfile::TempDir;

use crate::generators::scenario_observations;

/// Well-known stations from the Hawaii dataset.
pub mod stations {
    use climate_common::Station;

    /// (station id, name, latitude, longitude, elevation)
    pub type StationTuple = (&'static str, &'static str, f64, f64, f64);

    pub const WAIKIKI: StationTuple = ("USC00519397", "WAIKIKI 717.2, HI US", 21.2716, -157.8168, 3.0);

    pub const KANEOHE: StationTuple = ("USC00513117", "KANEOHE 838.1, HI US", 21.4234, -157.8015, 14.6);

    /// The most active station; the scenario dataset reports from here.
    pub const WAIHEE: StationTuple = ("USC00519281", "WAIHEE 837.5, HI US", 21.45167, -157.84889, 32.9);

    pub const MANOA: StationTuple = ("USC00516128", "MANOA LYON ARBO 785.2, HI US", 21.3331, -157.8025, 152.4);

    pub fn to_station(t: StationTuple) -> Station {
        Station {
            station: t.0.to_string(),
            name: t.1.to_string(),
            latitude: t.2,
            longitude: t.3,
            elevation: t.4,
        }
    }

    pub fn all() -> Vec<Station> {
        [WAIKIKI, KANEOHE, WAIHEE, MANOA].into_iter().map(to_station).collect()
    }
}

/// DDL matching the production observation database.
pub const SCHEMA_SQL: [&str; 2] = [
    "CREATE TABLE measurement (
        id INTEGER PRIMARY KEY,
        station TEXT,
        date TEXT,
        prcp FLOAT,
        tobs FLOAT
    )",
    "CREATE TABLE station (
        id INTEGER PRIMARY KEY,
        station TEXT,
        name TEXT,
        latitude FLOAT,
        longitude FLOAT,
        elevation FLOAT
    )",
];

/// A SQLite observation database in a temporary directory.
///
/// The file is removed when the fixture is dropped.
pub struct FixtureDatabase {
    _dir: TempDir,
    path: PathBuf,
}

impl FixtureDatabase {
    /// Create a database with the standard schema holding the given rows.
    pub async fn new(stations: &[Station], observations: &[Observation]) -> Self {
        let fixture = Self::blank();
        fixture
            .populate(stations, observations)
            .await
            .expect("Failed to populate fixture database");
        fixture
    }

    /// Schema only, no rows.
    pub async fn empty() -> Self {
        Self::new(&[], &[]).await
    }

    /// All well-known stations plus the scenario year of observations.
    pub async fn scenario() -> Self {
        Self::new(&stations::all(), &scenario_observations()).await
    }

    /// A valid SQLite file that contains none of the expected tables.
    pub async fn without_schema() -> Self {
        let fixture = Self::blank();
        let mut conn = fixture.writer().await.expect("Failed to create fixture database");
        sqlx::query("CREATE TABLE unrelated (id INTEGER PRIMARY KEY)")
            .execute(&mut conn)
            .await
            .expect("Failed to create table");
        conn.close().await.expect("Failed to close fixture database");
        fixture
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn blank() -> Self {
        let dir = crate::paths::temp_test_dir();
        let path = dir.path().join("observations.sqlite");
        Self { _dir: dir, path }
    }

    async fn writer(&self) -> Result<sqlx::SqliteConnection, sqlx::Error> {
        SqliteConnectOptions::new()
            .filename(&self.path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Delete)
            .connect()
            .await
    }

    async fn populate(
        &self,
        stations: &[Station],
        observations: &[Observation],
    ) -> Result<(), sqlx::Error> {
        let mut conn = self.writer().await?;

        for ddl in SCHEMA_SQL {
            sqlx::query(ddl).execute(&mut conn).await?;
        }

        let mut tx = conn.begin().await?;

        for s in stations {
            sqlx::query(
                "INSERT INTO station (station, name, latitude, longitude, elevation) \
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(s.station.as_str())
            .bind(s.name.as_str())
            .bind(s.latitude)
            .bind(s.longitude)
            .bind(s.elevation)
            .execute(&mut *tx)
            .await?;
        }

        for o in observations {
            sqlx::query("INSERT INTO measurement (station, date, prcp, tobs) VALUES (?, ?, ?, ?)")
                .bind(o.station.as_str())
                .bind(o.date.as_str())
                .bind(o.prcp)
                .bind(o.tobs)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        conn.close().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixture_file_exists() {
        let db = FixtureDatabase::empty().await;
        assert!(db.path().is_file());
    }

    #[tokio::test]
    async fn test_fixture_rows_written() {
        let db = FixtureDatabase::scenario().await;
        let mut conn = SqliteConnectOptions::new()
            .filename(db.path())
            .read_only(true)
            .connect()
            .await
            .unwrap();

        let stations: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM station")
            .fetch_one(&mut conn)
            .await
            .unwrap();
        let observations: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM measurement")
            .fetch_one(&mut conn)
            .await
            .unwrap();

        assert_eq!(stations, 4);
        assert_eq!(observations, 366);
    }

    #[test]
    fn test_station_tuple_conversion() {
        let s = stations::to_station(stations::WAIHEE);
        assert_eq!(s.station, "USC00519281");
        assert_eq!(s.elevation, 32.9);
    }
}
