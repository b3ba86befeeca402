//! Records served by the climate API.
//!
//! Query results are encoded as positional JSON arrays rather than objects,
//! e.g. a precipitation reading is `["2017-08-23", 0.45]`.

use serde::ser::{Serialize, SerializeTuple, Serializer};

/// One row of the `measurement` table.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub station: String,
    /// `YYYY-MM-DD`
    pub date: String,
    pub prcp: Option<f64>,
    pub tobs: Option<f64>,
}

impl Observation {
    pub fn new(station: impl Into<String>, date: impl Into<String>, prcp: Option<f64>, tobs: Option<f64>) -> Self {
        Self {
            station: station.into(),
            date: date.into(),
            prcp,
            tobs,
        }
    }
}

/// Metadata for a weather-monitoring location (`station` table).
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    pub station: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
}

impl Serialize for Station {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tup = serializer.serialize_tuple(5)?;
        tup.serialize_element(&self.station)?;
        tup.serialize_element(&self.name)?;
        tup.serialize_element(&self.latitude)?;
        tup.serialize_element(&self.longitude)?;
        tup.serialize_element(&self.elevation)?;
        tup.end()
    }
}

/// A non-null precipitation amount on a given date.
#[derive(Debug, Clone, PartialEq)]
pub struct PrecipitationReading {
    pub date: String,
    pub prcp: f64,
}

impl Serialize for PrecipitationReading {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (&self.date, self.prcp).serialize(serializer)
    }
}

/// A temperature observation on a given date.
#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureReading {
    pub date: String,
    pub tobs: Option<f64>,
}

impl Serialize for TemperatureReading {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (&self.date, self.tobs).serialize(serializer)
    }
}

/// Per-date temperature aggregates across all stations.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyTemperatureStats {
    pub date: String,
    pub min: Option<f64>,
    pub avg: Option<f64>,
    pub max: Option<f64>,
}

impl Serialize for DailyTemperatureStats {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tup = serializer.serialize_tuple(4)?;
        tup.serialize_element(&self.date)?;
        tup.serialize_element(&self.min)?;
        tup.serialize_element(&self.avg)?;
        tup.serialize_element(&self.max)?;
        tup.end()
    }
}
