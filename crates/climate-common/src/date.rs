//! Date handling for observation queries.
//!
//! Observations are stored with `YYYY-MM-DD` text dates, while the HTTP
//! routes accept the compact `YYYYMMDD` form. Because the storage format is
//! zero-padded ISO 8601, lexicographic comparison of stored strings matches
//! chronological order, so bounds are always rendered back to that format
//! before being bound into SQL.

use chrono::{Duration, NaiveDate};

/// `strftime` pattern of dates in the measurement table.
pub const STORAGE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Length of the rolling window, counted back from the latest observation.
pub const ROLLING_WINDOW_DAYS: i64 = 365;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateParseError {
    #[error("'{0}' is not in YYYYMMDD form")]
    InvalidFormat(String),

    #[error("'{0}' is not a calendar date")]
    OutOfRange(String),

    #[error("end date {end} precedes start date {start}")]
    ReversedRange { start: String, end: String },
}

/// Parse a compact `YYYYMMDD` date, as used in route paths.
///
/// Exactly eight ASCII digits are required and they must name a real day.
pub fn parse_compact_date(s: &str) -> Result<NaiveDate, DateParseError> {
    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DateParseError::InvalidFormat(s.to_string()));
    }

    let year: i32 = s[0..4].parse().map_err(|_| DateParseError::InvalidFormat(s.to_string()))?;
    let month: u32 = s[4..6].parse().map_err(|_| DateParseError::InvalidFormat(s.to_string()))?;
    let day: u32 = s[6..8].parse().map_err(|_| DateParseError::InvalidFormat(s.to_string()))?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| DateParseError::OutOfRange(s.to_string()))
}

/// Parse a `YYYY-MM-DD` date as found in storage.
pub fn parse_storage_date(s: &str) -> Result<NaiveDate, DateParseError> {
    NaiveDate::parse_from_str(s, STORAGE_DATE_FORMAT)
        .map_err(|_| DateParseError::InvalidFormat(s.to_string()))
}

/// Render a date in the storage format.
pub fn format_storage_date(date: NaiveDate) -> String {
    date.format(STORAGE_DATE_FORMAT).to_string()
}

/// Lower bound of the rolling 12-month window ending at `latest`.
pub fn rolling_window_start(latest: NaiveDate) -> NaiveDate {
    latest - Duration::days(ROLLING_WINDOW_DAYS)
}

/// An inclusive date range for temperature statistics.
///
/// The end is optional; an open range extends to the latest observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: Option<NaiveDate>) -> Result<Self, DateParseError> {
        if let Some(end) = end {
            if end < start {
                return Err(DateParseError::ReversedRange {
                    start: format_storage_date(start),
                    end: format_storage_date(end),
                });
            }
        }
        Ok(Self { start, end })
    }

    /// Build a range from the compact path segments.
    pub fn from_compact(start: &str, end: Option<&str>) -> Result<Self, DateParseError> {
        let start = parse_compact_date(start)?;
        let end = end.map(parse_compact_date).transpose()?;
        Self::new(start, end)
    }

    /// Start bound in storage format.
    pub fn start_key(&self) -> String {
        format_storage_date(self.start)
    }

    /// End bound in storage format, if any.
    pub fn end_key(&self) -> Option<String> {
        self.end.map(format_storage_date)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && self.end.map_or(true, |end| date <= end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_compact_date() {
        let d = parse_compact_date("20170823").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2017, 8, 23).unwrap());
    }

    #[test]
    fn test_rejects_impossible_dates() {
        assert!(matches!(
            parse_compact_date("99999999"),
            Err(DateParseError::OutOfRange(_))
        ));
        assert!(matches!(
            parse_compact_date("20170230"),
            Err(DateParseError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_rejects_non_compact_forms() {
        for input in ["2017-08-23", "2017082", "201708231", "2017O823", "", "+2017082"] {
            assert!(
                matches!(parse_compact_date(input), Err(DateParseError::InvalidFormat(_))),
                "accepted {input:?}"
            );
        }
    }

    #[test]
    fn test_rolling_window_start() {
        let latest = parse_storage_date("2017-08-23").unwrap();
        assert_eq!(format_storage_date(rolling_window_start(latest)), "2016-08-23");
    }

    #[test]
    fn test_range_keys() {
        let range = DateRange::from_compact("20170101", Some("20170107")).unwrap();
        assert_eq!(range.start_key(), "2017-01-01");
        assert_eq!(range.end_key().as_deref(), Some("2017-01-07"));
    }
}
