//! Core record type for speedwatch.
//!
//! This module defines the speed-camera observation record and the
//! day-key formatting that partitions records into per-day files.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Format of a day key, and of the `date` query parameter.
pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// Format of the full observation timestamp accepted at registration.
pub const TIMESTAMP_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

/// A single speed-camera observation.
///
/// Serialized as a JSON object. Empty vehicle numbers and zero speeds are
/// omitted on serialization, and any missing field deserializes to its
/// zero-value equivalent, so consumers must tolerate partial objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Record {
    /// When the observation was made.
    pub date: DateTime<Utc>,

    /// The observed vehicle's registration plate.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub vehicle_number: String,

    /// The observed speed. Positive in every stored record; zero only in
    /// the placeholder value deserialized from a partial object.
    #[serde(skip_serializing_if = "is_zero")]
    pub speed: f64,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_zero(speed: &f64) -> bool {
    *speed == 0.0
}

impl Default for Record {
    fn default() -> Self {
        Self {
            date: DateTime::UNIX_EPOCH,
            vehicle_number: String::new(),
            speed: 0.0,
        }
    }
}

impl Record {
    /// Create a new record.
    #[must_use]
    pub fn new(date: DateTime<Utc>, vehicle_number: impl Into<String>, speed: f64) -> Self {
        Self {
            date,
            vehicle_number: vehicle_number.into(),
            speed,
        }
    }

    /// The calendar day this record belongs to.
    #[must_use]
    pub fn day(&self) -> NaiveDate {
        self.date.date_naive()
    }

    /// Check if this is the zero-value placeholder record.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.vehicle_number.is_empty() && self.speed == 0.0
    }
}

/// Format a date as a day key (`DD.MM.YYYY`).
#[must_use]
pub fn day_key(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse a day key (`DD.MM.YYYY`) into a date.
///
/// # Errors
///
/// Returns a parse error if the input does not match [`DATE_FORMAT`].
pub fn parse_date(input: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(input, DATE_FORMAT)
}

/// Parse an observation timestamp (`DD.MM.YYYY HH:MM:SS`).
///
/// # Errors
///
/// Returns a parse error if the input does not match [`TIMESTAMP_FORMAT`].
pub fn parse_timestamp(input: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    let naive = NaiveDateTime::parse_from_str(input, TIMESTAMP_FORMAT)?;
    Ok(naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Record {
        Record::new(
            parse_timestamp("14.03.2021 08:15:00").unwrap(),
            "6048 EC-3",
            54.2,
        )
    }

    #[test]
    fn test_day_key_format() {
        let date = NaiveDate::from_ymd_opt(2021, 3, 14).unwrap();
        assert_eq!(day_key(date), "14.03.2021");
    }

    #[test]
    fn test_day_key_pads_single_digits() {
        let date = NaiveDate::from_ymd_opt(2021, 1, 2).unwrap();
        assert_eq!(day_key(date), "02.01.2021");
    }

    #[test]
    fn test_parse_date_round_trip() {
        let date = parse_date("14.03.2021").unwrap();
        assert_eq!(day_key(date), "14.03.2021");
    }

    #[test]
    fn test_parse_date_rejects_iso() {
        assert!(parse_date("2021-03-14").is_err());
    }

    #[test]
    fn test_parse_timestamp() {
        let ts = parse_timestamp("14.03.2021 08:15:30").unwrap();
        assert_eq!(ts.date_naive(), NaiveDate::from_ymd_opt(2021, 3, 14).unwrap());
    }

    #[test]
    fn test_record_day_matches_timestamp() {
        let record = sample();
        assert_eq!(day_key(record.day()), "14.03.2021");
    }

    #[test]
    fn test_serialize_skips_empty_fields() {
        let record = Record {
            vehicle_number: String::new(),
            speed: 0.0,
            ..sample()
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("vehicle_number"));
        assert!(!json.contains("speed"));
        assert!(json.contains("date"));
    }

    #[test]
    fn test_serialize_keeps_populated_fields() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert!(json.contains("\"vehicle_number\":\"6048 EC-3\""));
        assert!(json.contains("\"speed\":54.2"));
    }

    #[test]
    fn test_deserialize_missing_fields_defaults() {
        let record: Record = serde_json::from_str("{}").unwrap();
        assert!(record.is_placeholder());
        assert_eq!(record, Record::default());
    }

    #[test]
    fn test_deserialize_round_trip() {
        let record = sample();
        let json = serde_json::to_string(&record).unwrap();
        let back: Record = serde_json::from_str(&json).unwrap();
        assert_eq!(record, back);
    }

    #[test]
    fn test_default_is_placeholder() {
        assert!(Record::default().is_placeholder());
        assert!(!sample().is_placeholder());
    }
}
