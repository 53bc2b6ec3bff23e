//! Daily wellness log records.
//!
//! One [`DailyLog`] exists per calendar date. Saving a log for a date that
//! already has one replaces it; logs are only removed by an explicit delete
//! or a full clear. The serialized form uses the camelCase field names of
//! the backup file format.

use crate::libs::messages::Message;
use crate::msg_bail_anyhow;
use anyhow::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Protocol tag used when a log does not name one.
pub const DEFAULT_PROTOCOL: &str = "16:8";

/// All logs keyed by their date, oldest first.
pub type LogBook = BTreeMap<NaiveDate, DailyLog>;

/// A single day's log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyLog {
    /// Calendar date, the unique key of the record.
    pub date: NaiveDate,
    /// Hours fasted on this date, 0 to 24.
    #[serde(default)]
    pub fasting_hours: f64,
    /// Body weight; the unit is a display preference.
    #[serde(default)]
    pub weight: Option<f64>,
    /// Glasses of water.
    #[serde(default)]
    pub hydration: u32,
    /// Mood on a 1 to 5 scale.
    #[serde(default)]
    pub mood: Option<u8>,
    #[serde(default)]
    pub notes: String,
    /// Only completed logs count towards statistics.
    #[serde(default)]
    pub completed: bool,
    #[serde(default = "default_protocol")]
    pub protocol: String,
}

fn default_protocol() -> String {
    DEFAULT_PROTOCOL.to_string()
}

impl DailyLog {
    /// An empty, not yet completed log for `date`.
    pub fn new(date: NaiveDate) -> Self {
        DailyLog {
            date,
            fasting_hours: 0.0,
            weight: None,
            hydration: 0,
            mood: None,
            notes: String::new(),
            completed: false,
            protocol: default_protocol(),
        }
    }

    /// The `yyyy-MM-dd` key of this log.
    pub fn key(&self) -> String {
        date_key(self.date)
    }

    /// Checks the value ranges of a log before it is saved.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=24.0).contains(&self.fasting_hours) {
            msg_bail_anyhow!(Message::InvalidFastingHours(self.fasting_hours));
        }
        if let Some(weight) = self.weight {
            if !(weight > 0.0) {
                msg_bail_anyhow!(Message::InvalidWeight(weight));
            }
        }
        if let Some(mood) = self.mood {
            if !(1..=5).contains(&mood) {
                msg_bail_anyhow!(Message::InvalidMood(mood));
            }
        }
        Ok(())
    }
}

/// Formats a date as the `yyyy-MM-dd` record key.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parses a `yyyy-MM-dd` record key.
pub fn parse_date_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_serializes_with_camel_case_fields() {
        let mut log = DailyLog::new(date(2024, 3, 9));
        log.fasting_hours = 16.5;
        log.completed = true;

        let json = serde_json::to_value(&log).unwrap();
        assert_eq!(json["date"], "2024-03-09");
        assert_eq!(json["fastingHours"], 16.5);
        assert_eq!(json["completed"], true);
        assert!(json["weight"].is_null());
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let log: DailyLog = serde_json::from_str(r#"{"date":"2024-03-09","completed":true}"#).unwrap();
        assert_eq!(log.fasting_hours, 0.0);
        assert_eq!(log.hydration, 0);
        assert_eq!(log.protocol, DEFAULT_PROTOCOL);
        assert!(log.completed);
    }

    #[test]
    fn test_validate_ranges() {
        let mut log = DailyLog::new(date(2024, 3, 9));
        assert!(log.validate().is_ok());

        log.fasting_hours = 25.0;
        assert!(log.validate().is_err());

        log.fasting_hours = 16.0;
        log.weight = Some(0.0);
        assert!(log.validate().is_err());

        log.weight = Some(72.4);
        log.mood = Some(6);
        assert!(log.validate().is_err());

        log.mood = Some(3);
        assert!(log.validate().is_ok());
    }

    #[test]
    fn test_date_key_round_trip() {
        assert_eq!(date_key(date(2024, 1, 5)), "2024-01-05");
        assert_eq!(parse_date_key("2024-01-05"), Some(date(2024, 1, 5)));
        assert_eq!(parse_date_key("05/01/2024"), None);
    }
}
