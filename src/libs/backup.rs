//! Backup export and import of the daily log calendar.
//!
//! ## Features
//!
//! - **JSON backup**: `{ "dailyLogs": {...}, "exportDate": ..., "version": "1.0" }`,
//!   the only format that can be imported back
//! - **CSV export**: one row per log for spreadsheets
//! - **Validated import**: the whole file is decoded and checked before the
//!   first record is written, so a bad file changes nothing
//!
//! Importing merges into the existing calendar. A log in the file replaces
//! the stored log for the same date; dates absent from the file are kept.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use fastslowly::libs::backup::{Backup, BackupFormat};
//! # use fastslowly::libs::persistence::Persistence;
//! # async fn run(persistence: &Persistence) -> anyhow::Result<()> {
//! let backup = Backup::new(BackupFormat::Json, None);
//! backup.export(persistence).await?;
//! let imported = Backup::import(persistence, backup.output_path()).await?;
//! # Ok(())
//! # }
//! ```

use crate::api::RemoteSync;
use crate::libs::daily_log::{date_key, parse_date_key, DailyLog, LogBook};
use crate::libs::error::{Result as TrackerResult, TrackerError};
use crate::libs::messages::Message;
use crate::libs::persistence::{Persistence, Record};
use crate::{msg_info, msg_success, msg_warning};
use anyhow::Result;
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

pub const BACKUP_VERSION: &str = "1.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum BackupFormat {
    /// Full JSON backup that can be imported again.
    Json,
    /// Flat table of logs.
    Csv,
}

/// The JSON backup document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub daily_logs: LogBook,
    pub export_date: DateTime<Utc>,
    pub version: String,
}

/// One CSV row.
#[derive(Debug, Serialize)]
struct CsvLog<'a> {
    date: String,
    fasting_hours: f64,
    weight: Option<f64>,
    hydration: u32,
    mood: Option<u8>,
    completed: bool,
    protocol: &'a str,
    notes: &'a str,
}

pub struct Backup {
    format: BackupFormat,
    output_path: PathBuf,
}

impl Backup {
    /// Without an explicit path the file is named
    /// `fastslowly-backup-<date>.<ext>` in the working directory.
    pub fn new(format: BackupFormat, output_path: Option<PathBuf>) -> Self {
        let extension = match format {
            BackupFormat::Json => "json",
            BackupFormat::Csv => "csv",
        };
        let output_path = output_path.unwrap_or_else(|| {
            PathBuf::from(format!("fastslowly-backup-{}.{}", Local::now().format("%Y-%m-%d"), extension))
        });
        Self { format, output_path }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Writes every stored log in the configured format. Returns the number
    /// of logs written.
    pub async fn export<R: RemoteSync>(&self, persistence: &Persistence<R>) -> Result<usize> {
        let logs = persistence.load_logs().await;
        if logs.is_empty() {
            msg_info!(Message::BackupNoLogs);
        }
        match self.format {
            BackupFormat::Json => self.write_json(&logs)?,
            BackupFormat::Csv => self.write_csv(&logs)?,
        }
        msg_success!(Message::BackupExported(logs.len(), self.output_path.display().to_string()));
        Ok(logs.len())
    }

    fn write_json(&self, logs: &LogBook) -> Result<()> {
        let document = ExportDocument {
            daily_logs: logs.clone(),
            export_date: Utc::now(),
            version: BACKUP_VERSION.to_string(),
        };
        let file = File::create(&self.output_path)?;
        serde_json::to_writer_pretty(file, &document)?;
        Ok(())
    }

    fn write_csv(&self, logs: &LogBook) -> Result<()> {
        let mut wtr = csv::Writer::from_path(&self.output_path)?;
        for log in logs.values() {
            wtr.serialize(CsvLog {
                date: date_key(log.date),
                fasting_hours: log.fasting_hours,
                weight: log.weight,
                hydration: log.hydration,
                mood: log.mood,
                completed: log.completed,
                protocol: &log.protocol,
                notes: &log.notes,
            })?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Decodes and validates a backup document.
    ///
    /// # Errors
    ///
    /// [`TrackerError::ImportFormat`] when the input is not a JSON object,
    /// has no `dailyLogs` object, contains a log that does not decode, or
    /// files a log under a key other than its own date.
    pub fn parse(json: &str) -> TrackerResult<LogBook> {
        let document: Value =
            serde_json::from_str(json).map_err(|e| TrackerError::ImportFormat(format!("not valid JSON: {}", e)))?;
        let Some(document) = document.as_object() else {
            return Err(TrackerError::ImportFormat("expected a JSON object".to_string()));
        };
        let Some(daily_logs) = document.get("dailyLogs") else {
            return Err(TrackerError::ImportFormat("missing dailyLogs".to_string()));
        };
        let Some(daily_logs) = daily_logs.as_object() else {
            return Err(TrackerError::ImportFormat("dailyLogs must be an object".to_string()));
        };
        if let Some(version) = document.get("version").and_then(Value::as_str) {
            if version != BACKUP_VERSION {
                msg_warning!(Message::BackupVersionMismatch(version.to_string()));
            }
        }
        decode_logs(daily_logs)
    }

    /// Imports a backup file. Nothing is written unless the whole file is valid.
    pub async fn import<R: RemoteSync>(persistence: &Persistence<R>, path: &Path) -> Result<usize> {
        let json = fs::read_to_string(path)?;
        Ok(Self::import_str(persistence, &json).await?)
    }

    /// Imports a backup document already in memory.
    pub async fn import_str<R: RemoteSync>(persistence: &Persistence<R>, json: &str) -> TrackerResult<usize> {
        let logs = Self::parse(json)?;
        let count = logs.len();
        for log in logs.into_values() {
            persistence.save(Record::Log(log)).await;
        }
        Ok(count)
    }
}

fn decode_logs(daily_logs: &Map<String, Value>) -> TrackerResult<LogBook> {
    let mut logs = LogBook::new();
    for (key, value) in daily_logs {
        let Some(date) = parse_date_key(key) else {
            return Err(TrackerError::ImportFormat(format!("'{}' is not a yyyy-MM-dd date", key)));
        };
        let log: DailyLog = serde_json::from_value(value.clone())
            .map_err(|e| TrackerError::ImportFormat(format!("log {}: {}", key, e)))?;
        if log.date != date {
            return Err(TrackerError::ImportFormat(format!("log {} is filed under {}", log.key(), key)));
        }
        log.validate()
            .map_err(|e| TrackerError::ImportFormat(format!("log {}: {}", key, e)))?;
        logs.insert(date, log);
    }
    Ok(logs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_accepts_exported_shape() {
        let json = r#"{
            "dailyLogs": {
                "2024-01-01": {"date": "2024-01-01", "fastingHours": 16, "completed": true, "protocol": "16:8"},
                "2024-01-02": {"date": "2024-01-02", "fastingHours": 18.5, "weight": 80.1, "mood": 4}
            },
            "exportDate": "2024-01-03T10:00:00.000Z",
            "version": "1.0"
        }"#;
        let logs = Backup::parse(json).unwrap();

        assert_eq!(logs.len(), 2);
        let second = &logs[&NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()];
        assert_eq!(second.fasting_hours, 18.5);
        assert_eq!(second.weight, Some(80.1));
        assert!(!second.completed);
    }

    #[test]
    fn test_parse_rejects_missing_daily_logs() {
        let err = Backup::parse(r#"{"exportDate": "2024-01-03T10:00:00Z", "version": "1.0"}"#).unwrap_err();
        assert!(matches!(err, TrackerError::ImportFormat(_)));
    }

    #[test]
    fn test_parse_rejects_malformed_input() {
        for json in [
            "not json",
            "[]",
            r#"{"dailyLogs": []}"#,
            r#"{"dailyLogs": {"yesterday": {"date": "2024-01-01"}}}"#,
            r#"{"dailyLogs": {"2024-01-01": {"fastingHours": 16}}}"#,
            r#"{"dailyLogs": {"2024-01-01": {"date": "2024-01-02"}}}"#,
            r#"{"dailyLogs": {"2024-01-01": {"date": "2024-01-01", "fastingHours": 99}}}"#,
            r#"{"dailyLogs": {"2024-01-01": {"date": "2024-01-01", "mood": 9}}}"#,
            r#"{"dailyLogs": {"2024-01-01": {"date": "2024-01-01", "weight": -5}}}"#,
        ] {
            assert!(
                matches!(Backup::parse(json), Err(TrackerError::ImportFormat(_))),
                "accepted: {}",
                json
            );
        }
    }

    #[test]
    fn test_document_serializes_camel_case() {
        let document = ExportDocument {
            daily_logs: LogBook::new(),
            export_date: Utc::now(),
            version: BACKUP_VERSION.to_string(),
        };
        let value = serde_json::to_value(&document).unwrap();
        assert!(value.get("dailyLogs").is_some());
        assert!(value.get("exportDate").is_some());
        assert_eq!(value["version"], "1.0");
    }
}
