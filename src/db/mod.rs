//! Durable store for the fastslowly application.
//!
//! A versioned SQLite database with three independently keyed collections:
//!
//! | Collection | Table      | Key                         | Record            |
//! |------------|------------|-----------------------------|-------------------|
//! | Logs       | `logs`     | ISO date (`yyyy-MM-dd`)     | one row per day   |
//! | Settings   | `settings` | fixed `"app"`               | JSON document     |
//! | Timer      | `timer`    | fixed `"current"`           | JSON document     |
//!
//! Every operation is a self-contained transaction, and every failure
//! (cannot open, cannot migrate, locked by another connection) is reported
//! as [`TrackerError::StoreUnavailable`](crate::libs::error::TrackerError).
//! The store never decides what to do about a failure; that is the job of
//! the persistence facade.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use fastslowly::db::{db::{Db, DEFAULT_BUSY_TIMEOUT}, Collection};
//! use fastslowly::libs::daily_log::DailyLog;
//! use chrono::NaiveDate;
//!
//! let db = Db::open("fastslowly.db", DEFAULT_BUSY_TIMEOUT)?;
//! let log = DailyLog::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
//! db.logs().put(&log)?;
//! db.clear(Collection::Logs)?;
//! # Ok::<(), fastslowly::libs::error::TrackerError>(())
//! ```

/// Connection handling, lazy initialisation and whole-store operations.
pub mod db;

/// Versioned, additive schema migrations.
pub mod migrations;

/// The daily log calendar.
pub mod logs;

/// Single-key JSON document collections (settings, timer).
pub mod singletons;

/// Fixed key of the settings document.
pub const SETTINGS_KEY: &str = "app";

/// Fixed key of the timer document.
pub const TIMER_KEY: &str = "current";

/// The independently keyed record collections of the durable store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Logs,
    Settings,
    Timer,
}

impl Collection {
    pub const ALL: [Collection; 3] = [Collection::Logs, Collection::Settings, Collection::Timer];

    pub fn table(&self) -> &'static str {
        match self {
            Collection::Logs => "logs",
            Collection::Settings => "settings",
            Collection::Timer => "timer",
        }
    }

    /// Primary key column of the collection's table.
    pub fn key_column(&self) -> &'static str {
        match self {
            Collection::Logs => "date",
            Collection::Settings => "key",
            Collection::Timer => "id",
        }
    }

    /// Fixed key for singleton collections.
    pub fn singleton_key(&self) -> Option<&'static str> {
        match self {
            Collection::Logs => None,
            Collection::Settings => Some(SETTINGS_KEY),
            Collection::Timer => Some(TIMER_KEY),
        }
    }
}
