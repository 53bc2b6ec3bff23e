//! Core library modules for the fastslowly application.
//!
//! The persistence, sync and statistics core behind every command.
//!
//! ## Features
//!
//! - **Domain Records**: Daily logs, settings and the fasting timer
//! - **Dual-Tier Persistence**: Durable store with a fallback key-value cache
//! - **Offline Sync**: Queue of changes pushed to a remote on reconnect
//! - **Statistics**: Streaks, averages and weight trend over the log calendar
//! - **Backup**: JSON/CSV export and JSON import
//!
//! ## Usage
//!
//! ```rust,no_run
//! use fastslowly::libs::{config::Config, data_storage::DataStorage, persistence::{Persistence, Record}};
//! use fastslowly::libs::daily_log::DailyLog;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let persistence = Persistence::from_config(&Config::read()?, &DataStorage::new())?;
//! let log = DailyLog::new(chrono::Local::now().date_naive());
//! persistence.save(Record::Log(log)).await;
//! let stats = persistence.stats().await;
//! # Ok(())
//! # }
//! ```

pub mod backup;
pub mod cache;
pub mod config;
pub mod daily_log;
pub mod data_storage;
pub mod error;
pub mod messages;
pub mod persistence;
pub mod settings;
pub mod stats;
pub mod sync;
pub mod timer;
pub mod view;
