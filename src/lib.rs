//! # FastSlowly - offline-first intermittent fasting tracker
//!
//! Persistence, sync and statistics core of a fasting tracker, with a
//! command-line host for logging fasts and running the fasting timer.
//!
//! ## Features
//!
//! - **Daily Log**: Fasting hours, weight, hydration, mood and notes per day
//! - **Fasting Timer**: Start, pause, resume and stop a fast against a protocol
//! - **Statistics**: Current and longest streaks, averages, weight change
//! - **Offline First**: Durable SQLite store backed by a JSON fallback cache
//! - **Background Sync**: Changes made offline are pushed when back online
//! - **Backup**: Export to JSON or CSV, import from JSON
//!
//! ## Usage
//!
//! ```rust,no_run
//! use fastslowly::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod api;
pub mod commands;
pub mod db;
pub mod libs;
