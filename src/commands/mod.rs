//! Command-line host.
//!
//! Each subcommand lives in its own module with an `Args` struct and a
//! `cmd` function. Commands never touch the durable store or the cache
//! directly; everything goes through the persistence facade, and the host
//! supplies the wall-clock time to the pure timer transitions.

pub mod clear;
pub mod delete;
pub mod export;
pub mod import;
pub mod init;
pub mod log;
pub mod settings;
pub mod show;
pub mod stats;
pub mod sync;
pub mod timer;

use crate::libs::{config::Config, data_storage::DataStorage, messages::Message, persistence::Persistence};
use crate::msg_error_anyhow;
use anyhow::Result;
use chrono::{Local, NaiveDate, Utc};
use clap::{Parser, Subcommand};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Configuration initialization")]
    Init(init::InitArgs),
    #[command(about = "Save the daily log for a date")]
    Log(log::LogArgs),
    #[command(about = "Show one daily log or all of them")]
    Show(show::ShowArgs),
    #[command(about = "Delete the daily log for a date")]
    Delete(delete::DeleteArgs),
    #[command(about = "Show fasting statistics")]
    Stats,
    #[command(about = "Control the fasting timer", arg_required_else_help = true)]
    Timer(timer::TimerArgs),
    #[command(about = "Show or change settings", arg_required_else_help = true)]
    Settings(settings::SettingsArgs),
    #[command(about = "Export logs to a backup file")]
    Export(export::ExportArgs),
    #[command(about = "Import logs from a backup file")]
    Import(import::ImportArgs),
    #[command(about = "Delete all stored data")]
    Clear(clear::ClearArgs),
    #[command(about = "Connectivity and background sync", arg_required_else_help = true)]
    Sync(sync::SyncArgs),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub async fn menu() -> Result<()> {
        let cli = Self::parse();
        match cli.command {
            Commands::Init(args) => init::cmd(args),
            Commands::Log(args) => log::cmd(args).await,
            Commands::Show(args) => show::cmd(args).await,
            Commands::Delete(args) => delete::cmd(args).await,
            Commands::Stats => stats::cmd().await,
            Commands::Timer(args) => timer::cmd(args).await,
            Commands::Settings(args) => settings::cmd(args).await,
            Commands::Export(args) => export::cmd(args).await,
            Commands::Import(args) => import::cmd(args).await,
            Commands::Clear(args) => clear::cmd(args).await,
            Commands::Sync(args) => sync::cmd(args).await,
        }
    }
}

/// Opens the persistence facade in the configured data directory.
pub(crate) fn open_persistence() -> Result<Persistence> {
    let storage = DataStorage::new();
    let config = Config::read_from(&storage)?;
    Persistence::from_config(&config, &storage)
}

/// Wall-clock time as epoch milliseconds.
pub(crate) fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Parses `today`, `yesterday` or a `yyyy-MM-dd` date.
pub(crate) fn parse_date(date_str: &str) -> Result<NaiveDate> {
    let today = Local::now().date_naive();
    match date_str.to_lowercase().as_str() {
        "today" => Ok(today),
        "yesterday" => today.pred_opt().ok_or_else(|| msg_error_anyhow!(Message::InvalidDate(date_str.to_string()))),
        _ => NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
            .map_err(|_| msg_error_anyhow!(Message::InvalidDate(date_str.to_string()))),
    }
}
