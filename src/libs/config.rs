//! Configuration management for the fastslowly application.
//!
//! Holds the settings of the persistence core itself (file names, cache
//! quota, lock timeout) and of the optional sync endpoint. User preferences
//! such as theme or units are *not* stored here; they are a persisted
//! record of their own (see [`crate::libs::settings`]).
//!
//! ## Configuration Structure
//!
//! - **Storage Config**: durable store and fallback cache locations and limits
//! - **Sync Config**: remote endpoint and reconnect behaviour
//!
//! ## Storage
//!
//! The configuration file is `config.json` in the platform data directory
//! resolved by [`DataStorage`]. A missing file yields the default
//! configuration; every section is optional.
//!
//! ## Usage Examples
//!
//! ```rust,no_run
//! use fastslowly::libs::config::Config;
//!
//! let config = Config::read()?;
//! let storage = config.storage_or_default();
//! println!("Cache quota: {} bytes", storage.cache_quota_bytes);
//! # Ok::<(), anyhow::Error>(())
//! ```

use super::cache::{CACHE_FILE_NAME, DEFAULT_QUOTA_BYTES};
use super::data_storage::DataStorage;
use crate::db::db::{DB_FILE_NAME, DEFAULT_BUSY_TIMEOUT};
use crate::libs::messages::Message;
use crate::msg_print;
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, MultiSelect};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};

/// Configuration file name used for storing application settings.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Represents a configurable module in the interactive setup wizard.
#[derive(Debug, Clone)]
pub struct ConfigModule {
    /// Unique identifier for the module used in configuration routing
    pub key: String,
    /// Display name shown to users during interactive setup
    pub name: String,
}

/// Durable store and fallback cache settings.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct StorageConfig {
    /// SQLite file holding the logs, settings and timer collections.
    pub db_file: String,

    /// JSON file backing the fallback key-value cache.
    pub cache_file: String,

    /// Maximum serialized size of the fallback cache in bytes.
    ///
    /// Writes that would grow the cache past this size are refused, the
    /// same way a browser refuses local-storage writes over quota.
    pub cache_quota_bytes: usize,

    /// How long a store operation waits on a lock held by another
    /// connection before the store is reported unavailable.
    pub busy_timeout_ms: u64,
}

/// Remote sync endpoint settings.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SyncConfig {
    /// Base URL of the sync server. When absent the stub remote is used
    /// and every batch is acknowledged locally.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// Drain the offline queue on every online transition.
    pub auto_sync: bool,
}

/// Main configuration container.
///
/// All sections are optional so an empty or partial `config.json` is valid;
/// missing sections fall back to their defaults through the `*_or_default`
/// accessors.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<StorageConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sync: Option<SyncConfig>,
}

impl Default for StorageConfig {
    /// Defaults:
    /// - `fastslowly.db` durable store
    /// - `cache.json` fallback cache
    /// - 5 MiB cache quota
    /// - 250ms lock wait
    fn default() -> Self {
        StorageConfig {
            db_file: DB_FILE_NAME.to_string(),
            cache_file: CACHE_FILE_NAME.to_string(),
            cache_quota_bytes: DEFAULT_QUOTA_BYTES,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT.as_millis() as u64,
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            api_url: None,
            auto_sync: true,
        }
    }
}

impl Config {
    /// Reads configuration from the platform data directory.
    ///
    /// A missing file is not an error and yields [`Config::default`]; a file
    /// that exists but cannot be parsed is.
    pub fn read() -> Result<Config> {
        Self::read_from(&DataStorage::new())
    }

    /// Reads configuration from an explicit data directory.
    pub fn read_from(storage: &DataStorage) -> Result<Config> {
        let config_file_path = storage.get_path(CONFIG_FILE_NAME)?;

        if !config_file_path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(config_file_path)?;
        let config: Config = serde_json::from_str(&config_str)?;
        Ok(config)
    }

    /// Saves the configuration as pretty-printed JSON.
    pub fn save(&self) -> Result<()> {
        self.save_to(&DataStorage::new())
    }

    pub fn save_to(&self, storage: &DataStorage) -> Result<()> {
        let config_file_path = storage.get_path(CONFIG_FILE_NAME)?;
        let config_file = File::create(config_file_path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    pub fn storage_or_default(&self) -> StorageConfig {
        self.storage.clone().unwrap_or_default()
    }

    pub fn sync_or_default(&self) -> SyncConfig {
        self.sync.clone().unwrap_or_default()
    }

    /// Runs the interactive configuration wizard.
    ///
    /// Starts from the existing configuration so current values are offered
    /// as defaults, lets the user pick which sections to edit, and returns
    /// the updated configuration without saving it.
    pub fn init() -> Result<Self> {
        let mut config = Self::read().unwrap_or_default();

        let modules = vec![
            ConfigModule {
                key: "storage".to_string(),
                name: "Storage".to_string(),
            },
            ConfigModule {
                key: "sync".to_string(),
                name: "Sync".to_string(),
            },
        ];

        let selected = MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptSelectModules.to_string())
            .items(&modules.iter().map(|module| &module.name).collect::<Vec<_>>())
            .interact()?;

        for &selection in &selected {
            match modules[selection].key.as_str() {
                "storage" => {
                    let default = config.storage_or_default();
                    msg_print!(Message::ConfigModuleStorage);
                    config.storage = Some(StorageConfig {
                        db_file: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptDbFile.to_string())
                            .default(default.db_file)
                            .interact_text()?,
                        cache_file: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptCacheFile.to_string())
                            .default(default.cache_file)
                            .interact_text()?,
                        cache_quota_bytes: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptCacheQuota.to_string())
                            .default(default.cache_quota_bytes)
                            .interact_text()?,
                        busy_timeout_ms: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptBusyTimeout.to_string())
                            .default(default.busy_timeout_ms)
                            .interact_text()?,
                    });
                }
                "sync" => {
                    let default = config.sync_or_default();
                    msg_print!(Message::ConfigModuleSync);
                    let api_url: String = Input::with_theme(&ColorfulTheme::default())
                        .with_prompt(Message::PromptSyncApiUrl.to_string())
                        .default(default.api_url.unwrap_or_default())
                        .allow_empty(true)
                        .interact_text()?;
                    config.sync = Some(SyncConfig {
                        api_url: Some(api_url.trim().to_string()).filter(|url| !url.is_empty()),
                        auto_sync: Confirm::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptAutoSync.to_string())
                            .default(default.auto_sync)
                            .interact()?,
                    });
                }
                _ => {}
            }
        }

        Ok(config)
    }
}
