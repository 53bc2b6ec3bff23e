//! Persistence facade over the durable store and the fallback cache.
//!
//! Every read and write of application data goes through [`Persistence`].
//! The durable store is authoritative; the fallback cache is a best-effort
//! mirror that keeps the app usable when the store cannot be opened or is
//! locked. No method here returns a storage error: failures are logged and
//! absorbed, and reads degrade to the cache and then to defaults.
//!
//! ## Write Path
//!
//! ```text
//! save(record) ──▶ durable store (one transaction)
//!              ──▶ offline queue (only while offline)
//!              ──▶ fallback cache mirror (always attempted)
//! ```
//!
//! ## Read Path
//!
//! | Domain            | Order                                            |
//! |-------------------|--------------------------------------------------|
//! | log by date       | store, then cache when absent or unavailable     |
//! | all logs          | store only; empty when unavailable               |
//! | settings / timer  | store, then cache when empty, then defaults      |
//!
//! ## Usage
//!
//! ```rust,no_run
//! use fastslowly::libs::{config::Config, data_storage::DataStorage, persistence::{Persistence, Record}};
//! use fastslowly::libs::daily_log::DailyLog;
//! use chrono::Local;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let persistence = Persistence::from_config(&Config::read()?, &DataStorage::new())?;
//! persistence.save(Record::Log(DailyLog::new(Local::now().date_naive()))).await;
//! let stats = persistence.stats().await;
//! # Ok(())
//! # }
//! ```

use crate::api::{Remote, RemoteSync};
use crate::db::db::Db;
use crate::libs::cache::{self, Cache};
use crate::libs::config::Config;
use crate::libs::daily_log::{date_key, parse_date_key, DailyLog, LogBook};
use crate::libs::data_storage::DataStorage;
use crate::libs::error::{Result, TrackerError};
use crate::libs::messages::Message;
use crate::libs::settings::Settings;
use crate::libs::stats::{compute_stats, Stats};
use crate::libs::sync::{SyncCoordinator, SyncOutcome};
use crate::libs::timer::TimerState;
use crate::{db, msg_debug, msg_warning};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

/// The data domains the facade persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Log,
    Settings,
    Timer,
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Log => "log",
            Domain::Settings => "settings",
            Domain::Timer => "timer",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Domain {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "log" => Ok(Domain::Log),
            "settings" => Ok(Domain::Settings),
            "timer" => Ok(Domain::Timer),
            other => Err(TrackerError::Serialization(format!("unknown domain '{}'", other))),
        }
    }
}

/// A record of one of the persisted domains.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Log(DailyLog),
    Settings(Settings),
    Timer(TimerState),
}

impl Record {
    pub fn domain(&self) -> Domain {
        match self {
            Record::Log(_) => Domain::Log,
            Record::Settings(_) => Domain::Settings,
            Record::Timer(_) => Domain::Timer,
        }
    }

    /// Key of the record within its domain.
    pub fn key(&self) -> String {
        match self {
            Record::Log(log) => log.key(),
            Record::Settings(_) => db::SETTINGS_KEY.to_string(),
            Record::Timer(_) => db::TIMER_KEY.to_string(),
        }
    }

    fn cache_key(&self) -> String {
        match self {
            Record::Log(log) => cache::log_key(&log.key()),
            Record::Settings(_) => cache::SETTINGS_KEY.to_string(),
            Record::Timer(_) => cache::TIMER_KEY.to_string(),
        }
    }

    fn to_value(&self) -> Result<Value> {
        Ok(match self {
            Record::Log(log) => serde_json::to_value(log)?,
            Record::Settings(settings) => serde_json::to_value(settings)?,
            Record::Timer(timer) => serde_json::to_value(timer)?,
        })
    }

    /// Decodes an untyped value into the record type of `domain`.
    pub fn from_value(domain: Domain, value: Value) -> Result<Self> {
        Ok(match domain {
            Domain::Log => Record::Log(serde_json::from_value(value)?),
            Domain::Settings => Record::Settings(serde_json::from_value(value)?),
            Domain::Timer => Record::Timer(serde_json::from_value(value)?),
        })
    }
}

/// Result of an untyped [`Persistence::load`].
#[derive(Debug, Clone, PartialEq)]
pub enum LoadResult {
    Log(Option<DailyLog>),
    Logs(LogBook),
    Settings(Settings),
    Timer(TimerState),
}

pub struct Persistence<R: RemoteSync = Remote> {
    db: Db,
    cache: Arc<Cache>,
    sync: SyncCoordinator<R>,
}

impl Persistence<Remote> {
    /// Builds the facade from configuration, rooted at `storage`.
    ///
    /// The durable store is not opened here; the first operation opens it.
    pub fn from_config(config: &Config, storage: &DataStorage) -> anyhow::Result<Self> {
        let storage_config = config.storage_or_default();
        let sync_config = config.sync_or_default();

        let db = Db::new(
            storage.get_path(&storage_config.db_file)?,
            Duration::from_millis(storage_config.busy_timeout_ms),
        );
        let cache = Arc::new(Cache::new(
            storage.get_path(&storage_config.cache_file)?,
            storage_config.cache_quota_bytes,
        ));
        let sync = SyncCoordinator::new(cache.clone(), Remote::from_config(&sync_config), sync_config.auto_sync);

        Ok(Self::new(db, cache, sync))
    }
}

impl<R: RemoteSync> Persistence<R> {
    pub fn new(db: Db, cache: Arc<Cache>, sync: SyncCoordinator<R>) -> Self {
        Persistence { db, cache, sync }
    }

    pub fn db(&self) -> &Db {
        &self.db
    }

    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    pub fn sync(&self) -> &SyncCoordinator<R> {
        &self.sync
    }

    /// Saves a record to both backends.
    ///
    /// While offline the record is also queued for the next sync, ahead of
    /// the cache mirror, so cached log mirrors may be evicted to keep the
    /// queue within the cache quota. Backend failures are logged and never
    /// reported: the result is always true.
    pub async fn save(&self, record: Record) -> bool {
        let domain = record.domain();
        let key = record.key();

        let stored = self.write_store(&record);
        let cached = match record.to_value() {
            Ok(value) => {
                if !self.sync.is_online() && !self.sync.enqueue(domain, &key, value.clone()) {
                    msg_warning!(Message::SyncEnqueueFailed(domain.to_string(), key.clone()));
                }
                self.mirror(&record, &value)
            }
            Err(e) => {
                msg_warning!(Message::RecordEncodeFailed(domain.to_string(), e.to_string()));
                false
            }
        };

        if let Err(e) = stored {
            if cached {
                msg_warning!(Message::StoreWriteCached(domain.to_string(), e.to_string()));
            } else {
                msg_warning!(Message::StoreWriteFailed(domain.to_string(), e.to_string()));
                msg_warning!(Message::SaveNotPersisted(domain.to_string(), key));
            }
        }
        true
    }

    /// Untyped save. Returns false for an unknown domain name or a value
    /// that does not decode into that domain's record.
    pub async fn save_value(&self, domain: &str, value: Value) -> bool {
        let record = domain.parse::<Domain>().and_then(|domain| Record::from_value(domain, value));
        match record {
            Ok(record) => self.save(record).await,
            Err(e) => {
                msg_warning!(Message::UnknownRecord(domain.to_string(), e.to_string()));
                false
            }
        }
    }

    /// Untyped load. A log `key` selects one day; without it all logs are
    /// returned. Keys are ignored for settings and timer.
    pub async fn load(&self, domain: Domain, key: Option<&str>) -> LoadResult {
        match domain {
            Domain::Log => match key {
                Some(key) => match parse_date_key(key) {
                    Some(date) => LoadResult::Log(self.load_log(date).await),
                    None => LoadResult::Log(None),
                },
                None => LoadResult::Logs(self.load_logs().await),
            },
            Domain::Settings => LoadResult::Settings(self.load_settings().await),
            Domain::Timer => LoadResult::Timer(self.load_timer().await),
        }
    }

    pub async fn load_log(&self, date: NaiveDate) -> Option<DailyLog> {
        match self.db.logs().get(date) {
            Ok(Some(log)) => return Some(log),
            Ok(None) => {}
            Err(e) => msg_warning!(Message::StoreReadFailed(Domain::Log.to_string(), e.to_string())),
        }
        self.cache.get_opt(&cache::log_key(&date_key(date)))
    }

    /// Every log in the durable store. Empty when the store is unavailable,
    /// since the cache cannot enumerate its entries by domain.
    pub async fn load_logs(&self) -> LogBook {
        self.db.logs().get_all().unwrap_or_else(|e| {
            msg_warning!(Message::StoreReadFailed(Domain::Log.to_string(), e.to_string()));
            LogBook::new()
        })
    }

    pub async fn load_settings(&self) -> Settings {
        let stored = self.read_document(Domain::Settings, self.db.settings().get());
        match stored.or_else(|| self.cached_document(cache::SETTINGS_KEY)) {
            Some(value) => Settings::merged_over_defaults(&value),
            None => Settings::default(),
        }
    }

    pub async fn load_timer(&self) -> TimerState {
        let stored = self.read_document(Domain::Timer, self.db.timer().get());
        stored
            .or_else(|| self.cached_document(cache::TIMER_KEY))
            .and_then(|value| serde_json::from_value(value).ok())
            .unwrap_or_default()
    }

    /// Removes a log from both backends. Returns false when neither backend
    /// could be updated.
    pub async fn delete_log(&self, date: NaiveDate) -> bool {
        let deleted = match self.db.logs().delete(date) {
            Ok(_) => true,
            Err(e) => {
                msg_warning!(Message::StoreWriteFailed(Domain::Log.to_string(), e.to_string()));
                false
            }
        };
        let uncached = self.cache.remove(&cache::log_key(&date_key(date)));
        deleted || uncached
    }

    /// Empties the durable store (atomically) and the cache. Both are always
    /// attempted; true only when both succeed. Connectivity state is written
    /// back after the cache is emptied.
    pub async fn clear_all(&self) -> bool {
        let store_cleared = match self.db.clear_all() {
            Ok(()) => true,
            Err(e) => {
                msg_warning!(Message::StoreClearFailed(e.to_string()));
                false
            }
        };
        let cache_cleared = self.cache.clear();
        self.sync.persist_state();
        store_cleared && cache_cleared
    }

    /// Statistics over every stored log.
    pub async fn stats(&self) -> Stats {
        compute_stats(&self.load_logs().await)
    }

    pub async fn on_online(&self) -> Result<SyncOutcome> {
        self.sync.on_online().await
    }

    pub fn on_offline(&self) {
        self.sync.on_offline()
    }

    fn write_store(&self, record: &Record) -> Result<()> {
        match record {
            Record::Log(log) => self.db.logs().put(log),
            Record::Settings(settings) => self.db.settings().put(&serde_json::to_value(settings)?),
            Record::Timer(timer) => self.db.timer().put(&serde_json::to_value(timer)?),
        }
    }

    /// Writes the cache copy of a record, plus the boot keys for settings.
    fn mirror(&self, record: &Record, value: &Value) -> bool {
        let cache_key = record.cache_key();
        let cached = self.cache.set(&cache_key, value);
        if !cached {
            msg_debug!(Message::CacheMirrorFailed(cache_key));
        }
        if let Record::Settings(settings) = record {
            self.cache.set(cache::THEME_KEY, settings.theme.as_str());
            self.cache.set(cache::BOOT_SETTINGS_KEY, settings);
        }
        cached
    }

    /// A stored singleton, or `None` when it is absent, empty or unreadable.
    fn read_document(&self, domain: Domain, stored: Result<Option<Value>>) -> Option<Value> {
        match stored {
            Ok(value) => value.filter(|value| !is_empty_document(value)),
            Err(e) => {
                msg_warning!(Message::StoreReadFailed(domain.to_string(), e.to_string()));
                None
            }
        }
    }

    fn cached_document(&self, key: &str) -> Option<Value> {
        self.cache
            .get_opt::<Value>(key)
            .filter(|value| !is_empty_document(value))
    }
}

fn is_empty_document(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}
