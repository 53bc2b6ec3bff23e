//! Fallback key-value cache.
//!
//! A synchronous, best-effort mirror of the durable store persisted as one
//! JSON file. Each entry's value is itself a JSON-serialized string, so a
//! corrupt entry only affects its own key. The file is re-read on every
//! operation; nothing is held in memory between calls.
//!
//! No operation returns an error. Writes report success as a `bool` and
//! reads fall back to the caller's default:
//!
//! | Failure                               | `set`/`remove`/`clear` | `get`     |
//! |---------------------------------------|------------------------|-----------|
//! | value cannot be serialized            | `false`                |           |
//! | write would exceed the byte quota     | `false`                |           |
//! | file cannot be read or written        | `false`                | `default` |
//! | key missing or entry does not decode  |                        | `default` |
//!
//! ## Keys
//!
//! `log_<date>`, `settings`, `timer`, `offlineQueue`, `syncState`, `theme`
//! and `fastslowly-settings`.

use crate::libs::messages::Message;
use crate::{msg_debug, msg_warning};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const CACHE_FILE_NAME: &str = "cache.json";

/// Browser local-storage sized default quota.
pub const DEFAULT_QUOTA_BYTES: usize = 5 * 1024 * 1024;

pub const SETTINGS_KEY: &str = "settings";
pub const TIMER_KEY: &str = "timer";
pub const OFFLINE_QUEUE_KEY: &str = "offlineQueue";
pub const SYNC_STATE_KEY: &str = "syncState";
pub const THEME_KEY: &str = "theme";
pub const BOOT_SETTINGS_KEY: &str = "fastslowly-settings";

/// Cache key of the log for `date` (`yyyy-MM-dd`).
pub fn log_key(date: &str) -> String {
    format!("log_{}", date)
}

/// True for per-day log mirror keys.
pub fn is_log_key(key: &str) -> bool {
    key.starts_with("log_")
}

type Entries = BTreeMap<String, String>;

pub struct Cache {
    path: PathBuf,
    quota_bytes: usize,
    lock: Mutex<()>,
}

impl Cache {
    pub fn new(path: impl Into<PathBuf>, quota_bytes: usize) -> Self {
        Cache {
            path: path.into(),
            quota_bytes,
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stores `value` under `key`, replacing any previous entry.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
        let serialized = match serde_json::to_string(value) {
            Ok(serialized) => serialized,
            Err(e) => {
                msg_debug!(Message::CacheSerializeFailed(key.to_string(), e.to_string()));
                return false;
            }
        };

        let _guard = self.lock.lock();
        let Some(mut entries) = self.read_entries() else {
            return false;
        };
        entries.insert(key.to_string(), serialized);
        self.write_entries(&entries)
    }

    /// Stores `value` under `key` like [`Cache::set`], but when the write
    /// would exceed the quota, entries matching `evictable` are dropped in
    /// key order until it fits. Nothing is evicted if it still cannot fit.
    pub fn set_evicting<T: Serialize + ?Sized>(&self, key: &str, value: &T, evictable: impl Fn(&str) -> bool) -> bool {
        let serialized = match serde_json::to_string(value) {
            Ok(serialized) => serialized,
            Err(e) => {
                msg_debug!(Message::CacheSerializeFailed(key.to_string(), e.to_string()));
                return false;
            }
        };

        let _guard = self.lock.lock();
        let Some(mut entries) = self.read_entries() else {
            return false;
        };
        entries.insert(key.to_string(), serialized);

        let mut evicted = 0;
        loop {
            let Some(content) = encode(&entries) else {
                return false;
            };
            if content.len() <= self.quota_bytes {
                if evicted > 0 {
                    msg_debug!(Message::CacheMirrorsEvicted(evicted));
                }
                return self.write_content(content);
            }
            let victim = entries.keys().find(|k| k.as_str() != key && evictable(k)).cloned();
            match victim {
                Some(victim) => {
                    entries.remove(&victim);
                    evicted += 1;
                }
                None => {
                    msg_warning!(Message::CacheQuotaExceeded(content.len(), self.quota_bytes));
                    return false;
                }
            }
        }
    }

    /// Reads `key`, or returns `default` when the entry is missing or does
    /// not decode into `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get_opt(key).unwrap_or(default)
    }

    /// Reads `key`, or `None` when the entry is missing or does not decode.
    pub fn get_opt<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let entries = {
            let _guard = self.lock.lock();
            self.read_entries()?
        };
        let raw = entries.get(key)?;
        match serde_json::from_str(raw) {
            Ok(value) => Some(value),
            Err(e) => {
                msg_debug!(Message::CacheEntryUnreadable(key.to_string(), e.to_string()));
                None
            }
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        let _guard = self.lock.lock();
        self.read_entries().is_some_and(|entries| entries.contains_key(key))
    }

    /// Removes `key`. Removing a missing key succeeds.
    pub fn remove(&self, key: &str) -> bool {
        let _guard = self.lock.lock();
        let Some(mut entries) = self.read_entries() else {
            return false;
        };
        if entries.remove(key).is_none() {
            return true;
        }
        self.write_entries(&entries)
    }

    /// Removes every entry.
    pub fn clear(&self) -> bool {
        let _guard = self.lock.lock();
        self.write_entries(&Entries::new())
    }

    /// Current size of the cache file contents in bytes.
    pub fn used_bytes(&self) -> usize {
        let _guard = self.lock.lock();
        self.read_entries()
            .and_then(|entries| serde_json::to_string(&entries).ok())
            .map(|s| s.len())
            .unwrap_or(0)
    }

    fn read_entries(&self) -> Option<Entries> {
        match fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Some(Entries::new()),
            Ok(content) => match serde_json::from_str(&content) {
                Ok(entries) => Some(entries),
                Err(e) => {
                    // Corrupt file reads as empty; the next write replaces it
                    msg_warning!(Message::CacheFileCorrupt(e.to_string()));
                    Some(Entries::new())
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => Some(Entries::new()),
            Err(e) => {
                msg_debug!(Message::CacheIoFailed(e.to_string()));
                None
            }
        }
    }

    fn write_entries(&self, entries: &Entries) -> bool {
        let Some(content) = encode(entries) else {
            return false;
        };
        if content.len() > self.quota_bytes {
            msg_warning!(Message::CacheQuotaExceeded(content.len(), self.quota_bytes));
            return false;
        }
        self.write_content(content)
    }

    fn write_content(&self, content: String) -> bool {
        match fs::write(&self.path, content) {
            Ok(()) => true,
            Err(e) => {
                msg_debug!(Message::CacheIoFailed(e.to_string()));
                false
            }
        }
    }
}

fn encode(entries: &Entries) -> Option<String> {
    match serde_json::to_string(entries) {
        Ok(content) => Some(content),
        Err(e) => {
            msg_debug!(Message::CacheIoFailed(e.to_string()));
            None
        }
    }
}
