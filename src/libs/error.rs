//! Error taxonomy of the persistence and sync core.
//!
//! Only [`TrackerError::ImportFormat`] is ever returned to a caller as a hard
//! rejection. The other variants are produced by the storage backends and the
//! sync coordinator, then absorbed by the persistence facade (store and cache
//! failures) or reported as a non-fatal outcome (sync failures).

use thiserror::Error;

/// Errors produced by the durable store, fallback cache, sync and backup layers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrackerError {
    /// The durable store could not be opened, migrated or transacted.
    ///
    /// Recoverable: the facade falls back to the cache for that call.
    #[error("Durable store unavailable: {0}")]
    StoreUnavailable(String),

    /// A cached or stored value could not be encoded or decoded.
    ///
    /// Recoverable: treated as a cache miss.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The remote endpoint rejected the batch or could not be reached.
    ///
    /// Recoverable: the offline queue is preserved for the next reconnect.
    #[error("Remote sync failed: {0}")]
    RemoteSyncFailure(String),

    /// A backup document is malformed. Nothing was imported.
    #[error("Invalid backup file: {0}")]
    ImportFormat(String),
}

impl From<rusqlite::Error> for TrackerError {
    fn from(err: rusqlite::Error) -> Self {
        TrackerError::StoreUnavailable(err.to_string())
    }
}

impl From<serde_json::Error> for TrackerError {
    fn from(err: serde_json::Error) -> Self {
        TrackerError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TrackerError>;
