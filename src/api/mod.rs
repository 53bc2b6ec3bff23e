//! Remote sync clients.
//!
//! The sync coordinator only knows the [`RemoteSync`] trait: one call that
//! pushes a whole batch of queued records and either accepts all of them or
//! fails as a unit. Two clients are provided:
//!
//! - [`HttpRemote`]: `POST {api_url}/api/sync` with the batch as JSON
//! - [`StubRemote`]: acknowledges every batch locally, used when no endpoint
//!   is configured
//!
//! [`Remote`] picks one of them from the sync configuration.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use fastslowly::api::{Remote, RemoteSync};
//! use fastslowly::libs::config::SyncConfig;
//!
//! # async fn run() -> fastslowly::libs::error::Result<()> {
//! let remote = Remote::from_config(&SyncConfig::default());
//! remote.push(&[]).await?;
//! # Ok(())
//! # }
//! ```

use crate::libs::config::SyncConfig;
use crate::libs::error::Result;
use crate::libs::messages::Message;
use crate::libs::sync::QueuedRecord;
use crate::msg_debug;

pub mod http;

pub use http::HttpRemote;

/// A destination for queued records.
#[allow(async_fn_in_trait)]
pub trait RemoteSync {
    /// Sends the whole batch.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::RemoteSyncFailure`](crate::libs::error::TrackerError)
    /// when the batch was not accepted. A failure means none of the records
    /// may be considered delivered.
    async fn push(&self, batch: &[QueuedRecord]) -> Result<()>;
}

/// Stand-in remote that logs and acknowledges every batch.
#[derive(Debug, Clone, Default)]
pub struct StubRemote;

impl RemoteSync for StubRemote {
    async fn push(&self, batch: &[QueuedRecord]) -> Result<()> {
        msg_debug!(Message::StubRemoteAccepted(batch.len()));
        Ok(())
    }
}

/// The remote selected by configuration.
#[derive(Debug, Clone)]
pub enum Remote {
    Http(HttpRemote),
    Stub(StubRemote),
}

impl Remote {
    /// HTTP when an `api_url` is configured, the stub otherwise.
    pub fn from_config(config: &SyncConfig) -> Self {
        match config.api_url.as_deref().map(str::trim).filter(|url| !url.is_empty()) {
            Some(url) => Remote::Http(HttpRemote::new(url)),
            None => Remote::Stub(StubRemote),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Remote::Http(remote) => remote.endpoint(),
            Remote::Stub(_) => Message::StubRemoteName.to_string(),
        }
    }
}

impl RemoteSync for Remote {
    async fn push(&self, batch: &[QueuedRecord]) -> Result<()> {
        match self {
            Remote::Http(remote) => remote.push(batch).await,
            Remote::Stub(remote) => remote.push(batch).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_selects_client() {
        assert!(matches!(Remote::from_config(&SyncConfig::default()), Remote::Stub(_)));

        let blank = SyncConfig {
            api_url: Some("  ".to_string()),
            auto_sync: true,
        };
        assert!(matches!(Remote::from_config(&blank), Remote::Stub(_)));

        let http = SyncConfig {
            api_url: Some("https://sync.example.com/".to_string()),
            auto_sync: true,
        };
        let remote = Remote::from_config(&http);
        assert!(matches!(remote, Remote::Http(_)));
        assert_eq!(remote.describe(), "https://sync.example.com/api/sync");
    }

    #[tokio::test]
    async fn test_stub_acknowledges() {
        assert!(StubRemote.push(&[]).await.is_ok());
    }
}
