use super::RemoteSync;
use crate::libs::error::{Result, TrackerError};
use crate::libs::sync::QueuedRecord;
use reqwest::Client;

const SYNC_URL: &str = "api/sync";

/// JSON-over-HTTP sync client.
#[derive(Debug, Clone)]
pub struct HttpRemote {
    client: Client,
    api_url: String,
}

impl HttpRemote {
    pub fn new(api_url: &str) -> Self {
        Self {
            client: Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/{}", self.api_url, SYNC_URL)
    }
}

impl RemoteSync for HttpRemote {
    /// Any transport error or non-2xx status fails the whole batch.
    async fn push(&self, batch: &[QueuedRecord]) -> Result<()> {
        let res = self
            .client
            .post(self.endpoint())
            .json(batch)
            .send()
            .await
            .map_err(|e| TrackerError::RemoteSyncFailure(e.to_string()))?;

        match res.status() {
            status if status.is_success() => Ok(()),
            status => Err(TrackerError::RemoteSyncFailure(format!("server responded with {}", status))),
        }
    }
}
