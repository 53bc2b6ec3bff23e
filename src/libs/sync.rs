//! Background sync coordinator.
//!
//! Tracks connectivity, owns the offline queue and pushes queued records to
//! the remote endpoint when the app comes back online.
//!
//! ## Status Machine
//!
//! ```text
//!          trigger              push ok
//!  Idle ────────────▶ Syncing ──────────▶ Success
//!   ▲                    │
//!   │ on_offline         │ push failed
//!   └──────────────── Error ◀──┘
//! ```
//!
//! Triggers are [`SyncCoordinator::on_online`] and
//! [`SyncCoordinator::sync_now`]. A trigger that arrives while a push is in
//! flight is ignored. There is no retry loop: a failed push leaves the queue
//! intact for the next trigger.
//!
//! ## Offline Queue
//!
//! Saves made while offline are appended to the queue stored in the
//! fallback cache under `offlineQueue`. Entries are merged by
//! `(domain, key)`, so repeated edits of the same record before reconnecting
//! send only the latest value. Each append takes a fresh revision; a drain
//! removes exactly the entries (and revisions) it pushed, so anything queued
//! while the push was in flight survives for the next drain.
//!
//! Connectivity and status are persisted under `syncState` so separate
//! invocations of the command-line host see the same state.

use crate::api::RemoteSync;
use crate::libs::cache::{is_log_key, Cache, OFFLINE_QUEUE_KEY, SYNC_STATE_KEY};
use crate::libs::error::{Result, TrackerError};
use crate::libs::messages::Message;
use crate::libs::persistence::Domain;
use crate::{msg_debug, msg_error, msg_info, msg_success, msg_warning};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    #[default]
    Idle,
    Syncing,
    Success,
    Error,
}

/// One pending record in the offline queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueuedRecord {
    pub domain: Domain,
    pub key: String,
    pub payload: Value,
    pub queued_at: DateTime<Utc>,
    pub revision: u64,
}

impl QueuedRecord {
    fn same_record(&self, domain: Domain, key: &str) -> bool {
        self.domain == domain && self.key == key
    }
}

/// Persisted connectivity and status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SyncState {
    pub online: bool,
    pub status: SyncStatus,
    pub last_sync: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

impl Default for SyncState {
    fn default() -> Self {
        SyncState {
            online: true,
            status: SyncStatus::Idle,
            last_sync: None,
            last_error: None,
        }
    }
}

/// Result of a sync trigger that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The queue was pushed; holds the number of records sent.
    Synced(usize),
    /// The queue was empty, nothing was sent.
    NothingToSync,
    /// A push was already in flight.
    AlreadySyncing,
    /// Online, but automatic draining is disabled.
    Deferred,
    /// `sync_now` was called while offline.
    Offline,
}

pub struct SyncCoordinator<R: RemoteSync> {
    cache: Arc<Cache>,
    remote: R,
    auto_sync: bool,
    state: Mutex<SyncState>,
    queue_lock: Mutex<u64>,
}

impl<R: RemoteSync> SyncCoordinator<R> {
    /// Restores persisted state from the cache.
    ///
    /// A `Syncing` status left behind by an interrupted process is reset to
    /// `Idle`, since no push can be in flight at construction time.
    pub fn new(cache: Arc<Cache>, remote: R, auto_sync: bool) -> Self {
        let mut state: SyncState = cache.get(SYNC_STATE_KEY, SyncState::default());
        if state.status == SyncStatus::Syncing {
            state.status = SyncStatus::Idle;
        }
        SyncCoordinator {
            cache,
            remote,
            auto_sync,
            state: Mutex::new(state),
            queue_lock: Mutex::new(0),
        }
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    pub fn state(&self) -> SyncState {
        self.state.lock().clone()
    }

    pub fn status(&self) -> SyncStatus {
        self.state.lock().status
    }

    pub fn is_online(&self) -> bool {
        self.state.lock().online
    }

    /// Pending records, oldest first.
    pub fn queue(&self) -> Vec<QueuedRecord> {
        let _guard = self.queue_lock.lock();
        self.read_queue()
    }

    /// Records the offline transition. An `Error` status returns to `Idle`.
    pub fn on_offline(&self) {
        self.update_state(|state| {
            state.online = false;
            if state.status == SyncStatus::Error {
                state.status = SyncStatus::Idle;
            }
        });
        msg_info!(Message::SyncWentOffline);
    }

    /// Marks the coordinator online and drains the queue when auto sync is on.
    pub async fn on_online(&self) -> Result<SyncOutcome> {
        self.update_state(|state| state.online = true);
        msg_info!(Message::SyncWentOnline);
        if !self.auto_sync {
            return Ok(SyncOutcome::Deferred);
        }
        self.drain().await
    }

    /// Drains the queue now. Does nothing while offline.
    pub async fn sync_now(&self) -> Result<SyncOutcome> {
        if !self.is_online() {
            msg_warning!(Message::SyncOfflineSkipped);
            return Ok(SyncOutcome::Offline);
        }
        self.drain().await
    }

    /// Appends a record, replacing any queued entry for the same
    /// `(domain, key)`. Cached log mirrors are evicted when the queue would
    /// not otherwise fit the cache quota. Returns false when the cache still
    /// refused the write.
    pub fn enqueue(&self, domain: Domain, key: &str, payload: Value) -> bool {
        let mut last_revision = self.queue_lock.lock();
        let mut queue = self.read_queue();

        let revision = queue.iter().map(|r| r.revision).max().unwrap_or(0).max(*last_revision) + 1;
        *last_revision = revision;

        let record = QueuedRecord {
            domain,
            key: key.to_string(),
            payload,
            queued_at: Utc::now(),
            revision,
        };
        match queue.iter_mut().find(|r| r.same_record(domain, key)) {
            Some(existing) => *existing = record,
            None => queue.push(record),
        }

        if !self.cache.set_evicting(OFFLINE_QUEUE_KEY, &queue, is_log_key) {
            return false;
        }
        msg_debug!(Message::SyncQueued(domain.to_string(), key.to_string(), queue.len()));
        true
    }

    /// Drops every queued record.
    pub fn clear_queue(&self) -> bool {
        let _guard = self.queue_lock.lock();
        self.cache.remove(OFFLINE_QUEUE_KEY)
    }

    async fn drain(&self) -> Result<SyncOutcome> {
        let snapshot = {
            let mut state = self.state.lock();
            if state.status == SyncStatus::Syncing {
                msg_debug!(Message::SyncAlreadyRunning);
                return Ok(SyncOutcome::AlreadySyncing);
            }
            let snapshot = {
                let _guard = self.queue_lock.lock();
                self.read_queue()
            };
            if snapshot.is_empty() {
                msg_debug!(Message::SyncNothingToSync);
                return Ok(SyncOutcome::NothingToSync);
            }
            state.status = SyncStatus::Syncing;
            self.write_state(&state);
            snapshot
        };

        msg_debug!(Message::SyncPushing(snapshot.len()));

        match self.remote.push(&snapshot).await {
            Ok(()) => {
                self.commit_drained(&snapshot);
                self.update_state(|state| {
                    state.status = SyncStatus::Success;
                    state.last_sync = Some(Utc::now());
                    state.last_error = None;
                });
                msg_success!(Message::SyncCompleted(snapshot.len()));
                Ok(SyncOutcome::Synced(snapshot.len()))
            }
            Err(e) => {
                let reason = match e {
                    TrackerError::RemoteSyncFailure(reason) => reason,
                    other => other.to_string(),
                };
                self.update_state(|state| {
                    state.status = SyncStatus::Error;
                    state.last_error = Some(reason.clone());
                });
                msg_error!(Message::SyncFailed(reason.clone()));
                Err(TrackerError::RemoteSyncFailure(reason))
            }
        }
    }

    /// Removes exactly the pushed entries. An entry re-queued during the push
    /// carries a newer revision and is kept.
    fn commit_drained(&self, pushed: &[QueuedRecord]) {
        let _guard = self.queue_lock.lock();
        let remaining: Vec<QueuedRecord> = self
            .read_queue()
            .into_iter()
            .filter(|queued| {
                !pushed
                    .iter()
                    .any(|sent| sent.same_record(queued.domain, &queued.key) && sent.revision == queued.revision)
            })
            .collect();

        if remaining.is_empty() {
            self.cache.remove(OFFLINE_QUEUE_KEY);
        } else {
            self.cache.set(OFFLINE_QUEUE_KEY, &remaining);
        }
    }

    fn read_queue(&self) -> Vec<QueuedRecord> {
        self.cache.get(OFFLINE_QUEUE_KEY, Vec::new())
    }

    /// Writes the current connectivity and status to the cache, e.g. after
    /// the cache has been emptied.
    pub fn persist_state(&self) -> bool {
        let state = self.state.lock();
        self.write_state(&state)
    }

    fn update_state(&self, change: impl FnOnce(&mut SyncState)) {
        let mut state = self.state.lock();
        change(&mut state);
        self.write_state(&state);
    }

    fn write_state(&self, state: &SyncState) -> bool {
        let written = self.cache.set(SYNC_STATE_KEY, state);
        if !written {
            msg_debug!(Message::SyncStateNotPersisted);
        }
        written
    }
}
