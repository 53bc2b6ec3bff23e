#[cfg(test)]
mod tests {
    use fastslowly::api::{RemoteSync, StubRemote};
    use fastslowly::libs::cache::{Cache, DEFAULT_QUOTA_BYTES, SYNC_STATE_KEY};
    use fastslowly::libs::error::{Result, TrackerError};
    use fastslowly::libs::persistence::Domain;
    use fastslowly::libs::sync::{QueuedRecord, SyncCoordinator, SyncOutcome, SyncState, SyncStatus};
    use parking_lot::Mutex;
    use serde_json::json;
    use std::sync::Arc;
    use tempfile::TempDir;
    use test_context::{test_context, AsyncTestContext};
    use tokio::sync::Notify;

    /// Remembers every batch it accepts.
    #[derive(Default)]
    struct RecordingRemote {
        batches: Mutex<Vec<Vec<QueuedRecord>>>,
    }

    impl RemoteSync for RecordingRemote {
        async fn push(&self, batch: &[QueuedRecord]) -> Result<()> {
            self.batches.lock().push(batch.to_vec());
            Ok(())
        }
    }

    struct FailingRemote;

    impl RemoteSync for FailingRemote {
        async fn push(&self, _batch: &[QueuedRecord]) -> Result<()> {
            Err(TrackerError::RemoteSyncFailure("server down".to_string()))
        }
    }

    /// Holds every push until released.
    #[derive(Default)]
    struct GatedRemote {
        started: Notify,
        release: Notify,
    }

    impl RemoteSync for GatedRemote {
        async fn push(&self, _batch: &[QueuedRecord]) -> Result<()> {
            self.started.notify_one();
            self.release.notified().await;
            Ok(())
        }
    }

    struct SyncTestContext {
        _temp_dir: TempDir,
        cache: Arc<Cache>,
    }

    impl AsyncTestContext for SyncTestContext {
        async fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let cache = Arc::new(Cache::new(temp_dir.path().join("cache.json"), DEFAULT_QUOTA_BYTES));
            SyncTestContext {
                _temp_dir: temp_dir,
                cache,
            }
        }
    }

    #[test_context(SyncTestContext)]
    #[tokio::test]
    async fn test_initial_state(ctx: &mut SyncTestContext) {
        let sync = SyncCoordinator::new(ctx.cache.clone(), StubRemote, true);
        assert!(sync.is_online());
        assert_eq!(sync.status(), SyncStatus::Idle);
        assert!(sync.queue().is_empty());
        assert_eq!(sync.state().last_sync, None);
    }

    #[test_context(SyncTestContext)]
    #[tokio::test]
    async fn test_online_drains_queue(ctx: &mut SyncTestContext) {
        let sync = SyncCoordinator::new(ctx.cache.clone(), RecordingRemote::default(), true);
        sync.on_offline();
        assert!(sync.enqueue(Domain::Log, "2024-01-01", json!({"date": "2024-01-01"})));
        assert!(sync.enqueue(Domain::Timer, "current", json!({"isRunning": true})));

        assert_eq!(sync.on_online().await.unwrap(), SyncOutcome::Synced(2));

        let batches = sync.remote().batches.lock().clone();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0][0].key, "2024-01-01");
        assert_eq!(batches[0][1].domain, Domain::Timer);

        assert!(sync.queue().is_empty());
        let state = sync.state();
        assert_eq!(state.status, SyncStatus::Success);
        assert!(state.last_sync.is_some());
        assert_eq!(state.last_error, None);
    }

    #[test_context(SyncTestContext)]
    #[tokio::test]
    async fn test_queue_merges_by_key(ctx: &mut SyncTestContext) {
        let sync = SyncCoordinator::new(ctx.cache.clone(), StubRemote, true);
        sync.enqueue(Domain::Log, "2024-01-01", json!({"notes": "first"}));
        sync.enqueue(Domain::Settings, "app", json!({"theme": "dark"}));
        sync.enqueue(Domain::Log, "2024-01-01", json!({"notes": "second"}));

        let queue = sync.queue();
        assert_eq!(queue.len(), 2);
        assert_eq!(queue[0].payload["notes"], "second");
        assert!(queue[0].revision > queue[1].revision);
    }

    #[test_context(SyncTestContext)]
    #[tokio::test]
    async fn test_failed_push_keeps_queue(ctx: &mut SyncTestContext) {
        let sync = SyncCoordinator::new(ctx.cache.clone(), FailingRemote, true);
        sync.on_offline();
        sync.enqueue(Domain::Log, "2024-01-01", json!({}));

        let result = sync.on_online().await;
        assert_eq!(result, Err(TrackerError::RemoteSyncFailure("server down".to_string())));
        assert_eq!(sync.queue().len(), 1);
        assert_eq!(sync.status(), SyncStatus::Error);
        assert_eq!(sync.state().last_error.as_deref(), Some("server down"));

        // Losing connectivity clears the error
        sync.on_offline();
        assert_eq!(sync.status(), SyncStatus::Idle);
        assert_eq!(sync.queue().len(), 1);
    }

    #[test_context(SyncTestContext)]
    #[tokio::test]
    async fn test_empty_queue_is_not_a_sync(ctx: &mut SyncTestContext) {
        let sync = SyncCoordinator::new(ctx.cache.clone(), RecordingRemote::default(), true);

        assert_eq!(sync.on_online().await.unwrap(), SyncOutcome::NothingToSync);
        assert_eq!(sync.status(), SyncStatus::Idle);
        assert!(sync.remote().batches.lock().is_empty());
    }

    #[test_context(SyncTestContext)]
    #[tokio::test]
    async fn test_auto_sync_disabled_defers(ctx: &mut SyncTestContext) {
        let sync = SyncCoordinator::new(ctx.cache.clone(), RecordingRemote::default(), false);
        sync.on_offline();
        sync.enqueue(Domain::Log, "2024-01-01", json!({}));

        assert_eq!(sync.on_online().await.unwrap(), SyncOutcome::Deferred);
        assert!(sync.is_online());
        assert_eq!(sync.queue().len(), 1);

        assert_eq!(sync.sync_now().await.unwrap(), SyncOutcome::Synced(1));
        assert!(sync.queue().is_empty());
    }

    #[test_context(SyncTestContext)]
    #[tokio::test]
    async fn test_sync_now_while_offline(ctx: &mut SyncTestContext) {
        let sync = SyncCoordinator::new(ctx.cache.clone(), RecordingRemote::default(), true);
        sync.on_offline();
        sync.enqueue(Domain::Log, "2024-01-01", json!({}));

        assert_eq!(sync.sync_now().await.unwrap(), SyncOutcome::Offline);
        assert_eq!(sync.queue().len(), 1);
        assert!(sync.remote().batches.lock().is_empty());
    }

    #[test_context(SyncTestContext)]
    #[tokio::test]
    async fn test_records_queued_during_push_survive(ctx: &mut SyncTestContext) {
        let sync = SyncCoordinator::new(ctx.cache.clone(), GatedRemote::default(), true);
        sync.on_offline();
        sync.enqueue(Domain::Log, "2024-01-01", json!({"notes": "before"}));

        let drain = sync.on_online();
        let during = async {
            sync.remote().started.notified().await;
            assert_eq!(sync.status(), SyncStatus::Syncing);
            assert_eq!(sync.sync_now().await.unwrap(), SyncOutcome::AlreadySyncing);

            sync.enqueue(Domain::Log, "2024-01-01", json!({"notes": "during"}));
            sync.enqueue(Domain::Settings, "app", json!({}));
            sync.remote().release.notify_one();
        };
        let (outcome, ()) = tokio::join!(drain, during);

        assert_eq!(outcome.unwrap(), SyncOutcome::Synced(1));
        let queue = sync.queue();
        assert_eq!(queue.len(), 2);
        assert_eq!(queue[0].payload["notes"], "during");
        assert_eq!(queue[1].domain, Domain::Settings);
        assert_eq!(sync.status(), SyncStatus::Success);
    }

    #[test_context(SyncTestContext)]
    #[tokio::test]
    async fn test_state_survives_restart(ctx: &mut SyncTestContext) {
        {
            let sync = SyncCoordinator::new(ctx.cache.clone(), StubRemote, true);
            sync.on_offline();
            sync.enqueue(Domain::Timer, "current", json!({}));
        }

        let sync = SyncCoordinator::new(ctx.cache.clone(), StubRemote, true);
        assert!(!sync.is_online());
        assert_eq!(sync.queue().len(), 1);
        assert_eq!(sync.on_online().await.unwrap(), SyncOutcome::Synced(1));
    }

    #[test_context(SyncTestContext)]
    #[tokio::test]
    async fn test_interrupted_sync_resets_to_idle(ctx: &mut SyncTestContext) {
        let interrupted = SyncState {
            status: SyncStatus::Syncing,
            ..SyncState::default()
        };
        assert!(ctx.cache.set(SYNC_STATE_KEY, &interrupted));

        let sync = SyncCoordinator::new(ctx.cache.clone(), StubRemote, true);
        assert_eq!(sync.status(), SyncStatus::Idle);
    }

    #[test_context(SyncTestContext)]
    #[tokio::test]
    async fn test_clear_queue(ctx: &mut SyncTestContext) {
        let sync = SyncCoordinator::new(ctx.cache.clone(), StubRemote, true);
        sync.enqueue(Domain::Log, "2024-01-01", json!({}));

        assert!(sync.clear_queue());
        assert!(sync.queue().is_empty());
        assert_eq!(sync.on_online().await.unwrap(), SyncOutcome::NothingToSync);
    }
}
