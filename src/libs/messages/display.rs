//! Display implementation for fastslowly application messages.
//!
//! All user-facing text lives here, in one `match` over [`Message`]. Message
//! variants carry their dynamic parts as typed parameters, so wording can
//! change without touching call sites.
//!
//! ## Text Formatting Standards
//!
//! - **Sentence case**, no trailing period
//! - **Specific details**: dates, counts and file paths are always included
//! - Prefix emoji are added by the `msg_*!` macros, never here

use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = match self {
            // === DAILY LOG MESSAGES ===
            Message::LogSaved(date) => format!("Log saved for {}", date),
            Message::LogDeleted(date) => format!("Log for {} deleted", date),
            Message::LogDeleteFailed(date) => format!("Failed to delete the log for {}", date),
            Message::LogNotFound(date) => format!("No log found for {}", date),
            Message::NoLogsFound => "No logs found".to_string(),
            Message::ConfirmDeleteLog(date) => format!("Delete the log for {}?", date),
            Message::InvalidFastingHours(hours) => format!("Fasting hours must be between 0 and 24, got {}", hours),
            Message::InvalidWeight(weight) => format!("Weight must be a positive number, got {}", weight),
            Message::InvalidMood(mood) => format!("Mood must be between 1 and 5, got {}", mood),
            Message::InvalidDate(value) => format!("Invalid date '{}', expected yyyy-MM-dd, today or yesterday", value),
            Message::InvalidDateTime(value) => format!("Invalid date and time '{}', expected yyyy-MM-dd HH:MM", value),

            // === STATISTICS MESSAGES ===
            Message::StatsHeader => "📈 Fasting statistics".to_string(),

            // === TIMER MESSAGES ===
            Message::TimerStarted(protocol) => format!("Fast started ({}). You've got this!", protocol),
            Message::TimerPaused => "Timer paused".to_string(),
            Message::TimerResumed => "Timer resumed".to_string(),
            Message::TimerStopped(elapsed) => format!("Fast finished after {}", elapsed),
            Message::TimerReset => "Timer reset".to_string(),
            Message::TimerAlreadyRunning => "The timer is already running".to_string(),
            Message::TimerCannotPause => "Only a running, unpaused timer can be paused".to_string(),
            Message::TimerNotPaused => "The timer is not paused".to_string(),
            Message::TimerNotRunning => "The timer is not running".to_string(),
            Message::FastingGoalReached => "🎉 Fasting goal achieved! Great job!".to_string(),
            Message::ProtocolChanged(name) => format!("Protocol set to {}", name),
            Message::UnknownProtocol(name) => format!("Unknown protocol '{}'", name),
            Message::CustomDurationSet(hours) => format!("Custom fasting target set to {} hours", hours),
            Message::InvalidCustomDuration(hours) => {
                format!("Custom fasting target must be more than 0 and at most 72 hours, got {}", hours)
            }
            Message::StartTimeUpdated(start) => format!("Start time moved to {}", start),
            Message::StartTimeInFuture => "Start time cannot be in the future".to_string(),
            Message::StartTimeTooOld => "Start time cannot be more than 7 days in the past".to_string(),

            // === SETTINGS MESSAGES ===
            Message::SettingsSaved => "Settings saved".to_string(),

            // === PERSISTENCE MESSAGES ===
            Message::StoreReadFailed(domain, error) => {
                format!("Durable store read failed for {}, using the fallback cache: {}", domain, error)
            }
            Message::StoreWriteFailed(domain, error) => format!("Durable store write failed for {}: {}", domain, error),
            Message::StoreWriteCached(domain, error) => {
                format!("Durable store write failed for {}, kept in the fallback cache: {}", domain, error)
            }
            Message::SaveNotPersisted(domain, key) => {
                format!("Neither the durable store nor the fallback cache accepted {} '{}'", domain, key)
            }
            Message::StoreClearFailed(error) => format!("Failed to clear the durable store: {}", error),
            Message::RecordEncodeFailed(domain, error) => format!("Failed to encode {} record: {}", domain, error),
            Message::UnknownRecord(domain, error) => format!("Cannot save '{}' record: {}", domain, error),
            Message::CacheMirrorFailed(key) => format!("Fallback cache did not accept '{}'", key),
            Message::CacheMirrorsEvicted(count) => format!("Evicted {} cached logs to make room for the sync queue", count),
            Message::CacheSerializeFailed(key, error) => format!("Cannot serialize cache entry '{}': {}", key, error),
            Message::CacheEntryUnreadable(key, error) => format!("Ignoring unreadable cache entry '{}': {}", key, error),
            Message::CacheFileCorrupt(error) => format!("Fallback cache file is corrupt and was ignored: {}", error),
            Message::CacheIoFailed(error) => format!("Fallback cache I/O failed: {}", error),
            Message::CacheQuotaExceeded(needed, quota) => {
                format!("Fallback cache quota exceeded: {} bytes needed, {} allowed", needed, quota)
            }
            Message::ConfirmClearAll => "Permanently delete all fasting data? This cannot be undone".to_string(),
            Message::AllDataCleared => "All data cleared".to_string(),
            Message::ClearAllFailed => "Some data could not be cleared".to_string(),
            Message::OperationCancelled => "Operation cancelled".to_string(),

            // === SYNC MESSAGES ===
            Message::SyncWentOnline => "Back online".to_string(),
            Message::SyncWentOffline => "Offline: changes will be queued for sync".to_string(),
            Message::SyncQueued(domain, key, len) => format!("Queued {} '{}' for sync ({} pending)", domain, key, len),
            Message::SyncEnqueueFailed(domain, key) => {
                format!("Could not queue {} '{}' for sync, it will not reach the server", domain, key)
            }
            Message::SyncPushing(count) => format!("Pushing {} queued records", count),
            Message::SyncCompleted(count) => format!("Synced {} records", count),
            Message::SyncFailed(error) => format!("Sync failed: {}", error),
            Message::SyncRetryLater(error) => format!("Sync failed, queued changes are kept: {}", error),
            Message::SyncNothingToSync => "Nothing to sync".to_string(),
            Message::SyncAlreadyRunning => "A sync is already in progress".to_string(),
            Message::SyncDeferred => "Online. Automatic sync is disabled, run `sync now` to push".to_string(),
            Message::SyncOfflineSkipped => "Cannot sync while offline".to_string(),
            Message::SyncStateNotPersisted => "Sync state could not be written to the fallback cache".to_string(),
            Message::StubRemoteAccepted(count) => format!("Stub remote accepted {} records", count),
            Message::StubRemoteName => "local stub".to_string(),

            // === BACKUP MESSAGES ===
            Message::ExportingLogs(format) => format!("Exporting logs as {}", format),
            Message::BackupExported(count, path) => format!("Exported {} logs to {}", count, path),
            Message::BackupNoLogs => "There are no logs to export".to_string(),
            Message::BackupImported(count) => format!("Imported {} logs", count),
            Message::BackupVersionMismatch(version) => {
                format!("Backup version {} differs from the current format, importing anyway", version)
            }

            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved successfully".to_string(),
            Message::ConfigModuleStorage => "Storage settings".to_string(),
            Message::ConfigModuleSync => "Sync settings".to_string(),
            Message::PromptSelectModules => "Select modules to configure".to_string(),
            Message::PromptDbFile => "Durable store file name".to_string(),
            Message::PromptCacheFile => "Fallback cache file name".to_string(),
            Message::PromptCacheQuota => "Fallback cache quota in bytes".to_string(),
            Message::PromptBusyTimeout => "Durable store lock timeout in milliseconds".to_string(),
            Message::PromptSyncApiUrl => "Sync server URL (empty for the local stub)".to_string(),
            Message::PromptAutoSync => "Sync automatically when back online?".to_string(),

            // === MIGRATION MESSAGES ===
            Message::MigrationsFound(count) => format!("Found {} pending database migrations", count),
            Message::RunningMigration(version, name) => format!("Running migration v{}: {}", version, name),
            Message::MigrationFailed(version, error) => format!("✗ Migration v{} failed: {}", version, error),
            Message::AllMigrationsCompleted => "All database migrations completed successfully".to_string(),
        };

        write!(f, "{}", text)
    }
}
