#[derive(Debug, Clone)]
pub enum Message {
    // === DAILY LOG MESSAGES ===
    LogSaved(String),      // date
    LogDeleted(String),
    LogDeleteFailed(String),
    LogNotFound(String),
    NoLogsFound,
    ConfirmDeleteLog(String),
    InvalidFastingHours(f64),
    InvalidWeight(f64),
    InvalidMood(u8),
    InvalidDate(String),
    InvalidDateTime(String),

    // === STATISTICS MESSAGES ===
    StatsHeader,

    // === TIMER MESSAGES ===
    TimerStarted(String), // protocol
    TimerPaused,
    TimerResumed,
    TimerStopped(String), // elapsed
    TimerReset,
    TimerAlreadyRunning,
    TimerCannotPause,
    TimerNotPaused,
    TimerNotRunning,
    FastingGoalReached,
    ProtocolChanged(String),
    UnknownProtocol(String),
    CustomDurationSet(f64),
    InvalidCustomDuration(f64),
    StartTimeUpdated(String),
    StartTimeInFuture,
    StartTimeTooOld,

    // === SETTINGS MESSAGES ===
    SettingsSaved,

    // === PERSISTENCE MESSAGES ===
    StoreReadFailed(String, String),  // domain, error
    StoreWriteFailed(String, String), // domain, error
    StoreWriteCached(String, String), // domain, error
    SaveNotPersisted(String, String), // domain, key
    StoreClearFailed(String),
    RecordEncodeFailed(String, String),
    UnknownRecord(String, String),
    CacheMirrorFailed(String), // key
    CacheSerializeFailed(String, String),
    CacheEntryUnreadable(String, String),
    CacheFileCorrupt(String),
    CacheIoFailed(String),
    CacheQuotaExceeded(usize, usize), // needed, quota
    CacheMirrorsEvicted(usize),
    ConfirmClearAll,
    AllDataCleared,
    ClearAllFailed,
    OperationCancelled,

    // === SYNC MESSAGES ===
    SyncWentOnline,
    SyncWentOffline,
    SyncQueued(String, String, usize), // domain, key, queue length
    SyncEnqueueFailed(String, String), // domain, key
    SyncPushing(usize),
    SyncCompleted(usize),
    SyncFailed(String),
    SyncRetryLater(String),
    SyncNothingToSync,
    SyncAlreadyRunning,
    SyncDeferred,
    SyncOfflineSkipped,
    SyncStateNotPersisted,
    StubRemoteAccepted(usize),
    StubRemoteName,

    // === BACKUP MESSAGES ===
    ExportingLogs(String), // format
    BackupExported(usize, String),
    BackupNoLogs,
    BackupImported(usize),
    BackupVersionMismatch(String),

    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigModuleStorage,
    ConfigModuleSync,
    PromptSelectModules,
    PromptDbFile,
    PromptCacheFile,
    PromptCacheQuota,
    PromptBusyTimeout,
    PromptSyncApiUrl,
    PromptAutoSync,

    // === MIGRATION MESSAGES ===
    MigrationsFound(usize),
    RunningMigration(u32, String),
    MigrationFailed(u32, String),
    AllMigrationsCompleted,
}
