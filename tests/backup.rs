#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use fastslowly::api::StubRemote;
    use fastslowly::db::db::{Db, DEFAULT_BUSY_TIMEOUT};
    use fastslowly::libs::backup::{Backup, BackupFormat, ExportDocument, BACKUP_VERSION};
    use fastslowly::libs::cache::{Cache, DEFAULT_QUOTA_BYTES};
    use fastslowly::libs::daily_log::DailyLog;
    use fastslowly::libs::error::TrackerError;
    use fastslowly::libs::persistence::{Persistence, Record};
    use fastslowly::libs::sync::SyncCoordinator;
    use std::sync::Arc;
    use tempfile::TempDir;
    use test_context::{test_context, AsyncTestContext};

    struct BackupTestContext {
        temp_dir: TempDir,
        persistence: Persistence<StubRemote>,
    }

    impl AsyncTestContext for BackupTestContext {
        async fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let cache = Arc::new(Cache::new(temp_dir.path().join("cache.json"), DEFAULT_QUOTA_BYTES));
            let sync = SyncCoordinator::new(cache.clone(), StubRemote, true);
            let db = Db::new(temp_dir.path().join("fastslowly.db"), DEFAULT_BUSY_TIMEOUT);
            BackupTestContext {
                temp_dir,
                persistence: Persistence::new(db, cache, sync),
            }
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn log(date: NaiveDate, hours: f64, notes: &str) -> DailyLog {
        let mut log = DailyLog::new(date);
        log.fasting_hours = hours;
        log.notes = notes.to_string();
        log.completed = true;
        log
    }

    #[test_context(BackupTestContext)]
    #[tokio::test]
    async fn test_export_json_and_import_back(ctx: &mut BackupTestContext) {
        let first = log(date(2024, 1, 1), 16.0, "first");
        let mut second = log(date(2024, 1, 2), 18.5, "second, with comma");
        second.weight = Some(79.2);
        ctx.persistence.save(Record::Log(first.clone())).await;
        ctx.persistence.save(Record::Log(second.clone())).await;

        let path = ctx.temp_dir.path().join("backup.json");
        let backup = Backup::new(BackupFormat::Json, Some(path.clone()));
        assert_eq!(backup.export(&ctx.persistence).await.unwrap(), 2);

        let document: ExportDocument = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(document.version, BACKUP_VERSION);
        assert_eq!(document.daily_logs.len(), 2);

        assert!(ctx.persistence.clear_all().await);
        assert!(ctx.persistence.load_logs().await.is_empty());

        assert_eq!(Backup::import(&ctx.persistence, &path).await.unwrap(), 2);
        let logs = ctx.persistence.load_logs().await;
        assert_eq!(logs[&first.date], first);
        assert_eq!(logs[&second.date], second);
    }

    #[test_context(BackupTestContext)]
    #[tokio::test]
    async fn test_export_csv(ctx: &mut BackupTestContext) {
        ctx.persistence
            .save(Record::Log(log(date(2024, 1, 1), 16.0, "steady")))
            .await;

        let path = ctx.temp_dir.path().join("backup.csv");
        let backup = Backup::new(BackupFormat::Csv, Some(path.clone()));
        assert_eq!(backup.export(&ctx.persistence).await.unwrap(), 1);

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next(),
            Some("date,fasting_hours,weight,hydration,mood,completed,protocol,notes")
        );
        assert_eq!(lines.next(), Some("2024-01-01,16.0,,0,,true,16:8,steady"));
    }

    #[test_context(BackupTestContext)]
    #[tokio::test]
    async fn test_default_file_name(_ctx: &mut BackupTestContext) {
        let backup = Backup::new(BackupFormat::Csv, None);
        let name = backup.output_path().to_string_lossy().to_string();
        assert!(name.starts_with("fastslowly-backup-"));
        assert!(name.ends_with(".csv"));
    }

    #[test_context(BackupTestContext)]
    #[tokio::test]
    async fn test_import_without_daily_logs_changes_nothing(ctx: &mut BackupTestContext) {
        let existing = log(date(2024, 1, 1), 16.0, "keep me");
        ctx.persistence.save(Record::Log(existing.clone())).await;

        let result = Backup::import_str(&ctx.persistence, r#"{"exportDate": "2024-01-02T00:00:00Z", "version": "1.0"}"#).await;
        assert!(matches!(result, Err(TrackerError::ImportFormat(_))));

        let logs = ctx.persistence.load_logs().await;
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[&existing.date], existing);
    }

    #[test_context(BackupTestContext)]
    #[tokio::test]
    async fn test_partially_invalid_file_imports_nothing(ctx: &mut BackupTestContext) {
        let json = r#"{
            "dailyLogs": {
                "2024-01-05": {"date": "2024-01-05", "fastingHours": 16},
                "2024-01-06": {"date": "2024-01-06", "fastingHours": "sixteen"}
            },
            "version": "1.0"
        }"#;
        assert!(Backup::import_str(&ctx.persistence, json).await.is_err());
        assert!(ctx.persistence.load_logs().await.is_empty());
    }

    #[test_context(BackupTestContext)]
    #[tokio::test]
    async fn test_import_merges_and_overwrites_same_date(ctx: &mut BackupTestContext) {
        ctx.persistence
            .save(Record::Log(log(date(2024, 1, 1), 12.0, "old")))
            .await;
        ctx.persistence
            .save(Record::Log(log(date(2024, 1, 3), 14.0, "untouched")))
            .await;

        let json = r#"{
            "dailyLogs": {
                "2024-01-01": {"date": "2024-01-01", "fastingHours": 20, "notes": "imported", "completed": true},
                "2024-01-02": {"date": "2024-01-02", "fastingHours": 16, "completed": true}
            },
            "exportDate": "2024-01-04T08:00:00.000Z",
            "version": "1.0"
        }"#;
        assert_eq!(Backup::import_str(&ctx.persistence, json).await.unwrap(), 2);

        let logs = ctx.persistence.load_logs().await;
        assert_eq!(logs.len(), 3);
        assert_eq!(logs[&date(2024, 1, 1)].notes, "imported");
        assert_eq!(logs[&date(2024, 1, 1)].fasting_hours, 20.0);
        assert_eq!(logs[&date(2024, 1, 3)].notes, "untouched");
        assert_eq!(ctx.persistence.stats().await.current_streak, 3);
    }

    #[test_context(BackupTestContext)]
    #[tokio::test]
    async fn test_out_of_range_log_rejects_the_file(ctx: &mut BackupTestContext) {
        let json = r#"{
            "dailyLogs": {
                "2024-01-05": {"date": "2024-01-05", "fastingHours": 16, "completed": true},
                "2024-01-06": {"date": "2024-01-06", "fastingHours": 99, "mood": 9, "weight": -5, "completed": true}
            },
            "version": "1.0"
        }"#;
        let result = Backup::import_str(&ctx.persistence, json).await;
        assert!(matches!(result, Err(TrackerError::ImportFormat(_))));

        assert!(ctx.persistence.load_logs().await.is_empty());
        assert_eq!(ctx.persistence.stats().await.average_fasting_hours, 0.0);
    }
}
