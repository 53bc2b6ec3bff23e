#[cfg(test)]
mod tests {
    use fastslowly::libs::config::{Config, StorageConfig, SyncConfig, CONFIG_FILE_NAME};
    use fastslowly::libs::data_storage::DataStorage;
    use fastslowly::libs::persistence::{Persistence, Record};
    use fastslowly::libs::settings::{Settings, Theme};
    use tempfile::TempDir;
    use test_context::{test_context, AsyncTestContext, TestContext};

    /// Isolated data directory for each config test.
    struct ConfigTestContext {
        _temp_dir: TempDir,
        storage: DataStorage,
    }

    impl TestContext for ConfigTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let storage = DataStorage::at(temp_dir.path().join("fastslowly"));
            ConfigTestContext {
                _temp_dir: temp_dir,
                storage,
            }
        }
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_default_config(_ctx: &mut ConfigTestContext) {
        let config = Config::default();
        assert!(config.storage.is_none());
        assert!(config.sync.is_none());

        let storage = config.storage_or_default();
        assert_eq!(storage.db_file, "fastslowly.db");
        assert_eq!(storage.cache_file, "cache.json");
        assert_eq!(storage.cache_quota_bytes, 5 * 1024 * 1024);
        assert_eq!(storage.busy_timeout_ms, 250);

        let sync = config.sync_or_default();
        assert_eq!(sync.api_url, None);
        assert!(sync.auto_sync);
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_read_nonexistent_config(ctx: &mut ConfigTestContext) {
        let config = Config::read_from(&ctx.storage).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_save_and_read_config(ctx: &mut ConfigTestContext) {
        let config = Config {
            storage: Some(StorageConfig {
                db_file: "custom.db".to_string(),
                cache_file: "custom-cache.json".to_string(),
                cache_quota_bytes: 1024,
                busy_timeout_ms: 50,
            }),
            sync: Some(SyncConfig {
                api_url: Some("https://sync.example.com".to_string()),
                auto_sync: false,
            }),
        };
        config.save_to(&ctx.storage).unwrap();

        let read = Config::read_from(&ctx.storage).unwrap();
        assert_eq!(read, config);
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_partial_config_uses_defaults(ctx: &mut ConfigTestContext) {
        let path = ctx.storage.get_path(CONFIG_FILE_NAME).unwrap();
        std::fs::write(&path, r#"{"sync": {"auto_sync": false}}"#).unwrap();

        let config = Config::read_from(&ctx.storage).unwrap();
        assert_eq!(config.storage, None);
        assert_eq!(config.storage_or_default(), StorageConfig::default());
        assert!(!config.sync_or_default().auto_sync);
        assert_eq!(config.sync_or_default().api_url, None);
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_invalid_config_is_an_error(ctx: &mut ConfigTestContext) {
        let path = ctx.storage.get_path(CONFIG_FILE_NAME).unwrap();
        std::fs::write(&path, "{ not json").unwrap();

        assert!(Config::read_from(&ctx.storage).is_err());
    }

    struct FromConfigTestContext {
        _temp_dir: TempDir,
        storage: DataStorage,
    }

    impl AsyncTestContext for FromConfigTestContext {
        async fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let storage = DataStorage::at(temp_dir.path().join("data"));
            FromConfigTestContext {
                _temp_dir: temp_dir,
                storage,
            }
        }
    }

    #[test_context(FromConfigTestContext)]
    #[tokio::test]
    async fn test_persistence_uses_configured_files(ctx: &mut FromConfigTestContext) {
        let config = Config {
            storage: Some(StorageConfig {
                db_file: "store.db".to_string(),
                cache_file: "mirror.json".to_string(),
                ..StorageConfig::default()
            }),
            sync: None,
        };
        let persistence = Persistence::from_config(&config, &ctx.storage).unwrap();

        assert!(!persistence.db().is_open());
        assert!(persistence.save(Record::Settings(Settings::default().with_theme(Theme::Dark))).await);

        assert_eq!(persistence.db().path(), ctx.storage.base_path().join("store.db"));
        assert_eq!(persistence.cache().path(), ctx.storage.base_path().join("mirror.json"));
        assert!(persistence.db().path().exists());
        assert!(persistence.cache().path().exists());
        assert_eq!(persistence.sync().remote().describe(), "local stub");
    }
}
