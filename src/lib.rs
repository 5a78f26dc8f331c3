pub mod api;
pub mod config;
pub mod error;
pub mod resolver;
pub mod state;
pub mod storage;
pub mod utils;

// Driver modules (point to project root drivers via path attribute) / 驱动模块
#[path = "../drivers/mod.rs"]
pub mod drivers;

// Register all store drivers (call unified registration function from drivers module) / 注册所有存储驱动
pub fn register_store_drivers(manager: &mut storage::StoreManager) {
    drivers::register_all(manager)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_registered_drivers() {
        let mut manager = storage::StoreManager::new();
        register_store_drivers(&mut manager);
        assert_eq!(manager.driver_types(), vec!["local", "s3"]);
    }

    #[test]
    fn test_build_table_keeps_unconfigured_buckets() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = storage::StoreManager::new();
        register_store_drivers(&mut manager);

        let configs = vec![
            config::BucketConfig {
                name: "chisel-images".to_string(),
                mount: String::new(),
                resolve: storage::ResolveMode::Exact,
                key_prefix: String::new(),
                driver: "local".to_string(),
                config: json!({ "root": dir.path().to_string_lossy() }),
            },
            config::BucketConfig {
                name: "imgur-backup".to_string(),
                mount: "imgur".to_string(),
                resolve: storage::ResolveMode::Fuzzy,
                key_prefix: "images/".to_string(),
                driver: "s3".to_string(),
                config: json!({}),
            },
        ];

        let table = storage::BucketTable::build(&configs, &manager).unwrap();
        assert_eq!(table.mounts().len(), 2);
        let (default, _) = table.route("/a.png").unwrap();
        assert!(default.store().is_some());
        let (imgur, _) = table.route("/imgur/a.png").unwrap();
        assert!(imgur.store().is_none());
    }

    #[test]
    fn test_build_table_rejects_duplicate_mounts() {
        let manager = storage::StoreManager::new();
        let bucket = config::BucketConfig {
            name: "a".to_string(),
            mount: "imgur".to_string(),
            resolve: storage::ResolveMode::Exact,
            key_prefix: String::new(),
            driver: "s3".to_string(),
            config: json!({}),
        };
        let configs = vec![bucket.clone(), config::BucketConfig { name: "b".to_string(), ..bucket }];
        assert!(storage::BucketTable::build(&configs, &manager).is_err());
    }
}
