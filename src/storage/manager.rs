use std::collections::HashMap;
use std::sync::Arc;
use anyhow::{anyhow, Result};
use serde_json::Value;

use super::ObjectStore;

pub type StoreHandle = Arc<dyn ObjectStore>;

/// Store factory trait / 存储驱动工厂 trait
pub trait StoreFactory: Send + Sync {
    /// Driver type name, matched against `driver` in bucket config / 驱动类型名称
    fn driver_type(&self) -> &'static str;

    /// Create store instance / 创建存储实例
    fn create_store(&self, config: Value) -> Result<Box<dyn ObjectStore>>;
}

/// Store manager (driver factory registry) / 存储管理器
///
/// Only used while the bucket table is built at startup.
#[derive(Default)]
pub struct StoreManager {
    factories: HashMap<String, Box<dyn StoreFactory>>,
}

impl StoreManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register driver factory / 注册驱动工厂
    pub fn register_factory(&mut self, factory: Box<dyn StoreFactory>) {
        let driver_type = factory.driver_type().to_string();
        self.factories.insert(driver_type.clone(), factory);
        tracing::info!("Store factory registered: {}", driver_type);
    }

    /// Registered driver types, sorted / 已注册的驱动类型
    pub fn driver_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.factories.keys().map(|k| k.as_str()).collect();
        types.sort_unstable();
        types
    }

    /// Create store instance / 创建存储实例
    pub fn create_store(&self, driver_type: &str, config: Value) -> Result<StoreHandle> {
        let factory = self.factories.get(driver_type)
            .ok_or_else(|| anyhow!("Driver type not found: {}", driver_type))?;

        let store = factory.create_store(config)?;
        Ok(Arc::from(store))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::testing::MemoryStore;

    struct MemoryFactory;

    impl StoreFactory for MemoryFactory {
        fn driver_type(&self) -> &'static str {
            "memory"
        }

        fn create_store(&self, _config: Value) -> Result<Box<dyn ObjectStore>> {
            Ok(Box::new(MemoryStore::new()))
        }
    }

    #[test]
    fn test_create_store_by_driver_type() {
        let mut manager = StoreManager::new();
        manager.register_factory(Box::new(MemoryFactory));

        assert_eq!(manager.driver_types(), vec!["memory"]);
        let store = manager.create_store("memory", Value::Null).unwrap();
        assert_eq!(store.name(), "memory");
    }

    #[test]
    fn test_unknown_driver_type() {
        let manager = StoreManager::new();
        let err = manager.create_store("gcs", Value::Null).err().unwrap();
        assert!(err.to_string().contains("gcs"));
    }
}
