//! S3驱动工厂

use anyhow::{anyhow, Result};
use serde_json::Value;

use crate::storage::{ObjectStore, StoreFactory};
use super::config::S3Config;
use super::driver::S3Driver;

/// S3驱动工厂
pub struct S3DriverFactory;

impl StoreFactory for S3DriverFactory {
    fn driver_type(&self) -> &'static str {
        "s3"
    }

    fn create_store(&self, config: Value) -> Result<Box<dyn ObjectStore>> {
        let config: S3Config = serde_json::from_value(config)
            .map_err(|e| anyhow!("配置解析失败: {}", e))?;
        if config.bucket.is_empty() {
            return Err(anyhow!("未配置存储桶名称"));
        }
        Ok(Box::new(S3Driver::new(config)?))
    }
}
