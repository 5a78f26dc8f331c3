//! 本地文件系统对象存储
//!
//! 对象键为相对于根目录、以 `/` 分隔的文件路径

pub mod driver;

use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::storage::{ObjectStore, StoreFactory};
pub use driver::LocalDriver;

/// 本地驱动配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalConfig {
    /// 根目录
    pub root: String,
    /// 每页最多列出的对象数
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_page_size() -> usize {
    1000
}

// 本地驱动工厂
pub struct LocalDriverFactory;

impl StoreFactory for LocalDriverFactory {
    fn driver_type(&self) -> &'static str {
        "local"
    }

    fn create_store(&self, config: Value) -> Result<Box<dyn ObjectStore>> {
        let config: LocalConfig = serde_json::from_value(config)
            .map_err(|e| anyhow!("Invalid local driver config: {}", e))?;

        // 规范化根路径
        let root_path = PathBuf::from(config.root.replace('\\', "/"));

        // 确保是绝对路径
        let root_path = if root_path.is_absolute() {
            root_path
        } else {
            env::current_dir()?.join(root_path)
        };

        // 创建目录（如果不存在）
        std::fs::create_dir_all(&root_path)?;

        let canonical_root = root_path.canonicalize()?;

        Ok(Box::new(LocalDriver::new(canonical_root, config.page_size.max(1))))
    }
}
