//! Application configuration module / 应用配置模块
//!
//! Manages application configuration loaded from config.json
//! Creates default config file on first run / 首次运行时创建默认配置文件

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::PathBuf;

use crate::storage::ResolveMode;

/// Application configuration / 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration / 服务器配置
    #[serde(default)]
    pub server: ServerConfig,
    /// Mounted buckets / 挂载的存储桶
    #[serde(default)]
    pub buckets: Vec<BucketConfig>,
}

/// Server configuration / 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address / 服务器监听地址
    pub host: String,
    /// Server port / 服务器端口
    pub port: u16,
}

/// Bucket configuration / 存储桶配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketConfig {
    /// Logical bucket name / 逻辑名称
    pub name: String,
    /// First URL segment; empty string mounts the default bucket / URL前缀，空字符串为默认桶
    #[serde(default)]
    pub mount: String,
    /// Key resolution mode / 键解析方式
    #[serde(default)]
    pub resolve: ResolveMode,
    /// Prefix prepended to the request path / 对象键前缀
    #[serde(default)]
    pub key_prefix: String,
    /// Driver type (s3, local) / 驱动类型
    pub driver: String,
    /// Driver-specific configuration / 驱动配置
    #[serde(default)]
    pub config: Value,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            buckets: vec![
                BucketConfig {
                    name: "chisel-images".to_string(),
                    mount: String::new(),
                    resolve: ResolveMode::Exact,
                    key_prefix: String::new(),
                    driver: "local".to_string(),
                    config: json!({ "root": "data/chisel-images" }),
                },
                BucketConfig {
                    name: "imgur-backup".to_string(),
                    mount: "imgur".to_string(),
                    resolve: ResolveMode::Fuzzy,
                    key_prefix: "images/".to_string(),
                    driver: "local".to_string(),
                    config: json!({ "root": "data/imgur-backup" }),
                },
            ],
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8787,
        }
    }
}

impl AppConfig {
    /// Get the server bind address / 获取服务器绑定地址
    pub fn get_bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Get the config file path / 获取配置文件路径
fn get_config_path() -> PathBuf {
    if let Ok(path) = std::env::var("GATEWAY_CONFIG") {
        return PathBuf::from(path);
    }
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("config.json")
}

/// Load configuration from file, or create default if not exists / 加载配置文件，不存在则创建默认配置
pub fn load_config() -> Result<AppConfig, String> {
    let config_path = get_config_path();

    if config_path.exists() {
        // Load existing config / 加载现有配置
        let content = std::fs::read_to_string(&config_path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let config = parse_config(&content)?;

        tracing::info!("Loaded configuration from {:?}", config_path);
        Ok(config)
    } else {
        // Create default config / 创建默认配置
        let config = AppConfig::default();
        save_config(&config)?;
        tracing::info!("Created default configuration at {:?}", config_path);
        Ok(config)
    }
}

/// Parse configuration JSON / 解析配置
pub fn parse_config(content: &str) -> Result<AppConfig, String> {
    serde_json::from_str(content)
        .map_err(|e| format!("Failed to parse config file: {}", e))
}

/// Save configuration to file / 保存配置到文件
pub fn save_config(config: &AppConfig) -> Result<(), String> {
    let config_path = get_config_path();

    let content = serde_json::to_string_pretty(config)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;

    std::fs::write(&config_path, content)
        .map_err(|e| format!("Failed to write config file: {}", e))?;

    Ok(())
}
