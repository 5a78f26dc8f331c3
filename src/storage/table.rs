//! Bucket table: URL mount → object store / 存储桶路由表
//!
//! Built once at startup from the bucket configs, read-only afterwards.

use anyhow::{anyhow, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::BucketConfig;
use super::{StoreHandle, StoreManager};

/// How request paths map to object keys / 路径到对象键的解析方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolveMode {
    /// Path is the exact key / 路径即对象键
    #[default]
    Exact,
    /// Extension-insensitive lookup with listing fallback / 模糊匹配（忽略扩展名，多候选时列表）
    Fuzzy,
}

/// A mounted bucket / 挂载的存储桶
pub struct Mount {
    /// Logical bucket name / 逻辑名称
    pub name: String,
    /// First URL segment, empty for the default bucket / URL前缀，空为默认桶
    pub mount: String,
    pub mode: ResolveMode,
    /// Prepended to the request path before lookup / 查找前添加的键前缀
    pub key_prefix: String,
    store: Option<StoreHandle>,
    album_pattern: Option<Regex>,
}

impl Mount {
    pub fn new(name: &str, mount: &str, mode: ResolveMode, key_prefix: &str, store: Option<StoreHandle>) -> Result<Self> {
        let album_pattern = match mode {
            ResolveMode::Fuzzy => Some(album_regex(key_prefix)?),
            ResolveMode::Exact => None,
        };

        Ok(Self {
            name: name.to_string(),
            mount: mount.trim_matches('/').to_string(),
            mode,
            key_prefix: key_prefix.to_string(),
            store,
            album_pattern,
        })
    }

    /// Store handle, `None` when the bucket failed to configure / 未配置时为None
    pub fn store(&self) -> Option<&StoreHandle> {
        self.store.as_ref()
    }

    /// Object key for a path relative to this mount / 计算对象键
    pub fn object_key(&self, path: &str) -> String {
        format!("{}{}", self.key_prefix, path.trim_start_matches('/'))
    }

    /// Gateway URL path of a stored key / 对象键对应的网关路径
    pub fn public_path(&self, key: &str) -> String {
        let relative = key.strip_prefix(self.key_prefix.as_str()).unwrap_or(key);
        let encoded: Vec<String> = relative
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect();

        if self.mount.is_empty() {
            format!("/{}", encoded.join("/"))
        } else {
            format!("/{}/{}", self.mount, encoded.join("/"))
        }
    }

    /// Whether `key` names a whole album (`<key_prefix><segment>/`) / 是否为相册目录
    pub fn is_album_key(&self, key: &str) -> bool {
        self.album_pattern.as_ref().map_or(false, |re| re.is_match(key))
    }
}

fn album_regex(key_prefix: &str) -> Result<Regex> {
    let pattern = format!("^{}[^/]+/$", regex::escape(key_prefix));
    Regex::new(&pattern).map_err(|e| anyhow!("Invalid album pattern for prefix {:?}: {}", key_prefix, e))
}

/// Bucket routing table / 存储桶路由表
#[derive(Default)]
pub struct BucketTable {
    mounts: Vec<Mount>,
}

impl BucketTable {
    pub fn new(mounts: Vec<Mount>) -> Self {
        Self { mounts }
    }

    /// Build every configured bucket / 根据配置构建所有存储桶
    ///
    /// A bucket whose store cannot be created is kept as unconfigured so its
    /// requests answer 404 instead of falling through to the default bucket.
    pub fn build(configs: &[BucketConfig], manager: &StoreManager) -> Result<Self> {
        let mut mounts = Vec::with_capacity(configs.len());

        for config in configs {
            let store = match manager.create_store(&config.driver, config.config.clone()) {
                Ok(store) => {
                    tracing::info!(
                        "Bucket mounted: {} at /{} ({}, {:?})",
                        config.name, config.mount, store.name(), config.resolve
                    );
                    Some(store)
                }
                Err(e) => {
                    tracing::error!("Bucket {} is unconfigured: {}", config.name, e);
                    None
                }
            };

            if mounts.iter().any(|m: &Mount| m.mount == config.mount.trim_matches('/')) {
                return Err(anyhow!("Duplicate bucket mount: /{}", config.mount));
            }
            mounts.push(Mount::new(&config.name, &config.mount, config.resolve, &config.key_prefix, store)?);
        }

        Ok(Self { mounts })
    }

    pub fn mounts(&self) -> &[Mount] {
        &self.mounts
    }

    /// Pick the mount serving `path` and the path relative to it / 路由请求路径
    ///
    /// `/imgur/a/b.png` → (imgur, `a/b.png`); any other path → (default, whole path).
    pub fn route<'a>(&self, path: &'a str) -> Option<(&Mount, &'a str)> {
        let trimmed = path.trim_start_matches('/');
        let (first, rest) = match trimmed.split_once('/') {
            Some((first, rest)) => (first, rest),
            None => (trimmed, ""),
        };

        if !first.is_empty() {
            if let Some(mount) = self.mounts.iter().find(|m| !m.mount.is_empty() && m.mount == first) {
                return Some((mount, rest));
            }
        }

        self.mounts.iter()
            .find(|m| m.mount.is_empty())
            .map(|m| (m, trimmed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use crate::storage::testing::MemoryStore;

    fn table() -> BucketTable {
        let store: StoreHandle = Arc::new(MemoryStore::new());
        BucketTable::new(vec![
            Mount::new("chisel-images", "", ResolveMode::Exact, "", Some(store.clone())).unwrap(),
            Mount::new("imgur-backup", "imgur", ResolveMode::Fuzzy, "images/", Some(store)).unwrap(),
        ])
    }

    #[test]
    fn test_route_by_first_segment() {
        let table = table();

        let (mount, rest) = table.route("/imgur/abc123.png").unwrap();
        assert_eq!(mount.name, "imgur-backup");
        assert_eq!(rest, "abc123.png");

        let (mount, rest) = table.route("/imgur/album/").unwrap();
        assert_eq!(mount.name, "imgur-backup");
        assert_eq!(rest, "album/");

        let (mount, rest) = table.route("/imgur").unwrap();
        assert_eq!(mount.name, "imgur-backup");
        assert_eq!(rest, "");
    }

    #[test]
    fn test_route_falls_back_to_default() {
        let table = table();

        let (mount, rest) = table.route("/imgs/wowee.png").unwrap();
        assert_eq!(mount.name, "chisel-images");
        assert_eq!(rest, "imgs/wowee.png");

        let (mount, rest) = table.route("/imgurish/x.png").unwrap();
        assert_eq!(mount.name, "chisel-images");
        assert_eq!(rest, "imgurish/x.png");
    }

    #[test]
    fn test_route_without_default_mount() {
        let table = BucketTable::new(vec![
            Mount::new("imgur-backup", "imgur", ResolveMode::Fuzzy, "images/", None).unwrap(),
        ]);
        assert!(table.route("/imgs/wowee.png").is_none());
        assert!(table.route("/imgur/x").is_some());
    }

    #[test]
    fn test_object_key_and_public_path() {
        let table = table();
        let (imgur, _) = table.route("/imgur/x").unwrap();
        assert_eq!(imgur.object_key("abc123.png"), "images/abc123.png");
        assert_eq!(imgur.public_path("images/my album/a b.png"), "/imgur/my%20album/a%20b.png");

        let (default, _) = table.route("/x").unwrap();
        assert_eq!(default.object_key("imgs/wowee.png"), "imgs/wowee.png");
        assert_eq!(default.public_path("imgs/wowee.png"), "/imgs/wowee.png");
    }

    #[test]
    fn test_album_pattern() {
        let table = table();
        let (imgur, _) = table.route("/imgur/x").unwrap();
        assert!(imgur.is_album_key("images/xyz/"));
        assert!(!imgur.is_album_key("images/xyz"));
        assert!(!imgur.is_album_key("images/xyz/abc/"));
        assert!(!imgur.is_album_key("images//"));
        assert!(!imgur.is_album_key("other/xyz/"));

        let (default, _) = table.route("/x").unwrap();
        assert!(!default.is_album_key("xyz/"));
    }
}
