use async_trait::async_trait;
use anyhow::Result;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// One entry of a prefix listing / 列表条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectEntry {
    pub key: String,
    pub size: u64,
}

impl ObjectEntry {
    pub fn new(key: impl Into<String>, size: u64) -> Self {
        Self { key: key.into(), size }
    }
}

/// One page of a prefix listing / 分页列表结果
#[derive(Debug, Clone, Default)]
pub struct ListPage {
    pub entries: Vec<ObjectEntry>,
    /// More entries remain after this page / 是否还有后续分页
    pub truncated: bool,
    /// Cursor to pass to the next `list` call / 下一页游标
    pub cursor: Option<String>,
}

/// HTTP metadata stored alongside an object / 对象的HTTP元数据
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpMetadata {
    pub content_type: Option<String>,
    pub content_disposition: Option<String>,
    pub content_encoding: Option<String>,
    pub content_language: Option<String>,
    pub cache_control: Option<String>,
    pub expires: Option<String>,
    pub last_modified: Option<String>,
}

/// A fetched object / 读取到的对象
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub key: String,
    pub body: Bytes,
    /// Quoted entity tag, ready for the `etag` header / 带引号的ETag
    pub http_etag: String,
    pub metadata: HttpMetadata,
}

impl StoredObject {
    pub fn size(&self) -> u64 {
        self.body.len() as u64
    }
}

/// Object store interface (read-only primitives) / 对象存储接口（只读原语）
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Driver name / 驱动名称
    fn name(&self) -> &str;

    /// Fetch an object, `None` if the key does not exist / 获取对象，不存在返回None
    async fn get(&self, key: &str) -> Result<Option<StoredObject>>;

    /// List one page of keys starting with `prefix` / 按前缀列出一页
    ///
    /// `cursor` is the value returned in the previous page's `ListPage::cursor`.
    async fn list(&self, prefix: &str, cursor: Option<&str>) -> Result<ListPage>;
}

pub mod manager;
pub mod table;

#[cfg(test)]
pub mod testing;

pub use manager::{StoreFactory, StoreHandle, StoreManager};
pub use table::{BucketTable, Mount, ResolveMode};
