//! S3驱动核心实现
//!
//! 设计原则：
//! - 只提供只读原语（get, list）
//! - list 使用 ListObjectsV2 的 continuation token 作为分页游标
//! - get 的 404 视为对象不存在，其他非2xx状态视为错误

use std::collections::HashMap;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use s3::bucket::Bucket;
use s3::creds::Credentials;
use s3::error::S3Error;
use s3::Region;

use crate::storage::{HttpMetadata, ListPage, ObjectEntry, ObjectStore, StoredObject};
use super::config::S3Config;

/// S3驱动
pub struct S3Driver {
    config: S3Config,
    bucket: Box<Bucket>,
}

impl S3Driver {
    /// 创建新的S3驱动实例
    pub fn new(config: S3Config) -> Result<Self> {
        let bucket = Self::create_bucket(&config)?;
        Ok(Self { config, bucket })
    }

    /// 创建S3 Bucket客户端
    fn create_bucket(config: &S3Config) -> Result<Box<Bucket>> {
        let credentials = if config.access_key_id.is_empty() && config.secret_access_key.is_empty() {
            // 公开读取的存储桶
            Credentials::anonymous()
        } else {
            Credentials::new(
                Some(&config.access_key_id),
                Some(&config.secret_access_key),
                if config.session_token.is_empty() { None } else { Some(&config.session_token) },
                None,
                None,
            )
        };
        let credentials = credentials.map_err(|e| anyhow!("创建S3凭证失败: {}", e))?;

        let region = if config.endpoint.is_empty() {
            Region::Custom {
                region: config.region.clone(),
                endpoint: format!("https://s3.{}.amazonaws.com", config.region),
            }
        } else {
            Region::Custom {
                region: config.region.clone(),
                endpoint: config.endpoint.clone(),
            }
        };

        let bucket = Bucket::new(&config.bucket, region, credentials)
            .map_err(|e| anyhow!("创建S3 Bucket失败: {}", e))?;

        let bucket = if config.force_path_style {
            bucket.with_path_style()
        } else {
            bucket
        };

        Ok(bucket)
    }

    /// 根目录前缀（"a/b/"，根为空时返回空字符串）
    fn root_prefix(&self) -> String {
        let root = self.config.root_path.trim_matches('/');
        if root.is_empty() {
            String::new()
        } else {
            format!("{}/", root)
        }
    }

    /// 获取完整的对象键
    fn get_object_key(&self, key: &str) -> String {
        format!("{}{}", self.root_prefix(), key)
    }

    /// 去掉根目录前缀，得到相对对象键
    fn relative_key(&self, full_key: &str) -> String {
        let root = self.root_prefix();
        full_key.strip_prefix(root.as_str()).unwrap_or(full_key).to_string()
    }
}

/// 按名称读取响应头（忽略大小写）
fn header_value(headers: &HashMap<String, String>, name: &str) -> Option<String> {
    headers.iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.clone())
}

/// 从响应头中提取HTTP元数据
fn http_metadata(headers: &HashMap<String, String>) -> HttpMetadata {
    HttpMetadata {
        content_type: header_value(headers, "content-type"),
        content_disposition: header_value(headers, "content-disposition"),
        content_encoding: header_value(headers, "content-encoding"),
        content_language: header_value(headers, "content-language"),
        cache_control: header_value(headers, "cache-control"),
        expires: header_value(headers, "expires"),
        last_modified: header_value(headers, "last-modified"),
    }
}

/// ETag 统一为带引号的形式
fn quote_etag(etag: &str) -> String {
    if etag.starts_with('"') || etag.starts_with("W/") {
        etag.to_string()
    } else {
        format!("\"{}\"", etag)
    }
}

#[async_trait]
impl ObjectStore for S3Driver {
    fn name(&self) -> &str {
        "s3"
    }

    async fn get(&self, key: &str) -> Result<Option<StoredObject>> {
        let full_key = self.get_object_key(key);

        let response = match self.bucket.get_object(&full_key).await {
            Ok(response) => response,
            Err(S3Error::HttpFailWithBody(404, _)) => return Ok(None),
            Err(e) => return Err(anyhow!("获取S3对象失败: {}", e)),
        };

        match response.status_code() {
            200..=299 => {}
            404 => return Ok(None),
            code => return Err(anyhow!("获取S3对象失败: HTTP {} ({})", code, full_key)),
        }

        let headers = response.headers();
        let body = response.bytes().clone();
        let http_etag = match header_value(&headers, "etag") {
            Some(etag) => quote_etag(&etag),
            None => format!("\"{}\"", hex::encode(md5::compute(&body).0)),
        };

        Ok(Some(StoredObject {
            key: key.to_string(),
            body,
            http_etag,
            metadata: http_metadata(&headers),
        }))
    }

    async fn list(&self, prefix: &str, cursor: Option<&str>) -> Result<ListPage> {
        let full_prefix = self.get_object_key(prefix);

        let (result, _) = self.bucket
            .list_page(
                full_prefix,
                None,
                cursor.map(|c| c.to_string()),
                None,
                self.config.page_size,
            )
            .await
            .map_err(|e| anyhow!("列出S3对象失败: {}", e))?;

        let entries = result.contents.iter()
            .map(|obj| ObjectEntry::new(self.relative_key(&obj.key), obj.size as u64))
            .collect();

        Ok(ListPage {
            entries,
            truncated: result.is_truncated,
            cursor: result.next_continuation_token,
        })
    }
}
