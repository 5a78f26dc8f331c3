//! In-memory store used by tests / 测试用内存存储

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use bytes::Bytes;

use super::{HttpMetadata, ListPage, ObjectEntry, ObjectStore, StoredObject};

pub struct MemoryStore {
    objects: BTreeMap<String, (Bytes, HttpMetadata)>,
    page_size: usize,
    failing: bool,
    list_calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            objects: BTreeMap::new(),
            page_size: 1000,
            failing: false,
            list_calls: AtomicUsize::new(0),
        }
    }

    /// Store whose every call errors, like an unreachable bucket
    pub fn failing() -> Self {
        Self { failing: true, ..Self::new() }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_object(mut self, key: &str, body: impl Into<Bytes>) -> Self {
        self.objects.insert(key.to_string(), (body.into(), HttpMetadata::default()));
        self
    }

    pub fn with_typed_object(mut self, key: &str, body: impl Into<Bytes>, content_type: &str) -> Self {
        let metadata = HttpMetadata {
            content_type: Some(content_type.to_string()),
            ..Default::default()
        };
        self.objects.insert(key.to_string(), (body.into(), metadata));
        self
    }

    pub fn with_metadata(mut self, key: &str, body: impl Into<Bytes>, metadata: HttpMetadata) -> Self {
        self.objects.insert(key.to_string(), (body.into(), metadata));
        self
    }

    /// Object of `size` zero bytes
    pub fn with_sized_object(self, key: &str, size: usize) -> Self {
        self.with_object(key, vec![0u8; size])
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn get(&self, key: &str) -> Result<Option<StoredObject>> {
        if self.failing {
            return Err(anyhow!("memory store unavailable"));
        }
        Ok(self.objects.get(key).map(|(body, metadata)| StoredObject {
            key: key.to_string(),
            body: body.clone(),
            http_etag: format!("\"{}\"", hex::encode(md5::compute(body).0)),
            metadata: metadata.clone(),
        }))
    }

    async fn list(&self, prefix: &str, cursor: Option<&str>) -> Result<ListPage> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(anyhow!("memory store unavailable"));
        }

        let mut matching = self.objects.iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .filter(|(key, _)| cursor.map_or(true, |after| key.as_str() > after));

        let entries: Vec<ObjectEntry> = matching.by_ref()
            .take(self.page_size)
            .map(|(key, (body, _))| ObjectEntry::new(key.clone(), body.len() as u64))
            .collect();
        let truncated = matching.next().is_some();
        let cursor = if truncated {
            entries.last().map(|e| e.key.clone())
        } else {
            None
        };

        Ok(ListPage { entries, truncated, cursor })
    }
}
