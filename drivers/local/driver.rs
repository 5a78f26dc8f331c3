use async_trait::async_trait;
use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

use crate::storage::{HttpMetadata, ListPage, ObjectEntry, ObjectStore, StoredObject};

pub struct LocalDriver {
    root: PathBuf,
    page_size: usize,
}

impl LocalDriver {
    pub fn new(root: PathBuf, page_size: usize) -> Self {
        Self { root, page_size }
    }

    /// Map a key to a file path, `None` for keys that escape the root / 对象键转文件路径
    fn key_path(&self, key: &str) -> Option<PathBuf> {
        if key.is_empty() || key.starts_with('/') || key.contains('\\') {
            return None;
        }
        let mut path = self.root.clone();
        for segment in key.split('/') {
            if segment.is_empty() || segment == "." || segment == ".." {
                return None;
            }
            path.push(segment);
        }
        Some(path)
    }
}

/// Collect every file key under `dir`, relative to `root` / 递归收集文件键
fn collect_keys(root: &Path, dir: &Path, keys: &mut Vec<(String, u64)>) -> std::io::Result<()> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e),
    };

    for entry in entries {
        let entry = entry?;
        let metadata = entry.metadata()?;
        let path = entry.path();

        if metadata.is_dir() {
            collect_keys(root, &path, keys)?;
        } else if metadata.is_file() {
            let relative = match path.strip_prefix(root) {
                Ok(relative) => relative,
                Err(_) => continue,
            };
            let segments: Option<Vec<&str>> = relative
                .components()
                .map(|c| c.as_os_str().to_str())
                .collect();
            // Non UTF-8 names cannot be addressed by a key
            if let Some(segments) = segments {
                keys.push((segments.join("/"), metadata.len()));
            }
        }
    }
    Ok(())
}

/// HTTP date for `last-modified` / HTTP日期格式
fn http_date(time: std::time::SystemTime) -> String {
    let dt: DateTime<Utc> = time.into();
    dt.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

#[async_trait]
impl ObjectStore for LocalDriver {
    fn name(&self) -> &str {
        "local"
    }

    async fn get(&self, key: &str) -> Result<Option<StoredObject>> {
        let path = match self.key_path(key) {
            Some(path) => path,
            None => return Ok(None),
        };

        let metadata = match tokio::fs::metadata(&path).await {
            Ok(metadata) if metadata.is_file() => metadata,
            Ok(_) => return Ok(None),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(anyhow!("Failed to stat {}: {}", key, e)),
        };

        let data = tokio::fs::read(&path).await
            .map_err(|e| anyhow!("Failed to read {}: {}", key, e))?;
        let http_etag = format!("\"{}\"", hex::encode(md5::compute(&data).0));

        Ok(Some(StoredObject {
            key: key.to_string(),
            body: data.into(),
            http_etag,
            metadata: HttpMetadata {
                content_type: mime_guess::from_path(&path).first().map(|m| m.to_string()),
                last_modified: metadata.modified().ok().map(http_date),
                ..Default::default()
            },
        }))
    }

    async fn list(&self, prefix: &str, cursor: Option<&str>) -> Result<ListPage> {
        // Only the directory holding the prefix needs walking: "images/abc" -> images/
        let base = match prefix.rfind('/') {
            Some(pos) => match self.key_path(&prefix[..pos]) {
                Some(dir) => dir,
                None => return Ok(ListPage::default()),
            },
            None => self.root.clone(),
        };

        let root = self.root.clone();
        let mut keys = tokio::task::spawn_blocking(move || {
            let mut keys = Vec::new();
            if base.is_dir() {
                collect_keys(&root, &base, &mut keys)?;
            }
            Ok::<_, std::io::Error>(keys)
        }).await??;
        keys.sort_unstable_by(|a, b| a.0.cmp(&b.0));

        let mut matching = keys.into_iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .filter(|(key, _)| cursor.map_or(true, |after| key.as_str() > after));

        let entries: Vec<ObjectEntry> = matching.by_ref()
            .take(self.page_size)
            .map(|(key, size)| ObjectEntry::new(key, size))
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::list_all;

    fn write(root: &Path, key: &str, data: &[u8]) {
        let path = root.join(key);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, data).unwrap();
    }

    fn setup(page_size: usize) -> (tempfile::TempDir, LocalDriver) {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "images/abc.jpeg", b"jpeg");
        write(dir.path(), "images/abcdef.png", b"png!");
        write(dir.path(), "images/xyz/a.png", b"a");
        write(dir.path(), "images/xyz/b.png", b"bb");
        write(dir.path(), "images/xyz/c.png", b"ccc");
        write(dir.path(), "other.txt", b"other");
        let driver = LocalDriver::new(dir.path().to_path_buf(), page_size);
        (dir, driver)
    }

    #[tokio::test]
    async fn test_get() {
        let (_dir, driver) = setup(1000);

        let object = driver.get("images/abc.jpeg").await.unwrap().unwrap();
        assert_eq!(&object.body[..], b"jpeg");
        assert_eq!(object.metadata.content_type.as_deref(), Some("image/jpeg"));
        assert_eq!(object.http_etag, format!("\"{:x}\"", md5::compute(b"jpeg")));
        assert!(object.metadata.last_modified.unwrap().ends_with(" GMT"));

        assert!(driver.get("images/missing.png").await.unwrap().is_none());
        assert!(driver.get("images/xyz").await.unwrap().is_none());
        assert!(driver.get("").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_rejects_traversal() {
        let (dir, _) = setup(1000);
        let inner = dir.path().join("images");
        let driver = LocalDriver::new(inner, 1000);

        assert!(driver.get("../other.txt").await.unwrap().is_none());
        assert!(driver.get("xyz/../../other.txt").await.unwrap().is_none());
        assert!(driver.get("/etc/passwd").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_prefix() {
        let (_dir, driver) = setup(1000);

        let page = driver.list("images/abc", None).await.unwrap();
        assert!(!page.truncated);
        assert_eq!(page.entries, vec![
            ObjectEntry::new("images/abc.jpeg", 4),
            ObjectEntry::new("images/abcdef.png", 4),
        ]);

        let page = driver.list("images/xyz/", None).await.unwrap();
        assert_eq!(page.entries.len(), 3);

        let page = driver.list("nothing/here", None).await.unwrap();
        assert!(page.entries.is_empty());
    }

    #[tokio::test]
    async fn test_list_pages() {
        let (_dir, driver) = setup(2);

        let first = driver.list("images/xyz/", None).await.unwrap();
        assert!(first.truncated);
        assert_eq!(first.entries.len(), 2);
        assert_eq!(first.cursor.as_deref(), Some("images/xyz/b.png"));

        let second = driver.list("images/xyz/", first.cursor.as_deref()).await.unwrap();
        assert!(!second.truncated);
        assert_eq!(second.entries, vec![ObjectEntry::new("images/xyz/c.png", 3)]);

        let all = list_all(&driver, "images/").await.unwrap();
        assert_eq!(all.len(), 5);
    }
}
