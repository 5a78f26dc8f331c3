//! Key resolution / 对象键解析
//!
//! Maps a request path to zero, one or many stored objects.
//!
//! Exact mounts trust the path: the key is the path itself and the object fetch
//! decides between found and not found. Fuzzy mounts (the imgur backup) hold
//! historical imports whose extensions do not always match what clients ask for,
//! so the path is matched by prefix listing:
//!
//! - `images/<album>/` lists the whole album
//! - otherwise the extension is stripped and every key starting with the clean
//!   key is collected; a single exact or extension-insensitive match wins
//! - else the path is treated as a directory and its children are offered

use anyhow::Result;

use crate::storage::{Mount, ObjectEntry, ObjectStore, ResolveMode};
use crate::utils::{clean_key, dir_prefix};

/// Outcome of resolving one request / 解析结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Exactly one object / 唯一对象
    Unique(String),
    /// Several candidates, answered with a listing page / 多个候选
    Ambiguous(Vec<ObjectEntry>),
    NotFound,
}

/// Resolve `path` (relative to `mount`) against `store` / 解析请求路径
pub async fn resolve(store: &dyn ObjectStore, mount: &Mount, path: &str) -> Result<Resolution> {
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        return Ok(Resolution::NotFound);
    }

    let key = mount.object_key(path);
    match mount.mode {
        ResolveMode::Exact => Ok(Resolution::Unique(key)),
        ResolveMode::Fuzzy if mount.is_album_key(&key) => resolve_album(store, &key).await,
        ResolveMode::Fuzzy => resolve_fuzzy(store, &key).await,
    }
}

async fn resolve_album(store: &dyn ObjectStore, key: &str) -> Result<Resolution> {
    let entries = list_all(store, key).await?;
    tracing::debug!("Album {} has {} entries", key, entries.len());

    if entries.is_empty() {
        Ok(Resolution::NotFound)
    } else {
        Ok(Resolution::Ambiguous(entries))
    }
}

async fn resolve_fuzzy(store: &dyn ObjectStore, key: &str) -> Result<Resolution> {
    let clean = clean_key(key);
    let entries = list_all(store, clean).await?;
    tracing::debug!("Fuzzy lookup {} (clean {}): {} candidates", key, clean, entries.len());

    if entries.is_empty() {
        return Ok(Resolution::NotFound);
    }
    if entries.len() == 1 && entries[0].key == key {
        return Ok(Resolution::Unique(key.to_string()));
    }

    let variants: Vec<&ObjectEntry> = entries.iter()
        .filter(|e| clean_key(&e.key) == clean)
        .collect();
    if variants.len() == 1 {
        return Ok(Resolution::Unique(variants[0].key.clone()));
    }

    let dir = dir_prefix(key);
    let mut children: Vec<ObjectEntry> = entries.iter()
        .filter(|e| e.key.starts_with(&dir))
        .cloned()
        .collect();

    match children.len() {
        0 if variants.len() > 1 => Ok(Resolution::Ambiguous(variants.into_iter().cloned().collect())),
        0 => Ok(Resolution::NotFound),
        1 => Ok(Resolution::Unique(children.remove(0).key)),
        _ => Ok(Resolution::Ambiguous(children)),
    }
}

/// Collect every entry under `prefix`, following pagination / 分页列出全部条目
///
/// Stops when the store reports no truncation, returns an empty page, or gives
/// no cursor to continue from.
pub async fn list_all(store: &dyn ObjectStore, prefix: &str) -> Result<Vec<ObjectEntry>> {
    let mut entries = Vec::new();
    let mut cursor: Option<String> = None;

    loop {
        let page = store.list(prefix, cursor.as_deref()).await?;
        let empty = page.entries.is_empty();
        entries.extend(page.entries);

        if !page.truncated || empty {
            break;
        }
        match page.cursor {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    Ok(entries)
}
