//! Persistent `cache key -> hashed name` store.
//!
//! The whole store lives in one flat JSON object that is rewritten on
//! every mutating write. A missing or unreadable document is never an
//! error: the store simply starts empty.

mod key;

pub use key::cache_key;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::debug;
use crate::error::{Result, StampError};

/// Durable key/value store backed by a JSON document.
#[derive(Debug)]
pub struct PersistentCache {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl PersistentCache {
    /// Open the cache document at `path`, starting empty on any failure.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match load_entries(&path) {
            Ok(entries) => {
                debug!("cache"; "loaded {} entries from {}", entries.len(), path.display());
                entries
            }
            Err(reason) => {
                debug!("cache"; "starting empty ({}): {}", path.display(), reason);
                BTreeMap::new()
            }
        };
        Self { path, entries }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Insert one entry and persist the whole store.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> Result<()> {
        self.entries.insert(key.into(), value.into());
        self.persist()
    }

    /// Insert without persisting; the next `set`/`set_many`/`persist` writes it.
    pub(crate) fn insert(&mut self, key: String, value: String) {
        self.entries.insert(key, value);
    }

    /// Merge all entries, then persist once.
    pub fn set_many<K, V>(&mut self, values: impl IntoIterator<Item = (K, V)>) -> Result<()>
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.entries
            .extend(values.into_iter().map(|(k, v)| (k.into(), v.into())));
        self.persist()
    }

    /// Empty the in-memory store. The document on disk is left untouched
    /// until the next `set`/`set_many`.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Write the whole store to its document.
    pub fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| StampError::io(parent, e))?;
        }
        let json = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| StampError::io(&self.path, e.into()))?;
        fs::write(&self.path, json).map_err(|e| StampError::io(&self.path, e))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn load_entries(path: &Path) -> std::result::Result<BTreeMap<String, String>, String> {
    let json = fs::read_to_string(path).map_err(|e| e.to_string())?;
    serde_json::from_str(&json).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_document_starts_empty() {
        let dir = TempDir::new().unwrap();
        let cache = PersistentCache::open(dir.path().join("static.json"));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_corrupt_document_starts_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("static.json");
        fs::write(&path, "{not json").unwrap();

        let cache = PersistentCache::open(&path);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_set_persists_immediately() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("static.json");

        let mut cache = PersistentCache::open(&path);
        cache.set("k", "styles.93b1147e8552.css").unwrap();

        let reopened = PersistentCache::open(&path);
        assert_eq!(reopened.get("k"), Some("styles.93b1147e8552.css"));
    }

    #[test]
    fn test_set_many_merges() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("static.json");

        let mut cache = PersistentCache::open(&path);
        cache.set("a", "1").unwrap();
        cache.set_many([("b", "2"), ("a", "3")]).unwrap();

        let reopened = PersistentCache::open(&path);
        assert_eq!(reopened.len(), 2);
        assert_eq!(reopened.get("a"), Some("3"));
        assert_eq!(reopened.get("b"), Some("2"));
    }

    #[test]
    fn test_clear_does_not_persist() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("static.json");

        let mut cache = PersistentCache::open(&path);
        cache.set("a", "1").unwrap();
        cache.clear();
        assert_eq!(cache.get("a"), None);

        // Still on disk until the next write
        assert_eq!(PersistentCache::open(&path).get("a"), Some("1"));

        cache.set("b", "2").unwrap();
        let reopened = PersistentCache::open(&path);
        assert_eq!(reopened.get("a"), None);
        assert_eq!(reopened.get("b"), Some("2"));
    }

    #[test]
    fn test_persist_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/dir/static.json");

        let mut cache = PersistentCache::open(&path);
        cache.set("a", "1").unwrap();
        assert!(path.exists());
    }
}
