use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::fetch::{Request, Response};

/// File extension for persisted stores. One file per generation.
const STORE_EXT: &str = ".json";

/// A stored request/response pair. Entries are written once at install time
/// and never touched by runtime traffic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub response: Response,
    pub cached_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(response: Response) -> Self {
        Self {
            response,
            cached_at: Utc::now(),
        }
    }
}

/// One named cache store, keyed by normalized request.
///
/// Persisted as a single pretty-printed JSON file so a deployer can inspect
/// what a generation actually holds.
#[derive(Debug)]
pub struct CacheStore {
    name: String,
    path: PathBuf,
    entries: BTreeMap<String, CacheEntry>,
}

impl CacheStore {
    fn load(name: &str, path: PathBuf) -> Result<Self> {
        let entries = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read cache store: {}", name))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse cache store: {}", name))?
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            name: name.to_string(),
            path,
            entries,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Store a response under the request's normalized key, replacing any
    /// previous entry for that key.
    pub fn put(&mut self, request: &Request, response: Response) -> Result<()> {
        let key = request.cache_key();
        debug!(store = %self.name, key = %key, "caching entry");
        self.entries.insert(key, CacheEntry::new(response));
        self.persist()
    }

    /// Match a request against the store. Entries are valid indefinitely;
    /// there is no freshness check - replacement happens by generation.
    pub fn lookup(&self, request: &Request) -> Option<&Response> {
        self.entries.get(&request.cache_key()).map(|e| &e.response)
    }

    pub fn contains(&self, request: &Request) -> bool {
        self.entries.contains_key(&request.cache_key())
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write cache store: {}", self.name))?;
        Ok(())
    }
}

/// Collection of named stores under one root directory - the storage the
/// host hands the worker. Stores are created on open and enumerable by name.
pub struct CacheStorage {
    root: PathBuf,
}

impl CacheStorage {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)
            .with_context(|| format!("Failed to create cache root: {}", root.display()))?;
        Ok(Self { root })
    }

    fn store_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{}{}", name, STORE_EXT))
    }

    /// Open the named store, creating it if absent.
    pub fn open_store(&self, name: &str) -> Result<CacheStore> {
        CacheStore::load(name, self.store_path(name))
    }

    /// Names of all stores currently present, sorted.
    ///
    /// Generation names may contain dots (`hub-v1.0.0`), so the extension is
    /// stripped as a literal suffix rather than via `file_stem`.
    pub fn store_names(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.root)
            .with_context(|| format!("Failed to list cache root: {}", self.root.display()))?
        {
            let entry = entry?;
            if let Some(file_name) = entry.file_name().to_str() {
                if let Some(name) = file_name.strip_suffix(STORE_EXT) {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    /// Delete the named store, reporting whether it existed.
    pub fn delete_store(&self, name: &str) -> Result<bool> {
        let path = self.store_path(name);
        if path.exists() {
            std::fs::remove_file(&path)
                .with_context(|| format!("Failed to delete cache store: {}", name))?;
            return Ok(true);
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> (tempfile::TempDir, CacheStorage) {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let storage = CacheStorage::open(dir.path()).expect("Failed to open storage");
        (dir, storage)
    }

    #[test]
    fn test_put_and_lookup_roundtrip() {
        let (_dir, storage) = storage();
        let mut store = storage.open_store("hub-v1.0.0").unwrap();

        let request = Request::get("https://hub.test/index.html");
        store.put(&request, Response::ok("<html>home</html>")).unwrap();

        let hit = store.lookup(&request).expect("entry should be present");
        assert_eq!(hit.status, 200);
        assert_eq!(hit.text(), Some("<html>home</html>"));
    }

    #[test]
    fn test_replacing_put_keeps_single_entry() {
        let (_dir, storage) = storage();
        let mut store = storage.open_store("hub-v1.0.0").unwrap();

        let request = Request::get("https://hub.test/index.html");
        store.put(&request, Response::ok("first")).unwrap();
        store.put(&request, Response::ok("second")).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.lookup(&request).unwrap().text(), Some("second"));
    }

    #[test]
    fn test_store_persists_across_reopen() {
        let (_dir, storage) = storage();
        let request = Request::get("https://hub.test/css/style.css");

        {
            let mut store = storage.open_store("hub-v1.0.0").unwrap();
            let response = Response::ok("body{}").with_header("content-type", "text/css");
            store.put(&request, response).unwrap();
        }

        let reopened = storage.open_store("hub-v1.0.0").unwrap();
        assert_eq!(reopened.len(), 1);
        let hit = reopened.lookup(&request).unwrap();
        assert_eq!(hit.text(), Some("body{}"));
        assert_eq!(hit.headers.get("content-type").map(String::as_str), Some("text/css"));
    }

    #[test]
    fn test_store_names_handle_dotted_generations() {
        let (_dir, storage) = storage();
        let request = Request::get("https://hub.test/");

        let mut v1 = storage.open_store("hub-v1.0.0").unwrap();
        v1.put(&request, Response::ok("v1")).unwrap();
        let mut v2 = storage.open_store("hub-v1.1.0").unwrap();
        v2.put(&request, Response::ok("v2")).unwrap();

        assert_eq!(
            storage.store_names().unwrap(),
            vec!["hub-v1.0.0".to_string(), "hub-v1.1.0".to_string()]
        );
    }

    #[test]
    fn test_delete_store_reports_existence() {
        let (_dir, storage) = storage();
        let mut store = storage.open_store("hub-v1.0.0").unwrap();
        store
            .put(&Request::get("https://hub.test/"), Response::ok("home"))
            .unwrap();

        assert!(storage.delete_store("hub-v1.0.0").unwrap());
        assert!(!storage.delete_store("hub-v1.0.0").unwrap());
        assert!(storage.store_names().unwrap().is_empty());
    }

    #[test]
    fn test_empty_store_is_not_persisted_until_put() {
        let (_dir, storage) = storage();
        let _store = storage.open_store("hub-v1.0.0").unwrap();
        // Opening alone creates nothing on disk; only put writes.
        assert!(storage.store_names().unwrap().is_empty());
    }
}
