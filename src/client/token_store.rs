//! # Client-side key/value persistence
//!
//! The extension keeps two kinds of values in its local store: the bearer
//! token (under `<app>_token`) and one draft per site (under
//! `note_<domain>`). Drafts are a cache for the editor's default content and
//! are never reconciled with the notes saved on the server.
//!
//! [`KeyValueStore`] is the injected capability; [`MemoryStore`] lives for one
//! page session, [`FileStore`] survives restarts.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt store file {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// String-keyed persistence, the analog of extension-local storage.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    async fn remove(&self, key: &str) -> Result<(), StoreError>;

    async fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).await.unwrap_or_else(|| default.to_string())
    }
}

/// In-memory store for tests and single-session use.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    values: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Option<String> {
        self.values.read().await.get(key).cloned()
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.values.write().await.remove(key);
        Ok(())
    }
}

/// JSON-file-backed store. The whole map is rewritten on every change via a
/// temporary file and rename, so a crash never leaves a half-written file.
#[derive(Clone, Debug)]
pub struct FileStore {
    path: PathBuf,
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl FileStore {
    /// Opens the store at `path`, starting empty if the file does not exist.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        let values = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.is_empty() => HashMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        Ok(Self {
            path,
            values: Arc::new(Mutex::new(values)),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, values: &HashMap<String, String>) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }

        let bytes = serde_json::to_vec_pretty(values).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })?;

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await.map_err(io_err)?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(io_err)?;

        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Option<String> {
        self.values.lock().await.get(key).cloned()
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut values = self.values.lock().await;
        values.insert(key.to_string(), value.to_string());
        self.persist(&values).await
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut values = self.values.lock().await;
        if values.remove(key).is_some() {
            self.persist(&values).await?;
        }
        Ok(())
    }
}

/// Typed view over a [`KeyValueStore`] for the token and per-domain drafts.
#[derive(Clone)]
pub struct TokenStore {
    inner: Arc<dyn KeyValueStore>,
    token_key: String,
}

impl TokenStore {
    pub fn new(inner: Arc<dyn KeyValueStore>, app_name: &str) -> Self {
        Self {
            inner,
            token_key: format!("{app_name}_token"),
        }
    }

    #[must_use]
    pub fn token_key(&self) -> &str {
        &self.token_key
    }

    pub async fn token(&self) -> Option<String> {
        self.inner
            .get(&self.token_key)
            .await
            .filter(|t| !t.is_empty())
    }

    pub async fn set_token(&self, token: &str) -> Result<(), StoreError> {
        self.inner.set(&self.token_key, token).await
    }

    pub async fn clear_token(&self) -> Result<(), StoreError> {
        self.inner.remove(&self.token_key).await
    }

    pub async fn draft(&self, domain: &str, default: &str) -> String {
        self.inner.get_or(&draft_key(domain), default).await
    }

    pub async fn set_draft(&self, domain: &str, html: &str) -> Result<(), StoreError> {
        self.inner.set(&draft_key(domain), html).await
    }
}

/// Key of the cached draft for a site, e.g. `note_example.com`.
#[must_use]
pub fn draft_key(domain: &str) -> String {
    format!("note_{domain}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("noted-{name}-{}.json", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_memory_store_get_or_default() {
        let store = MemoryStore::new();
        assert_eq!(store.get_or("missing", "fallback").await, "fallback");

        store.set("key", "value").await.unwrap();
        assert_eq!(store.get_or("key", "fallback").await, "value");

        store.remove("key").await.unwrap();
        assert!(store.get("key").await.is_none());
    }

    #[tokio::test]
    async fn test_file_store_survives_reopen() {
        let path = temp_path("reopen");

        let store = FileStore::open(&path).await.unwrap();
        store.set("noted_token", "abc").await.unwrap();
        store.set("note_example.com", "<b>draft</b>").await.unwrap();
        drop(store);

        let reopened = FileStore::open(&path).await.unwrap();
        assert_eq!(reopened.get("noted_token").await.as_deref(), Some("abc"));
        assert_eq!(
            reopened.get("note_example.com").await.as_deref(),
            Some("<b>draft</b>")
        );

        reopened.remove("noted_token").await.unwrap();
        let reopened = FileStore::open(&path).await.unwrap();
        assert!(reopened.get("noted_token").await.is_none());

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_file_store_rejects_corrupt_file() {
        let path = temp_path("corrupt");
        std::fs::write(&path, "not json").unwrap();

        assert!(matches!(
            FileStore::open(&path).await,
            Err(StoreError::Corrupt { .. })
        ));

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_token_store_keys() {
        let inner = Arc::new(MemoryStore::new());
        let store = TokenStore::new(inner.clone(), "noted");

        assert!(store.token().await.is_none());
        store.set_token("t1").await.unwrap();
        store.set_token("t1").await.unwrap();
        assert_eq!(inner.get("noted_token").await.as_deref(), Some("t1"));

        assert_eq!(store.draft("example.com", "Write a note...").await, "Write a note...");
        store.set_draft("example.com", "<p>hi</p>").await.unwrap();
        assert_eq!(inner.get("note_example.com").await.as_deref(), Some("<p>hi</p>"));
        assert_eq!(store.draft("other.org", "").await, "");
    }
}
