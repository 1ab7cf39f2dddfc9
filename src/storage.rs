//! Named JSON document storage.
//!
//! Every store in the service persists one whole document (`admin.json`,
//! `reviews.json`, ...). This module provides the interface they share plus:
//! - `FileStore`: documents as files under the data directory, written atomically
//! - `MemoryStore`: an in-process map used by tests

use async_trait::async_trait;
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;
use tokio::sync::RwLock;

/// Shared handle to whichever document backend the service runs with.
pub type SharedStore = Arc<dyn DocumentStore>;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid document name: {0}")]
    InvalidName(String),

    #[error("Storage error: {0}")]
    Other(String),
}

/// Get/set access to named documents.
///
/// `load` returns `Ok(None)` when the document has never been written.
/// Parsing is left to the caller so each store can decide how to heal a
/// corrupt document.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn load(&self, name: &str) -> Result<Option<String>, StorageError>;

    async fn save(&self, name: &str, contents: &str) -> Result<(), StorageError>;
}

/// Serialize `value` as pretty JSON and save it under `name`.
pub async fn save_json<T: serde::Serialize + ?Sized>(
    store: &dyn DocumentStore,
    name: &str,
    value: &T,
) -> Result<(), StorageError> {
    let contents = serde_json::to_string_pretty(value)?;
    store.save(name, &contents).await
}

/// Documents stored as files in one directory.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, StorageError> {
        let valid = !name.is_empty()
            && !name.starts_with('.')
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !valid {
            return Err(StorageError::InvalidName(name.to_string()));
        }
        Ok(self.root.join(name))
    }
}

#[async_trait]
impl DocumentStore for FileStore {
    async fn load(&self, name: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(name)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, name: &str, contents: &str) -> Result<(), StorageError> {
        let path = self.path_for(name)?;
        tokio::fs::create_dir_all(&self.root).await?;
        atomic_write(&path, contents.as_bytes()).await
    }
}

/// Write to a temp file in the same directory, fsync, then rename over `path`.
async fn atomic_write(path: &Path, data: &[u8]) -> Result<(), StorageError> {
    let parent = path
        .parent()
        .ok_or_else(|| StorageError::Other("cannot write a path with no parent".into()))?
        .to_path_buf();
    let path = path.to_path_buf();
    let data = data.to_vec();

    tokio::task::spawn_blocking(move || {
        let mut tmp = NamedTempFile::new_in(&parent)?;
        tmp.write_all(&data)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| e.error)?;
        Ok(())
    })
    .await
    .map_err(|e| StorageError::Other(format!("spawn_blocking join failed: {e}")))?
}

/// In-memory documents, for tests and throwaway instances.
#[derive(Default)]
pub struct MemoryStore {
    documents: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw contents of a document, if any.
    pub async fn get(&self, name: &str) -> Option<String> {
        self.documents.read().await.get(name).cloned()
    }

    /// Seed a document with arbitrary contents (including invalid JSON).
    pub async fn put(&self, name: &str, contents: &str) {
        self.documents
            .write()
            .await
            .insert(name.to_string(), contents.to_string());
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn load(&self, name: &str) -> Result<Option<String>, StorageError> {
        Ok(self.get(name).await)
    }

    async fn save(&self, name: &str, contents: &str) -> Result<(), StorageError> {
        self.put(name, contents).await;
        Ok(())
    }
}
