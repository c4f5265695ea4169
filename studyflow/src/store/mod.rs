//! Local key-value store, one per entity type.
//!
//! The cache that survives restarts and keeps the UI usable offline.
//! Exactly five operations are exposed — save-many (upsert), get-one,
//! get-all, delete-one, clear-all — and consumers never assume any
//! query capability beyond a full scan.
//!
//! Records live in memory behind a [`RwLock`]; when the store is opened
//! against a directory, every mutation rewrites a postcard snapshot of
//! the full record set (hundreds of records, not millions).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;

use studyflow_model::{Project, Subject, Task};

/// Errors that can occur while accessing a local store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Failed to read or write the snapshot file.
    #[error("store I/O error at {path}: {source}")]
    Io {
        /// Snapshot path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Snapshot bytes could not be encoded or decoded.
    #[error("store codec error: {0}")]
    Codec(#[from] postcard::Error),
}

/// A record addressable by a string key.
pub trait Keyed {
    /// The record's store key (the entity ID).
    fn key(&self) -> &str;
}

impl Keyed for Task {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for Subject {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for Project {
    fn key(&self) -> &str {
        &self.id
    }
}

/// A local store for one entity type, keyed by entity ID.
pub struct LocalStore<T> {
    name: &'static str,
    records: RwLock<HashMap<String, T>>,
    snapshot: Option<PathBuf>,
}

impl<T> LocalStore<T>
where
    T: Keyed + Clone + Serialize + DeserializeOwned + Send + Sync,
{
    /// Creates a store that lives only in memory.
    #[must_use]
    pub fn in_memory(name: &'static str) -> Self {
        Self {
            name,
            records: RwLock::new(HashMap::new()),
            snapshot: None,
        }
    }

    /// Opens a file-backed store under `dir`, loading the existing
    /// snapshot if one is present.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if an existing snapshot cannot be read or
    /// decoded. A missing snapshot is an empty store, not an error.
    pub async fn open(name: &'static str, dir: &Path) -> Result<Self, StoreError> {
        let path = dir.join(format!("{name}.bin"));
        let records = match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let items: Vec<T> = postcard::from_bytes(&bytes)?;
                items.into_iter().map(|t| (t.key().to_string(), t)).collect()
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(StoreError::Io { path, source: e }),
        };
        Ok(Self {
            name,
            records: RwLock::new(records),
            snapshot: Some(path),
        })
    }

    /// Upserts a batch of records.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the snapshot cannot be persisted; the
    /// in-memory records are updated regardless.
    pub async fn save_many(&self, items: &[T]) -> Result<(), StoreError> {
        {
            let mut records = self.records.write().await;
            for item in items {
                records.insert(item.key().to_string(), item.clone());
            }
        }
        self.persist().await
    }

    /// Returns one record by ID, if present.
    pub async fn get(&self, id: &str) -> Option<T> {
        self.records.read().await.get(id).cloned()
    }

    /// Returns every record, in no particular order.
    pub async fn get_all(&self) -> Vec<T> {
        self.records.read().await.values().cloned().collect()
    }

    /// Deletes one record by ID; deleting an absent ID is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the snapshot cannot be persisted.
    pub async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.records.write().await.remove(id);
        self.persist().await
    }

    /// Removes every record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the snapshot cannot be persisted.
    pub async fn clear(&self) -> Result<(), StoreError> {
        self.records.write().await.clear();
        self.persist().await
    }

    /// Rewrites the snapshot file, if this store is file-backed.
    async fn persist(&self) -> Result<(), StoreError> {
        let Some(path) = &self.snapshot else {
            return Ok(());
        };
        let items: Vec<T> = self.get_all().await;
        let bytes = postcard::to_allocvec(&items)?;
        tokio::fs::write(path, bytes)
            .await
            .map_err(|e| StoreError::Io {
                path: path.clone(),
                source: e,
            })?;
        tracing::trace!(store = self.name, records = items.len(), "snapshot written");
        Ok(())
    }
}
