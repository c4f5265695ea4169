//! In-memory remote store used for tests and local demo runs.
//!
//! Documents live in one flat map keyed by full path string; collection
//! reads scan by prefix. The store carries two switches for exercising
//! sync behavior: an online flag (writes while offline fail with
//! [`RemoteError::Offline`]) and a per-document rejection set (writes to
//! those paths fail with [`RemoteError::Rejected`]).

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::RwLock;

use super::{CollectionPath, DocPatch, DocPath, Document, FieldPatch, RemoteError, RemoteStore};

/// An in-memory [`RemoteStore`] backend.
pub struct MemoryRemote {
    docs: RwLock<HashMap<String, Document>>,
    online: AtomicBool,
    rejected: RwLock<HashSet<String>>,
}

impl Default for MemoryRemote {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRemote {
    /// Creates an empty store in the online state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            docs: RwLock::new(HashMap::new()),
            online: AtomicBool::new(true),
            rejected: RwLock::new(HashSet::new()),
        }
    }

    /// Flips the connectivity switch.
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    /// Marks one document path so that writes to it are rejected.
    pub async fn reject_writes(&self, path: &DocPath) {
        self.rejected.write().await.insert(path.to_string());
    }

    /// Direct read of a stored document, bypassing the trait. Test hook.
    pub async fn raw_document(&self, path: &DocPath) -> Option<Document> {
        self.docs.read().await.get(&path.to_string()).cloned()
    }

    fn check_online(&self) -> Result<(), RemoteError> {
        if self.online.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(RemoteError::Offline)
        }
    }

    async fn check_writable(&self, path: &DocPath) -> Result<(), RemoteError> {
        self.check_online()?;
        if self.rejected.read().await.contains(&path.to_string()) {
            return Err(RemoteError::Rejected(path.to_string()));
        }
        Ok(())
    }
}

impl RemoteStore for MemoryRemote {
    async fn get_document(&self, path: &DocPath) -> Result<Option<Document>, RemoteError> {
        self.check_online()?;
        Ok(self.docs.read().await.get(&path.to_string()).cloned())
    }

    async fn get_collection(
        &self,
        path: &CollectionPath,
    ) -> Result<Vec<(String, Document)>, RemoteError> {
        self.check_online()?;
        let prefix = format!("{path}/");
        let docs = self.docs.read().await;
        Ok(docs
            .iter()
            .filter_map(|(key, doc)| {
                let id = key.strip_prefix(&prefix)?;
                // Only direct children; nested subcollection docs have
                // further slashes.
                if id.contains('/') {
                    return None;
                }
                Some((id.to_string(), doc.clone()))
            })
            .collect())
    }

    async fn set_document(&self, path: &DocPath, doc: Document) -> Result<(), RemoteError> {
        self.check_writable(path).await?;
        self.docs.write().await.insert(path.to_string(), doc);
        Ok(())
    }

    async fn update_document(&self, path: &DocPath, patch: DocPatch) -> Result<(), RemoteError> {
        self.check_writable(path).await?;
        let mut docs = self.docs.write().await;
        let doc = docs
            .get_mut(&path.to_string())
            .ok_or_else(|| RemoteError::NotFound(path.to_string()))?;
        for (field, op) in patch {
            match op {
                FieldPatch::Set(value) => {
                    doc.insert(field, value);
                }
                FieldPatch::Clear => {
                    doc.remove(&field);
                }
            }
        }
        Ok(())
    }

    async fn delete_document(&self, path: &DocPath) -> Result<(), RemoteError> {
        self.check_writable(path).await?;
        self.docs.write().await.remove(&path.to_string());
        Ok(())
    }
}
