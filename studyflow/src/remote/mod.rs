//! Remote document store abstraction.
//!
//! The authoritative store is a schemaless document database: documents
//! are string-keyed field maps living under collection paths scoped by
//! user (`users/{uid}/tasks/{id}`). This module defines the path types,
//! the patch language for partial updates, and the [`RemoteStore`] trait
//! the entity managers and sync coordinator are written against.
//!
//! Writes are last-writer-wins. No operation checks a version or
//! timestamp; whoever writes last owns the field.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod memory;

pub use memory::MemoryRemote;

/// A remote document: a flat map of named fields.
pub type Document = serde_json::Map<String, Value>;

/// A patch over one document's fields.
///
/// Absent fields are left untouched. `BTreeMap` keeps patch application
/// deterministic, which keeps test failures reproducible.
pub type DocPatch = BTreeMap<String, FieldPatch>;

/// One field's fate under a partial update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldPatch {
    /// Overwrite the field with this value.
    Set(Value),
    /// Remove the field from the document entirely.
    Clear,
}

/// Errors surfaced by a remote store.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// The store is unreachable; the caller should queue and continue.
    #[error("remote store is offline")]
    Offline,

    /// A partial update targeted a document that does not exist.
    #[error("remote document not found: {0}")]
    NotFound(String),

    /// The store refused the write.
    #[error("remote write rejected: {0}")]
    Rejected(String),
}

/// A collection path, e.g. `users/u1/tasks`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionPath {
    segments: Vec<String>,
}

impl CollectionPath {
    /// Builds a path from its segments.
    #[must_use]
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Addresses one document inside this collection.
    #[must_use]
    pub fn doc(&self, id: &str) -> DocPath {
        DocPath {
            collection: self.clone(),
            id: id.to_string(),
        }
    }

    /// The final path segment (the collection name).
    #[must_use]
    pub fn name(&self) -> &str {
        self.segments.last().map_or("", String::as_str)
    }
}

impl std::fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

/// A full document path: collection plus document ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocPath {
    pub collection: CollectionPath,
    pub id: String,
}

impl std::fmt::Display for DocPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.collection, self.id)
    }
}

/// A document reference stored inside another document's field.
///
/// Serialized as `{"collection": ..., "id": ...}`; the flattener reads
/// the `id` back out when producing local records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocRef {
    pub collection: String,
    pub id: String,
}

impl DocRef {
    /// Encodes this reference as a document field value.
    ///
    /// Serializing a two-string struct cannot fail, so the fallback arm
    /// is unreachable in practice.
    #[must_use]
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Decodes a reference from a document field value, if it is one.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }
}

/// Operations every remote store backend provides.
///
/// All writes are unconditional; conflict resolution is last-writer-wins
/// by design.
pub trait RemoteStore: Send + Sync {
    /// Fetches one document, or `None` if it does not exist.
    fn get_document(
        &self,
        path: &DocPath,
    ) -> impl Future<Output = Result<Option<Document>, RemoteError>> + Send;

    /// Fetches every document in a collection as `(id, document)` pairs.
    fn get_collection(
        &self,
        path: &CollectionPath,
    ) -> impl Future<Output = Result<Vec<(String, Document)>, RemoteError>> + Send;

    /// Creates or fully replaces a document.
    fn set_document(
        &self,
        path: &DocPath,
        doc: Document,
    ) -> impl Future<Output = Result<(), RemoteError>> + Send;

    /// Applies a partial update to an existing document.
    ///
    /// Fails with [`RemoteError::NotFound`] if the document is absent.
    fn update_document(
        &self,
        path: &DocPath,
        patch: DocPatch,
    ) -> impl Future<Output = Result<(), RemoteError>> + Send;

    /// Deletes a document; deleting an absent document succeeds.
    fn delete_document(&self, path: &DocPath)
    -> impl Future<Output = Result<(), RemoteError>> + Send;
}
