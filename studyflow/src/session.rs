//! Per-user session: the user ID and the collection paths scoped to it.
//!
//! Every remote path the engine touches is derived here, so the
//! `users/{uid}/...` layout lives in exactly one place.

use crate::remote::{CollectionPath, DocPath};

/// An authenticated user's identity, scoping all engine operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    user_id: String,
}

impl Session {
    /// Creates a session for the given user ID.
    #[must_use]
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }

    /// The user ID this session is scoped to.
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// The user's task collection.
    #[must_use]
    pub fn tasks(&self) -> CollectionPath {
        CollectionPath::new(["users", self.user_id.as_str(), "tasks"])
    }

    /// The user's subject collection.
    #[must_use]
    pub fn subjects(&self) -> CollectionPath {
        CollectionPath::new(["users", self.user_id.as_str(), "subjects"])
    }

    /// The user's project collection.
    #[must_use]
    pub fn projects(&self) -> CollectionPath {
        CollectionPath::new(["users", self.user_id.as_str(), "projects"])
    }

    /// The user's profile document.
    #[must_use]
    pub fn profile_doc(&self) -> DocPath {
        CollectionPath::new(["users"]).doc(&self.user_id)
    }
}
