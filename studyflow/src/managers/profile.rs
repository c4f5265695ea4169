//! User profile operations.
//!
//! The profile lives on the per-user document (`users/{uid}`). Updates
//! are read-modify-write merges: only the supplied fields change.

use serde_json::Value;
use tracing::debug;

use studyflow_model::{ProfileUpdate, UserProfile};

use crate::managers::ManagerError;
use crate::remote::{Document, RemoteError, RemoteStore};
use crate::Organizer;

impl<R: RemoteStore> Organizer<R> {
    /// Fetches the user's profile; a missing or unreadable document
    /// yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError`] if the remote read fails while online.
    pub async fn fetch_profile(&self) -> Result<UserProfile, ManagerError> {
        if self.is_offline().await {
            return Ok(UserProfile::default());
        }
        let doc = match self.remote.get_document(&self.session.profile_doc()).await {
            Ok(doc) => doc,
            Err(RemoteError::Offline) => return Ok(UserProfile::default()),
            Err(e) => return Err(e.into()),
        };
        Ok(doc.map(|d| profile_from_doc(&d)).unwrap_or_default())
    }

    /// Merges a partial update into the user's profile document.
    /// Offline updates queue and replay in order on reconnect, so later
    /// updates win field by field.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError`] if the remote write is rejected while
    /// online.
    pub async fn update_profile(&self, update: ProfileUpdate) -> Result<(), ManagerError> {
        if self.is_offline().await {
            self.queues.queue_profile_update(update).await;
            debug!("offline, profile update queued");
            return Ok(());
        }
        match self.apply_profile_update_remote(&update).await {
            Ok(()) => Ok(()),
            Err(RemoteError::Offline) => {
                self.queues.queue_profile_update(update).await;
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Read-modify-write merge against the remote profile document.
    pub(crate) async fn apply_profile_update_remote(
        &self,
        update: &ProfileUpdate,
    ) -> Result<(), RemoteError> {
        let path = self.session.profile_doc();
        let mut profile = self
            .remote
            .get_document(&path)
            .await?
            .map(|d| profile_from_doc(&d))
            .unwrap_or_default();
        update.apply(&mut profile);
        self.remote.set_document(&path, profile_to_doc(&profile)).await
    }
}

fn profile_from_doc(doc: &Document) -> UserProfile {
    serde_json::from_value(Value::Object(doc.clone())).unwrap_or_default()
}

fn profile_to_doc(profile: &UserProfile) -> Document {
    match serde_json::to_value(profile) {
        Ok(Value::Object(map)) => map,
        _ => Document::new(),
    }
}
