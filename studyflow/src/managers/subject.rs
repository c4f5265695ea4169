//! Subject manager operations, including the delete cascade.

use tracing::{debug, warn};
use uuid::Uuid;

use studyflow_model::{EntityStatus, NONE_SENTINEL, RefInput, Subject};

use crate::managers::{ManagerError, SubjectDetails, TaskDetails};
use crate::remote::{DocPatch, FieldPatch, RemoteError, RemoteStore};
use crate::resolver;
use crate::sync::EntityKind;
use crate::Organizer;

impl<R: RemoteStore> Organizer<R> {
    /// Creates a subject, writing remote first and mirroring locally.
    /// Returns the local record.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError`] if the remote write is rejected while
    /// online, or if the local mirror cannot be written.
    pub async fn create_subject(&self, details: SubjectDetails) -> Result<Subject, ManagerError> {
        let id = details
            .lms
            .as_ref()
            .map_or_else(|| Uuid::now_v7().to_string(), |lms| lms.uid.clone());
        let resolved = resolver::resolve_subject(&id, &details);

        if self.is_offline().await {
            self.queues.mark_dirty(EntityKind::Subject, &id).await;
            debug!(id, "offline, subject create queued");
        } else {
            let path = self.session.subjects().doc(&id);
            match self.remote.set_document(&path, resolved.doc).await {
                Ok(()) => {}
                Err(RemoteError::Offline) => {
                    self.queues.mark_dirty(EntityKind::Subject, &id).await;
                    warn!(%path, "remote unreachable, subject create queued");
                }
                Err(e) => return Err(e.into()),
            }
        }
        self.subjects
            .save_many(std::slice::from_ref(&resolved.record))
            .await?;
        Ok(resolved.record)
    }

    /// Updates a subject with explicit-clear semantics for its optional
    /// fields. Returns the local record.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError`] under the same conditions as
    /// [`Self::create_subject`].
    pub async fn update_subject(
        &self,
        id: &str,
        details: SubjectDetails,
    ) -> Result<Subject, ManagerError> {
        let resolved = resolver::subject_patch(id, &details);
        if self.is_offline().await {
            self.queues.mark_dirty(EntityKind::Subject, id).await;
        } else {
            let path = self.session.subjects().doc(id);
            match self.remote.update_document(&path, resolved.patch).await {
                Ok(()) => {}
                Err(RemoteError::Offline) => {
                    self.queues.mark_dirty(EntityKind::Subject, id).await;
                }
                Err(RemoteError::NotFound(_)) => {
                    let rebuilt = resolver::resolve_subject(id, &details);
                    match self.remote.set_document(&path, rebuilt.doc).await {
                        Ok(()) => {}
                        Err(RemoteError::Offline) => {
                            self.queues.mark_dirty(EntityKind::Subject, id).await;
                            warn!(%path, "remote unreachable, subject update queued");
                        }
                        Err(e) => return Err(e.into()),
                    }
                }
                Err(e) => return Err(e.into()),
            }
        }
        self.subjects
            .save_many(std::slice::from_ref(&resolved.record))
            .await?;
        Ok(resolved.record)
    }

    /// Deletes a subject and cascade-nullifies its dependents: tasks
    /// referencing it re-point to the sentinel, projects drop it from
    /// their subject set (the sentinel substitutes if the set empties).
    ///
    /// Dependents are never deleted. Per-dependent failures are logged
    /// and the cascade continues.
    pub async fn delete_subject(&self, id: &str) {
        if self.is_offline().await {
            self.queues.queue_delete(EntityKind::Subject, id).await;
        } else {
            let path = self.session.subjects().doc(id);
            match self.remote.delete_document(&path).await {
                Ok(()) => {}
                Err(RemoteError::Offline) => {
                    self.queues.queue_delete(EntityKind::Subject, id).await;
                }
                Err(e) => warn!(%path, error = %e, "remote subject delete failed"),
            }
        }
        if let Err(e) = self.subjects.delete(id).await {
            warn!(id, error = %e, "local subject delete failed");
        }

        for task in self.tasks.get_all().await {
            if task.subject != id {
                continue;
            }
            let mut details = TaskDetails::from_local(&task);
            details.subject = RefInput::Unset;
            if let Err(e) = self.update_task(&task.id, details).await {
                warn!(task = task.id, error = %e, "cascade re-point failed");
            }
        }

        for project in self.projects.get_all().await {
            if !project.subjects.iter().any(|s| s == id) {
                continue;
            }
            let mut details = crate::managers::ProjectDetails::from_local(&project);
            details
                .subjects
                .retain(|input| input.id() != Some(id));
            if let Err(e) = self.update_project(&project.id, details).await {
                warn!(project = project.id, error = %e, "cascade subject-set fix failed");
            }
        }
    }

    /// Archives a subject via a targeted status update.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError`] if the remote update is rejected while
    /// online, or the local write fails. Unknown IDs are a no-op.
    pub async fn archive_subject(&self, id: &str) -> Result<(), ManagerError> {
        self.set_subject_status(id, EntityStatus::Archived).await
    }

    /// Reactivates an archived subject via a targeted status update.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError`] under the same conditions as
    /// [`Self::archive_subject`].
    pub async fn reactivate_subject(&self, id: &str) -> Result<(), ManagerError> {
        self.set_subject_status(id, EntityStatus::Active).await
    }

    async fn set_subject_status(
        &self,
        id: &str,
        status: EntityStatus,
    ) -> Result<(), ManagerError> {
        if id == NONE_SENTINEL {
            return Ok(());
        }
        let Some(mut subject) = self.subjects.get(id).await else {
            return Ok(());
        };
        subject.status = status;

        if self.is_offline().await {
            self.queues.mark_dirty(EntityKind::Subject, id).await;
        } else {
            let mut patch = DocPatch::new();
            patch.insert(
                "status".to_string(),
                FieldPatch::Set(serde_json::Value::String(status.to_string())),
            );
            let path = self.session.subjects().doc(id);
            match self.remote.update_document(&path, patch).await {
                Ok(()) | Err(RemoteError::NotFound(_)) => {}
                Err(RemoteError::Offline) => {
                    self.queues.mark_dirty(EntityKind::Subject, id).await;
                }
                Err(e) => return Err(e.into()),
            }
        }
        self.subjects.save_many(std::slice::from_ref(&subject)).await?;
        Ok(())
    }
}
