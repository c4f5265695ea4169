//! Project manager operations, including the delete cascade.

use tracing::{debug, warn};
use uuid::Uuid;

use studyflow_model::{EntityStatus, NONE_SENTINEL, Project, RefInput};

use crate::managers::{ManagerError, ProjectDetails, TaskDetails};
use crate::remote::{DocPatch, FieldPatch, RemoteError, RemoteStore};
use crate::resolver;
use crate::sync::EntityKind;
use crate::Organizer;

impl<R: RemoteStore> Organizer<R> {
    /// Creates a project, writing remote first and mirroring locally.
    /// Returns the local record; its subject set is never empty.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError`] if the remote write is rejected while
    /// online, or if the local mirror cannot be written.
    pub async fn create_project(&self, details: ProjectDetails) -> Result<Project, ManagerError> {
        let id = Uuid::now_v7().to_string();
        let resolved = resolver::resolve_project(&self.session, &id, &details);

        if self.is_offline().await {
            self.queues.mark_dirty(EntityKind::Project, &id).await;
            debug!(id, "offline, project create queued");
        } else {
            let path = self.session.projects().doc(&id);
            match self.remote.set_document(&path, resolved.doc).await {
                Ok(()) => {}
                Err(RemoteError::Offline) => {
                    self.queues.mark_dirty(EntityKind::Project, &id).await;
                    warn!(%path, "remote unreachable, project create queued");
                }
                Err(e) => return Err(e.into()),
            }
        }
        self.projects
            .save_many(std::slice::from_ref(&resolved.record))
            .await?;
        Ok(resolved.record)
    }

    /// Updates a project; due date and time are explicitly cleared
    /// remotely when absent from `details`. Returns the local record.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError`] under the same conditions as
    /// [`Self::create_project`].
    pub async fn update_project(
        &self,
        id: &str,
        details: ProjectDetails,
    ) -> Result<Project, ManagerError> {
        let resolved = resolver::project_patch(&self.session, id, &details);
        if self.is_offline().await {
            self.queues.mark_dirty(EntityKind::Project, id).await;
        } else {
            let path = self.session.projects().doc(id);
            match self.remote.update_document(&path, resolved.patch).await {
                Ok(()) => {}
                Err(RemoteError::Offline) => {
                    self.queues.mark_dirty(EntityKind::Project, id).await;
                }
                Err(RemoteError::NotFound(_)) => {
                    let rebuilt = resolver::resolve_project(&self.session, id, &details);
                    match self.remote.set_document(&path, rebuilt.doc).await {
                        Ok(()) => {}
                        Err(RemoteError::Offline) => {
                            self.queues.mark_dirty(EntityKind::Project, id).await;
                            warn!(%path, "remote unreachable, project update queued");
                        }
                        Err(e) => return Err(e.into()),
                    }
                }
                Err(e) => return Err(e.into()),
            }
        }
        self.projects
            .save_many(std::slice::from_ref(&resolved.record))
            .await?;
        Ok(resolved.record)
    }

    /// Deletes a project and cascade-nullifies dependent tasks: each
    /// task referencing it re-points to the sentinel before the project
    /// itself is removed. Per-dependent failures are logged and the
    /// cascade continues.
    pub async fn delete_project(&self, id: &str) {
        for task in self.tasks.get_all().await {
            if task.project != id {
                continue;
            }
            let mut details = TaskDetails::from_local(&task);
            details.project = RefInput::Unset;
            if let Err(e) = self.update_task(&task.id, details).await {
                warn!(task = task.id, error = %e, "cascade re-point failed");
            }
        }

        if self.is_offline().await {
            self.queues.queue_delete(EntityKind::Project, id).await;
        } else {
            let path = self.session.projects().doc(id);
            match self.remote.delete_document(&path).await {
                Ok(()) => {}
                Err(RemoteError::Offline) => {
                    self.queues.queue_delete(EntityKind::Project, id).await;
                }
                Err(e) => warn!(%path, error = %e, "remote project delete failed"),
            }
        }
        if let Err(e) = self.projects.delete(id).await {
            warn!(id, error = %e, "local project delete failed");
        }
    }

    /// Archives a project via a targeted status update.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError`] if the remote update is rejected while
    /// online, or the local write fails. Unknown IDs are a no-op.
    pub async fn archive_project(&self, id: &str) -> Result<(), ManagerError> {
        self.set_project_status(id, EntityStatus::Archived).await
    }

    /// Reactivates an archived project via a targeted status update.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError`] under the same conditions as
    /// [`Self::archive_project`].
    pub async fn reactivate_project(&self, id: &str) -> Result<(), ManagerError> {
        self.set_project_status(id, EntityStatus::Active).await
    }

    async fn set_project_status(
        &self,
        id: &str,
        status: EntityStatus,
    ) -> Result<(), ManagerError> {
        if id == NONE_SENTINEL {
            return Ok(());
        }
        let Some(mut project) = self.projects.get(id).await else {
            return Ok(());
        };
        project.status = status;

        if self.is_offline().await {
            self.queues.mark_dirty(EntityKind::Project, id).await;
        } else {
            let mut patch = DocPatch::new();
            patch.insert(
                "status".to_string(),
                FieldPatch::Set(serde_json::Value::String(status.to_string())),
            );
            let path = self.session.projects().doc(id);
            match self.remote.update_document(&path, patch).await {
                Ok(()) | Err(RemoteError::NotFound(_)) => {}
                Err(RemoteError::Offline) => {
                    self.queues.mark_dirty(EntityKind::Project, id).await;
                }
                Err(e) => return Err(e.into()),
            }
        }
        self.projects.save_many(std::slice::from_ref(&project)).await?;
        Ok(())
    }
}
