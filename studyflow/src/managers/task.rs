//! Task manager operations.

use tracing::{debug, warn};
use uuid::Uuid;

use studyflow_model::{Task, TaskStatus};

use crate::managers::{ManagerError, TaskDetails};
use crate::remote::{DocPatch, FieldPatch, RemoteError, RemoteStore};
use crate::resolver;
use crate::sync::EntityKind;
use crate::Organizer;

impl<R: RemoteStore> Organizer<R> {
    /// Creates a task, writing remote first and mirroring the
    /// denormalized record locally. Returns the local record.
    ///
    /// The ID is a time-ordered UUID, or the LMS UID verbatim for
    /// imported tasks so that re-importing the same feed upserts
    /// instead of duplicating.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError`] if the remote write is rejected while
    /// online, or if the local mirror cannot be written. A remote
    /// failure caused by being offline is not an error; the task is
    /// queued for the next sync instead.
    pub async fn create_task(&self, details: TaskDetails) -> Result<Task, ManagerError> {
        let id = details
            .lms
            .as_ref()
            .map_or_else(|| Uuid::now_v7().to_string(), |lms| lms.uid.clone());
        let resolved = resolver::resolve_task(&self.session, &id, &details);
        self.write_task(resolved.doc, resolved.record).await
    }

    /// Updates a task with full explicit-clear semantics: optional
    /// fields absent from `details` are cleared remotely, not left
    /// stale. Returns the local record.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError`] under the same conditions as
    /// [`Self::create_task`].
    pub async fn update_task(&self, id: &str, details: TaskDetails) -> Result<Task, ManagerError> {
        let resolved = resolver::task_patch(&self.session, id, &details);
        if self.is_offline().await {
            self.queues.mark_dirty(EntityKind::Task, id).await;
            debug!(id, "offline, task update queued");
        } else {
            let path = self.session.tasks().doc(id);
            match self.remote.update_document(&path, resolved.patch).await {
                Ok(()) => {}
                Err(RemoteError::Offline) => {
                    self.queues.mark_dirty(EntityKind::Task, id).await;
                    warn!(%path, "remote unreachable, task update queued");
                }
                // A vanished remote document still upserts cleanly.
                Err(RemoteError::NotFound(_)) => {
                    let rebuilt = resolver::resolve_task(&self.session, id, &details);
                    match self.remote.set_document(&path, rebuilt.doc).await {
                        Ok(()) => {}
                        Err(RemoteError::Offline) => {
                            self.queues.mark_dirty(EntityKind::Task, id).await;
                            warn!(%path, "remote unreachable, task update queued");
                        }
                        Err(e) => return Err(e.into()),
                    }
                }
                Err(e) => return Err(e.into()),
            }
        }
        self.tasks.save_many(std::slice::from_ref(&resolved.record)).await?;
        Ok(resolved.record)
    }

    /// Deletes a task remotely then locally. Errors from either step
    /// are logged, not propagated, and neither step rolls back the
    /// other.
    pub async fn delete_task(&self, id: &str) {
        if self.is_offline().await {
            self.queues.queue_delete(EntityKind::Task, id).await;
        } else {
            let path = self.session.tasks().doc(id);
            match self.remote.delete_document(&path).await {
                Ok(()) => {}
                Err(RemoteError::Offline) => {
                    self.queues.queue_delete(EntityKind::Task, id).await;
                }
                Err(e) => warn!(%path, error = %e, "remote task delete failed"),
            }
        }
        if let Err(e) = self.tasks.delete(id).await {
            warn!(id, error = %e, "local task delete failed");
        }
    }

    /// Marks a task completed via a targeted status update.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError`] under the same conditions as
    /// [`Self::update_task`]. Unknown IDs are a no-op.
    pub async fn archive_task(&self, id: &str) -> Result<(), ManagerError> {
        let Some(mut task) = self.tasks.get(id).await else {
            return Ok(());
        };
        task.status = TaskStatus::Completed;

        if self.is_offline().await {
            self.queues.mark_dirty(EntityKind::Task, id).await;
        } else {
            let mut patch = DocPatch::new();
            patch.insert(
                "status".to_string(),
                FieldPatch::Set(serde_json::Value::String(
                    TaskStatus::Completed.to_string(),
                )),
            );
            let path = self.session.tasks().doc(id);
            match self.remote.update_document(&path, patch).await {
                Ok(()) | Err(RemoteError::NotFound(_)) => {}
                Err(RemoteError::Offline) => {
                    self.queues.mark_dirty(EntityKind::Task, id).await;
                }
                Err(e) => return Err(e.into()),
            }
        }
        self.tasks.save_many(std::slice::from_ref(&task)).await?;
        Ok(())
    }

    /// Shared create-path tail: remote set, then local mirror.
    async fn write_task(&self, doc: crate::remote::Document, record: Task) -> Result<Task, ManagerError> {
        if self.is_offline().await {
            self.queues.mark_dirty(EntityKind::Task, &record.id).await;
            debug!(id = record.id, "offline, task create queued");
        } else {
            let path = self.session.tasks().doc(&record.id);
            match self.remote.set_document(&path, doc).await {
                Ok(()) => {}
                Err(RemoteError::Offline) => {
                    self.queues.mark_dirty(EntityKind::Task, &record.id).await;
                    warn!(%path, "remote unreachable, task create queued");
                }
                Err(e) => return Err(e.into()),
            }
        }
        self.tasks.save_many(std::slice::from_ref(&record)).await?;
        Ok(record)
    }
}
