//! The organizer engine: one instance per signed-in user.
//!
//! Owns the session, the remote store handle, the three local stores,
//! and the sync queues. Entity-manager operations live in `managers/`;
//! this module carries construction, the read-side API the UI consumes,
//! and the sync coordinator.

use std::path::Path;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use studyflow_model::{
    Project, ProjectView, Subject, Task, TaskView, sort_projects, sort_subjects, sort_tasks,
};

use crate::managers::{ProjectDetails, SubjectDetails, TaskDetails};
use crate::remote::RemoteStore;
use crate::resolver;
use crate::session::Session;
use crate::store::{LocalStore, StoreError};
use crate::sync::{EntityKind, SyncQueues, SyncState};

/// The per-user engine instance.
pub struct Organizer<R: RemoteStore> {
    pub(crate) session: Session,
    pub(crate) remote: Arc<R>,
    pub(crate) tasks: LocalStore<Task>,
    pub(crate) subjects: LocalStore<Subject>,
    pub(crate) projects: LocalStore<Project>,
    pub(crate) queues: SyncQueues,
    pub(crate) state: RwLock<SyncState>,
}

impl<R: RemoteStore> Organizer<R> {
    /// Creates an organizer with in-memory local stores, starting in
    /// the `Idle` state.
    #[must_use]
    pub fn in_memory(session: Session, remote: Arc<R>) -> Self {
        Self {
            session,
            remote,
            tasks: LocalStore::in_memory("tasks"),
            subjects: LocalStore::in_memory("subjects"),
            projects: LocalStore::in_memory("projects"),
            queues: SyncQueues::default(),
            state: RwLock::new(SyncState::Idle),
        }
    }

    /// Creates an organizer with file-backed local stores under `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if an existing snapshot cannot be loaded.
    pub async fn open(session: Session, remote: Arc<R>, dir: &Path) -> Result<Self, StoreError> {
        Ok(Self {
            session,
            remote,
            tasks: LocalStore::open("tasks", dir).await?,
            subjects: LocalStore::open("subjects", dir).await?,
            projects: LocalStore::open("projects", dir).await?,
            queues: SyncQueues::default(),
            state: RwLock::new(SyncState::Idle),
        })
    }

    /// The session this organizer is scoped to.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Current connectivity state.
    pub async fn sync_state(&self) -> SyncState {
        *self.state.read().await
    }

    pub(crate) async fn is_offline(&self) -> bool {
        *self.state.read().await == SyncState::Offline
    }

    /// All cached tasks, sorted by due date, due time, then name.
    pub async fn list_tasks(&self) -> Vec<Task> {
        let mut tasks = self.tasks.get_all().await;
        sort_tasks(&mut tasks);
        tasks
    }

    /// All cached subjects except the sentinel, sorted by name.
    pub async fn list_subjects(&self) -> Vec<Subject> {
        let mut subjects: Vec<Subject> = self
            .subjects
            .get_all()
            .await
            .into_iter()
            .filter(|s| s.id != studyflow_model::NONE_SENTINEL)
            .collect();
        sort_subjects(&mut subjects);
        subjects
    }

    /// All cached projects except the sentinel, sorted by due date,
    /// due time, then name.
    pub async fn list_projects(&self) -> Vec<Project> {
        let mut projects: Vec<Project> = self
            .projects
            .get_all()
            .await
            .into_iter()
            .filter(|p| p.id != studyflow_model::NONE_SENTINEL)
            .collect();
        sort_projects(&mut projects);
        projects
    }

    /// Tasks joined with their subjects and projects for display.
    pub async fn task_views(&self) -> Vec<TaskView> {
        let tasks = self.list_tasks().await;
        let subjects = self.subjects.get_all().await;
        let projects = self.projects.get_all().await;
        resolver::inflate_tasks(tasks, &subjects, &projects)
    }

    /// Projects joined with their subjects for display.
    pub async fn project_views(&self) -> Vec<ProjectView> {
        let projects = self.list_projects().await;
        let subjects = self.subjects.get_all().await;
        resolver::inflate_projects(projects, &subjects)
    }

    /// One cached task by ID.
    pub async fn get_task(&self, id: &str) -> Option<Task> {
        self.tasks.get(id).await
    }

    /// One cached subject by ID.
    pub async fn get_subject(&self, id: &str) -> Option<Subject> {
        self.subjects.get(id).await
    }

    /// One cached project by ID.
    pub async fn get_project(&self, id: &str) -> Option<Project> {
        self.projects.get(id).await
    }

    /// Network-lost signal: stop attempting remote calls.
    pub async fn handle_offline(&self) {
        info!(user = self.session.user_id(), "going offline");
        *self.state.write().await = SyncState::Offline;
    }

    /// Network-reconnect signal: replay queued mutations against
    /// remote, then refresh the local cache from it.
    ///
    /// Best-effort throughout. A failed push re-marks the entity dirty
    /// and the coordinator moves on; it never aborts the batch.
    pub async fn handle_reconnect(&self) {
        info!(user = self.session.user_id(), "reconnecting");
        *self.state.write().await = SyncState::Syncing;

        self.push_dirty().await;
        self.replay_queued().await;
        self.refresh_from_remote().await;

        *self.state.write().await = SyncState::Idle;
        info!(user = self.session.user_id(), "sync complete");
    }

    /// Pushes every dirty entity by re-running its upsert against the
    /// locally cached copy. Upserts are keyed by ID, so a retry after a
    /// partial failure is idempotent.
    async fn push_dirty(&self) {
        let dirty: Vec<String> = self.queues.dirty_tasks.write().await.drain().collect();
        for id in dirty {
            let Some(task) = self.tasks.get(&id).await else {
                continue;
            };
            let resolved = resolver::resolve_task(&self.session, &id, &TaskDetails::from_local(&task));
            let path = self.session.tasks().doc(&id);
            if let Err(e) = self.remote.set_document(&path, resolved.doc).await {
                warn!(%path, error = %e, "task push failed, keeping dirty");
                self.queues.mark_dirty(EntityKind::Task, &id).await;
            }
        }

        let dirty: Vec<String> = self.queues.dirty_subjects.write().await.drain().collect();
        for id in dirty {
            let Some(subject) = self.subjects.get(&id).await else {
                continue;
            };
            let resolved = resolver::resolve_subject(&id, &SubjectDetails::from_local(&subject));
            let path = self.session.subjects().doc(&id);
            if let Err(e) = self.remote.set_document(&path, resolved.doc).await {
                warn!(%path, error = %e, "subject push failed, keeping dirty");
                self.queues.mark_dirty(EntityKind::Subject, &id).await;
            }
        }

        let dirty: Vec<String> = self.queues.dirty_projects.write().await.drain().collect();
        for id in dirty {
            let Some(project) = self.projects.get(&id).await else {
                continue;
            };
            let resolved =
                resolver::resolve_project(&self.session, &id, &ProjectDetails::from_local(&project));
            let path = self.session.projects().doc(&id);
            if let Err(e) = self.remote.set_document(&path, resolved.doc).await {
                warn!(%path, error = %e, "project push failed, keeping dirty");
                self.queues.mark_dirty(EntityKind::Project, &id).await;
            }
        }
    }

    /// Replays queued deletions and profile updates, then clears both
    /// queues regardless of individual failures.
    async fn replay_queued(&self) {
        let (deletes, profile_updates) = self.queues.take_replayable().await;

        for queued in deletes {
            let path = match queued.kind {
                EntityKind::Task => self.session.tasks().doc(&queued.id),
                EntityKind::Subject => self.session.subjects().doc(&queued.id),
                EntityKind::Project => self.session.projects().doc(&queued.id),
            };
            if let Err(e) = self.remote.delete_document(&path).await {
                warn!(%path, error = %e, "queued delete replay failed");
            }
        }

        for update in profile_updates {
            if let Err(e) = self.apply_profile_update_remote(&update).await {
                warn!(error = %e, "queued profile update replay failed");
            }
        }
    }

    /// Overwrites the local cache with the remote collections.
    ///
    /// Local records absent remotely are pruned, except the sentinel
    /// entries, which are re-seeded so joins keep resolving.
    async fn refresh_from_remote(&self) {
        match self.remote.get_collection(&self.session.tasks()).await {
            Ok(docs) => {
                let records: Vec<Task> = docs
                    .iter()
                    .map(|(id, doc)| resolver::flatten_task(id, doc))
                    .collect();
                self.replace_store(&self.tasks, records, None).await;
            }
            Err(e) => warn!(error = %e, "task refresh failed"),
        }

        match self.remote.get_collection(&self.session.subjects()).await {
            Ok(docs) => {
                let records: Vec<Subject> = docs
                    .iter()
                    .map(|(id, doc)| resolver::flatten_subject(id, doc))
                    .collect();
                self.replace_store(&self.subjects, records, Some(resolver::sentinel_subject()))
                    .await;
            }
            Err(e) => warn!(error = %e, "subject refresh failed"),
        }

        match self.remote.get_collection(&self.session.projects()).await {
            Ok(docs) => {
                let records: Vec<Project> = docs
                    .iter()
                    .map(|(id, doc)| resolver::flatten_project(id, doc))
                    .collect();
                self.replace_store(&self.projects, records, Some(resolver::sentinel_project()))
                    .await;
            }
            Err(e) => warn!(error = %e, "project refresh failed"),
        }
    }

    async fn replace_store<T>(&self, store: &LocalStore<T>, mut records: Vec<T>, sentinel: Option<T>)
    where
        T: crate::store::Keyed + Clone + serde::Serialize + serde::de::DeserializeOwned + Send + Sync,
    {
        if let Some(sentinel) = sentinel
            && !records.iter().any(|r| r.key() == sentinel.key())
        {
            records.push(sentinel);
        }
        let keep: std::collections::HashSet<String> =
            records.iter().map(|r| r.key().to_string()).collect();
        let stale: Vec<String> = store
            .get_all()
            .await
            .into_iter()
            .map(|r| r.key().to_string())
            .filter(|id| !keep.contains(id))
            .collect();
        for id in &stale {
            if let Err(e) = store.delete(id).await {
                warn!(id, error = %e, "stale record prune failed");
            }
        }
        debug!(refreshed = records.len(), pruned = stale.len(), "store refreshed");
        if let Err(e) = store.save_many(&records).await {
            warn!(error = %e, "store refresh write failed");
        }
    }
}
