//! Sync coordinator state and queues.
//!
//! While the engine is offline, entity managers keep writing locally and
//! record what they could not push: dirty entity IDs (to re-upsert),
//! deletions, and profile updates. On reconnect the coordinator drains
//! the queues best-effort and then refreshes the local cache from
//! remote. The replay logic itself lives on [`crate::Organizer`].

use std::collections::HashSet;

use tokio::sync::RwLock;

use studyflow_model::ProfileUpdate;

/// Connectivity state of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// No remote calls are attempted; mutations queue locally.
    Offline,
    /// Reconnect replay in progress.
    Syncing,
    /// Online and caught up.
    Idle,
}

/// Which entity collection a queued deletion targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Task,
    Subject,
    Project,
}

/// A deletion recorded while offline, replayed on reconnect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedDelete {
    pub kind: EntityKind,
    pub id: String,
}

/// Mutations recorded while offline.
///
/// Dirty sets hold entity IDs whose local copy has not reached remote;
/// pushing re-runs the upsert path, so duplicates collapse naturally.
/// Deletes and profile updates are ordered queues because replay order
/// matters for them.
#[derive(Default)]
pub struct SyncQueues {
    pub dirty_tasks: RwLock<HashSet<String>>,
    pub dirty_subjects: RwLock<HashSet<String>>,
    pub dirty_projects: RwLock<HashSet<String>>,
    pub deletes: RwLock<Vec<QueuedDelete>>,
    pub profile_updates: RwLock<Vec<ProfileUpdate>>,
}

impl SyncQueues {
    /// Records an entity whose local copy is ahead of remote.
    pub async fn mark_dirty(&self, kind: EntityKind, id: &str) {
        let set = match kind {
            EntityKind::Task => &self.dirty_tasks,
            EntityKind::Subject => &self.dirty_subjects,
            EntityKind::Project => &self.dirty_projects,
        };
        set.write().await.insert(id.to_string());
    }

    /// Records a deletion to replay against remote.
    pub async fn queue_delete(&self, kind: EntityKind, id: &str) {
        // A queued upsert for a deleted entity would resurrect it on
        // replay; drop the dirty mark along with the record.
        let set = match kind {
            EntityKind::Task => &self.dirty_tasks,
            EntityKind::Subject => &self.dirty_subjects,
            EntityKind::Project => &self.dirty_projects,
        };
        set.write().await.remove(id);
        self.deletes.write().await.push(QueuedDelete {
            kind,
            id: id.to_string(),
        });
    }

    /// Records a profile update to replay in order.
    pub async fn queue_profile_update(&self, update: ProfileUpdate) {
        self.profile_updates.write().await.push(update);
    }

    /// Drains the ordered queues, returning their contents.
    pub async fn take_replayable(&self) -> (Vec<QueuedDelete>, Vec<ProfileUpdate>) {
        let deletes = std::mem::take(&mut *self.deletes.write().await);
        let updates = std::mem::take(&mut *self.profile_updates.write().await);
        (deletes, updates)
    }
}
