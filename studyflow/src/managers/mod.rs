//! Entity managers: the caller-facing mutation API, split per entity.
//!
//! Each manager is an `impl` block on [`crate::Organizer`]; this module
//! holds the shared input types. A details struct carries everything a
//! create or update accepts. On update, optional fields left as `None`
//! are explicitly cleared remotely, never left stale.

mod profile;
mod project;
mod subject;
mod task;

use chrono::{NaiveDate, NaiveTime};

use studyflow_model::{
    EntityStatus, LmsOrigin, Project, RefInput, Subject, Task, TaskPriority, TaskStatus,
};

/// Errors surfaced by entity-manager operations.
#[derive(Debug, thiserror::Error)]
pub enum ManagerError {
    /// The remote store refused the write while online.
    #[error(transparent)]
    Remote(#[from] crate::remote::RemoteError),

    /// The local mirror could not be written.
    #[error(transparent)]
    Store(#[from] crate::store::StoreError),
}

/// Input to task create/update.
#[derive(Debug, Clone, Default)]
pub struct TaskDetails {
    pub name: String,
    pub description: String,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub subject: RefInput,
    pub project: RefInput,
    pub start_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    /// Meaningful only alongside `due_date`; ignored without one.
    pub due_time: Option<NaiveTime>,
    pub lms: Option<LmsOrigin>,
}

impl TaskDetails {
    /// Rebuilds the details that would reproduce a cached local record,
    /// used by the sync push and cascade-nullify paths.
    #[must_use]
    pub fn from_local(task: &Task) -> Self {
        Self {
            name: task.name.clone(),
            description: task.description.clone(),
            priority: task.priority,
            status: task.status,
            subject: RefInput::from_id(&task.subject),
            project: RefInput::from_id(&task.project),
            start_date: task.start_date,
            due_date: task.due_date,
            due_time: task.due_time,
            lms: task.lms.clone(),
        }
    }
}

/// Input to subject create/update.
#[derive(Debug, Clone, Default)]
pub struct SubjectDetails {
    pub name: String,
    pub semester: String,
    pub description: String,
    /// Empty means "use the default color".
    pub color: String,
    pub status: Option<EntityStatus>,
    pub lms: Option<LmsOrigin>,
}

impl SubjectDetails {
    /// Rebuilds the details that would reproduce a cached local record.
    #[must_use]
    pub fn from_local(subject: &Subject) -> Self {
        Self {
            name: subject.name.clone(),
            semester: subject.semester.clone(),
            description: subject.description.clone(),
            color: subject.color.clone(),
            status: Some(subject.status),
            lms: subject.lms.clone(),
        }
    }
}

/// Input to project create/update.
#[derive(Debug, Clone, Default)]
pub struct ProjectDetails {
    pub name: String,
    pub description: String,
    /// Subject references; an empty set resolves to the sentinel
    /// singleton.
    pub subjects: Vec<RefInput>,
    pub status: Option<EntityStatus>,
    pub due_date: Option<NaiveDate>,
    /// Meaningful only alongside `due_date`; ignored without one.
    pub due_time: Option<NaiveTime>,
}

impl ProjectDetails {
    /// Rebuilds the details that would reproduce a cached local record.
    #[must_use]
    pub fn from_local(project: &Project) -> Self {
        Self {
            name: project.name.clone(),
            description: project.description.clone(),
            subjects: project
                .subjects
                .iter()
                .map(|id| RefInput::from_id(id))
                .collect(),
            status: Some(project.status),
            due_date: project.due_date,
            due_time: project.due_time,
        }
    }
}
