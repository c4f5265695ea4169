//! Task entity: the denormalized local record plus its enums.
//!
//! A [`Task`] as stored locally carries plain string IDs for its subject
//! and project references (the `"None"` sentinel when unset) and plain
//! date/time components. The remote document representation (live
//! references, anchored instants) is built by the reference resolver.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::refs::NONE_SENTINEL;

/// Task priority, displayed verbatim in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskPriority {
    High,
    Medium,
    Low,
}

impl Default for TaskPriority {
    fn default() -> Self {
        Self::Medium
    }
}

impl std::fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::High => write!(f, "High"),
            Self::Medium => write!(f, "Medium"),
            Self::Low => write!(f, "Low"),
        }
    }
}

/// Lifecycle status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    #[serde(rename = "Not Started")]
    NotStarted,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

impl Default for TaskStatus {
    fn default() -> Self {
        Self::NotStarted
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotStarted => write!(f, "Not Started"),
            Self::InProgress => write!(f, "In Progress"),
            Self::Completed => write!(f, "Completed"),
        }
    }
}

/// Origin metadata for entities imported from an LMS calendar feed.
///
/// The external UID doubles as the entity ID so that re-importing the
/// same feed upserts instead of duplicating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LmsOrigin {
    /// Source system identifier (e.g. "canvas").
    pub source: String,
    /// Stable UID assigned by the source system.
    pub uid: String,
}

/// A task in the denormalized local shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Entity ID: time-ordered UUID, or the LMS UID for imported tasks.
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub status: TaskStatus,
    /// Subject reference as a plain ID; the `"None"` sentinel when unset.
    pub subject: String,
    /// Project reference as a plain ID; the `"None"` sentinel when unset.
    pub project: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    /// Meaningful only when `due_date` is set.
    #[serde(default)]
    pub due_time: Option<NaiveTime>,
    #[serde(default)]
    pub lms: Option<LmsOrigin>,
}

impl Task {
    /// Returns true when a real subject is referenced rather than the
    /// unset sentinel.
    #[must_use]
    pub fn has_subject(&self) -> bool {
        self.subject != NONE_SENTINEL
    }

    /// Returns true when a real project is referenced rather than the
    /// unset sentinel.
    #[must_use]
    pub fn has_project(&self) -> bool {
        self.project != NONE_SENTINEL
    }
}

/// Sorts tasks by due date, then due time, then name.
///
/// Tasks without a due date sort last; a missing due time sorts as end
/// of day.
pub fn sort_tasks(tasks: &mut [Task]) {
    tasks.sort_by(|a, b| {
        let date_a = a.due_date.unwrap_or(NaiveDate::MAX);
        let date_b = b.due_date.unwrap_or(NaiveDate::MAX);
        date_a
            .cmp(&date_b)
            .then_with(|| {
                let end = NaiveTime::from_hms_opt(23, 59, 0).unwrap_or(NaiveTime::MIN);
                a.due_time.unwrap_or(end).cmp(&b.due_time.unwrap_or(end))
            })
            .then_with(|| a.name.cmp(&b.name))
    });
}
