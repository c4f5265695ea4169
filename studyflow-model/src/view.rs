//! Read-side view records with embedded entities, produced by inflating
//! flattened local records against the full local collections.

use crate::project::Project;
use crate::subject::Subject;
use crate::task::Task;

/// A task joined with its subject and project.
///
/// A dangling or sentinel reference inflates to `None` rather than an
/// error; the display layer renders it as "no subject"/"no project".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskView {
    pub task: Task,
    pub subject: Option<Subject>,
    pub project: Option<Project>,
}

/// A project joined with its resolvable subjects.
///
/// Dangling subject references are filtered out, so the list may be
/// shorter than the project's raw subject set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectView {
    pub project: Project,
    pub subjects: Vec<Subject>,
}
