//! Project entity (a body of work grouping tasks across subjects).

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::refs::NONE_SENTINEL;
use crate::subject::EntityStatus;

/// A project in the denormalized local shape.
///
/// The subject set holds plain subject IDs and is never empty: a project
/// with no real subjects carries the `"None"` sentinel as its single
/// element, so downstream joins never have to special-case emptiness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub subjects: Vec<String>,
    #[serde(default)]
    pub status: EntityStatus,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    /// Meaningful only when `due_date` is set.
    #[serde(default)]
    pub due_time: Option<NaiveTime>,
}

impl Project {
    /// Returns the subject IDs excluding the unset sentinel.
    #[must_use]
    pub fn real_subjects(&self) -> impl Iterator<Item = &str> {
        self.subjects
            .iter()
            .map(String::as_str)
            .filter(|s| *s != NONE_SENTINEL)
    }
}

/// Sorts projects by due date, then due time, then name.
///
/// Projects without a due date sort last; a missing due time sorts as
/// end of day.
pub fn sort_projects(projects: &mut [Project]) {
    projects.sort_by(|a, b| {
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
