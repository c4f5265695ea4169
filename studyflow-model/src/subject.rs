//! Subject entity (a course the student is enrolled in).

use serde::{Deserialize, Serialize};

use crate::task::LmsOrigin;

/// Lifecycle status shared by subjects and projects.
///
/// Archiving is a soft delete: the record keeps all of its relationships
/// and can be reactivated at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityStatus {
    Active,
    Archived,
}

impl Default for EntityStatus {
    fn default() -> Self {
        Self::Active
    }
}

impl std::fmt::Display for EntityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "Active"),
            Self::Archived => write!(f, "Archived"),
        }
    }
}

/// A subject in the denormalized local shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    /// Entity ID: time-ordered UUID, or the LMS UID for imported subjects.
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub semester: String,
    #[serde(default)]
    pub description: String,
    /// Display color used by the front-end; never interpreted here.
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub status: EntityStatus,
    #[serde(default)]
    pub lms: Option<LmsOrigin>,
}

fn default_color() -> String {
    "black".to_string()
}

/// Sorts subjects alphabetically by name.
pub fn sort_subjects(subjects: &mut [Subject]) {
    subjects.sort_by(|a, b| a.name.cmp(&b.name));
}
