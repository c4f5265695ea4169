//! Reference inputs: the tagged union replacing string-typed polymorphic
//! relationship fields.
//!
//! Callers historically supplied a relationship as a raw ID string, a
//! full embedded entity, or nothing at all. [`RefInput`] makes the three
//! cases explicit; only the reference resolver consumes it, so the
//! disambiguation logic lives in exactly one place.

use crate::project::Project;
use crate::subject::Subject;

/// Well-known ID of the shared placeholder entity representing "unset".
///
/// Every logically-empty subject/project reference points at the
/// sentinel rather than being null, so joins never fail on a missing
/// reference.
pub const NONE_SENTINEL: &str = "None";

/// Which collection a reference points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    Subject,
    Project,
}

/// A relationship field as supplied by a caller.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RefInput {
    /// No reference supplied; resolves to the sentinel.
    #[default]
    Unset,
    /// A bare entity ID.
    ById(String),
    /// The ID taken from an embedded entity object.
    Embedded(String),
}

impl RefInput {
    /// Builds a reference input from an ID string, treating empty and
    /// sentinel values as unset.
    #[must_use]
    pub fn from_id(id: &str) -> Self {
        if id.is_empty() || id == NONE_SENTINEL {
            Self::Unset
        } else {
            Self::ById(id.to_string())
        }
    }

    /// Returns the carried ID, if any.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Unset => None,
            Self::ById(id) | Self::Embedded(id) => Some(id),
        }
    }
}

impl From<&Subject> for RefInput {
    fn from(subject: &Subject) -> Self {
        Self::Embedded(subject.id.clone())
    }
}

impl From<&Project> for RefInput {
    fn from(project: &Project) -> Self {
        Self::Embedded(project.id.clone())
    }
}
