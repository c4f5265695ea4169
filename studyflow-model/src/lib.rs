//! `Studyflow` — entity types for the student task organizer.
//!
//! Defines the denormalized local shapes of tasks, subjects, and projects
//! (plain string reference IDs, plain date/time components), the tagged
//! reference union consumed by the reference resolver, user profile
//! preferences, and the sort orders shared by every front-end.
//!
//! The remote document shapes (live references, anchored instants) never
//! appear here — converting between the two representations is the
//! reference resolver's job in the engine crate.

pub mod display;
pub mod profile;
pub mod project;
pub mod refs;
pub mod subject;
pub mod task;
pub mod view;

pub use display::{DateFormat, TimeFormat, format_date_display, format_time_display};
pub use profile::{ProfileUpdate, UserProfile};
pub use project::{Project, sort_projects};
pub use refs::{NONE_SENTINEL, RefInput, RefKind};
pub use subject::{EntityStatus, Subject, sort_subjects};
pub use task::{LmsOrigin, Task, TaskPriority, TaskStatus, sort_tasks};
pub use view::{ProjectView, TaskView};
