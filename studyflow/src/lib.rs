//! `Studyflow` — offline-first student task organizer engine.
//!
//! Maintains two parallel representations of the user's tasks, subjects,
//! and projects: a remote document store (live references, anchored
//! instants) and a local cache (flattened IDs, plain date/time
//! components). Entity managers write remote-then-local; the sync
//! coordinator replays queued offline mutations on reconnect and
//! refreshes the cache from the remote store.

pub mod config;
pub mod dates;
pub mod managers;
pub mod organizer;
pub mod remote;
pub mod resolver;
pub mod session;
pub mod store;
pub mod sync;

pub use organizer::Organizer;
pub use session::Session;
