//! Shared types for marginalia
//!
//! Entries (articles and bookmarks) and reader comments as handed to the
//! rendering and classification layers by whatever persistence sits above
//! them.

mod comment;
mod entry;

pub use comment::{ClassificationState, Comment};
pub use entry::{Entry, EntryKind, DEFAULT_FILTER};
