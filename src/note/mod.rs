//! Note data model: immutable entries and the per-session store.
//!
//! [`NoteEntry`] is the immutable value for one captured utterance;
//! [`NoteStore`] is the session-scoped, in-memory collection the controller
//! owns and the export renderer reads.

pub mod entry;
pub mod store;

pub use entry::{NoteEntry, DEFAULT_TITLE};
pub use store::{CaptureMode, NoteStore, BUFFER_PLACEHOLDER};
