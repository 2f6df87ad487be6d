//! Capture session: state machine and controller.
//!
//! [`SessionController`] is the single owner of the session's
//! [`NoteStore`](crate::note::NoteStore) and the only component that mutates
//! it.  [`CaptureState`] tracks where a capture attempt is, making illegal
//! transitions detectable.

pub mod controller;
pub mod state;

pub use controller::{CaptureError, CaptureOutcome, ExportReceipt, SessionController};
pub use state::CaptureState;
