//! Capture attempt state machine.
//!
//! [`CaptureState`] makes the permission-then-capture two-step explicit
//! instead of burying it in nested conditionals:
//!
//! ```text
//! Idle ──capture()──▶ PermissionCheck
//!                       ├─ granted ──▶ Listening
//!                       └─ denied ───▶ Idle  (PermissionDenied reported)
//! Listening ──transcript / cancelled / no-match──▶ Idle
//! ```
//!
//! A transcript arriving while `Idle` has no legal transition and is a
//! programming error, which the controller can detect by inspecting the
//! state.

/// States of one capture attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    /// No capture in flight.
    Idle,

    /// Querying (and possibly prompting for) the record-audio capability.
    PermissionCheck,

    /// The speech engine is listening; a transcript, cancellation, or
    /// error will resolve the attempt.
    Listening,
}

impl CaptureState {
    /// `true` while a capture attempt is in flight.
    ///
    /// The controller rejects new capture or export requests while busy.
    ///
    /// ```
    /// use voice_notes::session::CaptureState;
    ///
    /// assert!(!CaptureState::Idle.is_busy());
    /// assert!(CaptureState::PermissionCheck.is_busy());
    /// assert!(CaptureState::Listening.is_busy());
    /// ```
    pub fn is_busy(&self) -> bool {
        matches!(self, CaptureState::PermissionCheck | CaptureState::Listening)
    }

    /// A short human-readable label suitable for a status line.
    pub fn label(&self) -> &'static str {
        match self {
            CaptureState::Idle => "Idle",
            CaptureState::PermissionCheck => "Checking permission",
            CaptureState::Listening => "Listening",
        }
    }
}

impl Default for CaptureState {
    fn default() -> Self {
        CaptureState::Idle
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
