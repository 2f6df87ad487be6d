//! In-memory session store for captured notes.
//!
//! A [`NoteStore`] lives exactly as long as one capture session.  It starts
//! empty, grows by one element per successful transcript, and is never
//! persisted — process termination clears it.  There is no delete
//! operation.
//!
//! The store has two shapes, chosen at construction via [`CaptureMode`]:
//!
//! * **Single buffer** — every capture is appended to one accumulating
//!   text block as `"[HH:MM:SS] content"`, blank-line separated.
//! * **Note list** — entries are kept most-recent-first; each append is an
//!   O(1) front insertion.
//!
//! Only the session controller mutates the store; the export renderer
//! reads it through [`NoteStore::buffer`] / [`NoteStore::entries`].

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::entry::NoteEntry;

/// Placeholder text a fresh single-buffer display shows before the first
/// capture.  A buffer equal to this string counts as empty.
pub const BUFFER_PLACEHOLDER: &str = "Your notes will appear here...";

// ---------------------------------------------------------------------------
// CaptureMode
// ---------------------------------------------------------------------------

/// Selects how the session accumulates captured notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaptureMode {
    /// One accumulating text block with inline `[HH:MM:SS]` markers.
    SingleBuffer,
    /// Discrete entries, most-recent-first.
    NoteList,
}

impl Default for CaptureMode {
    fn default() -> Self {
        Self::SingleBuffer
    }
}

// ---------------------------------------------------------------------------
// NoteStore
// ---------------------------------------------------------------------------

/// Ordered in-memory collection of the session's captures.
#[derive(Debug, Clone, PartialEq)]
pub enum NoteStore {
    /// Accumulating text block (single-buffer mode).  `captures` counts the
    /// appends folded into the buffer.
    SingleBuffer { buffer: String, captures: usize },
    /// Most-recent-first entry list (note-list mode).
    NoteList { entries: VecDeque<NoteEntry> },
}

impl NoteStore {
    /// Create an empty store for the given mode.
    pub fn new(mode: CaptureMode) -> Self {
        match mode {
            CaptureMode::SingleBuffer => Self::SingleBuffer {
                buffer: String::new(),
                captures: 0,
            },
            CaptureMode::NoteList => Self::NoteList {
                entries: VecDeque::new(),
            },
        }
    }

    /// The mode this store was created with.
    pub fn mode(&self) -> CaptureMode {
        match self {
            Self::SingleBuffer { .. } => CaptureMode::SingleBuffer,
            Self::NoteList { .. } => CaptureMode::NoteList,
        }
    }

    /// Append one captured entry.
    ///
    /// Single-buffer mode concatenates `"[HH:MM:SS] content"` onto the
    /// buffer, separated from prior content by a blank line — or with no
    /// separator when the buffer is empty or still equal to
    /// [`BUFFER_PLACEHOLDER`].  Note-list mode inserts at index 0 so the
    /// newest entry always comes first.
    pub fn append(&mut self, entry: NoteEntry) {
        match self {
            Self::SingleBuffer { buffer, captures } => {
                let line = format!("[{}] {}", entry.time_token(), entry.content());
                if buffer.is_empty() || buffer.as_str() == BUFFER_PLACEHOLDER {
                    *buffer = line;
                } else {
                    buffer.push_str("\n\n");
                    buffer.push_str(&line);
                }
                *captures += 1;
            }
            Self::NoteList { entries } => {
                entries.push_front(entry);
            }
        }
    }

    /// `true` when there is nothing to export: zero entries, an empty
    /// buffer, or a buffer still showing the placeholder text.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::SingleBuffer { buffer, .. } => {
                buffer.is_empty() || buffer.as_str() == BUFFER_PLACEHOLDER
            }
            Self::NoteList { entries } => entries.is_empty(),
        }
    }

    /// Number of captures appended so far: the append count in
    /// single-buffer mode, the entry count in note-list mode.
    pub fn len(&self) -> usize {
        match self {
            Self::SingleBuffer { captures, .. } => *captures,
            Self::NoteList { entries } => entries.len(),
        }
    }

    /// The accumulated buffer text, or `None` in note-list mode.
    pub fn buffer(&self) -> Option<&str> {
        match self {
            Self::SingleBuffer { buffer, .. } => Some(buffer),
            Self::NoteList { .. } => None,
        }
    }

    /// The entries, newest first.  Empty in single-buffer mode.
    pub fn entries(&self) -> Box<dyn Iterator<Item = &NoteEntry> + '_> {
        match self {
            Self::SingleBuffer { .. } => Box::new(std::iter::empty()),
            Self::NoteList { entries } => Box::new(entries.iter()),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
