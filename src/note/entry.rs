//! Immutable note entries.
//!
//! A [`NoteEntry`] represents exactly one captured utterance.  Entries are
//! constructed through [`NoteEntry::create`], which enforces the two
//! invariants of the data model:
//!
//! * `content` is never empty — blank transcripts are discarded at
//!   construction (`None`), not stored and not reported as errors.
//! * a missing or blank `title` is replaced by [`DEFAULT_TITLE`].
//!
//! Once created an entry never changes; there is no edit operation anywhere
//! in the pipeline.

use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::timestamp;

/// Title substituted when the caller supplies none (or a blank one).
pub const DEFAULT_TITLE: &str = "Voice Note";

// ---------------------------------------------------------------------------
// NoteEntry
// ---------------------------------------------------------------------------

/// One captured utterance: id, title, transcript text, and capture instant.
///
/// All fields are private and exposed through read-only accessors so an
/// entry cannot be mutated after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteEntry {
    id: Uuid,
    title: String,
    content: String,
    created_at: NaiveDateTime,
}

impl NoteEntry {
    /// Create an entry from a transcript, or discard it.
    ///
    /// Returns `None` when `content` is empty after trimming — the caller
    /// treats this exactly like a cancelled capture.  Leading and trailing
    /// whitespace is stripped from the stored content; interior whitespace
    /// is preserved verbatim.
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use voice_notes::note::NoteEntry;
    ///
    /// let at = NaiveDate::from_ymd_opt(2024, 1, 1)
    ///     .unwrap()
    ///     .and_hms_opt(12, 0, 0)
    ///     .unwrap();
    ///
    /// assert!(NoteEntry::create(None, "   ", at).is_none());
    ///
    /// let entry = NoteEntry::create(None, "Buy milk", at).unwrap();
    /// assert_eq!(entry.content(), "Buy milk");
    /// assert_eq!(entry.title(), "Voice Note");
    /// ```
    pub fn create(title: Option<&str>, content: &str, created_at: NaiveDateTime) -> Option<Self> {
        let content = content.trim();
        if content.is_empty() {
            return None;
        }

        let title = match title.map(str::trim) {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => DEFAULT_TITLE.to_string(),
        };

        Some(Self {
            id: Uuid::new_v4(),
            title,
            content: content.to_string(),
            created_at,
        })
    }

    /// Opaque unique identifier, generated at creation.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Display label — [`DEFAULT_TITLE`] unless the caller supplied one.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The transcript text.  Non-empty by construction.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Capture-time instant.
    pub fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }

    /// `HH:MM:SS` marker for this entry's capture time.
    pub fn time_token(&self) -> String {
        timestamp::note_time_token(&self.created_at)
    }

    /// `Mon DD, YYYY` date line for this entry, used in list-mode rendering.
    pub fn date_token(&self) -> String {
        timestamp::entry_date_token(&self.created_at)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
