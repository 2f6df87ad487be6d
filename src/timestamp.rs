//! Timestamp tokens used throughout the note pipeline.
//!
//! Every token is a pure function of a wall-clock instant
//! ([`chrono::NaiveDateTime`]) — deterministic, zero-padded, 24-hour,
//! Gregorian, and independent of the process locale.  The controller decides
//! *when* to sample the clock; this module only formats.
//!
//! | Token                  | Pattern               | Used for               |
//! |------------------------|-----------------------|------------------------|
//! | [`filename_token`]     | `YYYY-MM-DDTHH-mm-ss` | export file names      |
//! | [`note_time_token`]    | `HH:MM:SS`            | inline capture markers |
//! | [`human_token`]        | `YYYY-MM-DD HH:MM:SS` | export document header |
//! | [`entry_date_token`]   | `Mon DD, YYYY`        | list-mode entry dates  |

use chrono::NaiveDateTime;

/// Filename-safe instant token: `YYYY-MM-DDTHH-mm-ss`.
///
/// Hyphens replace the colons of ISO 8601 time so the result is a valid
/// file name on every platform.  The output never contains `:`, `/` or `\`.
///
/// ```
/// use chrono::NaiveDate;
/// use voice_notes::timestamp::filename_token;
///
/// let instant = NaiveDate::from_ymd_opt(2024, 1, 1)
///     .unwrap()
///     .and_hms_opt(12, 0, 0)
///     .unwrap();
/// assert_eq!(filename_token(&instant), "2024-01-01T12-00-00");
/// ```
pub fn filename_token(instant: &NaiveDateTime) -> String {
    instant.format("%Y-%m-%dT%H-%M-%S").to_string()
}

/// Inline capture marker: `HH:MM:SS` (24-hour, zero-padded).
///
/// Single-buffer mode prefixes each captured utterance with
/// `"[<note_time_token>] "`.
pub fn note_time_token(instant: &NaiveDateTime) -> String {
    instant.format("%H:%M:%S").to_string()
}

/// Human-readable instant: `YYYY-MM-DD HH:MM:SS`.
///
/// Appears in the `**Exported on:**` line of the export document header.
pub fn human_token(instant: &NaiveDateTime) -> String {
    instant.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Per-entry date line for list-mode rendering: `Mon DD, YYYY`
/// (e.g. `Jan 01, 2024`).  Month abbreviations are always English.
pub fn entry_date_token(instant: &NaiveDateTime) -> String {
    instant.format("%b %d, %Y").to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
