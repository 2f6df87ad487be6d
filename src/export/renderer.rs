//! Markdown export renderer.
//!
//! [`render`] is a pure function from a store snapshot plus a caller-supplied
//! header timestamp to the exact UTF-8 byte sequence of the export document.
//! The document layout is fixed:
//!
//! ```text
//! # Voice Notes Export
//!
//! **Exported on:** <human_token>
//!
//! ---
//!
//! <store contents>
//! ```
//!
//! followed by exactly one trailing newline.  User content is inserted
//! verbatim — no Markdown escaping — so a transcript containing `#` or `*`
//! appears byte-for-byte in the output.

use thiserror::Error;

use crate::note::NoteStore;

use super::sink::SinkError;

// ---------------------------------------------------------------------------
// ExportError
// ---------------------------------------------------------------------------

/// Failures of the export operation.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The store is empty (or still shows the placeholder) — there is
    /// nothing to render and no sink is contacted.
    #[error("No notes to export yet")]
    NothingToExport,

    /// Another export is already in flight for this session.
    #[error("An export is already in progress")]
    Busy,

    /// The destination sink rejected or failed the write.
    #[error("Export failed: {0}")]
    Sink(#[from] SinkError),
}

// ---------------------------------------------------------------------------
// render
// ---------------------------------------------------------------------------

/// Render `store` into the export document.
///
/// `human_token` is supplied by the caller (`YYYY-MM-DD HH:MM:SS`), never
/// regenerated here, so rendering an unchanged store with a fixed token is
/// byte-identical across calls.
///
/// # Errors
///
/// [`ExportError::NothingToExport`] when [`NoteStore::is_empty`] — the
/// renderer never produces bytes for an empty store.
pub fn render(store: &NoteStore, human_token: &str) -> Result<Vec<u8>, ExportError> {
    if store.is_empty() {
        return Err(ExportError::NothingToExport);
    }

    let mut doc = String::new();
    doc.push_str("# Voice Notes Export\n\n");
    doc.push_str("**Exported on:** ");
    doc.push_str(human_token);
    doc.push_str("\n\n---\n\n");

    match store.buffer() {
        Some(buffer) => doc.push_str(buffer),
        None => {
            // List mode: one block per entry, newest first, blank-line
            // separated.
            let mut first = true;
            for entry in store.entries() {
                if !first {
                    doc.push_str("\n\n");
                }
                first = false;
                doc.push_str("### ");
                doc.push_str(entry.title());
                doc.push('\n');
                doc.push_str(&entry.date_token());
                doc.push_str(" - ");
                doc.push_str(&entry.time_token());
                doc.push_str("\n\n");
                doc.push_str(entry.content());
            }
        }
    }

    doc.push('\n');
    Ok(doc.into_bytes())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
