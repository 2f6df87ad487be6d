//! Destination sink collaborator.
//!
//! An export always renders fully in memory first; the sink only ever sees
//! the finished byte sequence together with a proposed file name.  Two
//! production shapes exist for the sink:
//!
//! * an interactive picker (platform UI, represented only by the trait),
//!   where the user chooses the final location and may cancel;
//! * [`DirectorySink`] — a fixed-directory provider that writes
//!   `<root>/<file_name>`, creating intermediate directories as needed.
//!
//! A sink failure never touches the in-memory note store, so the next
//! export attempt starts from a complete fresh render.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

/// MIME type proposed to interactive pickers for the export document.
pub const MARKDOWN_MIME: &str = "text/markdown";

/// Directory name used under the documents root by the fixed-path sink.
pub const EXPORT_DIR_NAME: &str = "VoiceNotes";

// ---------------------------------------------------------------------------
// SinkError
// ---------------------------------------------------------------------------

/// Failures while handing the rendered document to a destination.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The user backed out of the destination picker.
    #[error("Export cancelled")]
    Cancelled,

    /// The destination directory could not be created.
    #[error("Could not create directory {path}: {source}")]
    CreateDirectory {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Writing the document failed.
    #[error("Could not write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// DestinationSink trait
// ---------------------------------------------------------------------------

/// Object-safe, thread-safe interface to an export destination.
#[async_trait]
pub trait DestinationSink: Send + Sync {
    /// Write `bytes` under the proposed `file_name`.
    ///
    /// Returns the resolved destination identifier (a path or display
    /// name) on success.  Implementations own filesystem-level atomicity;
    /// the pipeline never rolls back a partial write.
    async fn write_document(&self, file_name: &str, bytes: &[u8]) -> Result<String, SinkError>;

    /// MIME type a picker-backed destination should advertise when asking
    /// the platform to create the document.
    fn mime_type(&self) -> &'static str {
        MARKDOWN_MIME
    }
}

const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn DestinationSink>) {}
};

// ---------------------------------------------------------------------------
// DirectorySink
// ---------------------------------------------------------------------------

/// Fixed-directory sink: writes every document into one root directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    root: PathBuf,
}

impl DirectorySink {
    /// Sink rooted at an explicit directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Sink rooted at `<documents>/VoiceNotes`, falling back to the current
    /// directory when the platform has no documents directory.
    pub fn default_documents() -> Self {
        let documents = dirs::document_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::new(documents.join(EXPORT_DIR_NAME))
    }

    /// The directory all documents land in.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl DestinationSink for DirectorySink {
    async fn write_document(&self, file_name: &str, bytes: &[u8]) -> Result<String, SinkError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|source| SinkError::CreateDirectory {
                path: self.root.display().to_string(),
                source,
            })?;

        let path = self.root.join(file_name);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|source| SinkError::Write {
                path: path.display().to_string(),
                source,
            })?;

        log::debug!("sink: wrote {} bytes to {}", bytes.len(), path.display());
        Ok(path.display().to_string())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
