//! Voice Notes — speech-to-text note capture and Markdown export.
//!
//! The crate implements the note pipeline from voice capture to a persisted
//! Markdown artifact.  Everything platform-specific (recognizers,
//! permission prompts, destination pickers) sits behind collaborator
//! traits; the pipeline itself is plain, testable Rust.
//!
//! # Architecture
//!
//! ```text
//! caller ──▶ SessionController ──▶ PermissionProvider   (check / prompt)
//!                │                 SpeechEngine         (recognize)
//!                │                 DestinationSink      (write document)
//!                ▼
//!            NoteStore ──▶ export::render ──▶ Markdown bytes
//! ```
//!
//! The controller owns the [`note::NoteStore`] for the session, appends one
//! [`note::NoteEntry`] per successful transcript, and renders the store on
//! demand.  Rendering is pure and completes in memory before any sink write
//! begins.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use voice_notes::export::DirectorySink;
//! use voice_notes::note::CaptureMode;
//! use voice_notes::permission::StaticPermissions;
//! use voice_notes::session::SessionController;
//! use voice_notes::speech::TypedSpeechEngine;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut session = SessionController::new(
//!         CaptureMode::SingleBuffer,
//!         Arc::new(StaticPermissions::granted()),
//!         Arc::new(TypedSpeechEngine::new()),
//!         Arc::new(DirectorySink::default_documents()),
//!     );
//!
//!     if let Ok(outcome) = session.capture().await {
//!         println!("{outcome:?}");
//!     }
//!     if let Ok(receipt) = session.export().await {
//!         println!("exported to {}", receipt.destination);
//!     }
//! }
//! ```

pub mod config;
pub mod export;
pub mod note;
pub mod permission;
pub mod session;
pub mod speech;
pub mod timestamp;

// ── Public re-exports ──────────────────────────────────────────────────────

pub use config::AppConfig;
pub use export::{DestinationSink, DirectorySink, ExportError, SinkError};
pub use note::{CaptureMode, NoteEntry, NoteStore};
pub use permission::{Capability, PermissionProvider, StaticPermissions};
pub use session::{CaptureError, CaptureOutcome, CaptureState, ExportReceipt, SessionController};
pub use speech::{RecognizeConfig, RecognizeOutcome, SpeechEngine, SpeechError};
