//! Session controller — the pipeline orchestrator.
//!
//! [`SessionController`] exclusively owns the [`NoteStore`] for the lifetime
//! of the session and drives the two operations the pipeline exposes:
//!
//! ```text
//! capture():  PermissionCheck ──▶ Listening ──▶ append entry   (or discard)
//! export():   guard non-empty ──▶ render in memory ──▶ sink.write_document
//! ```
//!
//! One capture or export attempt is in flight at a time; overlapping
//! requests are rejected with a busy error rather than queued.  No retries
//! happen anywhere — every failure is terminal for its attempt and must be
//! re-triggered by the caller.

use std::sync::Arc;

use chrono::Local;
use thiserror::Error;

use crate::export::{render, DestinationSink, ExportError};
use crate::note::{CaptureMode, NoteEntry, NoteStore};
use crate::permission::{Capability, PermissionProvider};
use crate::speech::{RecognizeConfig, RecognizeOutcome, SpeechEngine, SpeechError};
use crate::timestamp;

use super::state::CaptureState;

// ---------------------------------------------------------------------------
// CaptureError / CaptureOutcome
// ---------------------------------------------------------------------------

/// User-visible failures of one capture attempt.
///
/// Cancellation and blank transcripts are deliberately *not* errors — they
/// resolve to [`CaptureOutcome::Discarded`] so no empty notes are created
/// and no noise reaches the user.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// Another capture or export attempt is in flight.
    #[error("A capture is already in progress")]
    Busy,

    /// The record-audio capability was denied, including after the one-shot
    /// prompt.  No retry is scheduled.
    #[error("Microphone permission is required for voice notes")]
    PermissionDenied,

    /// The speech engine reported itself unavailable; listening never
    /// started.
    #[error("Speech recognition not available on this device")]
    EngineUnavailable,

    /// The engine started but failed.
    #[error(transparent)]
    Engine(#[from] SpeechError),
}

/// Resolution of a successful capture attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureOutcome {
    /// A non-blank transcript was appended to the store.
    Captured(NoteEntry),
    /// The attempt ended without a note: cancelled, no match, or a blank
    /// transcript.  The store is unchanged.
    Discarded,
}

// ---------------------------------------------------------------------------
// ExportReceipt
// ---------------------------------------------------------------------------

/// Proof of a completed export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportReceipt {
    /// Resolved destination identifier — a path or display name from the
    /// sink.
    pub destination: String,
    /// Size of the rendered document.
    pub bytes_written: usize,
}

// ---------------------------------------------------------------------------
// Drop guards
// ---------------------------------------------------------------------------

/// Resets the capture state to `Idle` on drop.
///
/// Collaborator awaits happen while this guard is alive, so a `capture()`
/// future dropped mid-flight (timeout, task abort) still returns the
/// session to `Idle` instead of leaving it busy forever.  A cancelled
/// attempt must leave no trace.
struct StateGuard<'a> {
    state: &'a mut CaptureState,
}

impl<'a> StateGuard<'a> {
    fn new(state: &'a mut CaptureState) -> Self {
        Self { state }
    }

    fn set(&mut self, next: CaptureState) {
        *self.state = next;
    }
}

impl Drop for StateGuard<'_> {
    fn drop(&mut self) {
        *self.state = CaptureState::Idle;
    }
}

/// Clears the exporting flag on drop, so a dropped `export()` future
/// cannot wedge the session in a busy state either.
struct ExportGuard<'a> {
    flag: &'a mut bool,
}

impl<'a> ExportGuard<'a> {
    fn engage(flag: &'a mut bool) -> Self {
        *flag = true;
        Self { flag }
    }
}

impl Drop for ExportGuard<'_> {
    fn drop(&mut self) {
        *self.flag = false;
    }
}

// ---------------------------------------------------------------------------
// SessionController
// ---------------------------------------------------------------------------

/// Drives capture and export for one session.
///
/// Collaborators are held behind `Arc<dyn …>` so production code and tests
/// plug in freely.
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use voice_notes::export::DirectorySink;
/// use voice_notes::note::CaptureMode;
/// use voice_notes::permission::StaticPermissions;
/// use voice_notes::session::SessionController;
/// use voice_notes::speech::TypedSpeechEngine;
///
/// # async fn example() {
/// let mut session = SessionController::new(
///     CaptureMode::SingleBuffer,
///     Arc::new(StaticPermissions::granted()),
///     Arc::new(TypedSpeechEngine::new()),
///     Arc::new(DirectorySink::default_documents()),
/// );
///
/// let _ = session.capture().await;
/// let receipt = session.export().await;
/// # let _ = receipt;
/// # }
/// ```
pub struct SessionController {
    store: NoteStore,
    state: CaptureState,
    exporting: bool,
    permissions: Arc<dyn PermissionProvider>,
    engine: Arc<dyn SpeechEngine>,
    sink: Arc<dyn DestinationSink>,
    recognize: RecognizeConfig,
}

impl SessionController {
    /// Create a controller with an empty store for `mode`.
    pub fn new(
        mode: CaptureMode,
        permissions: Arc<dyn PermissionProvider>,
        engine: Arc<dyn SpeechEngine>,
        sink: Arc<dyn DestinationSink>,
    ) -> Self {
        Self {
            store: NoteStore::new(mode),
            state: CaptureState::Idle,
            exporting: false,
            permissions,
            engine,
            sink,
            recognize: RecognizeConfig::default(),
        }
    }

    /// Override the recognition parameters (language model, locale, prompt).
    pub fn with_recognize_config(mut self, recognize: RecognizeConfig) -> Self {
        self.recognize = recognize;
        self
    }

    /// Read-only view of the session's store — the display projection.
    pub fn store(&self) -> &NoteStore {
        &self.store
    }

    /// Current capture state.
    pub fn state(&self) -> CaptureState {
        self.state
    }

    // -----------------------------------------------------------------------
    // capture
    // -----------------------------------------------------------------------

    /// Run one capture attempt: permission check → listen → append.
    ///
    /// Silent resolutions (cancelled, no match, blank transcript) return
    /// `Ok(Discarded)`; the store grows only on `Ok(Captured(_))`.
    pub async fn capture(&mut self) -> Result<CaptureOutcome, CaptureError> {
        if self.state.is_busy() || self.exporting {
            return Err(CaptureError::Busy);
        }

        // All state changes go through the guard, which restores Idle on
        // drop — on every return path and when the future itself is
        // dropped mid-await.
        let mut state = StateGuard::new(&mut self.state);

        // ── Permission check ─────────────────────────────────────────────
        state.set(CaptureState::PermissionCheck);

        if !self.permissions.check_granted(Capability::RecordAudio) {
            log::debug!("capture: record-audio not granted, prompting once");
            if !self.permissions.request_grant(Capability::RecordAudio).await {
                log::warn!("capture: record-audio denied after prompt");
                return Err(CaptureError::PermissionDenied);
            }
        }

        // Availability is checked before Listening is ever entered.
        if !self.engine.is_available() {
            log::warn!("capture: speech engine unavailable");
            return Err(CaptureError::EngineUnavailable);
        }

        // ── Listening ────────────────────────────────────────────────────
        state.set(CaptureState::Listening);
        let outcome = self.engine.recognize(&self.recognize).await;
        drop(state);

        match outcome {
            Ok(RecognizeOutcome::Transcript(text)) => {
                let now = Local::now().naive_local();
                match NoteEntry::create(None, &text, now) {
                    Some(entry) => {
                        log::info!(
                            "capture: appended note {} ({} chars)",
                            entry.id(),
                            entry.content().len()
                        );
                        self.store.append(entry.clone());
                        Ok(CaptureOutcome::Captured(entry))
                    }
                    // Blank transcript — same silent resolution as a
                    // cancelled capture.
                    None => {
                        log::debug!("capture: blank transcript discarded");
                        Ok(CaptureOutcome::Discarded)
                    }
                }
            }
            Ok(RecognizeOutcome::Cancelled) => {
                log::debug!("capture: cancelled, no side effects");
                Ok(CaptureOutcome::Discarded)
            }
            Err(e) => {
                log::warn!("capture: engine error: {e}");
                Err(CaptureError::Engine(e))
            }
        }
    }

    // -----------------------------------------------------------------------
    // export
    // -----------------------------------------------------------------------

    /// Render the store and hand the document to the sink.
    ///
    /// Guarded only by emptiness and mutual exclusion — export is
    /// independent of the capture state machine.  The store is never
    /// modified, so a failed export can simply be retried; an unchanged
    /// store re-exports under a fresh timestamped file name each time.
    pub async fn export(&mut self) -> Result<ExportReceipt, ExportError> {
        if self.exporting || self.state.is_busy() {
            return Err(ExportError::Busy);
        }
        if self.store.is_empty() {
            return Err(ExportError::NothingToExport);
        }

        // Cleared on drop, so a dropped export future cannot leave the
        // session busy.
        let _exporting = ExportGuard::engage(&mut self.exporting);

        let now = Local::now().naive_local();

        // Render completes fully in memory before any write begins.
        let bytes = render(&self.store, &timestamp::human_token(&now))?;
        let file_name = format!("voice-notes-{}.md", timestamp::filename_token(&now));

        let destination = self.sink.write_document(&file_name, &bytes).await?;
        log::info!("export: {} bytes to {destination}", bytes.len());

        Ok(ExportReceipt {
            destination,
            bytes_written: bytes.len(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::SinkError;
    use crate::speech::MockSpeechEngine;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    // -----------------------------------------------------------------------
    // Test doubles
    // -----------------------------------------------------------------------

    /// Permission provider scripted as (check answer, prompt answer);
    /// counts how often the prompt fired.
    struct ScriptedPermissions {
        check: bool,
        grant: bool,
        prompts: AtomicUsize,
    }

    impl ScriptedPermissions {
        fn new(check: bool, grant: bool) -> Self {
            Self {
                check,
                grant,
                prompts: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl PermissionProvider for ScriptedPermissions {
        fn check_granted(&self, _capability: Capability) -> bool {
            self.check
        }

        async fn request_grant(&self, _capability: Capability) -> bool {
            self.prompts.fetch_add(1, Ordering::SeqCst);
            self.grant
        }
    }

    /// Sink that records every write.
    #[derive(Default)]
    struct RecordingSink {
        writes: Mutex<Vec<(String, Vec<u8>)>>,
    }

    #[async_trait]
    impl DestinationSink for RecordingSink {
        async fn write_document(
            &self,
            file_name: &str,
            bytes: &[u8],
        ) -> Result<String, SinkError> {
            self.writes
                .lock()
                .unwrap()
                .push((file_name.to_string(), bytes.to_vec()));
            Ok(format!("mem://{file_name}"))
        }
    }

    /// Engine that hangs on its first recognition and answers normally
    /// afterwards — stands in for a stuck host recognizer that the caller
    /// times out on.
    struct HangThenOkEngine {
        calls: AtomicUsize,
    }

    impl HangThenOkEngine {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl SpeechEngine for HangThenOkEngine {
        fn is_available(&self) -> bool {
            true
        }

        async fn recognize(
            &self,
            _config: &RecognizeConfig,
        ) -> Result<RecognizeOutcome, SpeechError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                std::future::pending::<()>().await;
            }
            Ok(RecognizeOutcome::Transcript("after the timeout".into()))
        }
    }

    /// Sink that hangs on its first write and succeeds afterwards.
    struct HangThenOkSink {
        calls: AtomicUsize,
    }

    impl HangThenOkSink {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl DestinationSink for HangThenOkSink {
        async fn write_document(
            &self,
            file_name: &str,
            _bytes: &[u8],
        ) -> Result<String, SinkError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                std::future::pending::<()>().await;
            }
            Ok(format!("mem://{file_name}"))
        }
    }

    /// Sink that always fails with an I/O error.
    struct FailingSink;

    #[async_trait]
    impl DestinationSink for FailingSink {
        async fn write_document(
            &self,
            file_name: &str,
            _bytes: &[u8],
        ) -> Result<String, SinkError> {
            Err(SinkError::Write {
                path: file_name.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
            })
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn controller(
        mode: CaptureMode,
        permissions: ScriptedPermissions,
        engine: MockSpeechEngine,
    ) -> SessionController {
        SessionController::new(
            mode,
            Arc::new(permissions),
            Arc::new(engine),
            Arc::new(RecordingSink::default()),
        )
    }

    fn granted() -> ScriptedPermissions {
        ScriptedPermissions::new(true, true)
    }

    // -----------------------------------------------------------------------
    // capture
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn capture_appends_a_note_on_transcript() {
        let mut session = controller(
            CaptureMode::SingleBuffer,
            granted(),
            MockSpeechEngine::ok("Buy milk"),
        );

        let outcome = session.capture().await.unwrap();
        match outcome {
            CaptureOutcome::Captured(entry) => assert_eq!(entry.content(), "Buy milk"),
            other => panic!("expected Captured, got {other:?}"),
        }
        assert!(!session.store().is_empty());
        assert_eq!(session.state(), CaptureState::Idle);
    }

    #[tokio::test]
    async fn cancelled_capture_is_a_silent_discard() {
        let mut session = controller(
            CaptureMode::SingleBuffer,
            granted(),
            MockSpeechEngine::cancelled(),
        );

        assert_eq!(session.capture().await.unwrap(), CaptureOutcome::Discarded);
        assert!(session.store().is_empty());
    }

    #[tokio::test]
    async fn blank_transcript_is_discarded_like_a_cancellation() {
        let mut session = controller(
            CaptureMode::SingleBuffer,
            granted(),
            MockSpeechEngine::ok("   \t "),
        );

        assert_eq!(session.capture().await.unwrap(), CaptureOutcome::Discarded);
        assert!(session.store().is_empty());
    }

    #[tokio::test]
    async fn denial_then_grant_proceeds_to_listening() {
        let mut session = controller(
            CaptureMode::SingleBuffer,
            ScriptedPermissions::new(false, true),
            MockSpeechEngine::ok("after prompt"),
        );

        let outcome = session.capture().await.unwrap();
        assert!(matches!(outcome, CaptureOutcome::Captured(_)));
    }

    #[tokio::test]
    async fn denial_after_prompt_is_terminal_for_the_attempt() {
        let permissions = Arc::new(ScriptedPermissions::new(false, false));
        let mut session = SessionController::new(
            CaptureMode::SingleBuffer,
            Arc::clone(&permissions) as Arc<dyn PermissionProvider>,
            Arc::new(MockSpeechEngine::ok("never heard")),
            Arc::new(RecordingSink::default()),
        );

        let err = session.capture().await.unwrap_err();
        assert!(matches!(err, CaptureError::PermissionDenied));
        // Exactly one prompt per attempt, never a scheduled retry.
        assert_eq!(permissions.prompts.load(Ordering::SeqCst), 1);
        assert!(session.store().is_empty());
        assert_eq!(session.state(), CaptureState::Idle);
    }

    #[tokio::test]
    async fn already_granted_permission_never_prompts() {
        let permissions = Arc::new(ScriptedPermissions::new(true, false));
        let mut session = SessionController::new(
            CaptureMode::SingleBuffer,
            Arc::clone(&permissions) as Arc<dyn PermissionProvider>,
            Arc::new(MockSpeechEngine::ok("note")),
            Arc::new(RecordingSink::default()),
        );

        session.capture().await.unwrap();
        assert_eq!(permissions.prompts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unavailable_engine_fails_before_listening() {
        let mut session = controller(
            CaptureMode::SingleBuffer,
            granted(),
            MockSpeechEngine::unavailable(),
        );

        let err = session.capture().await.unwrap_err();
        assert!(matches!(err, CaptureError::EngineUnavailable));
        assert_eq!(session.state(), CaptureState::Idle);
    }

    #[tokio::test]
    async fn engine_error_surfaces_and_leaves_store_untouched() {
        let mut session = controller(
            CaptureMode::SingleBuffer,
            granted(),
            MockSpeechEngine::err(SpeechError::Recognition("mic busy".into())),
        );

        let err = session.capture().await.unwrap_err();
        assert!(matches!(err, CaptureError::Engine(_)));
        assert!(session.store().is_empty());
        assert_eq!(session.state(), CaptureState::Idle);
    }

    #[tokio::test]
    async fn list_mode_captures_land_newest_first() {
        let mut session = controller(
            CaptureMode::NoteList,
            granted(),
            MockSpeechEngine::with_script(vec![
                Ok(RecognizeOutcome::Transcript("First".into())),
                Ok(RecognizeOutcome::Transcript("Second".into())),
            ]),
        );

        session.capture().await.unwrap();
        session.capture().await.unwrap();

        let contents: Vec<&str> = session.store().entries().map(|e| e.content()).collect();
        assert_eq!(contents, vec!["Second", "First"]);
    }

    // -----------------------------------------------------------------------
    // cancellation safety
    // -----------------------------------------------------------------------

    /// A capture future dropped while the engine is listening must leave
    /// the session in `Idle` with an empty store — not wedged busy.
    #[tokio::test]
    async fn capture_dropped_mid_listen_leaves_session_usable() {
        let mut session = SessionController::new(
            CaptureMode::SingleBuffer,
            Arc::new(granted()),
            Arc::new(HangThenOkEngine::new()),
            Arc::new(RecordingSink::default()),
        );

        let timed_out =
            tokio::time::timeout(std::time::Duration::from_millis(20), session.capture()).await;
        assert!(timed_out.is_err(), "hanging engine must not resolve");

        // The dropped attempt leaves no trace.
        assert_eq!(session.state(), CaptureState::Idle);
        assert!(session.store().is_empty());

        // And the next attempt is accepted, not rejected as busy.
        let outcome = session.capture().await.unwrap();
        match outcome {
            CaptureOutcome::Captured(entry) => {
                assert_eq!(entry.content(), "after the timeout")
            }
            other => panic!("expected Captured, got {other:?}"),
        }
    }

    /// An export future dropped while the sink writes must clear the busy
    /// marker; the retry starts from a fresh, complete render.
    #[tokio::test]
    async fn export_dropped_mid_write_leaves_session_usable() {
        let mut session = SessionController::new(
            CaptureMode::SingleBuffer,
            Arc::new(granted()),
            Arc::new(MockSpeechEngine::ok("Hello")),
            Arc::new(HangThenOkSink::new()),
        );

        session.capture().await.unwrap();

        let timed_out =
            tokio::time::timeout(std::time::Duration::from_millis(20), session.export()).await;
        assert!(timed_out.is_err(), "hanging sink must not resolve");

        let receipt = session.export().await.expect("retry after dropped export");
        assert!(receipt.destination.starts_with("mem://voice-notes-"));
        assert!(!session.store().is_empty());
    }

    /// A capture future dropped during the permission prompt resets to
    /// `Idle` as well — the guard covers every await point.
    #[tokio::test]
    async fn capture_dropped_mid_prompt_resets_to_idle() {
        /// Prompt that never answers.
        struct HangingPrompt;

        #[async_trait]
        impl PermissionProvider for HangingPrompt {
            fn check_granted(&self, _capability: Capability) -> bool {
                false
            }

            async fn request_grant(&self, _capability: Capability) -> bool {
                std::future::pending::<()>().await;
                unreachable!()
            }
        }

        let mut session = SessionController::new(
            CaptureMode::SingleBuffer,
            Arc::new(HangingPrompt),
            Arc::new(MockSpeechEngine::ok("never heard")),
            Arc::new(RecordingSink::default()),
        );

        let timed_out =
            tokio::time::timeout(std::time::Duration::from_millis(20), session.capture()).await;
        assert!(timed_out.is_err());
        assert_eq!(session.state(), CaptureState::Idle);
    }

    // -----------------------------------------------------------------------
    // export
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn export_on_empty_store_never_contacts_the_sink() {
        let sink = Arc::new(RecordingSink::default());
        let mut session = SessionController::new(
            CaptureMode::SingleBuffer,
            Arc::new(granted()),
            Arc::new(MockSpeechEngine::cancelled()),
            Arc::clone(&sink) as Arc<dyn DestinationSink>,
        );

        let err = session.export().await.unwrap_err();
        assert!(matches!(err, ExportError::NothingToExport));
        assert!(sink.writes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn export_writes_rendered_document_and_returns_receipt() {
        let sink = Arc::new(RecordingSink::default());
        let mut session = SessionController::new(
            CaptureMode::SingleBuffer,
            Arc::new(granted()),
            Arc::new(MockSpeechEngine::ok("Hello")),
            Arc::clone(&sink) as Arc<dyn DestinationSink>,
        );

        session.capture().await.unwrap();
        let receipt = session.export().await.unwrap();

        let writes = sink.writes.lock().unwrap();
        assert_eq!(writes.len(), 1);
        let (file_name, bytes) = &writes[0];

        assert!(file_name.starts_with("voice-notes-"));
        assert!(file_name.ends_with(".md"));
        // Filename token is filesystem-safe.
        assert!(!file_name.contains(':'));

        let text = String::from_utf8(bytes.clone()).unwrap();
        assert!(text.starts_with("# Voice Notes Export\n\n**Exported on:** "));
        assert!(text.contains("Hello"));
        assert!(text.ends_with('\n'));

        assert_eq!(receipt.destination, format!("mem://{file_name}"));
        assert_eq!(receipt.bytes_written, bytes.len());
    }

    #[tokio::test]
    async fn failed_export_preserves_the_store() {
        let mut session = SessionController::new(
            CaptureMode::SingleBuffer,
            Arc::new(granted()),
            Arc::new(MockSpeechEngine::ok("Hello")),
            Arc::new(FailingSink),
        );

        session.capture().await.unwrap();
        let before = session.store().clone();

        let err = session.export().await.unwrap_err();
        assert!(matches!(err, ExportError::Sink(_)));
        assert_eq!(session.store(), &before);

        // The attempt is re-triggerable; the controller is not stuck busy.
        assert!(matches!(
            session.export().await.unwrap_err(),
            ExportError::Sink(_)
        ));
    }

    #[tokio::test]
    async fn unchanged_store_re_exports_under_a_fresh_file_each_time() {
        let sink = Arc::new(RecordingSink::default());
        let mut session = SessionController::new(
            CaptureMode::SingleBuffer,
            Arc::new(granted()),
            Arc::new(MockSpeechEngine::ok("Hello")),
            Arc::clone(&sink) as Arc<dyn DestinationSink>,
        );

        session.capture().await.unwrap();
        session.export().await.unwrap();
        session.export().await.unwrap();

        let writes = sink.writes.lock().unwrap();
        assert_eq!(writes.len(), 2);
        // Identical content both times; the file name carries the timestamp.
        assert_eq!(writes[0].1, writes[1].1);
    }
}
