//! Speech engine collaborator interface.
//!
//! [`SpeechEngine`] is the pipeline's view of whatever actually performs
//! recognition — a platform recognizer, a terminal stand-in, or a test
//! mock.  It is object-safe and `Send + Sync` so it can be held behind an
//! `Arc<dyn SpeechEngine>`.
//!
//! Cancellation is a normal outcome ([`RecognizeOutcome::Cancelled`]), not
//! an error: the user backing out of a capture must leave no trace.  Errors
//! are reserved for genuine engine faults.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// SpeechError
// ---------------------------------------------------------------------------

/// Faults raised by a speech engine.
#[derive(Debug, Clone, Error)]
pub enum SpeechError {
    /// Recognition capability is missing on this host.  Callers should
    /// check [`SpeechEngine::is_available`] first; this covers engines that
    /// lose the capability between the check and the call.
    #[error("Speech recognition not available")]
    Unavailable,

    /// The engine started but failed mid-recognition.
    #[error("Speech recognition failed: {0}")]
    Recognition(String),
}

// ---------------------------------------------------------------------------
// RecognizeConfig
// ---------------------------------------------------------------------------

/// Language model hint passed to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LanguageModel {
    /// Free-form dictation — the model for note taking.
    FreeForm,
    /// Short web-search style queries.
    WebSearch,
}

impl Default for LanguageModel {
    fn default() -> Self {
        Self::FreeForm
    }
}

/// Per-request recognition parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct RecognizeConfig {
    /// Language model to bias recognition towards.
    pub language_model: LanguageModel,
    /// BCP-47 locale tag, or `None` for the system default.
    pub locale: Option<String>,
    /// User-facing prompt shown while the engine listens.
    pub prompt: String,
}

impl Default for RecognizeConfig {
    fn default() -> Self {
        Self {
            language_model: LanguageModel::FreeForm,
            locale: None,
            prompt: "Speak your note...".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// RecognizeOutcome
// ---------------------------------------------------------------------------

/// Successful completion of a recognition request.
#[derive(Debug, Clone, PartialEq)]
pub enum RecognizeOutcome {
    /// The engine heard something.  May still be blank — the controller
    /// discards blank transcripts without creating a note.
    Transcript(String),
    /// The user or the host cancelled the capture, or nothing matched.
    Cancelled,
}

// ---------------------------------------------------------------------------
// SpeechEngine trait
// ---------------------------------------------------------------------------

/// Object-safe, thread-safe interface to a speech recognizer.
///
/// # Contract
///
/// - `is_available` must be cheap; the controller calls it before every
///   capture attempt and never enters `Listening` when it returns `false`.
/// - `recognize` resolves to exactly one of: a transcript, `Cancelled`, or
///   an error.  No partial results, no retries.
#[async_trait]
pub trait SpeechEngine: Send + Sync {
    /// Whether recognition can be attempted at all right now.
    fn is_available(&self) -> bool;

    /// Perform one recognition request.
    async fn recognize(&self, config: &RecognizeConfig)
        -> Result<RecognizeOutcome, SpeechError>;
}

// Compile-time assertion: Box<dyn SpeechEngine> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn SpeechEngine>) {}
};

// ---------------------------------------------------------------------------
// MockSpeechEngine  (test-only)
// ---------------------------------------------------------------------------

/// A test double that replays a scripted sequence of recognition results.
#[cfg(test)]
pub struct MockSpeechEngine {
    available: bool,
    script: std::sync::Mutex<std::collections::VecDeque<Result<RecognizeOutcome, SpeechError>>>,
}

#[cfg(test)]
impl MockSpeechEngine {
    /// A mock that returns `Transcript(text)` once, then `Cancelled`.
    pub fn ok(text: impl Into<String>) -> Self {
        Self::with_script(vec![Ok(RecognizeOutcome::Transcript(text.into()))])
    }

    /// A mock that always reports cancellation.
    pub fn cancelled() -> Self {
        Self::with_script(vec![])
    }

    /// A mock that fails once with `error`, then reports `Cancelled`.
    pub fn err(error: SpeechError) -> Self {
        Self::with_script(vec![Err(error)])
    }

    /// A mock whose `is_available` is `false`.
    pub fn unavailable() -> Self {
        let mut mock = Self::with_script(vec![]);
        mock.available = false;
        mock
    }

    /// A mock that replays `script` in order, then reports `Cancelled`.
    pub fn with_script(script: Vec<Result<RecognizeOutcome, SpeechError>>) -> Self {
        Self {
            available: true,
            script: std::sync::Mutex::new(script.into()),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl SpeechEngine for MockSpeechEngine {
    fn is_available(&self) -> bool {
        self.available
    }

    async fn recognize(
        &self,
        _config: &RecognizeConfig,
    ) -> Result<RecognizeOutcome, SpeechError> {
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(RecognizeOutcome::Cancelled))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
