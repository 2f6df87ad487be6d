//! Typed-input speech engine for the CLI binary.
//!
//! [`TypedSpeechEngine`] stands in for a real recognizer when running in a
//! terminal: it prints the recognition prompt and takes one typed line of
//! input as the "transcript".  An empty line or end-of-input counts as a
//! cancelled capture, mirroring a user backing out of a speech dialog.

use std::io::{BufRead, Write};

use async_trait::async_trait;

use super::engine::{RecognizeConfig, RecognizeOutcome, SpeechEngine, SpeechError};

/// Reads a line from stdin as the transcript.
///
/// Blocking terminal I/O runs on the tokio blocking pool so the async
/// runtime never stalls while the user types.
#[derive(Debug, Default)]
pub struct TypedSpeechEngine;

impl TypedSpeechEngine {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SpeechEngine for TypedSpeechEngine {
    fn is_available(&self) -> bool {
        true
    }

    async fn recognize(
        &self,
        config: &RecognizeConfig,
    ) -> Result<RecognizeOutcome, SpeechError> {
        let prompt = config.prompt.clone();

        let line = tokio::task::spawn_blocking(move || -> std::io::Result<Option<String>> {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            write!(out, "{prompt} ")?;
            out.flush()?;

            let stdin = std::io::stdin();
            let mut line = String::new();
            let read = stdin.lock().read_line(&mut line)?;
            // read == 0 means end-of-input.
            Ok((read > 0).then_some(line))
        })
        .await
        .map_err(|e| SpeechError::Recognition(format!("input task failed: {e}")))?
        .map_err(|e| SpeechError::Recognition(e.to_string()))?;

        match line {
            Some(text) if !text.trim().is_empty() => {
                Ok(RecognizeOutcome::Transcript(text.trim().to_string()))
            }
            _ => Ok(RecognizeOutcome::Cancelled),
        }
    }
}
