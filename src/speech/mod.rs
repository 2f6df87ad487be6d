//! Speech recognition collaborator.
//!
//! The pipeline never talks to a recognizer directly — it goes through the
//! [`SpeechEngine`] trait.  This module provides the trait, its request and
//! outcome types, and [`TypedSpeechEngine`], the terminal stand-in used by
//! the CLI binary.

pub mod engine;
pub mod typed;

pub use engine::{LanguageModel, RecognizeConfig, RecognizeOutcome, SpeechEngine, SpeechError};
pub use typed::TypedSpeechEngine;

// test-only re-export so controller tests can import the mock directly.
#[cfg(test)]
pub use engine::MockSpeechEngine;
