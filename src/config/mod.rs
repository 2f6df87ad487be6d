//! Configuration module for Voice Notes.
//!
//! Provides `AppConfig` (top-level settings), sub-configs for capture and
//! export, `AppPaths` for cross-platform data directories, and TOML
//! persistence via `AppConfig::load` / `AppConfig::save`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{AppConfig, CaptureConfig, ExportConfig};
