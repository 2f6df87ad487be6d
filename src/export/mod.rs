//! Export: Markdown rendering and destination sinks.
//!
//! Rendering ([`render`]) is pure and happens fully in memory; only a
//! complete document is ever handed to a [`DestinationSink`].  The sink
//! reports back the resolved destination identifier, which the session
//! controller surfaces to the caller.

pub mod renderer;
pub mod sink;

pub use renderer::{render, ExportError};
pub use sink::{DestinationSink, DirectorySink, SinkError, EXPORT_DIR_NAME, MARKDOWN_MIME};
