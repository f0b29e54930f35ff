//! Operational log stream on stderr, via tracing.

mod format;

pub use format::StructuredLogger;
