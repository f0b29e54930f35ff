//! proc-tracker — periodic resource sampling of named processes.
//!
//! Modular structure:
//! - [`collectors`] — Process table enumeration and per-process metrics (sysinfo, procfs)
//! - [`sample`] — CSV record formatting with the `n/a` sentinel
//! - [`storage`] — Per-name append-only CSV logs
//! - [`sampler`] — Poll cycle and loop
//! - [`error`] — Fatal conditions
//! - [`logging`] — Operational log stream

pub mod cli;
pub mod config;
pub mod collectors;
pub mod error;
pub mod logging;
pub mod sample;
pub mod sampler;
pub mod storage;

pub use config::TrackerConfig;
pub use collectors::{ProcessProbe, ProcessSource, SysinfoSource};
pub use error::FatalError;
pub use logging::StructuredLogger;
pub use sample::Sample;
pub use sampler::{CycleReport, Sampler};
pub use storage::SampleStore;
