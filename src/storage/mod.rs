//! Append-only per-process CSV logs.

mod csv_log;

pub use csv_log::{SampleFile, SampleStore};
