//! Conditions that end the tracker. `main` turns these into a process exit.

use crate::collectors::MetricError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FatalError {
    #[error("failed to create log directory {}: {source}", path.display())]
    LogDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to enumerate processes: {0}")]
    Enumerate(#[source] MetricError),

    #[error("open file failed: {}: {source}", path.display())]
    OpenLog {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("get CPU failed for {name} (pid {pid}): {source}")]
    Cpu {
        name: String,
        pid: u32,
        #[source]
        source: MetricError,
    },

    #[error("none of the provided processes were found")]
    NoneFound,
}

impl FatalError {
    /// Every fatal condition exits with status 1.
    pub fn exit_code(&self) -> i32 {
        1
    }
}
