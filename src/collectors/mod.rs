//! Process metrics facility: enumeration plus per-process name, CPU, memory,
//! disk and network accessors. Each accessor fails independently.

mod process;
mod network;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

use thiserror::Error;

pub use process::{full_name, ProcessSnapshot, SysinfoSource};
pub use network::{combine, parse_net_dev, process_net_io};

/// Failure reported by the metrics facility for one query
#[derive(Debug, Error)]
pub enum MetricError {
    #[error("process {pid} is no longer available")]
    Gone { pid: u32 },

    #[error("{0} is not supported on this platform")]
    Unsupported(&'static str),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("malformed {what}: {detail}")]
    Parse { what: &'static str, detail: String },
}

/// Resident and virtual memory, in bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryInfo {
    pub rss: u64,
    pub vms: u64,
}

/// Cumulative disk bytes since process start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IoCounters {
    pub read_bytes: u64,
    pub write_bytes: u64,
}

/// Cumulative network bytes for one interface (or `all` when combined)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetIoCounters {
    pub name: String,
    pub bytes_recv: u64,
    pub bytes_sent: u64,
}

/// One process as seen during a single poll cycle
pub trait ProcessProbe {
    fn pid(&self) -> u32;
    fn name(&self) -> Result<String, MetricError>;
    fn cpu_percent(&self) -> Result<f64, MetricError>;
    fn memory_info(&self) -> Result<MemoryInfo, MetricError>;
    fn io_counters(&self) -> Result<IoCounters, MetricError>;
    /// `per_interface = false` asks for a single combined entry.
    fn net_io_counters(&self, per_interface: bool) -> Result<Vec<NetIoCounters>, MetricError>;
}

/// Enumerates the OS process table. Every call is a fresh enumeration.
pub trait ProcessSource {
    type Process: ProcessProbe;

    fn processes(&self) -> Result<Vec<Self::Process>, MetricError>;
}
