//! Process table collector (cross-platform via sysinfo).

use super::{network, IoCounters, MemoryInfo, MetricError, NetIoCounters, ProcessProbe, ProcessSource};
use sysinfo::System;
use std::path::Path;
use std::sync::Mutex;

/// Linux truncates `comm` to 15 bytes.
const COMM_LEN: usize = 15;

/// Recover the full name of a process whose `comm` was truncated, from the base
/// name of `argv[0]` or of the executable, when it extends the short name.
pub fn full_name(short: &str, cmd: &[String], exe: Option<&Path>) -> String {
    if short.len() < COMM_LEN {
        return short.to_string();
    }
    let from_cmd = cmd.first().and_then(|arg0| Path::new(arg0).file_name());
    let from_exe = exe.and_then(|p| p.file_name());
    [from_cmd, from_exe]
        .into_iter()
        .flatten()
        .filter_map(|n| n.to_str())
        .find(|n| n.starts_with(short))
        .unwrap_or(short)
        .to_string()
}

/// Values captured from one sysinfo refresh
#[derive(Debug, Clone)]
pub struct ProcessSnapshot {
    pid: u32,
    name: String,
    cpu_percent: f32,
    memory: MemoryInfo,
    disk: IoCounters,
}

impl ProcessProbe for ProcessSnapshot {
    fn pid(&self) -> u32 {
        self.pid
    }

    fn name(&self) -> Result<String, MetricError> {
        if self.name.is_empty() {
            return Err(MetricError::Gone { pid: self.pid });
        }
        Ok(self.name.clone())
    }

    fn cpu_percent(&self) -> Result<f64, MetricError> {
        Ok(f64::from(self.cpu_percent))
    }

    fn memory_info(&self) -> Result<MemoryInfo, MetricError> {
        Ok(self.memory)
    }

    fn io_counters(&self) -> Result<IoCounters, MetricError> {
        Ok(self.disk)
    }

    fn net_io_counters(&self, per_interface: bool) -> Result<Vec<NetIoCounters>, MetricError> {
        network::process_net_io(self.pid, per_interface)
    }
}

pub struct SysinfoSource {
    sys: Mutex<System>,
}

impl Default for SysinfoSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SysinfoSource {
    pub fn new() -> Self {
        Self {
            sys: Mutex::new(System::new_all()),
        }
    }
}

impl ProcessSource for SysinfoSource {
    type Process = ProcessSnapshot;

    /// Refresh the process table and snapshot every process in it.
    /// CPU usage is relative to the previous refresh; for the first cycle that is
    /// the refresh done in `new`.
    fn processes(&self) -> Result<Vec<ProcessSnapshot>, MetricError> {
        let mut sys = self
            .sys
            .lock()
            .map_err(|_| std::io::Error::from(std::io::ErrorKind::Other))?;
        sys.refresh_processes();

        let snapshots = sys
            .processes()
            .iter()
            .map(|(pid, proc_)| {
                let disk = proc_.disk_usage();
                ProcessSnapshot {
                    pid: pid.as_u32(),
                    name: full_name(proc_.name(), proc_.cmd(), proc_.exe()),
                    cpu_percent: proc_.cpu_usage(),
                    memory: MemoryInfo {
                        rss: proc_.memory(),
                        vms: proc_.virtual_memory(),
                    },
                    disk: IoCounters {
                        read_bytes: disk.total_read_bytes,
                        write_bytes: disk.total_written_bytes,
                    },
                }
            })
            .collect();
        Ok(snapshots)
    }
}
