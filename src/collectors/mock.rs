//! Scripted metrics facility for tests: each `processes()` call pops the next
//! cycle's process list; once the script runs out, the table is empty.

use super::{IoCounters, MemoryInfo, MetricError, NetIoCounters, ProcessProbe, ProcessSource};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// A fake process. `None` in any metric makes that accessor fail.
#[derive(Debug, Clone)]
pub struct MockProcess {
    pub pid: u32,
    pub name: Option<String>,
    pub cpu: Option<f64>,
    pub memory: Option<MemoryInfo>,
    pub disk: Option<IoCounters>,
    pub net: Option<Vec<NetIoCounters>>,
}

impl MockProcess {
    /// A process with every metric available.
    pub fn named(name: &str) -> Self {
        Self {
            pid: 1,
            name: Some(name.to_string()),
            cpu: Some(12.5),
            memory: Some(MemoryInfo { rss: 4096, vms: 8192 }),
            disk: Some(IoCounters { read_bytes: 100, write_bytes: 200 }),
            net: Some(vec![NetIoCounters {
                name: "all".to_string(),
                bytes_recv: 300,
                bytes_sent: 400,
            }]),
        }
    }

    /// A process whose name cannot be resolved.
    pub fn unnamed() -> Self {
        Self {
            name: None,
            ..Self::named("")
        }
    }

    pub fn with_pid(mut self, pid: u32) -> Self {
        self.pid = pid;
        self
    }

    pub fn without_cpu(mut self) -> Self {
        self.cpu = None;
        self
    }

    pub fn without_memory(mut self) -> Self {
        self.memory = None;
        self
    }

    pub fn without_disk(mut self) -> Self {
        self.disk = None;
        self
    }

    pub fn without_net(mut self) -> Self {
        self.net = None;
        self
    }

    pub fn with_net(mut self, net: Vec<NetIoCounters>) -> Self {
        self.net = Some(net);
        self
    }
}

fn unavailable(pid: u32) -> MetricError {
    MetricError::Gone { pid }
}

impl ProcessProbe for MockProcess {
    fn pid(&self) -> u32 {
        self.pid
    }

    fn name(&self) -> Result<String, MetricError> {
        self.name.clone().ok_or_else(|| unavailable(self.pid))
    }

    fn cpu_percent(&self) -> Result<f64, MetricError> {
        self.cpu.ok_or_else(|| unavailable(self.pid))
    }

    fn memory_info(&self) -> Result<MemoryInfo, MetricError> {
        self.memory.ok_or_else(|| unavailable(self.pid))
    }

    fn io_counters(&self) -> Result<IoCounters, MetricError> {
        self.disk.ok_or_else(|| unavailable(self.pid))
    }

    fn net_io_counters(&self, _per_interface: bool) -> Result<Vec<NetIoCounters>, MetricError> {
        self.net.clone().ok_or_else(|| unavailable(self.pid))
    }
}

#[derive(Default)]
pub struct MockSource {
    cycles: Mutex<VecDeque<Vec<MockProcess>>>,
    calls: AtomicUsize,
    fail_enumeration: bool,
}

impl MockSource {
    pub fn new(cycles: Vec<Vec<MockProcess>>) -> Self {
        Self {
            cycles: Mutex::new(cycles.into()),
            ..Self::default()
        }
    }

    /// A source whose enumeration always fails.
    pub fn failing() -> Self {
        Self {
            fail_enumeration: true,
            ..Self::default()
        }
    }

    /// Number of enumerations performed so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ProcessSource for MockSource {
    type Process = MockProcess;

    fn processes(&self) -> Result<Vec<MockProcess>, MetricError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_enumeration {
            return Err(MetricError::Unsupported("process enumeration"));
        }
        let mut cycles = self
            .cycles
            .lock()
            .map_err(|_| std::io::Error::from(std::io::ErrorKind::Other))?;
        Ok(cycles.pop_front().unwrap_or_default())
    }
}
