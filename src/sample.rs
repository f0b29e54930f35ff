//! One CSV record per (tracked name, matched process, cycle):
//! `time, cpu, mem_rss, mem_priv, disk_read, disk_write, net_in, net_out`.

use crate::collectors::{IoCounters, MemoryInfo, NetIoCounters};
use chrono::{DateTime, Local, SecondsFormat};

/// Written in place of any metric the facility could not provide.
pub const NOT_AVAILABLE: &str = "n/a";

pub const FIELD_COUNT: usize = 8;

#[derive(Debug, Clone)]
pub struct Sample {
    pub ts: DateTime<Local>,
    pub cpu_percent: f64,
    pub memory: Option<MemoryInfo>,
    pub disk: Option<IoCounters>,
    pub network: Option<NetIoCounters>,
}

fn or_na(value: Option<u64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| v.to_string())
}

impl Sample {
    /// Timestamp is taken now, at formatting time.
    pub fn now(
        cpu_percent: f64,
        memory: Option<MemoryInfo>,
        disk: Option<IoCounters>,
        network: Option<NetIoCounters>,
    ) -> Self {
        Self {
            ts: Local::now(),
            cpu_percent,
            memory,
            disk,
            network,
        }
    }

    pub fn fields(&self) -> [String; FIELD_COUNT] {
        [
            self.ts.to_rfc3339_opts(SecondsFormat::Secs, true),
            format!("{:.6}", self.cpu_percent),
            or_na(self.memory.map(|m| m.rss)),
            or_na(self.memory.map(|m| m.vms)),
            or_na(self.disk.map(|d| d.read_bytes)),
            or_na(self.disk.map(|d| d.write_bytes)),
            or_na(self.network.as_ref().map(|n| n.bytes_recv)),
            or_na(self.network.as_ref().map(|n| n.bytes_sent)),
        ]
    }

    pub fn to_csv_line(&self) -> String {
        self.fields().join(",")
    }
}
