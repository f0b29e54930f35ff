//! Per-process network counters. On Linux these come from `/proc/<pid>/net/dev`,
//! i.e. the interfaces of the network namespace the process lives in.

use super::{MetricError, NetIoCounters};

/// Parse the `net/dev` table: two header lines, then `iface: rx_bytes ... tx_bytes ...`.
pub fn parse_net_dev(raw: &str) -> Result<Vec<NetIoCounters>, MetricError> {
    let mut out = Vec::new();
    for line in raw.lines().skip(2) {
        let Some((iface_raw, stats_raw)) = line.split_once(':') else {
            continue;
        };
        let fields: Vec<&str> = stats_raw.split_whitespace().collect();
        if fields.len() < 16 {
            return Err(MetricError::Parse {
                what: "net/dev",
                detail: format!("expected 16 columns, got {}: {}", fields.len(), line.trim()),
            });
        }
        let parse = |s: &str| {
            s.parse::<u64>().map_err(|e| MetricError::Parse {
                what: "net/dev",
                detail: format!("{}: {}", s, e),
            })
        };
        out.push(NetIoCounters {
            name: iface_raw.trim().to_string(),
            bytes_recv: parse(fields[0])?,
            bytes_sent: parse(fields[8])?,
        });
    }
    Ok(out)
}

/// Sum all interfaces into a single `all` entry. No interfaces means no entry.
pub fn combine(counters: &[NetIoCounters]) -> Vec<NetIoCounters> {
    if counters.is_empty() {
        return Vec::new();
    }
    let total = counters.iter().fold(
        NetIoCounters {
            name: "all".to_string(),
            bytes_recv: 0,
            bytes_sent: 0,
        },
        |mut acc, c| {
            acc.bytes_recv = acc.bytes_recv.saturating_add(c.bytes_recv);
            acc.bytes_sent = acc.bytes_sent.saturating_add(c.bytes_sent);
            acc
        },
    );
    vec![total]
}

#[cfg(target_os = "linux")]
pub fn process_net_io(pid: u32, per_interface: bool) -> Result<Vec<NetIoCounters>, MetricError> {
    let raw = std::fs::read_to_string(format!("/proc/{}/net/dev", pid))?;
    let counters = parse_net_dev(&raw)?;
    if per_interface {
        Ok(counters)
    } else {
        Ok(combine(&counters))
    }
}

#[cfg(not(target_os = "linux"))]
pub fn process_net_io(_pid: u32, _per_interface: bool) -> Result<Vec<NetIoCounters>, MetricError> {
    Err(MetricError::Unsupported("per-process network counters"))
}
