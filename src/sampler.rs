//! The poll loop: enumerate, filter to tracked names, sample, append, sleep.

use crate::collectors::{ProcessProbe, ProcessSource};
use crate::config::TrackerConfig;
use crate::error::FatalError;
use crate::sample::Sample;
use crate::storage::SampleStore;
use std::convert::Infallible;
use std::time::Duration;
use tracing::{debug, info, warn};

/// What one cycle did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Enumerated processes whose name matched a tracked name
    pub matched: usize,
    /// Records actually appended (a write failure after open is not fatal)
    pub written: usize,
}

pub struct Sampler<S: ProcessSource> {
    source: S,
    tracked: Vec<String>,
    store: SampleStore,
    period: Duration,
}

impl<S: ProcessSource> Sampler<S> {
    /// Prepare the log directory. Fails if it cannot be created.
    pub fn new(source: S, tracked: Vec<String>, config: &TrackerConfig) -> Result<Self, FatalError> {
        let store = SampleStore::create(&config.log_dir).map_err(|source| FatalError::LogDir {
            path: config.log_dir.clone(),
            source,
        })?;
        Ok(Self {
            source,
            tracked,
            store,
            period: config.period(),
        })
    }

    pub fn store(&self) -> &SampleStore {
        &self.store
    }

    fn is_tracked(&self, name: &str) -> bool {
        self.tracked.iter().any(|t| t == name)
    }

    /// One full pass over the process table. A cycle that matches nothing is fatal.
    pub fn run_cycle(&self) -> Result<CycleReport, FatalError> {
        let procs = self.source.processes().map_err(FatalError::Enumerate)?;
        let mut report = CycleReport::default();

        for proc_ in &procs {
            let name = match proc_.name() {
                Ok(n) => n,
                Err(e) => {
                    debug!(pid = proc_.pid(), error = %e, "name lookup failed; skipping");
                    continue;
                }
            };
            if !self.is_tracked(&name) {
                continue;
            }
            report.matched += 1;
            if self.sample(proc_, &name)? {
                report.written += 1;
            }
        }

        if report.matched == 0 {
            return Err(FatalError::NoneFound);
        }
        Ok(report)
    }

    /// Sample one matched process into its log. Returns whether the record landed.
    fn sample(&self, proc_: &S::Process, name: &str) -> Result<bool, FatalError> {
        let pid = proc_.pid();
        let file = self.store.open(name).map_err(|source| FatalError::OpenLog {
            path: self.store.path_for(name),
            source,
        })?;

        let cpu = proc_.cpu_percent().map_err(|source| FatalError::Cpu {
            name: name.to_string(),
            pid,
            source,
        })?;

        let memory = proc_
            .memory_info()
            .map_err(|e| debug!(pid, error = %e, "memory unavailable"))
            .ok();
        let disk = proc_
            .io_counters()
            .map_err(|e| debug!(pid, error = %e, "disk counters unavailable"))
            .ok();
        let network = match proc_.net_io_counters(false) {
            Ok(counters) => {
                if counters.is_empty() {
                    debug!(pid, "no network interfaces reported");
                }
                counters.into_iter().next()
            }
            Err(e) => {
                debug!(pid, error = %e, "network counters unavailable");
                None
            }
        };

        let sample = Sample::now(cpu, memory, disk, network);
        info!(process = %name, pid, "{}", sample.to_csv_line());

        let path = file.path().to_path_buf();
        match file.write(&sample) {
            Ok(()) => Ok(true),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to append sample");
                Ok(false)
            }
        }
    }

    /// Cycle forever with a fixed delay after each cycle. Only returns on a fatal error.
    pub fn run(&self) -> Result<Infallible, FatalError> {
        let mut cycle: u64 = 0;
        loop {
            cycle += 1;
            let report = self.run_cycle()?;
            debug!(cycle, matched = report.matched, written = report.written, "cycle complete");
            if !self.period.is_zero() {
                std::thread::sleep(self.period);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collectors::mock::{MockProcess, MockSource};
    use crate::collectors::NetIoCounters;
    use crate::sample::{FIELD_COUNT, NOT_AVAILABLE};
    use std::path::Path;

    fn config(dir: &Path) -> TrackerConfig {
        TrackerConfig {
            log_dir: dir.join("logs"),
            period_secs: 0,
            ..TrackerConfig::default()
        }
    }

    fn sampler(dir: &Path, tracked: &[&str], cycles: Vec<Vec<MockProcess>>) -> Sampler<MockSource> {
        let tracked = tracked.iter().map(|s| s.to_string()).collect();
        Sampler::new(MockSource::new(cycles), tracked, &config(dir)).unwrap()
    }

    fn lines(path: &Path) -> Vec<Vec<String>> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|l| l.split(',').map(String::from).collect())
            .collect()
    }

    #[test]
    fn new_creates_log_dir() {
        let dir = tempfile::tempdir().unwrap();
        let s = sampler(dir.path(), &["alpha"], vec![]);
        assert!(s.store().dir().is_dir());
    }

    #[cfg(unix)]
    #[test]
    fn log_dir_creation_failure_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("logs");
        std::fs::write(&blocker, "file in the way").unwrap();
        let err = Sampler::new(MockSource::default(), vec![], &config(dir.path()))
            .err()
            .unwrap();
        assert!(matches!(err, FatalError::LogDir { .. }));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn writes_one_line_per_match() {
        let dir = tempfile::tempdir().unwrap();
        let s = sampler(
            dir.path(),
            &["alpha", "beta"],
            vec![vec![
                MockProcess::named("alpha"),
                MockProcess::named("gamma").with_pid(2),
                MockProcess::named("beta").with_pid(3),
            ]],
        );
        let report = s.run_cycle().unwrap();
        assert_eq!(report, CycleReport { matched: 2, written: 2 });

        let alpha = lines(&s.store().path_for("alpha"));
        assert_eq!(alpha.len(), 1);
        assert_eq!(alpha[0].len(), FIELD_COUNT);
        assert_eq!(&alpha[0][1..], ["12.500000", "4096", "8192", "100", "200", "300", "400"]);
        assert!(!s.store().path_for("gamma").exists());
    }

    #[test]
    fn same_name_instances_share_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let s = sampler(
            dir.path(),
            &["worker"],
            vec![vec![
                MockProcess::named("worker").with_pid(10),
                MockProcess::named("worker").with_pid(11),
            ]],
        );
        assert_eq!(s.run_cycle().unwrap().matched, 2);
        assert_eq!(lines(&s.store().path_for("worker")).len(), 2);
    }

    #[test]
    fn duplicate_tracked_names_do_not_double_write() {
        let dir = tempfile::tempdir().unwrap();
        let s = sampler(dir.path(), &["alpha", "alpha"], vec![vec![MockProcess::named("alpha")]]);
        s.run_cycle().unwrap();
        assert_eq!(lines(&s.store().path_for("alpha")).len(), 1);
    }

    #[test]
    fn matching_is_case_sensitive() {
        let dir = tempfile::tempdir().unwrap();
        let s = sampler(dir.path(), &["Alpha"], vec![vec![MockProcess::named("alpha")]]);
        assert!(matches!(s.run_cycle(), Err(FatalError::NoneFound)));
    }

    #[test]
    fn nothing_found_is_fatal_without_touching_files() {
        let dir = tempfile::tempdir().unwrap();
        let s = sampler(dir.path(), &[], vec![vec![]]);
        assert!(matches!(s.run_cycle(), Err(FatalError::NoneFound)));
        assert_eq!(std::fs::read_dir(s.store().dir()).unwrap().count(), 0);
    }

    #[test]
    fn unresolvable_names_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let s = sampler(
            dir.path(),
            &["alpha"],
            vec![vec![MockProcess::unnamed(), MockProcess::named("alpha").with_pid(5)]],
        );
        assert_eq!(s.run_cycle().unwrap().matched, 1);
    }

    #[test]
    fn cpu_failure_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let s = sampler(
            dir.path(),
            &["alpha", "beta"],
            vec![vec![MockProcess::named("alpha").without_cpu(), MockProcess::named("beta")]],
        );
        match s.run_cycle() {
            Err(FatalError::Cpu { name, .. }) => assert_eq!(name, "alpha"),
            other => panic!("expected cpu failure, got {:?}", other),
        }
        assert!(!s.store().path_for("beta").exists());
    }

    #[test]
    fn soft_failures_degrade_their_own_fields() {
        let dir = tempfile::tempdir().unwrap();
        let s = sampler(
            dir.path(),
            &["mem", "disk", "net"],
            vec![vec![
                MockProcess::named("mem").without_memory(),
                MockProcess::named("disk").without_disk(),
                MockProcess::named("net").without_net(),
            ]],
        );
        assert_eq!(s.run_cycle().unwrap().written, 3);

        let mem = &lines(&s.store().path_for("mem"))[0];
        assert_eq!(&mem[2..4], [NOT_AVAILABLE, NOT_AVAILABLE]);
        assert_eq!(&mem[4..], ["100", "200", "300", "400"]);

        let disk = &lines(&s.store().path_for("disk"))[0];
        assert_eq!(&disk[4..6], [NOT_AVAILABLE, NOT_AVAILABLE]);
        assert_eq!(&disk[2..4], ["4096", "8192"]);

        let net = &lines(&s.store().path_for("net"))[0];
        assert_eq!(&net[6..], [NOT_AVAILABLE, NOT_AVAILABLE]);
        assert_eq!(net[1], "12.500000");
    }

    #[test]
    fn empty_interface_list_is_not_available() {
        let dir = tempfile::tempdir().unwrap();
        let s = sampler(dir.path(), &["alpha"], vec![vec![MockProcess::named("alpha").with_net(vec![])]]);
        s.run_cycle().unwrap();
        let row = &lines(&s.store().path_for("alpha"))[0];
        assert_eq!(&row[6..], [NOT_AVAILABLE, NOT_AVAILABLE]);
    }

    #[test]
    fn only_first_interface_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let net = vec![
            NetIoCounters { name: "eth0".into(), bytes_recv: 1, bytes_sent: 2 },
            NetIoCounters { name: "eth1".into(), bytes_recv: 3, bytes_sent: 4 },
        ];
        let s = sampler(dir.path(), &["alpha"], vec![vec![MockProcess::named("alpha").with_net(net)]]);
        s.run_cycle().unwrap();
        let row = &lines(&s.store().path_for("alpha"))[0];
        assert_eq!(&row[6..], ["1", "2"]);
    }

    #[test]
    fn enumeration_failure_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let s = Sampler::new(MockSource::failing(), vec!["alpha".into()], &config(dir.path())).unwrap();
        assert!(matches!(s.run_cycle(), Err(FatalError::Enumerate(_))));
    }

    #[test]
    fn run_stops_on_first_empty_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let s = sampler(
            dir.path(),
            &["alpha"],
            vec![vec![MockProcess::named("alpha")], vec![MockProcess::named("alpha")], vec![]],
        );
        let err = s.run().unwrap_err();
        assert!(matches!(err, FatalError::NoneFound));
        assert_eq!(s.source.calls(), 3);
        assert_eq!(lines(&s.store().path_for("alpha")).len(), 2);
    }
}
