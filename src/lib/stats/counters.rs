//! Raw monotonic counter reading from procfs.
//!
//! The aggregate `cpu ` line of `/proc/stat` provides the system-wide tick
//! buckets; `/proc/net/dev` provides per-interface byte counters, which are
//! summed across everything except the loopback interface. Timestamps are
//! captured immediately before each read so the pair stays consistent.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};

use super::types::{self, MetricFamily, RawCounterSample, BYTES_RECV, BYTES_SENT};

/// A reader of raw monotonic counters, one sample per call.
pub trait CounterSource: Send + Sync {
    fn read_cpu_counters(&self) -> Result<RawCounterSample>;
    fn read_network_counters(&self) -> Result<RawCounterSample>;
}

/// The production source, backed by the kernel's procfs.
pub struct ProcfsCounterSource {
    root: PathBuf,
}

impl Default for ProcfsCounterSource {
    fn default() -> Self {
        Self::new("/proc")
    }
}

impl ProcfsCounterSource {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

impl CounterSource for ProcfsCounterSource {
    fn read_cpu_counters(&self) -> Result<RawCounterSample> {
        let timestamp = types::now_timestamp();
        let path = self.root.join("stat");
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed reading {path:?}"))?;
        parse_proc_stat(&content, timestamp)
            .ok_or_else(|| anyhow!("No aggregate cpu line in {path:?}"))
    }

    fn read_network_counters(&self) -> Result<RawCounterSample> {
        let timestamp = types::now_timestamp();
        let path = self.root.join("net/dev");
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed reading {path:?}"))?;
        Ok(parse_proc_net_dev(&content, timestamp))
    }
}

/// Parse the aggregate `cpu ` line of `/proc/stat` into a CPU sample.
///
/// The line carries up to ten tick buckets; the first eight
/// (user nice system idle iowait irq softirq steal) take part in the usage
/// formula, guest buckets are ignored. Returns `None` when the line is
/// missing or too short to carry an idle bucket.
fn parse_proc_stat(content: &str, timestamp: f64) -> Option<RawCounterSample> {
    let line = content.lines().find(|line| line.starts_with("cpu "))?;
    let values: Vec<u64> = line
        .split_whitespace()
        .skip(1)
        .filter_map(|field| field.parse().ok())
        .collect();
    if values.len() < 4 {
        return None;
    }

    let mut sample = RawCounterSample::new(MetricFamily::Cpu, timestamp);
    for (name, value) in types::CPU_COMPONENTS.iter().zip(values) {
        sample.counters.insert(name.to_string(), value);
    }
    Some(sample)
}

/// Parse `/proc/net/dev` into a network sample, summing receive and transmit
/// byte counters across all interfaces except `lo`.
///
/// A file with no eligible interfaces still yields a valid zero-sum sample:
/// "no interfaces" is zero throughput, not missing data.
fn parse_proc_net_dev(content: &str, timestamp: f64) -> RawCounterSample {
    let mut bytes_sent: u64 = 0;
    let mut bytes_recv: u64 = 0;

    for line in content.lines() {
        let Some((name, counters)) = line.split_once(':') else {
            continue; // header lines
        };
        if name.trim() == "lo" {
            continue;
        }

        let fields: Vec<&str> = counters.split_whitespace().collect();
        // receive bytes is the first column, transmit bytes the ninth
        let recv = fields.first().and_then(|field| field.parse::<u64>().ok());
        let sent = fields.get(8).and_then(|field| field.parse::<u64>().ok());
        if let (Some(recv), Some(sent)) = (recv, sent) {
            bytes_recv = bytes_recv.saturating_add(recv);
            bytes_sent = bytes_sent.saturating_add(sent);
        }
    }

    RawCounterSample::new(MetricFamily::Network, timestamp)
        .with_counter(BYTES_SENT, bytes_sent)
        .with_counter(BYTES_RECV, bytes_recv)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROC_STAT: &str = "\
cpu  4705 150 1120 16250 520 30 45 10 0 0
cpu0 2350 75 560 8125 260 15 22 5 0 0
cpu1 2355 75 560 8125 260 15 23 5 0 0
intr 114930548 113199788 3 0 5 263 0 4 [...]
ctxt 1990473
btime 1062191376
";

    const PROC_NET_DEV: &str = "\
Inter-|   Receive                                                |  Transmit
 face |bytes    packets errs drop fifo frame compressed multicast|bytes    packets errs drop fifo colls carrier compressed
    lo:  999999    1000    0    0    0     0          0         0   999999    1000    0    0    0     0       0          0
  eth0: 1500000   12000    0    0    0     0          0         0   500000    8000    0    0    0     0       0          0
 wlan0:  250000    2100    0    0    0     0          0         0    24000     300    0    0    0     0       0          0
";

    #[test]
    fn test_parse_proc_stat_aggregate_line() {
        let sample = parse_proc_stat(PROC_STAT, 42.0).unwrap();

        assert_eq!(sample.family, MetricFamily::Cpu);
        assert_eq!(sample.timestamp, 42.0);
        assert_eq!(sample.counter("user"), 4705);
        assert_eq!(sample.counter("nice"), 150);
        assert_eq!(sample.counter("system"), 1120);
        assert_eq!(sample.counter("idle"), 16250);
        assert_eq!(sample.counter("iowait"), 520);
        assert_eq!(sample.counter("steal"), 10);
        // guest buckets are not carried
        assert_eq!(sample.counters.len(), 8);
    }

    #[test]
    fn test_parse_proc_stat_short_line() {
        // Ancient kernels report only four buckets.
        let sample = parse_proc_stat("cpu 10 20 30 40\n", 1.0).unwrap();
        assert_eq!(sample.counter("idle"), 40);
        assert_eq!(sample.counter("iowait"), 0);
        assert_eq!(sample.total(), 100);

        assert!(parse_proc_stat("cpu 10 20\n", 1.0).is_none());
        assert!(parse_proc_stat("intr 1 2 3\n", 1.0).is_none());
    }

    #[test]
    fn test_parse_proc_net_dev_sums_and_excludes_loopback() {
        let sample = parse_proc_net_dev(PROC_NET_DEV, 42.0);

        assert_eq!(sample.family, MetricFamily::Network);
        assert_eq!(sample.counter(BYTES_RECV), 1_750_000);
        assert_eq!(sample.counter(BYTES_SENT), 524_000);
    }

    #[test]
    fn test_parse_proc_net_dev_loopback_only_is_zero_sum() {
        let content = "\
Inter-|   Receive                                                |  Transmit
 face |bytes    packets errs drop fifo frame compressed multicast|bytes    packets errs drop fifo colls carrier compressed
    lo: 123456     100    0    0    0     0          0         0   123456     100    0    0    0     0       0          0
";
        let sample = parse_proc_net_dev(content, 1.0);
        assert_eq!(sample.counter(BYTES_SENT), 0);
        assert_eq!(sample.counter(BYTES_RECV), 0);
    }

    #[test]
    fn test_procfs_source_reads_fixture_tree() {
        use rand::Rng;
        use std::io::Write;

        let suffix: String = rand::thread_rng()
            .sample_iter(&rand::distributions::Alphanumeric)
            .take(12)
            .map(char::from)
            .collect();
        let root = std::env::temp_dir().join(format!("proc-fixture-{suffix}"));
        std::fs::create_dir_all(root.join("net")).unwrap();
        let mut stat = std::fs::File::create(root.join("stat")).unwrap();
        stat.write_all(PROC_STAT.as_bytes()).unwrap();
        let mut net = std::fs::File::create(root.join("net/dev")).unwrap();
        net.write_all(PROC_NET_DEV.as_bytes()).unwrap();

        let source = ProcfsCounterSource::new(&root);
        let cpu = source.read_cpu_counters().unwrap();
        assert_eq!(cpu.counter("user"), 4705);
        let network = source.read_network_counters().unwrap();
        assert_eq!(network.counter(BYTES_SENT), 524_000);
        assert!(network.timestamp >= cpu.timestamp);

        std::fs::remove_dir_all(&root).unwrap();
    }
}
