//! Shared data model for the delta-sampling core.
//!
//! A [`RawCounterSample`] is one timestamped reading of a family's monotonic
//! counters, keyed by component name. The same shape is persisted between
//! collection passes (see [`crate::stats::store`]) and diffed against the next
//! reading (see [`crate::stats::rate`]).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// CPU tick buckets of the aggregate `cpu ` line in `/proc/stat`, in file order.
pub const CPU_COMPONENTS: [&str; 8] = [
    "user", "nice", "system", "idle", "iowait", "irq", "softirq", "steal",
];

pub const BYTES_SENT: &str = "bytes_sent";
pub const BYTES_RECV: &str = "bytes_recv";

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricFamily {
    Cpu,
    Network,
}

impl MetricFamily {
    pub fn key(&self) -> &'static str {
        match self {
            MetricFamily::Cpu => "cpu",
            MetricFamily::Network => "network",
        }
    }
}

/// One timestamped reading of a family's monotonic counters.
///
/// Counter values are non-decreasing across observations of a live source;
/// a decrease means the source was reset (e.g. host reboot) and is handled
/// by the rate calculator, never trusted as a negative delta.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct RawCounterSample {
    pub family: MetricFamily,
    pub counters: BTreeMap<String, u64>,
    /// Wall-clock epoch seconds with sub-second resolution.
    pub timestamp: f64,
}

/// The most recently observed sample of a family, durably stored between
/// collection passes.
pub type PersistedSample = RawCounterSample;

impl RawCounterSample {
    pub fn new(family: MetricFamily, timestamp: f64) -> Self {
        Self {
            family,
            counters: BTreeMap::new(),
            timestamp,
        }
    }

    pub fn with_counter(mut self, name: &str, value: u64) -> Self {
        self.counters.insert(name.to_string(), value);
        self
    }

    /// Value of a named component, zero when the component is absent.
    pub fn counter(&self, name: &str) -> u64 {
        self.counters.get(name).copied().unwrap_or(0)
    }

    /// Sum over all components.
    pub fn total(&self) -> u64 {
        self.counters.values().sum()
    }
}

/// Current wall-clock time as epoch seconds with microsecond resolution.
pub fn now_timestamp() -> f64 {
    chrono::Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

/// The full response object for one collection pass.
///
/// Raw-numeric form: formatting is a client concern. `None` serializes as
/// `null` and means "unavailable this pass", which is distinct from zero.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Snapshot {
    pub timestamp: f64,
    pub cpu_percent: Option<f64>,
    pub uptime_seconds: Option<u64>,
    pub ram_percent: Option<f64>,
    pub ram_total_bytes: Option<u64>,
    pub ram_used_bytes: Option<u64>,
    pub cpu_temp_celsius: Option<f64>,
    pub net_upload_bps: Option<f64>,
    pub net_download_bps: Option<f64>,
    pub total_bytes_sent: Option<u64>,
    pub total_bytes_recv: Option<u64>,
    pub main_disk_percent: Option<f64>,
    pub main_disk_total_bytes: Option<u64>,
    pub main_disk_used_bytes: Option<u64>,
    pub usb_disk_percent: Option<f64>,
    pub usb_disk_total_bytes: Option<u64>,
    pub usb_disk_used_bytes: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_access() {
        let sample = RawCounterSample::new(MetricFamily::Cpu, 1.0)
            .with_counter("user", 100)
            .with_counter("idle", 400);

        assert_eq!(sample.counter("user"), 100);
        assert_eq!(sample.counter("steal"), 0);
        assert_eq!(sample.total(), 500);
    }

    #[test]
    fn test_persisted_sample_roundtrip() {
        let sample = RawCounterSample::new(MetricFamily::Network, 1722.5)
            .with_counter(BYTES_SENT, 1000)
            .with_counter(BYTES_RECV, 2000);

        let json = serde_json::to_string(&sample).unwrap();
        let back: PersistedSample = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sample);
    }

    #[test]
    fn test_unavailable_fields_serialize_as_null() {
        let snapshot = Snapshot {
            timestamp: 1.0,
            ram_percent: Some(42.0),
            ..Default::default()
        };

        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["cpu_percent"], serde_json::Value::Null);
        assert_eq!(value["ram_percent"], 42.0);
    }
}
