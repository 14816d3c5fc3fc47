//! Snapshot assembly: one collection pass per request.
//!
//! Per rate family the pass is read current → load previous → derive rate →
//! save current. The save happens after every successful read, present
//! previous sample or not, so the next pass always has a baseline. Collector
//! failures degrade their own fields to unavailable; assembly itself never
//! fails.

use std::sync::{Arc, Mutex};

use tracing::*;

use crate::{collector, settings};

use super::{
    counters::{CounterSource, ProcfsCounterSource},
    rate,
    store::{FileSampleStore, SampleStore},
    types::{self, MetricFamily, Snapshot, BYTES_RECV, BYTES_SENT},
};

/// The rate-family part of one pass, before collector merge.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RatePass {
    pub timestamp: f64,
    pub cpu_percent: Option<f64>,
    pub net_upload_bps: Option<f64>,
    pub net_download_bps: Option<f64>,
    pub total_bytes_sent: Option<u64>,
    pub total_bytes_recv: Option<u64>,
}

pub struct Manager {
    source: Box<dyn CounterSource>,
    store: Box<dyn SampleStore>,
}

lazy_static! {
    static ref MANAGER: Arc<Mutex<Option<Manager>>> = Default::default();
}

impl Manager {
    pub fn new(source: Box<dyn CounterSource>, store: Box<dyn SampleStore>) -> Self {
        Self { source, store }
    }

    /// Run the stateful half of a pass: both rate families, with the
    /// load→derive→save discipline applied per family.
    pub fn run_rate_pass(&self) -> RatePass {
        let mut pass = RatePass {
            timestamp: types::now_timestamp(),
            ..Default::default()
        };

        match self.source.read_cpu_counters() {
            Ok(current) => {
                let previous = self.store.load(MetricFamily::Cpu);
                pass.cpu_percent = previous
                    .as_ref()
                    .and_then(|previous| rate::cpu_usage_percent(previous, &current));
                self.store.save(&current);
            }
            Err(error) => warn!("Failed to read CPU counters: {error:#}"),
        }

        match self.source.read_network_counters() {
            Ok(current) => {
                let previous = self.store.load(MetricFamily::Network);
                if let Some(previous) = previous.as_ref() {
                    let rates = rate::network_rates(previous, &current);
                    pass.net_upload_bps = rates.upload_bps;
                    pass.net_download_bps = rates.download_bps;
                }
                pass.total_bytes_sent = Some(current.counter(BYTES_SENT));
                pass.total_bytes_recv = Some(current.counter(BYTES_RECV));
                self.store.save(&current);
            }
            Err(error) => warn!("Failed to read network counters: {error:#}"),
        }

        pass
    }

    /// One full pass: rate families merged with every point-in-time
    /// collector. Each collector failure leaves its own fields unavailable.
    pub fn snapshot(&self) -> Snapshot {
        let pass = self.run_rate_pass();
        let mut snapshot = Snapshot {
            timestamp: pass.timestamp,
            cpu_percent: pass.cpu_percent,
            net_upload_bps: pass.net_upload_bps,
            net_download_bps: pass.net_download_bps,
            total_bytes_sent: pass.total_bytes_sent,
            total_bytes_recv: pass.total_bytes_recv,
            ..Default::default()
        };

        if let Some(memory) = collector::memory::memory_usage() {
            snapshot.ram_percent = Some(memory.percent);
            snapshot.ram_total_bytes = Some(memory.total_bytes);
            snapshot.ram_used_bytes = Some(memory.used_bytes);
        }
        snapshot.uptime_seconds = collector::uptime::uptime_seconds();
        snapshot.cpu_temp_celsius = collector::temperature::cpu_temperature();

        for mount_point in settings::manager::mount_points() {
            let usage = collector::disk::disk_usage(&mount_point.path);
            match (mount_point.label.as_str(), usage) {
                ("main", Some(usage)) => {
                    snapshot.main_disk_percent = Some(usage.percent);
                    snapshot.main_disk_total_bytes = Some(usage.total_bytes);
                    snapshot.main_disk_used_bytes = Some(usage.used_bytes);
                }
                ("usb", Some(usage)) => {
                    snapshot.usb_disk_percent = Some(usage.percent);
                    snapshot.usb_disk_total_bytes = Some(usage.total_bytes);
                    snapshot.usb_disk_used_bytes = Some(usage.used_bytes);
                }
                (_, None) => {} // absent mount point, expected
                (label, Some(_)) => debug!("Mount point label {label:?} has no snapshot field"),
            }
        }

        snapshot
    }
}

// Construct our manager with the production source and store, should be done
// inside main after the settings manager
pub fn init() {
    init_with(
        Box::<ProcfsCounterSource>::default(),
        Box::new(FileSampleStore::new(settings::manager::samples_dir())),
    );
}

pub fn init_with(source: Box<dyn CounterSource>, store: Box<dyn SampleStore>) {
    *MANAGER.lock().unwrap() = Some(Manager::new(source, store));
}

pub fn snapshot() -> Snapshot {
    let manager = MANAGER.lock().unwrap();
    match manager.as_ref() {
        Some(manager) => manager.snapshot(),
        None => {
            warn!("Stats manager used before init, returning an empty snapshot");
            Snapshot {
                timestamp: types::now_timestamp(),
                ..Default::default()
            }
        }
    }
}
