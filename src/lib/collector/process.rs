use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use sysinfo::{PidExt, ProcessExt, System, SystemExt};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ProcessInfo {
    pub pid: u32,
    pub name: String,
    pub cpu_percent: f64,
    pub memory_percent: f64,
    pub cmdline: String,
}

lazy_static! {
    // Long-lived so sysinfo can diff per-process CPU times between
    // successive refreshes; the first request after start reports 0 %.
    static ref SYSTEM: Mutex<System> = Mutex::new(System::new());
}

/// Top `count` processes by CPU share, descending.
///
/// CPU is normalized by logical core count (100 % means the whole host),
/// memory is resident share of total RAM.
pub fn top_processes(count: usize) -> Vec<ProcessInfo> {
    let mut system = SYSTEM.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    system.refresh_cpu();
    system.refresh_memory();
    system.refresh_processes();

    let logical_cores = system.cpus().len().max(1) as f64;
    let total_memory = system.total_memory();

    let mut processes: Vec<ProcessInfo> = system
        .processes()
        .values()
        .map(|process| ProcessInfo {
            pid: process.pid().as_u32(),
            name: process.name().to_string(),
            cpu_percent: process.cpu_usage() as f64 / logical_cores,
            memory_percent: if total_memory > 0 {
                process.memory() as f64 / total_memory as f64 * 100.0
            } else {
                0.0
            },
            cmdline: process.cmd().join(" "),
        })
        .collect();

    processes.sort_by(|a, b| {
        b.cpu_percent
            .partial_cmp(&a.cpu_percent)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    processes.truncate(count);
    processes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_processes_is_bounded_and_sorted() {
        let processes = top_processes(10);
        assert!(processes.len() <= 10);
        assert!(!processes.is_empty(), "no processes on a live host?");

        for pair in processes.windows(2) {
            assert!(pair[0].cpu_percent >= pair[1].cpu_percent);
        }
        for process in &processes {
            assert!((0.0..=100.0).contains(&process.memory_percent));
        }
    }
}
