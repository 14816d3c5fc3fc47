//! Display state machine of the dashboard.
//!
//! Results apply in arrival order. A failed poll blanks its own section to
//! the unavailable sentinel rather than keeping stale data on screen; the
//! one-shot loading flag hides after the first successful snapshot and never
//! comes back.

use crate::{
    collector::{interface::InterfaceInfo, process::ProcessInfo},
    stats::types::Snapshot,
};

pub struct DashboardState {
    loading: bool,
    pub snapshot: Option<Snapshot>,
    pub processes: Option<Vec<ProcessInfo>>,
    pub interfaces: Option<Vec<InterfaceInfo>>,
    pub processes_expanded: bool,
    pub interfaces_expanded: bool,
    pub last_error: Option<String>,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardState {
    pub fn new() -> Self {
        Self {
            loading: true,
            snapshot: None,
            processes: None,
            interfaces: None,
            processes_expanded: false,
            interfaces_expanded: false,
            last_error: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn apply_snapshot(&mut self, result: Result<Snapshot, String>) {
        match result {
            Ok(snapshot) => {
                self.loading = false;
                self.snapshot = Some(snapshot);
                self.last_error = None;
            }
            Err(error) => {
                self.snapshot = None;
                self.last_error = Some(error);
            }
        }
    }

    pub fn apply_processes(&mut self, result: Result<Vec<ProcessInfo>, String>) {
        self.processes = result.ok();
    }

    pub fn apply_interfaces(&mut self, result: Result<Vec<InterfaceInfo>, String>) {
        self.interfaces = result.ok();
    }

    /// Returns whether the section is expanded afterwards, i.e. whether its
    /// poll timer should be running.
    pub fn toggle_processes(&mut self) -> bool {
        self.processes_expanded = !self.processes_expanded;
        if !self.processes_expanded {
            self.processes = None;
        }
        self.processes_expanded
    }

    pub fn toggle_interfaces(&mut self) -> bool {
        self.interfaces_expanded = !self.interfaces_expanded;
        if !self.interfaces_expanded {
            self.interfaces = None;
        }
        self.interfaces_expanded
    }
}
