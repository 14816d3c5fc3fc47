//! Cancellable fixed-interval repeating task.
//!
//! The tick cadence is independent of poll completion: every tick spawns the
//! poll as its own task, so a stuck call cannot block future ones (callers
//! bound each poll with a timeout). Start while running and stop while
//! stopped are no-ops, which makes rapid toggling safe: there is never more
//! than one live timer per task.

use std::{future::Future, time::Duration};

use tokio::{task::JoinHandle, time::MissedTickBehavior};
use tracing::*;

pub struct RepeatingTask {
    name: &'static str,
    handle: Option<JoinHandle<()>>,
}

impl RepeatingTask {
    pub fn new(name: &'static str) -> Self {
        Self { name, handle: None }
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Start ticking: once immediately, then every `period`. No-op while
    /// already running.
    pub fn start<F, Fut>(&mut self, period: Duration, mut poll: F)
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        if self.is_running() {
            debug!("{:?} timer is already running", self.name);
            return;
        }

        self.handle = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                tokio::spawn(poll());
            }
        }));
    }

    /// Stop ticking. Polls already in flight finish on their own and their
    /// results apply on arrival. No-op while already stopped.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            debug!("Stopping {:?} timer", self.name);
            handle.abort();
        }
    }
}

impl Drop for RepeatingTask {
    fn drop(&mut self) {
        self.stop();
    }
}
