//! Progress reporting for long-running reasoner tasks

use parking_lot::Mutex;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Receives task lifecycle events from the materialization pipeline.
/// Calls arrive in `task_started` .. `task_stopped` pairs, never nested.
pub trait ProgressMonitor: Send + Sync {
    fn task_started(&self, name: &str);

    /// The current task is running but cannot report a fraction
    fn task_busy(&self) {}

    fn task_progressed(&self, _value: u64, _max: u64) {}

    fn task_stopped(&self);
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NullProgressMonitor;

impl ProgressMonitor for NullProgressMonitor {
    fn task_started(&self, _name: &str) {}

    fn task_stopped(&self) {}
}

/// Emits tracing events and keeps the elapsed time of each finished task
#[derive(Debug, Default)]
pub struct TracingProgressMonitor {
    current: Mutex<Option<(String, Instant)>>,
    finished: Mutex<Vec<(String, Duration)>>,
}

impl TracingProgressMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Finished tasks in completion order
    pub fn finished_tasks(&self) -> Vec<(String, Duration)> {
        self.finished.lock().clone()
    }

    pub fn task_names(&self) -> Vec<String> {
        self.finished.lock().iter().map(|(name, _)| name.clone()).collect()
    }
}

impl ProgressMonitor for TracingProgressMonitor {
    fn task_started(&self, name: &str) {
        info!(task = name, "reasoner task started");
        *self.current.lock() = Some((name.to_string(), Instant::now()));
    }

    fn task_busy(&self) {
        if let Some((name, _)) = self.current.lock().as_ref() {
            debug!(task = name.as_str(), "reasoner task busy");
        }
    }

    fn task_progressed(&self, value: u64, max: u64) {
        if let Some((name, _)) = self.current.lock().as_ref() {
            debug!(task = name.as_str(), value, max, "reasoner task progressed");
        }
    }

    fn task_stopped(&self) {
        if let Some((name, started)) = self.current.lock().take() {
            let elapsed = started.elapsed();
            info!(task = name.as_str(), elapsed_ms = elapsed.as_millis() as u64, "reasoner task stopped");
            self.finished.lock().push((name, elapsed));
        }
    }
}

/// Pairs `task_started` with `task_stopped`, including on early return
pub(crate) struct TaskGuard<'a> {
    monitor: &'a dyn ProgressMonitor,
}

impl<'a> TaskGuard<'a> {
    pub(crate) fn start(monitor: &'a dyn ProgressMonitor, name: &str) -> Self {
        monitor.task_started(name);
        monitor.task_busy();
        Self { monitor }
    }
}

impl Drop for TaskGuard<'_> {
    fn drop(&mut self) {
        self.monitor.task_stopped();
    }
}
