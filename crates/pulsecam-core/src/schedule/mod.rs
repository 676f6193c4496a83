//! Cooperative timers for sampling, preview and composite draws.
//!
//! Everything runs on one thread. A task runs to completion each time it
//! fires and hands control back to the scheduler, which owns the clock.

use crate::consts::MIN_TIMER_INTERVAL_MS;

mod manual;
mod realtime;

pub use manual::ManualScheduler;
pub use realtime::RealtimeScheduler;

/// What a task wants after running.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskStatus {
    Continue,
    Finished,
}

/// Work run by a scheduler at a fixed interval.
pub trait Task {
    fn run(&mut self, now_ms: f64) -> TaskStatus;
}

impl<F> Task for F
where
    F: FnMut(f64) -> TaskStatus,
{
    fn run(&mut self, now_ms: f64) -> TaskStatus {
        self(now_ms)
    }
}

/// Identifies a scheduled task; used to cancel it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

pub trait Clock {
    /// Milliseconds since the clock's origin.
    fn now_ms(&self) -> f64;
}

pub trait Scheduler: Clock {
    /// Run `task` every `interval_ms`, first one interval from now, until it
    /// returns [`TaskStatus::Finished`] or is cancelled.
    fn schedule_repeating(&mut self, interval_ms: f64, task: Box<dyn Task>) -> TaskHandle;

    /// Drop a task. Returns false if it had already finished or was unknown.
    fn cancel(&mut self, handle: TaskHandle) -> bool;

    fn is_scheduled(&self, handle: TaskHandle) -> bool;

    /// Wait for the earliest deadline and run every task due by then.
    /// Returns false when nothing is scheduled.
    fn run_next(&mut self) -> bool;
}

struct Entry {
    handle: TaskHandle,
    interval_ms: f64,
    due_ms: f64,
    task: Box<dyn Task>,
    finished: bool,
}

/// Deadline bookkeeping shared by the scheduler implementations.
#[derive(Default)]
struct TimerQueue {
    entries: Vec<Entry>,
    next_id: u64,
}

impl TimerQueue {
    fn insert(&mut self, now_ms: f64, interval_ms: f64, task: Box<dyn Task>) -> TaskHandle {
        let handle = TaskHandle(self.next_id);
        self.next_id += 1;
        let interval_ms = if interval_ms.is_finite() {
            interval_ms.max(MIN_TIMER_INTERVAL_MS)
        } else {
            MIN_TIMER_INTERVAL_MS
        };
        self.entries.push(Entry {
            handle,
            interval_ms,
            due_ms: now_ms + interval_ms,
            task,
            finished: false,
        });
        handle
    }

    fn remove(&mut self, handle: TaskHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.handle != handle);
        self.entries.len() != before
    }

    fn contains(&self, handle: TaskHandle) -> bool {
        self.entries.iter().any(|e| e.handle == handle)
    }

    fn next_deadline(&self) -> Option<f64> {
        self.entries
            .iter()
            .map(|e| e.due_ms)
            .min_by(|a, b| a.total_cmp(b))
    }

    /// Run every task due at `now_ms`, earliest deadline first, ties in
    /// scheduling order. Each runs at most once per call.
    fn run_due(&mut self, now_ms: f64) -> usize {
        let mut due: Vec<usize> = (0..self.entries.len())
            .filter(|&i| self.entries[i].due_ms <= now_ms)
            .collect();
        due.sort_by(|&a, &b| {
            let (ea, eb) = (&self.entries[a], &self.entries[b]);
            ea.due_ms
                .total_cmp(&eb.due_ms)
                .then(ea.handle.0.cmp(&eb.handle.0))
        });

        for &i in &due {
            let entry = &mut self.entries[i];
            match entry.task.run(now_ms) {
                TaskStatus::Continue => entry.due_ms = now_ms + entry.interval_ms,
                TaskStatus::Finished => entry.finished = true,
            }
        }
        self.entries.retain(|e| !e.finished);
        due.len()
    }

    fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
