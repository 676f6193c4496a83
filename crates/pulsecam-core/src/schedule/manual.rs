use super::{Clock, Scheduler, Task, TaskHandle, TimerQueue};

/// Scheduler on a virtual clock that only moves when told to.
///
/// Runs are fully deterministic, which makes it the scheduler for tests and
/// for replaying a capture offline.
#[derive(Default)]
pub struct ManualScheduler {
    now_ms: f64,
    queue: TimerQueue,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward by `ms`, firing every deadline on the way.
    pub fn advance(&mut self, ms: f64) {
        let target = self.now_ms + ms.max(0.0);
        while let Some(deadline) = self.queue.next_deadline() {
            if deadline > target {
                break;
            }
            self.now_ms = self.now_ms.max(deadline);
            self.queue.run_due(self.now_ms);
        }
        self.now_ms = target;
    }

    /// Fire deadlines until no task is left. Stops after `max_steps` steps
    /// so a task that never finishes cannot hang the caller.
    pub fn run_until_idle(&mut self, max_steps: usize) -> usize {
        let mut steps = 0;
        while steps < max_steps && self.run_next() {
            steps += 1;
        }
        steps
    }

    pub fn pending(&self) -> usize {
        self.queue.entries.len()
    }
}

impl Clock for ManualScheduler {
    fn now_ms(&self) -> f64 {
        self.now_ms
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_repeating(&mut self, interval_ms: f64, task: Box<dyn Task>) -> TaskHandle {
        self.queue.insert(self.now_ms, interval_ms, task)
    }

    fn cancel(&mut self, handle: TaskHandle) -> bool {
        self.queue.remove(handle)
    }

    fn is_scheduled(&self, handle: TaskHandle) -> bool {
        self.queue.contains(handle)
    }

    fn run_next(&mut self) -> bool {
        let Some(deadline) = self.queue.next_deadline() else {
            return false;
        };
        self.now_ms = self.now_ms.max(deadline);
        self.queue.run_due(self.now_ms);
        true
    }
}
