use std::time::{Duration, Instant};

use super::{Clock, Scheduler, Task, TaskHandle, TimerQueue};

/// Scheduler on the wall clock. Sleeps the thread until the next deadline.
///
/// Deadlines are best effort: a late wake-up runs the task late, and the next
/// run is measured from the late one, so spacing never drops below the
/// interval.
pub struct RealtimeScheduler {
    origin: Instant,
    queue: TimerQueue,
}

impl Default for RealtimeScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl RealtimeScheduler {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            queue: TimerQueue::default(),
        }
    }

    /// Run tasks until none are left.
    pub fn run_until_idle(&mut self) {
        while self.run_next() {}
    }
}

impl Clock for RealtimeScheduler {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

impl Scheduler for RealtimeScheduler {
    fn schedule_repeating(&mut self, interval_ms: f64, task: Box<dyn Task>) -> TaskHandle {
        let now = self.now_ms();
        self.queue.insert(now, interval_ms, task)
    }

    fn cancel(&mut self, handle: TaskHandle) -> bool {
        self.queue.remove(handle)
    }

    fn is_scheduled(&self, handle: TaskHandle) -> bool {
        self.queue.contains(handle)
    }

    fn run_next(&mut self) -> bool {
        if self.queue.is_empty() {
            return false;
        }
        let Some(deadline) = self.queue.next_deadline() else {
            return false;
        };
        let now = self.now_ms();
        if deadline > now {
            std::thread::sleep(Duration::from_secs_f64((deadline - now) / 1000.0));
        }
        let now = self.now_ms();
        self.queue.run_due(now);
        true
    }
}
