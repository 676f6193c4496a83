use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use approx::assert_abs_diff_eq;

use pulsecam_core::schedule::{
    Clock, ManualScheduler, RealtimeScheduler, Scheduler, Task, TaskStatus,
};

type Log = Rc<RefCell<Vec<(&'static str, f64)>>>;

fn logger(log: &Log, name: &'static str, runs: usize) -> Box<dyn Task> {
    let log = Rc::clone(log);
    let mut left = runs;
    Box::new(move |now: f64| {
        log.borrow_mut().push((name, now));
        left -= 1;
        if left == 0 {
            TaskStatus::Finished
        } else {
            TaskStatus::Continue
        }
    })
}

// ---------------------------------------------------------------------------
// ManualScheduler
// ---------------------------------------------------------------------------

#[test]
fn test_first_run_is_one_interval_out() {
    let log: Log = Rc::default();
    let mut scheduler = ManualScheduler::new();
    scheduler.schedule_repeating(50.0, logger(&log, "a", 3));

    scheduler.advance(49.0);
    assert!(log.borrow().is_empty());
    scheduler.advance(1.0);
    assert_eq!(*log.borrow(), vec![("a", 50.0)]);
}

#[test]
fn test_tasks_run_in_deadline_order() {
    let log: Log = Rc::default();
    let mut scheduler = ManualScheduler::new();
    scheduler.schedule_repeating(30.0, logger(&log, "slow", 10));
    scheduler.schedule_repeating(20.0, logger(&log, "fast", 10));

    scheduler.advance(60.0);
    assert_eq!(
        *log.borrow(),
        vec![
            ("fast", 20.0),
            ("slow", 30.0),
            ("fast", 40.0),
            ("slow", 60.0),
            ("fast", 60.0),
        ]
    );
}

#[test]
fn test_finished_task_is_dropped() {
    let log: Log = Rc::default();
    let mut scheduler = ManualScheduler::new();
    let handle = scheduler.schedule_repeating(10.0, logger(&log, "a", 3));
    assert!(scheduler.is_scheduled(handle));

    assert_eq!(scheduler.run_until_idle(100), 3);
    assert!(!scheduler.is_scheduled(handle));
    assert_eq!(scheduler.pending(), 0);
    assert!(!scheduler.run_next());
    assert_abs_diff_eq!(scheduler.now_ms(), 30.0);
}

#[test]
fn test_cancel_removes_task() {
    let log: Log = Rc::default();
    let mut scheduler = ManualScheduler::new();
    let a = scheduler.schedule_repeating(10.0, logger(&log, "a", 100));
    let b = scheduler.schedule_repeating(15.0, logger(&log, "b", 100));

    scheduler.advance(10.0);
    assert!(scheduler.cancel(a));
    assert!(!scheduler.cancel(a));
    scheduler.advance(40.0);

    let names: Vec<_> = log.borrow().iter().map(|(n, _)| *n).collect();
    assert_eq!(names, vec!["a", "b", "b", "b"]);
    assert!(scheduler.is_scheduled(b));
}

#[test]
fn test_run_until_idle_bounds_endless_task() {
    let mut scheduler = ManualScheduler::new();
    scheduler.schedule_repeating(5.0, Box::new(|_now: f64| TaskStatus::Continue));
    assert_eq!(scheduler.run_until_idle(10), 10);
    assert_eq!(scheduler.pending(), 1);
    assert_abs_diff_eq!(scheduler.now_ms(), 50.0);
}

#[test]
fn test_advance_moves_clock_without_tasks() {
    let mut scheduler = ManualScheduler::new();
    scheduler.advance(125.0);
    scheduler.advance(-5.0);
    assert_abs_diff_eq!(scheduler.now_ms(), 125.0);
    assert!(!scheduler.run_next());
}

#[test]
fn test_zero_interval_is_raised_to_minimum() {
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let mut scheduler = ManualScheduler::new();
    scheduler.schedule_repeating(0.0, logger(&log, "zero", 1_000));
    scheduler.advance(10.0);

    let times: Vec<f64> = log.borrow().iter().map(|&(_, t)| t).collect();
    assert_eq!(times, (1..=10).map(f64::from).collect::<Vec<_>>());
    assert_abs_diff_eq!(scheduler.now_ms(), 10.0);
}

#[test]
fn test_negative_and_nan_intervals_are_raised_to_minimum() {
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let mut scheduler = ManualScheduler::new();
    scheduler.schedule_repeating(-50.0, logger(&log, "negative", 3));
    scheduler.schedule_repeating(f64::NAN, logger(&log, "nan", 3));
    scheduler.advance(5.0);

    let log = log.borrow();
    assert_eq!(log.len(), 6);
    assert!(log.iter().all(|&(_, t)| t >= 1.0 && t <= 3.0));
}

#[test]
fn test_run_next_steps_one_deadline_at_a_time() {
    let log: Log = Rc::default();
    let mut scheduler = ManualScheduler::new();
    scheduler.schedule_repeating(10.0, logger(&log, "a", 3));
    let other: Log = Rc::default();
    scheduler.schedule_repeating(35.0, logger(&other, "b", 1));
    scheduler.run_next();
    scheduler.run_next();
    scheduler.run_next();
    scheduler.run_next();

    let times: Vec<f64> = log.borrow().iter().map(|(_, t)| *t).collect();
    assert_eq!(times, vec![10.0, 20.0, 30.0]);
    assert_eq!(*other.borrow(), vec![("b", 35.0)]);
}

// ---------------------------------------------------------------------------
// RealtimeScheduler
// ---------------------------------------------------------------------------

#[test]
fn test_realtime_waits_for_deadline() {
    let log: Log = Rc::default();
    let mut scheduler = RealtimeScheduler::new();
    let started = Instant::now();
    scheduler.schedule_repeating(20.0, logger(&log, "a", 2));
    scheduler.run_until_idle();

    assert_eq!(log.borrow().len(), 2);
    assert!(started.elapsed().as_millis() >= 40);
    assert!(scheduler.now_ms() >= 40.0);
}
