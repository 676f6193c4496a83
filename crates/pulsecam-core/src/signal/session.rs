use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, info};

use crate::pipeline::config::HeartRateConfig;
use crate::schedule::{Scheduler, TaskHandle, TaskStatus};
use crate::source::FrameSource;

use super::estimator::{estimate_heart_rate, BpmEstimate};
use super::live::LiveBeatTracker;
use super::sampler::RegionSampler;
use super::window::{ColorSample, SampleWindow};

/// Lifecycle of a measurement session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SessionStatus {
    Idle,
    Sampling,
    Complete(BpmEstimate),
    Cancelled,
}

struct SessionState {
    window: SampleWindow,
    live: LiveBeatTracker,
    started_at_ms: f64,
    status: SessionStatus,
}

/// One heart-rate measurement: a periodic sampling timer that fills a
/// [`SampleWindow`] for the session duration, then estimates once.
///
/// Restarting or cancelling stops the timer and throws the partial window
/// away; a cancelled session never produces an estimate.
pub struct MeasurementSession {
    config: HeartRateConfig,
    state: Rc<RefCell<SessionState>>,
    timer: Option<TaskHandle>,
}

impl MeasurementSession {
    pub fn new(config: HeartRateConfig) -> Self {
        let state = SessionState {
            window: SampleWindow::new(config.window_capacity),
            live: LiveBeatTracker::default(),
            started_at_ms: 0.0,
            status: SessionStatus::Idle,
        };
        Self {
            config,
            state: Rc::new(RefCell::new(state)),
            timer: None,
        }
    }

    /// Begin sampling `source`, cancelling any session already running.
    pub fn start<S, F>(&mut self, scheduler: &mut S, source: F)
    where
        S: Scheduler + ?Sized,
        F: FrameSource + 'static,
    {
        self.cancel(scheduler);

        let started_at_ms = scheduler.now_ms();
        // A fresh state per run: a stale timer can never write into it.
        self.state = Rc::new(RefCell::new(SessionState {
            window: SampleWindow::new(self.config.window_capacity),
            live: LiveBeatTracker::default(),
            started_at_ms,
            status: SessionStatus::Sampling,
        }));

        let state = Rc::clone(&self.state);
        let sampler = RegionSampler::from_config(&self.config);
        let config = self.config.clone();
        let duration_ms = config.session_duration_sec * 1000.0;

        let task = move |now_ms: f64| {
            let mut state = state.borrow_mut();
            if let Some(intensity) = sampler.sample(&source.capture_frame()) {
                let sample = ColorSample::new(now_ms, intensity);
                state.window.push(sample);
                if let Some(bpm) = state.live.push(sample) {
                    debug!(bpm, "Live beat rate updated");
                }
            }
            if now_ms - state.started_at_ms < duration_ms {
                return TaskStatus::Continue;
            }
            let estimate = estimate_heart_rate(&state.window, &config);
            info!(
                samples = state.window.len(),
                bpm = estimate.value,
                valid = estimate.valid,
                "Measurement session complete"
            );
            state.status = SessionStatus::Complete(estimate);
            TaskStatus::Finished
        };

        info!(
            interval_ms = self.config.sample_interval_ms,
            duration_sec = self.config.session_duration_sec,
            "Measurement session started"
        );
        self.timer = Some(scheduler.schedule_repeating(self.config.sample_interval_ms, Box::new(task)));
    }

    /// Stop sampling and discard the partial window. A completed session
    /// keeps its estimate.
    pub fn cancel<S: Scheduler + ?Sized>(&mut self, scheduler: &mut S) {
        if let Some(handle) = self.timer.take() {
            scheduler.cancel(handle);
        }
        let mut state = self.state.borrow_mut();
        if state.status == SessionStatus::Sampling {
            state.window.clear();
            state.live.reset();
            state.status = SessionStatus::Cancelled;
            info!("Measurement session cancelled");
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.state.borrow().status
    }

    /// The session estimate, once sampling has finished.
    pub fn estimate(&self) -> Option<BpmEstimate> {
        match self.status() {
            SessionStatus::Complete(estimate) => Some(estimate),
            _ => None,
        }
    }

    /// Running beat rate for display while sampling.
    pub fn live_bpm(&self) -> Option<u32> {
        self.state.borrow().live.bpm()
    }

    pub fn samples_collected(&self) -> usize {
        self.state.borrow().window.len()
    }

    /// Milliseconds of sampling left at `now_ms`, zero when not sampling.
    pub fn remaining_ms(&self, now_ms: f64) -> f64 {
        let state = self.state.borrow();
        if state.status != SessionStatus::Sampling {
            return 0.0;
        }
        let end = state.started_at_ms + self.config.session_duration_sec * 1000.0;
        (end - now_ms).max(0.0)
    }
}
