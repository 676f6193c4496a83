use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, info, warn};

use crate::error::{PulsecamError, Result};
use crate::filters::resize::{fit_within, resize_nearest};
use crate::frame::PixelBuffer;
use crate::model::{ApertureModel, ApertureValue, ExposureParams, Look};
use crate::schedule::{Scheduler, TaskHandle, TaskStatus};
use crate::source::FrameSource;
use crate::stack::accumulate::Accumulator;

use super::config::{ExposureConfig, PulsecamConfig, RenderConfig};
use super::develop::develop;
use super::types::{CompositePlan, CompositeStage, NoOpReporter, ProgressReporter};

/// Builds the final photo: a simulated long exposure of the live feed,
/// developed with the aperture's look.
#[derive(Clone, Debug)]
pub struct Compositor {
    model: ApertureModel,
    exposure: ExposureConfig,
    render: RenderConfig,
}

impl Compositor {
    pub fn new(config: &PulsecamConfig) -> Self {
        Self {
            model: ApertureModel::new(config.aperture.clone()),
            exposure: config.exposure.clone(),
            render: config.render.clone(),
        }
    }

    /// Exposure and look for a heart rate and aperture.
    pub fn plan(&self, bpm: f64, aperture: ApertureValue) -> CompositePlan {
        CompositePlan {
            aperture,
            bpm,
            exposure: ExposureParams::from_bpm(bpm, &self.exposure),
            look: self.model.look(aperture),
        }
    }

    /// Capture the first frame now and schedule the rest one frame interval
    /// apart. `aperture` is a snapshot: later dial changes do not affect this
    /// composite.
    ///
    /// Fails with [`PulsecamError::SourceUnavailable`] if the first frame is
    /// empty; the caller should fall back to a plain capture.
    pub fn start<S, F>(
        &self,
        scheduler: &mut S,
        source: F,
        bpm: f64,
        aperture: ApertureValue,
    ) -> Result<CompositeJob>
    where
        S: Scheduler + ?Sized,
        F: FrameSource + 'static,
    {
        self.start_reported(scheduler, source, bpm, aperture, Rc::new(NoOpReporter))
    }

    /// [`Compositor::start`] with progress reporting.
    pub fn start_reported<S, F>(
        &self,
        scheduler: &mut S,
        source: F,
        bpm: f64,
        aperture: ApertureValue,
        reporter: Rc<dyn ProgressReporter>,
    ) -> Result<CompositeJob>
    where
        S: Scheduler + ?Sized,
        F: FrameSource + 'static,
    {
        let plan = self.plan(bpm, aperture);
        let first = source.capture_frame();
        if first.is_empty() {
            warn!(
                width = first.width(),
                height = first.height(),
                "Frame source returned an empty frame, composite aborted"
            );
            return Err(PulsecamError::SourceUnavailable {
                width: first.width(),
                height: first.height(),
            });
        }

        let (width, height) = match self.render.capture_max_dimension {
            Some(max_dim) => fit_within(first.width(), first.height(), max_dim),
            None => (first.width(), first.height()),
        };
        info!(
            aperture = plan.aperture.get(),
            bpm = plan.bpm,
            duration_sec = plan.exposure.duration_sec,
            frames = plan.exposure.frame_count,
            blur_radius = plan.look.blur_radius,
            width,
            height,
            "Composite started"
        );

        reporter.begin_stage(
            CompositeStage::Accumulating,
            Some(plan.exposure.frame_count as usize),
        );
        let mut state = CompositeState {
            accumulator: Accumulator::new(width, height, plan.exposure.per_frame_weight),
            width,
            height,
            target: plan.exposure.frame_count as usize,
            look: plan.look,
            reporter,
            result: None,
            finished: false,
        };
        state.draw(&first)?;

        let state = Rc::new(RefCell::new(state));
        let timer = if state.borrow().finished {
            None
        } else {
            let task_state = Rc::clone(&state);
            let task = move |_now_ms: f64| {
                let mut state = task_state.borrow_mut();
                let frame = source.capture_frame();
                if frame.is_empty() {
                    warn!(
                        drawn = state.accumulator.frames(),
                        "Frame source went away during composite"
                    );
                    state.fail(PulsecamError::SourceUnavailable {
                        width: frame.width(),
                        height: frame.height(),
                    });
                    return TaskStatus::Finished;
                }
                match state.draw(&frame) {
                    Ok(false) => TaskStatus::Continue,
                    Ok(true) => TaskStatus::Finished,
                    Err(e) => {
                        state.fail(e);
                        TaskStatus::Finished
                    }
                }
            };
            Some(scheduler.schedule_repeating(self.exposure.frame_interval_ms(), Box::new(task)))
        };

        Ok(CompositeJob { plan, state, timer })
    }

    /// Run a whole composite on `scheduler` and return the developed image.
    ///
    /// Other tasks on the scheduler keep running between draws.
    pub fn composite<S, F>(
        &self,
        scheduler: &mut S,
        source: F,
        bpm: f64,
        aperture: ApertureValue,
    ) -> Result<PixelBuffer>
    where
        S: Scheduler + ?Sized,
        F: FrameSource + 'static,
    {
        self.start(scheduler, source, bpm, aperture)?.wait(scheduler)
    }
}

struct CompositeState {
    accumulator: Accumulator,
    width: u32,
    height: u32,
    target: usize,
    look: Look,
    reporter: Rc<dyn ProgressReporter>,
    result: Option<Result<PixelBuffer>>,
    finished: bool,
}

impl CompositeState {
    /// Blend one frame; develop and store the result after the last one.
    /// Returns true once the composite is complete.
    fn draw(&mut self, frame: &PixelBuffer) -> Result<bool> {
        if frame.width() == self.width && frame.height() == self.height {
            self.accumulator.add(frame)?;
        } else {
            self.accumulator
                .add(&resize_nearest(frame, self.width, self.height))?;
        }
        let drawn = self.accumulator.frames();
        self.reporter.advance(drawn);
        debug!(frame = drawn, total = self.target, "Frame accumulated");
        if drawn < self.target {
            return Ok(false);
        }

        self.reporter.finish_stage();
        self.reporter.begin_stage(CompositeStage::Developing, None);
        let mut output = self.accumulator.resolve();
        develop(&mut output, &self.look);
        self.reporter.finish_stage();
        info!(frames = drawn, "Composite complete");

        self.result = Some(Ok(output));
        self.finished = true;
        Ok(true)
    }

    fn fail(&mut self, error: PulsecamError) {
        if !self.finished {
            self.reporter.finish_stage();
            self.result = Some(Err(error));
            self.finished = true;
        }
    }
}

/// A composite in progress on a scheduler.
pub struct CompositeJob {
    plan: CompositePlan,
    state: Rc<RefCell<CompositeState>>,
    timer: Option<TaskHandle>,
}

impl CompositeJob {
    pub fn plan(&self) -> &CompositePlan {
        &self.plan
    }

    pub fn frames_drawn(&self) -> usize {
        self.state.borrow().accumulator.frames()
    }

    pub fn is_finished(&self) -> bool {
        self.state.borrow().finished
    }

    /// Stop drawing. The job then resolves to [`PulsecamError::Cancelled`].
    pub fn cancel<S: Scheduler + ?Sized>(&mut self, scheduler: &mut S) {
        if let Some(handle) = self.timer.take() {
            scheduler.cancel(handle);
        }
        self.state.borrow_mut().fail(PulsecamError::Cancelled);
    }

    /// The developed image or the failure, once finished. Yields the value
    /// only once.
    pub fn take_result(&mut self) -> Option<Result<PixelBuffer>> {
        self.state.borrow_mut().result.take()
    }

    /// Drive `scheduler` until this job finishes.
    pub fn wait<S: Scheduler + ?Sized>(mut self, scheduler: &mut S) -> Result<PixelBuffer> {
        while !self.is_finished() {
            if !scheduler.run_next() {
                break;
            }
        }
        self.take_result().unwrap_or(Err(PulsecamError::Cancelled))
    }
}
