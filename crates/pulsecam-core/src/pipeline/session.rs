use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::info;

use crate::error::Result;
use crate::model::ApertureDial;
use crate::schedule::{Scheduler, TaskHandle, TaskStatus};
use crate::source::FrameSource;

use super::compositor::{CompositeJob, Compositor};
use super::config::PulsecamConfig;
use super::preview::{DisplaySurface, PreviewRenderer};

/// The camera screen: a live preview loop plus captures, sharing one frame
/// source and one aperture dial.
pub struct RenderSession<F: FrameSource + 'static> {
    config: PulsecamConfig,
    source: Rc<F>,
    dial: ApertureDial,
    compositor: Compositor,
    preview_timer: Option<TaskHandle>,
    rendered: Rc<Cell<u64>>,
}

impl<F: FrameSource + 'static> RenderSession<F> {
    pub fn new(config: &PulsecamConfig, source: Rc<F>, dial: ApertureDial) -> Self {
        Self {
            config: config.clone(),
            source,
            dial,
            compositor: Compositor::new(config),
            preview_timer: None,
            rendered: Rc::new(Cell::new(0)),
        }
    }

    pub fn dial(&self) -> &ApertureDial {
        &self.dial
    }

    /// Start the preview loop, called every `display_interval_ms`. The
    /// preview's own rate limit decides which calls draw.
    pub fn start_preview<S, D>(
        &mut self,
        scheduler: &mut S,
        surface: Rc<RefCell<D>>,
        display_interval_ms: f64,
    ) where
        S: Scheduler + ?Sized,
        D: DisplaySurface + 'static,
    {
        self.stop_preview(scheduler);

        let mut renderer = PreviewRenderer::new(&self.config);
        let source = Rc::clone(&self.source);
        let dial = self.dial.clone();
        let rendered = Rc::clone(&self.rendered);
        let task = move |now_ms: f64| {
            let mut surface = surface.borrow_mut();
            if renderer.render(now_ms, &*source, dial.get(), &mut *surface) {
                rendered.set(rendered.get() + 1);
            }
            TaskStatus::Continue
        };
        self.preview_timer = Some(scheduler.schedule_repeating(display_interval_ms, Box::new(task)));
        info!(display_interval_ms, "Preview started");
    }

    /// Stop the preview loop. Takes effect between ticks.
    pub fn stop_preview<S: Scheduler + ?Sized>(&mut self, scheduler: &mut S) {
        if let Some(handle) = self.preview_timer.take() {
            scheduler.cancel(handle);
            info!("Preview stopped");
        }
    }

    pub fn is_previewing(&self) -> bool {
        self.preview_timer.is_some()
    }

    /// Preview frames drawn since the session was created.
    pub fn frames_rendered(&self) -> u64 {
        self.rendered.get()
    }

    /// Start a composite with the aperture as it is right now.
    pub fn capture<S: Scheduler + ?Sized>(&self, scheduler: &mut S, bpm: f64) -> Result<CompositeJob> {
        let aperture = self.dial.get();
        self.compositor
            .start(scheduler, Rc::clone(&self.source), bpm, aperture)
    }
}
