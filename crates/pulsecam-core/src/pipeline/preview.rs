use crate::filters::resize::{fit_width, resize_nearest};
use crate::frame::PixelBuffer;
use crate::model::{ApertureModel, ApertureValue};
use crate::source::FrameSource;

use super::config::{PulsecamConfig, RenderConfig};
use super::develop::develop;

/// Where the preview is drawn.
pub trait DisplaySurface {
    /// Current size of the surface in pixels.
    fn size(&self) -> (u32, u32);

    /// Replace the surface contents. `frame` already matches [`Self::size`].
    fn present(&mut self, frame: PixelBuffer);
}

/// An in-memory surface that keeps the last presented frame.
#[derive(Clone, Debug)]
pub struct ImageSurface {
    width: u32,
    height: u32,
    last: Option<PixelBuffer>,
    presented: usize,
}

impl ImageSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            last: None,
            presented: 0,
        }
    }

    pub fn last_frame(&self) -> Option<&PixelBuffer> {
        self.last.as_ref()
    }

    pub fn into_last_frame(self) -> Option<PixelBuffer> {
        self.last
    }

    /// Number of frames presented so far.
    pub fn presented(&self) -> usize {
        self.presented
    }
}

impl DisplaySurface for ImageSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn present(&mut self, frame: PixelBuffer) {
        self.last = Some(frame);
        self.presented += 1;
    }
}

/// Live preview: a small developed copy of the current frame, rate limited.
///
/// Uses the same develop stage as the compositor but never accumulates; the
/// exposure simulation only happens at capture.
#[derive(Clone, Debug)]
pub struct PreviewRenderer {
    model: ApertureModel,
    render: RenderConfig,
    last_tick_ms: Option<f64>,
}

impl PreviewRenderer {
    pub fn new(config: &PulsecamConfig) -> Self {
        Self {
            model: ApertureModel::new(config.aperture.clone()),
            render: config.render.clone(),
            last_tick_ms: None,
        }
    }

    /// Called on every display tick. Draws only when more than one preview
    /// interval passed since the last drawn tick; returns whether it drew.
    pub fn render<F, D>(
        &mut self,
        now_ms: f64,
        source: &F,
        aperture: ApertureValue,
        surface: &mut D,
    ) -> bool
    where
        F: FrameSource + ?Sized,
        D: DisplaySurface + ?Sized,
    {
        if let Some(last) = self.last_tick_ms {
            if now_ms - last <= self.render.preview_interval_ms() {
                return false;
            }
        }
        let frame = source.capture_frame();
        if frame.is_empty() {
            return false;
        }
        self.last_tick_ms = Some(now_ms);

        let working = self.develop_frame(&frame, aperture);
        let (width, height) = surface.size();
        surface.present(resize_nearest(&working, width, height));
        true
    }

    /// Downscale `frame` to the preview width and develop it.
    pub fn develop_frame(&self, frame: &PixelBuffer, aperture: ApertureValue) -> PixelBuffer {
        let (width, height) = fit_width(frame.width(), frame.height(), self.render.preview_width);
        let mut working = resize_nearest(frame, width, height);
        develop(&mut working, &self.model.look(aperture));
        working
    }

    /// Forget the last tick so the next call draws immediately.
    pub fn reset(&mut self) {
        self.last_tick_ms = None;
    }
}
