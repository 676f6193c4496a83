#![allow(dead_code)]

use std::cell::Cell;
use std::f64::consts::PI;

use pulsecam_core::frame::PixelBuffer;
use pulsecam_core::signal::{ColorSample, SampleWindow};
use pulsecam_core::source::FrameSource;

/// A frame whose pixels vary in every channel, so tone and blur both show.
pub fn pattern_frame(width: u32, height: u32) -> PixelBuffer {
    let mut frame = PixelBuffer::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let r = ((x * 37 + y * 11) % 256) as u8;
            let g = ((x * 5 + y * 53) % 256) as u8;
            let b = ((x * y * 7 + 40) % 256) as u8;
            frame.put_pixel(x, y, [r, g, b, 255]);
        }
    }
    frame
}

/// `n` samples of `offset + amplitude * sin(2*pi*i/period + phase)`.
pub fn sine_intensities(n: usize, period: f64, phase: f64) -> Vec<f64> {
    (0..n)
        .map(|i| 100.0 + 10.0 * (2.0 * PI * i as f64 / period + phase).sin())
        .collect()
}

/// Window of `values` sampled every `interval_ms`.
pub fn window_from(values: &[f64], interval_ms: f64) -> SampleWindow {
    let mut window = SampleWindow::new(values.len().max(1));
    window.extend(
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| ColorSample::new(i as f64 * interval_ms, v)),
    );
    window
}

/// Frames whose red channel follows a pulse of `period_ms`, one per sampling
/// tick starting one interval after t = 0.
pub fn pulse_frames(count: usize, period_ms: f64, interval_ms: f64) -> Vec<PixelBuffer> {
    (1..=count)
        .map(|k| {
            let t = k as f64 * interval_ms;
            let red = (128.0 + 20.0 * (2.0 * PI * t / period_ms).sin()).round() as u8;
            PixelBuffer::filled(8, 6, [red, 40, 40, 255])
        })
        .collect()
}

/// Serves `good` copies of a frame, then empty frames.
pub struct FlakySource {
    frame: PixelBuffer,
    good: usize,
    calls: Cell<usize>,
}

impl FlakySource {
    pub fn new(frame: PixelBuffer, good: usize) -> Self {
        Self {
            frame,
            good,
            calls: Cell::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl FrameSource for FlakySource {
    fn capture_frame(&self) -> PixelBuffer {
        let n = self.calls.get();
        self.calls.set(n + 1);
        if n < self.good {
            self.frame.clone()
        } else {
            PixelBuffer::new(0, 0)
        }
    }
}
