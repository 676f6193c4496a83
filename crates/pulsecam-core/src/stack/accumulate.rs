use ndarray::{Array3, ArrayView3};

use crate::consts::RGBA_CHANNELS;
use crate::error::{PulsecamError, Result};
use crate::frame::PixelBuffer;

/// Running weighted sum of RGBA frames.
///
/// Each frame is added with the same weight, so after `1 / weight` frames the
/// sum is their mean: the exposure of a long shutter built from short ones.
pub struct Accumulator {
    sum: Array3<f32>,
    weight: f32,
    frames: usize,
}

impl Accumulator {
    /// A zeroed buffer of `width` x `height`.
    pub fn new(width: u32, height: u32, weight: f64) -> Self {
        Self {
            sum: Array3::zeros((height as usize, width as usize, RGBA_CHANNELS)),
            weight: weight as f32,
            frames: 0,
        }
    }

    /// Add `frame * weight`. The frame must match the buffer dimensions.
    pub fn add(&mut self, frame: &PixelBuffer) -> Result<()> {
        let (h, w, _) = self.sum.dim();
        let mismatch = || PulsecamError::InvalidDimensions {
            width: frame.width(),
            height: frame.height(),
            len: frame.data().len(),
        };
        if frame.dim() != (h, w) {
            return Err(mismatch());
        }
        let view = ArrayView3::from_shape((h, w, RGBA_CHANNELS), frame.data())
            .map_err(|_| mismatch())?;
        let weight = self.weight;
        ndarray::Zip::from(&mut self.sum)
            .and(&view)
            .for_each(|acc, &v| *acc += v as f32 * weight);
        self.frames += 1;
        Ok(())
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Round the sum back to 8-bit pixels.
    pub fn resolve(&self) -> PixelBuffer {
        let (h, w, _) = self.sum.dim();
        let data = self
            .sum
            .iter()
            .map(|v| v.round().clamp(0.0, 255.0) as u8)
            .collect();
        PixelBuffer::from_raw(w as u32, h as u32, data)
            .unwrap_or_else(|_| PixelBuffer::new(w as u32, h as u32))
    }
}

/// Equal-weight mean of a list of frames.
pub fn mean_stack(frames: &[PixelBuffer]) -> Result<PixelBuffer> {
    let Some(first) = frames.first() else {
        return Err(PulsecamError::SourceUnavailable {
            width: 0,
            height: 0,
        });
    };
    let mut acc = Accumulator::new(first.width(), first.height(), 1.0 / frames.len() as f64);
    for frame in frames {
        acc.add(frame)?;
    }
    Ok(acc.resolve())
}
