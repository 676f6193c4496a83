use rayon::prelude::*;

use crate::consts::{CONTRAST_PIVOT, PARALLEL_PIXEL_THRESHOLD, RGBA_CHANNELS};
use crate::frame::PixelBuffer;
use crate::model::ToneParams;

/// Apply brightness, contrast and saturation in place. Alpha is untouched.
///
/// Per channel: `v' = clamp((v * brightness - 128) * contrast + 128, 0, 255)`.
/// Then each channel is pushed away from (or toward) the pixel's gray level:
/// `c'' = clamp(avg + (c' - avg) * saturation, 0, 255)`.
pub fn apply_tone(buffer: &mut PixelBuffer, tone: &ToneParams) {
    let (h, w) = buffer.dim();
    if h == 0 || w == 0 {
        return;
    }
    let stride = w * RGBA_CHANNELS;
    let brightness = tone.brightness as f32;
    let contrast = tone.contrast as f32;
    let saturation = tone.saturation as f32;
    let apply_row = |row: &mut [u8]| {
        for px in row.chunks_exact_mut(RGBA_CHANNELS) {
            tone_pixel(px, brightness, contrast, saturation);
        }
    };

    if h * w >= PARALLEL_PIXEL_THRESHOLD {
        buffer.data_mut().par_chunks_mut(stride).for_each(apply_row);
    } else {
        buffer.data_mut().chunks_mut(stride).for_each(apply_row);
    }
}

fn tone_pixel(px: &mut [u8], brightness: f32, contrast: f32, saturation: f32) {
    let mut rgb = [0.0f32; 3];
    for (c, &v) in rgb.iter_mut().zip(px.iter()) {
        *c = ((v as f32 * brightness - CONTRAST_PIVOT) * contrast + CONTRAST_PIVOT)
            .clamp(0.0, 255.0);
    }
    let avg = (rgb[0] + rgb[1] + rgb[2]) / 3.0;
    for (out, c) in px.iter_mut().zip(rgb) {
        *out = (avg + (c - avg) * saturation).clamp(0.0, 255.0).round() as u8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_tone_keeps_pixels() {
        let mut buffer = PixelBuffer::filled(3, 2, [10, 128, 250, 77]);
        let original = buffer.clone();
        apply_tone(&mut buffer, &ToneParams::identity());
        assert_eq!(buffer, original);
    }

    #[test]
    fn zero_saturation_gives_gray() {
        let mut buffer = PixelBuffer::filled(1, 1, [30, 60, 90, 255]);
        let tone = ToneParams {
            saturation: 0.0,
            ..ToneParams::identity()
        };
        apply_tone(&mut buffer, &tone);
        assert_eq!(buffer.pixel(0, 0), [60, 60, 60, 255]);
    }
}
