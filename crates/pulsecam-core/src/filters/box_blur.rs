use rayon::prelude::*;

use crate::consts::{PARALLEL_PIXEL_THRESHOLD, RGBA_CHANNELS};
use crate::frame::PixelBuffer;

/// Box blur of `radius` over all four channels, in place.
///
/// Separable: a horizontal pass then a vertical pass, each averaging
/// `2 * radius + 1` taps with edge pixels repeated. Integer arithmetic with
/// round-half-up, so the result does not depend on thread scheduling.
pub fn box_blur(buffer: &mut PixelBuffer, radius: u32) {
    if radius == 0 || buffer.is_empty() {
        return;
    }
    let (h, w) = buffer.dim();
    let row_pass = blur_pass(buffer.data(), h, w, radius as isize, Pass::Rows);
    let col_pass = blur_pass(&row_pass, h, w, radius as isize, Pass::Cols);
    buffer.data_mut().copy_from_slice(&col_pass);
}

#[derive(Clone, Copy)]
enum Pass {
    Rows,
    Cols,
}

fn blur_pass(src: &[u8], h: usize, w: usize, radius: isize, pass: Pass) -> Vec<u8> {
    let stride = w * RGBA_CHANNELS;
    let mut out = vec![0u8; src.len()];
    let blur_line = |(row, out_row): (usize, &mut [u8])| {
        blur_row(src, out_row, row, h, w, radius, pass);
    };

    if h * w >= PARALLEL_PIXEL_THRESHOLD {
        out.par_chunks_mut(stride).enumerate().for_each(blur_line);
    } else {
        out.chunks_mut(stride).enumerate().for_each(blur_line);
    }
    out
}

fn blur_row(
    src: &[u8],
    out_row: &mut [u8],
    row: usize,
    h: usize,
    w: usize,
    radius: isize,
    pass: Pass,
) {
    let stride = w * RGBA_CHANNELS;
    let taps = (2 * radius + 1) as u32;
    for col in 0..w {
        for ch in 0..RGBA_CHANNELS {
            let mut sum = 0u32;
            for d in -radius..=radius {
                let (src_row, src_col) = match pass {
                    Pass::Rows => (row, (col as isize + d).clamp(0, w as isize - 1) as usize),
                    Pass::Cols => ((row as isize + d).clamp(0, h as isize - 1) as usize, col),
                };
                sum += src[src_row * stride + src_col * RGBA_CHANNELS + ch] as u32;
            }
            out_row[col * RGBA_CHANNELS + ch] = ((sum + taps / 2) / taps) as u8;
        }
    }
}
