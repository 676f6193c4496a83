use crate::consts::RGBA_CHANNELS;
use crate::frame::PixelBuffer;

/// Nearest-neighbour resample to `width` x `height`.
pub fn resize_nearest(src: &PixelBuffer, width: u32, height: u32) -> PixelBuffer {
    if src.width() == width && src.height() == height {
        return src.clone();
    }
    let mut out = PixelBuffer::new(width, height);
    if src.is_empty() || out.is_empty() {
        return out;
    }

    let (src_w, src_h) = (src.width() as usize, src.height() as usize);
    let src_stride = src_w * RGBA_CHANNELS;
    let dst_stride = width as usize * RGBA_CHANNELS;
    let data = src.data();
    for (y, out_row) in out.data_mut().chunks_exact_mut(dst_stride).enumerate() {
        let sy = y * src_h / height as usize;
        for (x, px) in out_row.chunks_exact_mut(RGBA_CHANNELS).enumerate() {
            let sx = x * src_w / width as usize;
            let i = sy * src_stride + sx * RGBA_CHANNELS;
            px.copy_from_slice(&data[i..i + RGBA_CHANNELS]);
        }
    }
    out
}

/// Dimensions with the longest side at most `max_dim`, keeping the aspect
/// ratio. Never upscales.
pub fn fit_within(width: u32, height: u32, max_dim: u32) -> (u32, u32) {
    let longest = width.max(height);
    if longest <= max_dim || longest == 0 {
        return (width, height);
    }
    let scale = max_dim as f64 / longest as f64;
    (
        ((width as f64 * scale).round() as u32).max(1),
        ((height as f64 * scale).round() as u32).max(1),
    )
}

/// Dimensions at most `target_width` wide, keeping the aspect ratio.
pub fn fit_width(width: u32, height: u32, target_width: u32) -> (u32, u32) {
    if width <= target_width || width == 0 {
        return (width, height);
    }
    let h = (height as f64 * target_width as f64 / width as f64).round() as u32;
    (target_width, h.max(1))
}
