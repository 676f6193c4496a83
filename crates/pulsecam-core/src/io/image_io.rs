use std::path::Path;

use image::{ImageFormat, RgbaImage};

use crate::error::{PulsecamError, Result};
use crate::frame::PixelBuffer;

/// Load any image format the `image` crate reads as an RGBA frame.
pub fn load_frame(path: &Path) -> Result<PixelBuffer> {
    let rgba = image::open(path)?.to_rgba8();
    let (w, h) = rgba.dimensions();
    PixelBuffer::from_raw(w, h, rgba.into_raw())
}

/// Load several frames, in order.
pub fn load_frames(paths: &[impl AsRef<Path>]) -> Result<Vec<PixelBuffer>> {
    paths.iter().map(|p| load_frame(p.as_ref())).collect()
}

fn to_rgba_image(frame: &PixelBuffer) -> Result<RgbaImage> {
    RgbaImage::from_raw(frame.width(), frame.height(), frame.data().to_vec()).ok_or(
        PulsecamError::InvalidDimensions {
            width: frame.width(),
            height: frame.height(),
            len: frame.data().len(),
        },
    )
}

/// Save a frame as 8-bit RGBA PNG.
pub fn save_png(frame: &PixelBuffer, path: &Path) -> Result<()> {
    to_rgba_image(frame)?.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

/// Save a frame as 8-bit RGB JPEG. Alpha is dropped.
pub fn save_jpeg(frame: &PixelBuffer, path: &Path) -> Result<()> {
    let rgb = image::DynamicImage::ImageRgba8(to_rgba_image(frame)?).to_rgb8();
    rgb.save_with_format(path, ImageFormat::Jpeg)?;
    Ok(())
}

/// Save frame, choosing format from file extension. PNG unless the
/// extension says JPEG.
pub fn save_frame(frame: &PixelBuffer, path: &Path) -> Result<()> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("jpg" | "jpeg") => save_jpeg(frame, path),
        _ => save_png(frame, path),
    }
}
