use crate::filters::box_blur::box_blur;
use crate::filters::tone::apply_tone;
use crate::frame::PixelBuffer;
use crate::model::Look;

/// The look stage shared by capture and preview: tone transform, then blur.
///
/// Capture and preview both call this, and nothing else touches pixel values
/// after accumulation, so the saved image matches what the preview showed up
/// to resolution.
pub fn develop(buffer: &mut PixelBuffer, look: &Look) {
    apply_tone(buffer, &look.tone);
    if look.blur_radius > 0 {
        box_blur(buffer, look.blur_radius);
    }
}
