use crate::consts::RGBA_CHANNELS;
use crate::frame::{Channel, PixelBuffer, Region};
use crate::pipeline::config::HeartRateConfig;

/// Mean value of `channel` over `region`, clipped to the frame.
///
/// Returns `None` when the clipped region is empty.
pub fn sample_intensity(frame: &PixelBuffer, region: Region, channel: Channel) -> Option<f64> {
    let region = region.clipped_to(frame.width(), frame.height());
    if region.area() == 0 {
        return None;
    }
    let stride = frame.width() as usize * RGBA_CHANNELS;
    let data = frame.data();
    let mut sum = 0u64;
    for row in region.y as usize..(region.y + region.height) as usize {
        let start = row * stride + region.x as usize * RGBA_CHANNELS;
        let end = start + region.width as usize * RGBA_CHANNELS;
        sum += data[start..end]
            .chunks_exact(RGBA_CHANNELS)
            .map(|px| px[channel.index()] as u64)
            .sum::<u64>();
    }
    Some(sum as f64 / region.area() as f64)
}

/// Samples the centered sub-rectangle of each frame.
#[derive(Clone, Copy, Debug)]
pub struct RegionSampler {
    pub fraction: f64,
    pub channel: Channel,
}

impl RegionSampler {
    pub fn from_config(config: &HeartRateConfig) -> Self {
        Self {
            fraction: config.sample_region_fraction,
            channel: config.sample_channel,
        }
    }

    pub fn sample(&self, frame: &PixelBuffer) -> Option<f64> {
        if frame.is_empty() {
            return None;
        }
        let region = Region::centered(frame.width(), frame.height(), self.fraction);
        sample_intensity(frame, region, self.channel)
    }
}
