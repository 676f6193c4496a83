use crate::pipeline::config::ExposureConfig;
use crate::signal::BpmEstimate;

/// Simulated shutter derived from a heart rate: one beat worth of light,
/// split into equally weighted frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExposureParams {
    pub duration_sec: f64,
    pub frame_count: u32,
    pub per_frame_weight: f64,
}

impl ExposureParams {
    /// Shutter for `bpm`. Zero, negative or non-finite rates fall back to the
    /// configured default instead of failing.
    pub fn from_bpm(bpm: f64, config: &ExposureConfig) -> Self {
        let bpm = if bpm.is_finite() && bpm > 0.0 {
            bpm
        } else {
            config.default_bpm
        };
        let duration_sec = (60.0 / bpm).clamp(config.min_duration_sec, config.max_duration_sec);
        let frame_count = (duration_sec * config.assumed_frame_rate).round().max(1.0) as u32;
        Self {
            duration_sec,
            frame_count,
            per_frame_weight: 1.0 / frame_count as f64,
        }
    }

    /// Shutter for a session result, using the default rate when the
    /// estimate was rejected.
    pub fn from_estimate(estimate: &BpmEstimate, config: &ExposureConfig) -> Self {
        if estimate.valid {
            Self::from_bpm(estimate.value as f64, config)
        } else {
            Self::from_bpm(config.default_bpm, config)
        }
    }
}
