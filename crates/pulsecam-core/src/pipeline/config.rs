use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{PulsecamError, Result};
use crate::frame::Channel;

/// Every tunable of the measurement and rendering pipeline.
///
/// All sections default, so a TOML file only needs the keys it overrides.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PulsecamConfig {
    pub heart_rate: HeartRateConfig,
    pub exposure: ExposureConfig,
    pub aperture: ApertureConfig,
    pub render: RenderConfig,
}

impl PulsecamConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(contents).map_err(|e| PulsecamError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| PulsecamError::InvalidConfig(e.to_string()))
    }

    /// Reject settings no input could be clamped into.
    pub fn validate(&self) -> Result<()> {
        self.heart_rate.validate()?;
        self.exposure.validate()?;
        self.aperture.validate()?;
        self.render.validate()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeartRateConfig {
    /// Milliseconds between samples.
    pub sample_interval_ms: f64,
    /// Length of one measurement session.
    pub session_duration_sec: f64,
    /// Maximum samples held; older ones are evicted first.
    pub window_capacity: usize,
    /// Moving-average radius k (window width 2k+1).
    pub smoothing_radius: usize,
    pub min_bpm: u32,
    pub max_bpm: u32,
    /// Value reported alongside an invalid estimate.
    pub default_bpm: u32,
    /// Fraction of the frame width and height sampled around the center.
    pub sample_region_fraction: f64,
    pub sample_channel: Channel,
}

impl Default for HeartRateConfig {
    fn default() -> Self {
        Self {
            sample_interval_ms: DEFAULT_SAMPLE_INTERVAL_MS,
            session_duration_sec: DEFAULT_SESSION_DURATION_SEC,
            window_capacity: DEFAULT_WINDOW_CAPACITY,
            smoothing_radius: DEFAULT_SMOOTHING_RADIUS,
            min_bpm: MIN_PLAUSIBLE_BPM,
            max_bpm: MAX_PLAUSIBLE_BPM,
            default_bpm: DEFAULT_BPM,
            sample_region_fraction: DEFAULT_SAMPLE_REGION_FRACTION,
            sample_channel: Channel::Red,
        }
    }
}

impl HeartRateConfig {
    fn validate(&self) -> Result<()> {
        ensure_positive("heart_rate.sample_interval_ms", self.sample_interval_ms)?;
        ensure_positive("heart_rate.session_duration_sec", self.session_duration_sec)?;
        let needed = self.samples_per_session().max(3);
        if self.window_capacity < needed {
            return Err(PulsecamError::InvalidConfig(format!(
                "heart_rate.window_capacity {} cannot hold a full session of {} samples",
                self.window_capacity, needed
            )));
        }
        if self.min_bpm > self.max_bpm {
            return Err(invalid("heart_rate.min_bpm exceeds heart_rate.max_bpm"));
        }
        if self.default_bpm == 0 {
            return Err(invalid("heart_rate.default_bpm must be non-zero"));
        }
        if !(self.sample_region_fraction > 0.0 && self.sample_region_fraction <= 1.0) {
            return Err(invalid("heart_rate.sample_region_fraction must be in (0, 1]"));
        }
        Ok(())
    }

    /// Samples a full session produces at the configured cadence.
    pub fn samples_per_session(&self) -> usize {
        (self.session_duration_sec * 1000.0 / self.sample_interval_ms).ceil() as usize
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExposureConfig {
    pub min_duration_sec: f64,
    pub max_duration_sec: f64,
    /// Frame rate used to turn a shutter duration into a frame count, and the
    /// pacing of composite draws.
    pub assumed_frame_rate: f64,
    /// BPM used when the estimate is unavailable.
    pub default_bpm: f64,
}

impl Default for ExposureConfig {
    fn default() -> Self {
        Self {
            min_duration_sec: MIN_EXPOSURE_SEC,
            max_duration_sec: MAX_EXPOSURE_SEC,
            assumed_frame_rate: ASSUMED_FRAME_RATE,
            default_bpm: DEFAULT_BPM as f64,
        }
    }
}

impl ExposureConfig {
    fn validate(&self) -> Result<()> {
        ensure_band(
            "exposure.duration",
            self.min_duration_sec,
            self.max_duration_sec,
        )?;
        ensure_positive("exposure.min_duration_sec", self.min_duration_sec)?;
        ensure_positive("exposure.assumed_frame_rate", self.assumed_frame_rate)?;
        ensure_positive("exposure.default_bpm", self.default_bpm)
    }

    /// Wait between two composite draws.
    pub fn frame_interval_ms(&self) -> f64 {
        1000.0 / self.assumed_frame_rate
    }
}

/// Constants of the aperture-to-look mapping.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApertureConfig {
    pub f_min: f64,
    pub f_max: f64,
    /// brightness = clamp(brightness_k / F, brightness_min, brightness_max)
    pub brightness_k: f64,
    pub brightness_min: f64,
    pub brightness_max: f64,
    /// saturation = clamp(saturation_base - F / saturation_div, ..)
    pub saturation_base: f64,
    pub saturation_div: f64,
    pub saturation_min: f64,
    pub saturation_max: f64,
    /// contrast = clamp(1 + (contrast_k / F) * contrast_scale, ..)
    pub contrast_k: f64,
    pub contrast_scale: f64,
    pub contrast_min: f64,
    pub contrast_max: f64,
    /// blur = round(blur_k * blur_f_ref / F), at most max_blur_radius
    pub blur_k: f64,
    pub blur_f_ref: f64,
    pub max_blur_radius: u32,
}

impl Default for ApertureConfig {
    fn default() -> Self {
        Self {
            f_min: F_MIN,
            f_max: F_MAX,
            brightness_k: 2.8,
            brightness_min: 0.5,
            brightness_max: 1.5,
            saturation_base: 1.4,
            saturation_div: 40.0,
            saturation_min: 0.5,
            saturation_max: 1.4,
            contrast_k: 1.0,
            contrast_scale: 0.3,
            contrast_min: 1.0,
            contrast_max: 1.3,
            blur_k: 6.0,
            blur_f_ref: F_MIN,
            max_blur_radius: 6,
        }
    }
}

impl ApertureConfig {
    fn validate(&self) -> Result<()> {
        ensure_positive("aperture.f_min", self.f_min)?;
        ensure_band("aperture.f", self.f_min, self.f_max)?;
        ensure_band(
            "aperture.brightness",
            self.brightness_min,
            self.brightness_max,
        )?;
        ensure_band(
            "aperture.saturation",
            self.saturation_min,
            self.saturation_max,
        )?;
        ensure_band("aperture.contrast", self.contrast_min, self.contrast_max)?;
        ensure_positive("aperture.saturation_div", self.saturation_div)?;
        if !(self.blur_k >= 0.0 && self.blur_f_ref >= 0.0) {
            return Err(invalid("aperture.blur_k and aperture.blur_f_ref must be >= 0"));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Upper bound on processed preview ticks per second.
    pub preview_fps: f64,
    /// Width of the preview working buffer; height follows the aspect ratio.
    pub preview_width: u32,
    /// Longest side of the composite; `None` keeps the camera resolution.
    pub capture_max_dimension: Option<u32>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            preview_fps: DEFAULT_PREVIEW_FPS,
            preview_width: DEFAULT_PREVIEW_WIDTH,
            capture_max_dimension: None,
        }
    }
}

impl RenderConfig {
    fn validate(&self) -> Result<()> {
        ensure_positive("render.preview_fps", self.preview_fps)?;
        if self.preview_width == 0 {
            return Err(invalid("render.preview_width must be non-zero"));
        }
        if self.capture_max_dimension == Some(0) {
            return Err(invalid("render.capture_max_dimension must be non-zero"));
        }
        Ok(())
    }

    pub fn preview_interval_ms(&self) -> f64 {
        1000.0 / self.preview_fps
    }
}

fn invalid(msg: &str) -> PulsecamError {
    PulsecamError::InvalidConfig(msg.to_string())
}

fn ensure_positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(PulsecamError::InvalidConfig(format!(
            "{name} must be a positive number, got {value}"
        )))
    }
}

fn ensure_band(name: &str, min: f64, max: f64) -> Result<()> {
    if min.is_finite() && max.is_finite() && min <= max {
        Ok(())
    } else {
        Err(PulsecamError::InvalidConfig(format!(
            "{name} band is inverted or not finite: [{min}, {max}]"
        )))
    }
}
