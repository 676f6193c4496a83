use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PulsecamError, Result};
use crate::pipeline::CompositePlan;

/// What a capture was made with, stored next to the image so it can be
/// replayed with the same parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CaptureRecord {
    /// Measured heart rate; `None` when the default was used.
    pub bpm: Option<f64>,
    pub aperture: f64,
    pub captured_at_ms: f64,
    pub width: u32,
    pub height: u32,
    pub frame_count: u32,
    pub duration_sec: f64,
}

impl CaptureRecord {
    pub fn new(
        plan: &CompositePlan,
        measured_bpm: Option<f64>,
        captured_at_ms: f64,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            bpm: measured_bpm,
            aperture: plan.aperture.get(),
            captured_at_ms,
            width,
            height,
            frame_count: plan.exposure.frame_count,
            duration_sec: plan.exposure.duration_sec,
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let contents =
            toml::to_string_pretty(self).map_err(|e| PulsecamError::InvalidRecord(e.to_string()))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents).map_err(|e| PulsecamError::InvalidRecord(e.to_string()))
    }
}

/// `photo.png` -> `photo.toml`
pub fn sidecar_path(image_path: &Path) -> PathBuf {
    image_path.with_extension("toml")
}
