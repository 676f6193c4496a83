use std::cell::Cell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::pipeline::config::ApertureConfig;

/// An F-number inside the configured dial range.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApertureValue(f64);

impl ApertureValue {
    /// Clamp `f` into `[config.f_min, config.f_max]`. NaN maps to `f_max`.
    pub fn clamped(f: f64, config: &ApertureConfig) -> Self {
        if f.is_nan() {
            return Self(config.f_max);
        }
        Self(f.clamp(config.f_min, config.f_max))
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl std::fmt::Display for ApertureValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "f/{:.1}", self.0)
    }
}

/// Brightness, contrast and saturation factors of the tone transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ToneParams {
    pub brightness: f64,
    pub contrast: f64,
    pub saturation: f64,
}

impl ToneParams {
    /// Factors that leave every pixel unchanged.
    pub fn identity() -> Self {
        Self {
            brightness: 1.0,
            contrast: 1.0,
            saturation: 1.0,
        }
    }
}

/// Everything the develop stage needs: tone factors plus blur radius.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Look {
    pub tone: ToneParams,
    pub blur_radius: u32,
}

/// Maps an aperture to a look. Pure: same input, same output.
#[derive(Clone, Debug, Default)]
pub struct ApertureModel {
    config: ApertureConfig,
}

impl ApertureModel {
    pub fn new(config: ApertureConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ApertureConfig {
        &self.config
    }

    /// Clamp a raw dial reading with this model's range.
    pub fn aperture(&self, f: f64) -> ApertureValue {
        ApertureValue::clamped(f, &self.config)
    }

    pub fn tone(&self, aperture: ApertureValue) -> ToneParams {
        let c = &self.config;
        let f = aperture.get();
        ToneParams {
            brightness: (c.brightness_k / f).clamp(c.brightness_min, c.brightness_max),
            contrast: (1.0 + (c.contrast_k / f) * c.contrast_scale)
                .clamp(c.contrast_min, c.contrast_max),
            saturation: (c.saturation_base - f / c.saturation_div)
                .clamp(c.saturation_min, c.saturation_max),
        }
    }

    /// Wider apertures blur more; the smallest aperture is sharp.
    pub fn blur_radius(&self, aperture: ApertureValue) -> u32 {
        let c = &self.config;
        let raw = (c.blur_k * (c.blur_f_ref / aperture.get())).round();
        if raw.is_nan() || raw <= 0.0 {
            0
        } else {
            (raw as u32).min(c.max_blur_radius)
        }
    }

    pub fn look(&self, aperture: ApertureValue) -> Look {
        Look {
            tone: self.tone(aperture),
            blur_radius: self.blur_radius(aperture),
        }
    }
}

/// The user's aperture setting, shared between the UI (writer) and the
/// preview and capture paths (readers).
///
/// Clones share the same value. Readers take a copy with [`ApertureDial::get`];
/// a capture reads it once and keeps that copy for the whole composite.
#[derive(Clone, Debug)]
pub struct ApertureDial {
    value: Rc<Cell<ApertureValue>>,
    config: ApertureConfig,
}

impl ApertureDial {
    pub fn new(initial: f64, config: ApertureConfig) -> Self {
        Self {
            value: Rc::new(Cell::new(ApertureValue::clamped(initial, &config))),
            config,
        }
    }

    /// Store a new reading, clamped into range.
    pub fn set(&self, f: f64) {
        self.value.set(ApertureValue::clamped(f, &self.config));
    }

    pub fn get(&self) -> ApertureValue {
        self.value.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dial_clones_share_value() {
        let dial = ApertureDial::new(4.0, ApertureConfig::default());
        let reader = dial.clone();
        dial.set(8.0);
        assert_eq!(reader.get().get(), 8.0);
    }

    #[test]
    fn dial_clamps_writes() {
        let dial = ApertureDial::new(100.0, ApertureConfig::default());
        assert_eq!(dial.get().get(), 32.0);
        dial.set(0.1);
        assert_eq!(dial.get().get(), 1.2);
    }
}
