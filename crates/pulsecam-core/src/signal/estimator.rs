use tracing::{debug, warn};

use crate::pipeline::config::HeartRateConfig;

use super::window::SampleWindow;

/// Why an estimate was rejected.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Rejection {
    /// Fewer than two peaks, so no beat interval could be measured.
    InsufficientSignal { peaks: usize },
    /// The computed rate is non-finite or outside the plausible range.
    OutOfRange { bpm: f64 },
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InsufficientSignal { peaks } => {
                write!(f, "insufficient signal ({peaks} peak(s))")
            }
            Self::OutOfRange { bpm } => write!(f, "estimate out of range ({bpm:.1} BPM)"),
        }
    }
}

/// Result of one measurement session.
///
/// When `valid` is false, `value` holds the configured default rate and
/// `rejection` says why.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BpmEstimate {
    pub value: u32,
    pub valid: bool,
    pub rejection: Option<Rejection>,
}

impl BpmEstimate {
    pub fn accepted(value: u32) -> Self {
        Self {
            value,
            valid: true,
            rejection: None,
        }
    }

    pub fn rejected(default_bpm: u32, rejection: Rejection) -> Self {
        Self {
            value: default_bpm,
            valid: false,
            rejection: Some(rejection),
        }
    }

    /// The measured rate, if there is one.
    pub fn bpm(&self) -> Option<u32> {
        self.valid.then_some(self.value)
    }
}

/// Centered moving average of radius `radius`, truncated at the ends.
pub fn smooth(values: &[f64], radius: usize) -> Vec<f64> {
    let n = values.len();
    (0..n)
        .map(|i| {
            let lo = i.saturating_sub(radius);
            let hi = (i + radius).min(n - 1);
            let window = &values[lo..=hi];
            window.iter().sum::<f64>() / window.len() as f64
        })
        .collect()
}

/// First differences; index 0 is 0 by convention.
pub fn first_differences(values: &[f64]) -> Vec<f64> {
    let mut diffs = Vec::with_capacity(values.len());
    if values.is_empty() {
        return diffs;
    }
    diffs.push(0.0);
    diffs.extend(values.windows(2).map(|w| w[1] - w[0]));
    diffs
}

/// Indices where a rising series turns non-increasing.
///
/// `i` (1 <= i < n-1) is a peak when `diffs[i-1] > 0` and `diffs[i] <= 0`.
/// Plateaus count once at their start, but a noisy plateau that wobbles can
/// report several peaks.
pub fn detect_peaks(diffs: &[f64]) -> Vec<usize> {
    let n = diffs.len();
    if n < 3 {
        return Vec::new();
    }
    (1..n - 1)
        .filter(|&i| diffs[i - 1] > 0.0 && diffs[i] <= 0.0)
        .collect()
}

/// Mean gap between consecutive peaks, in samples.
pub fn mean_peak_interval(peaks: &[usize]) -> Option<f64> {
    if peaks.len() < 2 {
        return None;
    }
    let total: usize = peaks.windows(2).map(|w| w[1] - w[0]).sum();
    Some(total as f64 / (peaks.len() - 1) as f64)
}

/// Estimate a heart rate from raw intensities captured over `duration_sec`.
pub fn estimate_from_intensities(
    intensities: &[f64],
    duration_sec: f64,
    config: &HeartRateConfig,
) -> BpmEstimate {
    let smoothed = smooth(intensities, config.smoothing_radius);
    let diffs = first_differences(&smoothed);
    let peaks = detect_peaks(&diffs);

    let Some(avg_interval) = mean_peak_interval(&peaks) else {
        warn!(
            samples = intensities.len(),
            peaks = peaks.len(),
            "Not enough peaks for a heart-rate estimate"
        );
        return BpmEstimate::rejected(
            config.default_bpm,
            Rejection::InsufficientSignal { peaks: peaks.len() },
        );
    };

    if peaks.windows(2).any(|w| w[1] - w[0] == 1) {
        debug!("Adjacent peaks found; the signal may have a noisy plateau");
    }

    let fps = intensities.len() as f64 / duration_sec;
    let bpm = (60.0 * fps / avg_interval).round();
    debug!(
        samples = intensities.len(),
        peaks = peaks.len(),
        avg_interval,
        fps,
        bpm,
        "Heart-rate estimate computed"
    );

    if !bpm.is_finite() || bpm < config.min_bpm as f64 || bpm > config.max_bpm as f64 {
        warn!(bpm, "Heart-rate estimate outside plausible range");
        return BpmEstimate::rejected(config.default_bpm, Rejection::OutOfRange { bpm });
    }

    BpmEstimate::accepted(bpm as u32)
}

/// Estimate a heart rate from a window filled over one configured session.
///
/// A full window that could not hold the whole session has dropped its oldest
/// samples; the retained samples then cover `len * sample_interval_ms`, not
/// the session duration.
pub fn estimate_heart_rate(window: &SampleWindow, config: &HeartRateConfig) -> BpmEstimate {
    let overflowed =
        window.len() >= window.capacity() && config.samples_per_session() > window.capacity();
    let duration_sec = if overflowed {
        let retained_sec = window.len() as f64 * config.sample_interval_ms / 1000.0;
        debug!(
            retained = window.len(),
            expected = config.samples_per_session(),
            retained_sec,
            "Sample window overflowed, estimating over retained samples"
        );
        retained_sec
    } else {
        config.session_duration_sec
    };
    estimate_from_intensities(&window.intensities(), duration_sec, config)
}
