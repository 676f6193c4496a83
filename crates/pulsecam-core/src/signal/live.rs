use crate::consts::{
    LIVE_BEAT_REFRACTORY_MS, LIVE_BEAT_THRESHOLD, LIVE_MAX_INTERVAL_MS, LIVE_MIN_INTERVAL_MS,
};

use super::window::ColorSample;

/// Running beat-to-beat rate for on-screen feedback while a session fills.
///
/// A beat is a jump of more than `threshold` between two consecutive samples,
/// at least `refractory_ms` after the previous beat. The rate only updates
/// for beat intervals inside (300 ms, 2000 ms). This is independent of the
/// session estimate, which is computed once the window is complete.
#[derive(Clone, Debug)]
pub struct LiveBeatTracker {
    threshold: f64,
    refractory_ms: f64,
    previous: Option<f64>,
    seen: usize,
    last_beat_ms: Option<f64>,
    bpm: Option<u32>,
}

impl Default for LiveBeatTracker {
    fn default() -> Self {
        Self::new(LIVE_BEAT_THRESHOLD, LIVE_BEAT_REFRACTORY_MS)
    }
}

impl LiveBeatTracker {
    pub fn new(threshold: f64, refractory_ms: f64) -> Self {
        Self {
            threshold,
            refractory_ms,
            previous: None,
            seen: 0,
            last_beat_ms: None,
            bpm: None,
        }
    }

    /// Feed one sample. Returns the new rate when this sample updated it.
    pub fn push(&mut self, sample: ColorSample) -> Option<u32> {
        let previous = self.previous.replace(sample.intensity);
        self.seen += 1;
        // Three samples before the first comparison, so one noisy start
        // frame does not register as a beat.
        let previous = previous.filter(|_| self.seen >= 3)?;

        if sample.intensity - previous <= self.threshold {
            return None;
        }
        let now = sample.timestamp_ms;
        match self.last_beat_ms {
            Some(last) if now - last <= self.refractory_ms => None,
            Some(last) => {
                self.last_beat_ms = Some(now);
                let interval = now - last;
                if interval > LIVE_MIN_INTERVAL_MS && interval < LIVE_MAX_INTERVAL_MS {
                    let bpm = (60_000.0 / interval).round() as u32;
                    self.bpm = Some(bpm);
                    Some(bpm)
                } else {
                    None
                }
            }
            None => {
                self.last_beat_ms = Some(now);
                None
            }
        }
    }

    pub fn bpm(&self) -> Option<u32> {
        self.bpm
    }

    pub fn reset(&mut self) {
        self.previous = None;
        self.seen = 0;
        self.last_beat_ms = None;
        self.bpm = None;
    }
}
