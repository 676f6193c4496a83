use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// One intensity reading taken from a frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorSample {
    pub timestamp_ms: f64,
    pub intensity: f64,
}

impl ColorSample {
    /// Negative and NaN intensities are stored as 0.
    pub fn new(timestamp_ms: f64, intensity: f64) -> Self {
        Self {
            timestamp_ms,
            intensity: if intensity > 0.0 { intensity } else { 0.0 },
        }
    }
}

/// Bounded FIFO of samples in arrival order.
#[derive(Clone, Debug)]
pub struct SampleWindow {
    samples: VecDeque<ColorSample>,
    capacity: usize,
}

impl SampleWindow {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a sample, returning the oldest one if it had to be evicted.
    pub fn push(&mut self, sample: ColorSample) -> Option<ColorSample> {
        let evicted = if self.samples.len() == self.capacity {
            self.samples.pop_front()
        } else {
            None
        };
        self.samples.push_back(sample);
        evicted
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColorSample> {
        self.samples.iter()
    }

    pub fn intensities(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.intensity).collect()
    }

    /// Time between the first and last retained samples.
    pub fn span_ms(&self) -> f64 {
        match (self.samples.front(), self.samples.back()) {
            (Some(first), Some(last)) => last.timestamp_ms - first.timestamp_ms,
            _ => 0.0,
        }
    }
}

impl Extend<ColorSample> for SampleWindow {
    fn extend<I: IntoIterator<Item = ColorSample>>(&mut self, iter: I) {
        for sample in iter {
            self.push(sample);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_oldest_when_full() {
        let mut window = SampleWindow::new(3);
        for i in 0..3 {
            assert!(window.push(ColorSample::new(i as f64, i as f64)).is_none());
        }
        let evicted = window.push(ColorSample::new(3.0, 3.0)).unwrap();
        assert_eq!(evicted.timestamp_ms, 0.0);
        assert_eq!(window.len(), 3);
        assert_eq!(window.intensities(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn negative_intensity_stored_as_zero() {
        assert_eq!(ColorSample::new(0.0, -4.0).intensity, 0.0);
        assert_eq!(ColorSample::new(0.0, f64::NAN).intensity, 0.0);
    }
}
