/// Minimum pixel count (h*w) to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Bytes per RGBA pixel.
pub const RGBA_CHANNELS: usize = 4;

/// Midpoint of the 8-bit range, the pivot of the contrast stretch.
pub const CONTRAST_PIVOT: f32 = 128.0;

/// Lower bound of the aperture dial.
pub const F_MIN: f64 = 1.2;

/// Upper bound of the aperture dial.
pub const F_MAX: f64 = 32.0;

/// Milliseconds between heart-rate samples.
pub const DEFAULT_SAMPLE_INTERVAL_MS: f64 = 60.0;

/// Length of one heart-rate measurement session.
pub const DEFAULT_SESSION_DURATION_SEC: f64 = 15.0;

/// Capacity of the sample window. 15 s at 60 ms needs 250 slots.
pub const DEFAULT_WINDOW_CAPACITY: usize = 512;

/// Moving-average radius used before peak detection (window width 2k+1).
pub const DEFAULT_SMOOTHING_RADIUS: usize = 4;

/// Plausible human heart-rate range, inclusive.
pub const MIN_PLAUSIBLE_BPM: u32 = 21;
pub const MAX_PLAUSIBLE_BPM: u32 = 219;

/// BPM substituted when no valid estimate exists.
pub const DEFAULT_BPM: u32 = 60;

/// Fraction of the frame width/height sampled around the center.
pub const DEFAULT_SAMPLE_REGION_FRACTION: f64 = 0.4;

/// Minimum rise between consecutive samples that counts as a live beat.
pub const LIVE_BEAT_THRESHOLD: f64 = 2.5;

/// Refractory period after a live beat.
pub const LIVE_BEAT_REFRACTORY_MS: f64 = 400.0;

/// Accepted live beat-to-beat interval, exclusive bounds.
pub const LIVE_MIN_INTERVAL_MS: f64 = 300.0;
pub const LIVE_MAX_INTERVAL_MS: f64 = 2000.0;

/// Simulated shutter duration bounds in seconds.
pub const MIN_EXPOSURE_SEC: f64 = 0.1;
pub const MAX_EXPOSURE_SEC: f64 = 2.0;

/// Frame rate assumed when converting a shutter duration to a frame count.
pub const ASSUMED_FRAME_RATE: f64 = 30.0;

/// Shortest repeat interval a timer accepts. Shorter or non-finite intervals
/// are raised to it, so a repeating task always lets the clock move.
pub const MIN_TIMER_INTERVAL_MS: f64 = 1.0;

/// Rate limit of the live preview.
pub const DEFAULT_PREVIEW_FPS: f64 = 15.0;

/// Width of the preview working buffer.
pub const DEFAULT_PREVIEW_WIDTH: u32 = 160;
