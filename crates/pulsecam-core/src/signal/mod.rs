//! Heart-rate estimation from per-frame color intensity.
//!
//! A finger over the lens turns the red channel into a crude
//! photoplethysmogram: each heartbeat pushes blood through the fingertip and
//! the mean intensity of the frame center rises and falls with it.

pub mod estimator;
pub mod live;
pub mod sampler;
pub mod session;
pub mod window;

pub use estimator::{estimate_heart_rate, BpmEstimate, Rejection};
pub use live::LiveBeatTracker;
pub use sampler::{sample_intensity, RegionSampler};
pub use session::{MeasurementSession, SessionStatus};
pub use window::{ColorSample, SampleWindow};
