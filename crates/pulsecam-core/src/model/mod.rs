pub mod aperture;
pub mod exposure;

pub use aperture::{ApertureDial, ApertureModel, ApertureValue, Look, ToneParams};
pub use exposure::ExposureParams;
