pub mod box_blur;
pub mod resize;
pub mod tone;
