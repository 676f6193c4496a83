use thiserror::Error;

#[derive(Error, Debug)]
pub enum PulsecamError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Frame source unavailable: captured a {width}x{height} frame")]
    SourceUnavailable { width: u32, height: u32 },

    #[error("Invalid image dimensions: {width}x{height} with {len} bytes")]
    InvalidDimensions { width: u32, height: u32, len: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid capture record: {0}")]
    InvalidRecord(String),

    #[error("Operation cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, PulsecamError>;
