pub mod composite;
pub mod config;
pub mod estimate;
pub mod measure;
pub mod params;
pub mod preview;
pub mod replay;

use std::path::Path;

use anyhow::{Context, Result};
use pulsecam_core::pipeline::config::PulsecamConfig;

/// Read the `--config` file, or fall back to the defaults.
pub fn load_config(path: Option<&Path>) -> Result<PulsecamConfig> {
    match path {
        Some(path) => PulsecamConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(PulsecamConfig::default()),
    }
}
