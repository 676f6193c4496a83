use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use pulsecam_core::io::record::CaptureRecord;
use pulsecam_core::model::ApertureValue;
use pulsecam_core::pipeline::config::PulsecamConfig;

use super::composite::CaptureRequest;

#[derive(Args)]
pub struct ReplayArgs {
    /// Capture record (.toml) written next to an earlier capture
    pub record: PathBuf,

    /// Frames to composite with the recorded parameters
    #[arg(required = true)]
    pub frames: Vec<PathBuf>,

    /// Output file path
    #[arg(short, long, default_value = "replay.png")]
    pub output: PathBuf,
}

pub fn run(args: &ReplayArgs, config: &PulsecamConfig) -> Result<()> {
    let record = CaptureRecord::load(&args.record)
        .with_context(|| format!("Failed to read record {}", args.record.display()))?;
    println!(
        "Replaying capture at {} with {}",
        ApertureValue::clamped(record.aperture, &config.aperture),
        record
            .bpm
            .map(|b| format!("{b:.0} BPM"))
            .unwrap_or_else(|| "default BPM".to_string())
    );

    CaptureRequest {
        frames: &args.frames,
        aperture: ApertureValue::clamped(record.aperture, &config.aperture),
        bpm: record.bpm,
        output: &args.output,
        write_record: false,
    }
    .run(config)
}
