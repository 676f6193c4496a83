use anyhow::Result;
use clap::Args;
use pulsecam_core::model::ApertureValue;
use pulsecam_core::pipeline::config::PulsecamConfig;
use pulsecam_core::pipeline::Compositor;

use crate::summary::print_plan_summary;

#[derive(Args)]
pub struct ParamsArgs {
    /// F-number on the aperture dial (clamped to the configured range)
    #[arg(long, default_value = "2.8")]
    pub aperture: f64,

    /// Heart rate in BPM; the configured default when omitted
    #[arg(long)]
    pub bpm: Option<f64>,
}

pub fn run(args: &ParamsArgs, config: &PulsecamConfig) -> Result<()> {
    let aperture = ApertureValue::clamped(args.aperture, &config.aperture);
    let bpm = args.bpm.unwrap_or(config.exposure.default_bpm);
    let plan = Compositor::new(config).plan(bpm, aperture);
    print_plan_summary(&plan, config.exposure.frame_interval_ms());
    Ok(())
}
