use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use pulsecam_core::io::image_io::load_frames;
use pulsecam_core::pipeline::config::PulsecamConfig;
use pulsecam_core::schedule::ManualScheduler;
use pulsecam_core::signal::MeasurementSession;
use pulsecam_core::source::FrameSequence;

use crate::summary::print_estimate_summary;

#[derive(Args)]
pub struct MeasureArgs {
    /// Frames of a fingertip over the lens, one per sampling tick; cycled
    /// if there are fewer than a session needs
    #[arg(required = true)]
    pub frames: Vec<PathBuf>,
}

pub fn run(args: &MeasureArgs, config: &PulsecamConfig) -> Result<()> {
    let frames = load_frames(&args.frames)?;
    let samples = config.heart_rate.samples_per_session();
    println!(
        "Sampling {} frame(s) over {} ticks of {} ms",
        frames.len(),
        samples,
        config.heart_rate.sample_interval_ms
    );

    let mut scheduler = ManualScheduler::new();
    let mut session = MeasurementSession::new(config.heart_rate.clone());
    session.start(&mut scheduler, FrameSequence::new(frames));
    scheduler.run_until_idle(samples + 1);

    let Some(estimate) = session.estimate() else {
        bail!("Measurement session did not complete");
    };
    print_estimate_summary(
        &estimate,
        session.samples_collected(),
        config.heart_rate.session_duration_sec,
    );
    if let Some(live) = session.live_bpm() {
        println!("  Last live reading: {live} BPM");
    }
    Ok(())
}
