use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{bail, Context, Result};
use clap::Args;
use pulsecam_core::error::PulsecamError;
use pulsecam_core::io::image_io::{load_frames, save_frame};
use pulsecam_core::io::record::{sidecar_path, CaptureRecord};
use pulsecam_core::model::ApertureValue;
use pulsecam_core::pipeline::config::PulsecamConfig;
use pulsecam_core::pipeline::Compositor;
use pulsecam_core::schedule::{Clock, ManualScheduler};
use pulsecam_core::source::{capture_plain, FrameSequence};
use tracing::warn;

use crate::progress::BarReporter;
use crate::summary::{print_capture_summary, print_plan_summary};

#[derive(Args)]
pub struct CompositeArgs {
    /// Frames of the live feed, drawn in order and cycled as needed
    #[arg(required = true)]
    pub frames: Vec<PathBuf>,

    /// F-number on the aperture dial
    #[arg(long, default_value = "2.8")]
    pub aperture: f64,

    /// Measured heart rate in BPM; the configured default when omitted
    #[arg(long)]
    pub bpm: Option<f64>,

    /// Output file path (PNG, or JPEG by extension)
    #[arg(short, long, default_value = "capture.png")]
    pub output: PathBuf,

    /// Skip writing the .toml capture record next to the image
    #[arg(long)]
    pub no_record: bool,
}

pub fn run(args: &CompositeArgs, config: &PulsecamConfig) -> Result<()> {
    let aperture = ApertureValue::clamped(args.aperture, &config.aperture);
    let capture = CaptureRequest {
        frames: &args.frames,
        aperture,
        bpm: args.bpm,
        output: &args.output,
        write_record: !args.no_record,
    };
    capture.run(config)
}

/// One capture from image files to an output image and its record.
pub struct CaptureRequest<'a> {
    pub frames: &'a [PathBuf],
    pub aperture: ApertureValue,
    pub bpm: Option<f64>,
    pub output: &'a Path,
    pub write_record: bool,
}

impl CaptureRequest<'_> {
    pub fn run(&self, config: &PulsecamConfig) -> Result<()> {
        let frames = load_frames(self.frames)?;
        let source = Rc::new(FrameSequence::new(frames));
        let compositor = Compositor::new(config);
        let bpm = self.bpm.unwrap_or(config.exposure.default_bpm);
        let plan = compositor.plan(bpm, self.aperture);
        print_plan_summary(&plan, config.exposure.frame_interval_ms());

        let mut scheduler = ManualScheduler::new();
        let reporter = Rc::new(BarReporter::new()?);
        let result = compositor
            .start_reported(
                &mut scheduler,
                Rc::clone(&source),
                bpm,
                self.aperture,
                reporter.clone(),
            )
            .and_then(|job| job.wait(&mut scheduler));

        let (image, plain) = match result {
            Ok(image) => {
                reporter.finish("Done");
                (image, false)
            }
            Err(PulsecamError::SourceUnavailable { width, height }) => {
                reporter.finish("Failed");
                warn!(width, height, "Composite failed, saving a plain capture");
                let Some(image) = capture_plain(&*source) else {
                    bail!("No usable frame to capture");
                };
                (image, true)
            }
            Err(e) => return Err(e.into()),
        };

        save_frame(&image, self.output)
            .with_context(|| format!("Failed to save {}", self.output.display()))?;

        let record = CaptureRecord::new(
            &plan,
            self.bpm,
            scheduler.now_ms(),
            image.width(),
            image.height(),
        );
        if self.write_record {
            let path = sidecar_path(self.output);
            record
                .save(&path)
                .with_context(|| format!("Failed to write record {}", path.display()))?;
        }
        println!();
        print_capture_summary(&record, self.output, plain);
        Ok(())
    }
}
