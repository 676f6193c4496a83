use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use pulsecam_core::io::image_io::{load_frame, save_frame};
use pulsecam_core::model::ApertureValue;
use pulsecam_core::pipeline::config::PulsecamConfig;
use pulsecam_core::pipeline::{ImageSurface, PreviewRenderer};
use pulsecam_core::source::StillSource;

#[derive(Args)]
pub struct PreviewArgs {
    /// Input image
    pub file: PathBuf,

    /// F-number on the aperture dial
    #[arg(long, default_value = "2.8")]
    pub aperture: f64,

    /// Surface size as WIDTHxHEIGHT; the input size when omitted
    #[arg(long)]
    pub size: Option<String>,

    /// Output file path
    #[arg(short, long, default_value = "preview.png")]
    pub output: PathBuf,
}

pub fn run(args: &PreviewArgs, config: &PulsecamConfig) -> Result<()> {
    let frame = load_frame(&args.file)
        .with_context(|| format!("Failed to load {}", args.file.display()))?;
    let (width, height) = match args.size.as_deref() {
        Some(size) => parse_size(size)?,
        None => (frame.width(), frame.height()),
    };

    let aperture = ApertureValue::clamped(args.aperture, &config.aperture);
    let mut renderer = PreviewRenderer::new(config);
    let mut surface = ImageSurface::new(width, height);
    if !renderer.render(0.0, &StillSource::new(frame), aperture, &mut surface) {
        bail!("Nothing to preview in {}", args.file.display());
    }
    let Some(image) = surface.into_last_frame() else {
        bail!("Preview produced no frame");
    };

    save_frame(&image, &args.output)?;
    println!(
        "Preview at {} saved to {}",
        aperture,
        args.output.display()
    );
    Ok(())
}

fn parse_size(size: &str) -> Result<(u32, u32)> {
    let parsed = size
        .split_once('x')
        .and_then(|(w, h)| Some((w.trim().parse().ok()?, h.trim().parse().ok()?)));
    match parsed {
        Some((w, h)) if w > 0 && h > 0 => Ok((w, h)),
        _ => bail!("Invalid size {:?}, expected WIDTHxHEIGHT", size),
    }
}
