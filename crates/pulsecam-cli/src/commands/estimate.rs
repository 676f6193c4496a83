use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use pulsecam_core::pipeline::config::PulsecamConfig;
use pulsecam_core::signal::estimator::estimate_from_intensities;
use pulsecam_core::signal::{ColorSample, SampleWindow};

use crate::summary::print_estimate_summary;

#[derive(Args)]
pub struct EstimateArgs {
    /// CSV file of `timestamp_ms,intensity` lines
    pub file: PathBuf,

    /// Session length in seconds; defaults to the configured session duration
    #[arg(long)]
    pub duration: Option<f64>,

    /// Use the span of the timestamps as the session length
    #[arg(long, conflicts_with = "duration")]
    pub from_timestamps: bool,
}

pub fn run(args: &EstimateArgs, config: &PulsecamConfig) -> Result<()> {
    let window = read_samples(&args.file, config.heart_rate.window_capacity)?;
    if window.is_empty() {
        bail!("No samples in {}", args.file.display());
    }

    let duration_sec = if args.from_timestamps {
        window.span_ms() / 1000.0
    } else {
        args.duration.unwrap_or(config.heart_rate.session_duration_sec)
    };
    if duration_sec.is_nan() || duration_sec <= 0.0 {
        bail!("Session length must be positive, got {duration_sec} s");
    }

    let estimate =
        estimate_from_intensities(&window.intensities(), duration_sec, &config.heart_rate);
    print_estimate_summary(&estimate, window.len(), duration_sec);
    Ok(())
}

fn read_samples(path: &Path, capacity: usize) -> Result<SampleWindow> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read samples from {}", path.display()))?;

    let mut window = SampleWindow::new(capacity);
    let mut evicted = 0usize;
    for (i, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match parse_line(line) {
            Some(sample) => {
                if window.push(sample).is_some() {
                    evicted += 1;
                }
            }
            // A header row is allowed on the first line only.
            None if i == 0 => continue,
            None => bail!("Malformed sample on line {}: {:?}", i + 1, line),
        }
    }
    if evicted > 0 {
        tracing::warn!(evicted, capacity, "Window full, oldest samples dropped");
    }
    Ok(window)
}

fn parse_line(line: &str) -> Option<ColorSample> {
    let (t, v) = line.split_once(',')?;
    let timestamp_ms = t.trim().parse().ok()?;
    let intensity = v.trim().parse().ok()?;
    Some(ColorSample::new(timestamp_ms, intensity))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sample_lines() {
        let sample = parse_line(" 120, 88.5 ").unwrap();
        assert_eq!(sample.timestamp_ms, 120.0);
        assert_eq!(sample.intensity, 88.5);
        assert!(parse_line("timestamp_ms,intensity").is_none());
        assert!(parse_line("12").is_none());
    }
}
