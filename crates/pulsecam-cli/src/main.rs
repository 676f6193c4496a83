mod commands;
mod progress;
mod summary;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pulsecam", about = "Heart-rate driven long-exposure camera")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (TOML); defaults are used for missing keys
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate a heart rate from a CSV of timestamp_ms,intensity samples
    Estimate(commands::estimate::EstimateArgs),
    /// Run a measurement session over a sequence of finger frames
    Measure(commands::measure::MeasureArgs),
    /// Show exposure and look parameters for a heart rate and aperture
    Params(commands::params::ParamsArgs),
    /// Composite frames into a simulated long exposure
    Composite(commands::composite::CompositeArgs),
    /// Composite frames again with a saved capture record
    Replay(commands::replay::ReplayArgs),
    /// Render one preview frame
    Preview(commands::preview::PreviewArgs),
    /// Print or save the effective configuration
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = commands::load_config(cli.config.as_deref())?;
    match &cli.command {
        Commands::Estimate(args) => commands::estimate::run(args, &config),
        Commands::Measure(args) => commands::measure::run(args, &config),
        Commands::Params(args) => commands::params::run(args, &config),
        Commands::Composite(args) => commands::composite::run(args, &config),
        Commands::Replay(args) => commands::replay::run(args, &config),
        Commands::Preview(args) => commands::preview::run(args, &config),
        Commands::Config(args) => commands::config::run(args, &config),
    }
}
