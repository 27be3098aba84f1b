//! Timeblocks CLI - specimen timeline segmentation.

mod cli;
mod commands;

use std::io;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let config = cli.config.as_deref();

    let result = match cli.command {
        Commands::Specimens { file, json } => commands::specimens::run(file, json, config),

        Commands::Segment {
            file,
            specimens,
            threshold,
            baseline,
            json,
        } => commands::segment::run(file, specimens, threshold, baseline, json, config),

        Commands::Timeline {
            file,
            specimens,
            threshold,
            baseline,
            output,
        } => commands::timeline::run(file, specimens, threshold, baseline, output, config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
