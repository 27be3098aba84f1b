//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use timeblocks::GapBaseline;

/// Timeblocks: segment specimen measurement timelines at idle gaps
#[derive(Parser)]
#[command(name = "timeblocks")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// JSON configuration file (loader columns, palette, timeline options)
    #[arg(long, global = true, value_name = "CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List specimens in a measurement file
    Specimens {
        /// Path to the measurement file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Segment specimens into blocks and print block summaries
    Segment {
        /// Path to the measurement file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Specimen to segment (repeatable; default: configured selection)
        #[arg(short, long = "specimen", value_name = "SPECIMEN")]
        specimens: Vec<String>,

        /// Maximum idle gap inside a block, in minutes
        #[arg(short, long = "threshold-minutes", default_value = "60", allow_negative_numbers = true)]
        threshold: f64,

        /// Gap baseline (overrides the configuration file)
        #[arg(long)]
        baseline: Option<BaselineChoice>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write render-ready timeline JSON for a selection
    Timeline {
        /// Path to the measurement file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Specimen to include (repeatable; default: configured selection)
        #[arg(short, long = "specimen", value_name = "SPECIMEN")]
        specimens: Vec<String>,

        /// Maximum idle gap inside a block, in minutes
        #[arg(short, long = "threshold-minutes", default_value = "60", allow_negative_numbers = true)]
        threshold: f64,

        /// Gap baseline (overrides the configuration file)
        #[arg(long)]
        baseline: Option<BaselineChoice>,

        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Gap baseline choice
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BaselineChoice {
    /// Gap from the previous measurement's end
    #[default]
    Previous,
    /// Gap from the latest end seen in the current block
    RunningMax,
}

impl std::str::FromStr for BaselineChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "previous" | "previous-end" | "prev" => Ok(BaselineChoice::Previous),
            "running-max" | "running-max-end" | "max" => Ok(BaselineChoice::RunningMax),
            _ => Err(format!(
                "Unknown baseline: {}. Use: previous or running-max.",
                s
            )),
        }
    }
}

impl std::fmt::Display for BaselineChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BaselineChoice::Previous => write!(f, "previous"),
            BaselineChoice::RunningMax => write!(f, "running-max"),
        }
    }
}

impl From<BaselineChoice> for GapBaseline {
    fn from(choice: BaselineChoice) -> Self {
        match choice {
            BaselineChoice::Previous => GapBaseline::PreviousEnd,
            BaselineChoice::RunningMax => GapBaseline::RunningMaxEnd,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_segment_args() {
        let cli = Cli::try_parse_from([
            "timeblocks",
            "segment",
            "data.csv",
            "-s",
            "FOF2-1",
            "-s",
            "FOF2-2",
            "-t",
            "45",
            "--baseline",
            "running-max",
        ])
        .unwrap();

        match cli.command {
            Commands::Segment {
                specimens,
                threshold,
                baseline,
                json,
                ..
            } => {
                assert_eq!(specimens, vec!["FOF2-1", "FOF2-2"]);
                assert_eq!(threshold, 45.0);
                assert_eq!(baseline, Some(BaselineChoice::RunningMax));
                assert!(!json);
            }
            _ => panic!("expected segment command"),
        }
    }

    #[test]
    fn test_negative_threshold_reaches_library() {
        let cli = Cli::try_parse_from(["timeblocks", "timeline", "data.csv", "-t", "-5"]).unwrap();
        match cli.command {
            Commands::Timeline { threshold, .. } => assert_eq!(threshold, -5.0),
            _ => panic!("expected timeline command"),
        }
    }

    #[test]
    fn test_baseline_choice_parsing() {
        assert_eq!("previous".parse::<BaselineChoice>(), Ok(BaselineChoice::Previous));
        assert_eq!("RUNNING_MAX".parse::<BaselineChoice>(), Ok(BaselineChoice::RunningMax));
        assert!("median".parse::<BaselineChoice>().is_err());
        assert_eq!(
            GapBaseline::from(BaselineChoice::RunningMax),
            GapBaseline::RunningMaxEnd
        );
    }
}
