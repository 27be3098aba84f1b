//! Timeline command - write render-ready timeline JSON.

use std::fs;
use std::path::{Path, PathBuf};

use colored::Colorize;
use tracing::info;

use crate::cli::BaselineChoice;

pub fn run(
    file: PathBuf,
    specimens: Vec<String>,
    threshold_minutes: f64,
    baseline: Option<BaselineChoice>,
    output: Option<PathBuf>,
    config: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let tb = super::open(&file, config, baseline)?;
    let selected = super::selection(&tb, specimens);

    let data = tb.timeline(&selected, threshold_minutes)?;
    let json = data.to_json_pretty()?;

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    fs::create_dir_all(parent)?;
                }
            }
            fs::write(&path, json)?;
            info!(
                items = data.items.len(),
                groups = data.groups.len(),
                "wrote timeline"
            );
            println!(
                "{} {}",
                "Saved to".green().bold(),
                path.display().to_string().white()
            );
        }
        None => println!("{}", json),
    }

    if let Some(warning) = &data.warning {
        eprintln!("{}", warning.yellow());
    }

    Ok(())
}
