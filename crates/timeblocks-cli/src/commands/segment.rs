//! Segment command - print block summaries per specimen.

use std::path::{Path, PathBuf};

use colored::Colorize;

use crate::cli::BaselineChoice;

pub fn run(
    file: PathBuf,
    specimens: Vec<String>,
    threshold_minutes: f64,
    baseline: Option<BaselineChoice>,
    json_output: bool,
    config: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let tb = super::open(&file, config, baseline)?;
    let selected = super::selection(&tb, specimens);

    let summaries = tb.summarize_selection(&selected, threshold_minutes)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    println!(
        "{} {} {}",
        "Blocks for".cyan().bold(),
        file.display().to_string().white(),
        format!("(gap threshold {} min)", threshold_minutes).dimmed()
    );
    println!();

    if summaries.is_empty() {
        println!("{}", "Select at least one specimen.".yellow());
        return Ok(());
    }

    for summary in &summaries {
        println!(
            "{} {}",
            summary.specimen.yellow().bold(),
            format!(
                "({} blocks, {} measurements)",
                summary.block_count, summary.measurement_count
            )
            .dimmed()
        );

        if summary.blocks.is_empty() {
            println!("  {}", "no measurements".dimmed());
        }
        for block in &summary.blocks {
            println!(
                "  #{:<3} {:9} {}",
                block.block_index,
                block.color,
                block.label
            );
        }
        println!();
    }

    Ok(())
}
