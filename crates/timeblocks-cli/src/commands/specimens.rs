//! Specimens command - list specimens and their measurement counts.

use std::path::{Path, PathBuf};

use colored::Colorize;
use serde::Serialize;

#[derive(Serialize)]
struct SpecimenRow<'a> {
    specimen: &'a str,
    measurements: usize,
}

pub fn run(
    file: PathBuf,
    json_output: bool,
    config: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let tb = super::open(&file, config, None)?;

    let rows: Vec<SpecimenRow> = tb
        .list_specimens()
        .iter()
        .map(|specimen| SpecimenRow {
            specimen: specimen.as_str(),
            measurements: tb.store().measurements_for(specimen).len(),
        })
        .collect();

    if json_output {
        let listing = serde_json::json!({
            "file": tb.store().source().file,
            "hash": tb.store().source().hash,
            "measurements": tb.store().len(),
            "specimens": rows,
        });
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Specimens in".cyan().bold(),
        file.display().to_string().white()
    );
    println!();

    if rows.is_empty() {
        println!("{}", "No measurements found.".yellow());
        return Ok(());
    }

    for row in &rows {
        println!("  {:20} {}", row.specimen, row.measurements.to_string().white());
    }
    println!();
    println!(
        "{} specimens, {} measurements",
        rows.len().to_string().white().bold(),
        tb.store().len().to_string().white().bold()
    );

    Ok(())
}
