//! Example: segment every specimen in a measurement file.
//!
//! Usage:
//!   cargo run --example segment -- <file_path> [threshold_minutes]
//!
//! Example:
//!   cargo run --example segment -- tests/fixtures/measurements.csv 30

use std::env;
use std::path::Path;

use timeblocks::Timeblocks;

fn main() -> timeblocks::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: cargo run --example segment -- <file_path> [threshold_minutes]");
        eprintln!("\nExample:");
        eprintln!("  cargo run --example segment -- tests/fixtures/measurements.csv 30");
        std::process::exit(1);
    }

    let file_path = &args[1];
    let path = Path::new(file_path);

    if !path.exists() {
        eprintln!("Error: File not found: {}", file_path);
        std::process::exit(1);
    }

    let threshold_minutes: f64 = match args.get(2) {
        Some(raw) => match raw.parse() {
            Ok(value) => value,
            Err(_) => {
                eprintln!("Error: threshold must be a number of minutes, got '{}'", raw);
                std::process::exit(1);
            }
        },
        None => 60.0,
    };

    let tb = Timeblocks::open(path)?;

    let separator = "=".repeat(80);
    println!("{}", separator);
    println!("Blocks for {} (gap threshold {} min)", file_path, threshold_minutes);
    println!("{}", separator);
    println!();

    println!("## Source");
    println!("  File: {}", tb.store().source().file);
    println!("  Format: {}", tb.store().source().format);
    println!("  Measurements: {}", tb.store().len());
    println!("  Specimens: {}", tb.list_specimens().len());
    println!();

    for specimen in tb.list_specimens() {
        let summary = tb.summarize_specimen(specimen, threshold_minutes)?;
        println!(
            "## {} ({} blocks, {} measurements)",
            specimen, summary.block_count, summary.measurement_count
        );
        for block in &summary.blocks {
            println!("  #{:<3} {:8} {}", block.block_index, block.color, block.label);
        }
        println!();
    }

    Ok(())
}
