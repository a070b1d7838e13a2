use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use hko_station_data::cli;
use hko_station_data::rainfall_csv::{load_records, validate_header, HeaderCheck};
use hko_station_data::utils::format_optional;

#[derive(Parser)]
#[command(name = "preview-rainfall")]
#[command(about = "Validate and load a processed rainfall CSV, then print a short preview", long_about = None)]
struct Cli {
    /// CSV to preview
    #[arg(default_value = "rainfall_processed.csv")]
    path: PathBuf,

    /// Number of sample rows to print
    #[arg(long, default_value_t = 10)]
    rows: usize,
}

const EXIT_MISSING: u8 = 2;
const EXIT_BAD_HEADER: u8 = 3;
const EXIT_LOAD_FAILED: u8 = 4;

fn main() -> ExitCode {
    cli::init();
    let args = Cli::parse();

    if !args.path.exists() {
        eprintln!("ERROR: {} not found", args.path.display());
        return ExitCode::from(EXIT_MISSING);
    }

    match validate_header(&args.path) {
        Ok(HeaderCheck::Valid) => {}
        Ok(HeaderCheck::Invalid(msg)) => {
            eprintln!("ERROR: CSV header invalid: {msg}");
            return ExitCode::from(EXIT_BAD_HEADER);
        }
        Err(e) => {
            eprintln!("ERROR: CSV header invalid: {e}");
            return ExitCode::from(EXIT_BAD_HEADER);
        }
    }

    let rows = match load_records(&args.path) {
        Ok(rows) => rows,
        Err(e) => {
            eprintln!("ERROR loading CSV: {e}");
            return ExitCode::from(EXIT_LOAD_FAILED);
        }
    };

    println!("Loaded {} records from {}", rows.len(), args.path.display());
    if !rows.is_empty() {
        println!("\nSample records (first {}):", args.rows);
        for row in rows.iter().take(args.rows) {
            let hum = row
                .humidity_pct
                .map(|h| format!("{h:.1}%"))
                .unwrap_or_default();
            println!(
                "  {}  rain={} mm  hum={}",
                row.datetime.format("%Y-%m-%d %H:%M"),
                format_optional(row.rainfall_mm, 2),
                hum
            );
        }
    }

    let values: Vec<f64> = rows.iter().filter_map(|r| r.rainfall_mm).collect();
    if values.is_empty() {
        println!("\nNo numeric rainfall values found.");
    } else {
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        println!(
            "\nRainfall stats: count={}, mean={mean:.2}, min={min:.2}, max={max:.2}",
            values.len()
        );
    }

    ExitCode::SUCCESS
}
