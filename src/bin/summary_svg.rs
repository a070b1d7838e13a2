use std::path::PathBuf;

use clap::Parser;
use hko_station_data::chart::{summarize_files, summary_svg};
use hko_station_data::cli;
use tracing::info;

#[derive(Parser)]
#[command(name = "summary-svg")]
#[command(about = "Render the wind/rainfall summary image from the processed daily CSVs", long_about = None)]
struct Cli {
    #[arg(long, default_value = "kaitak_wind_2010_2025.csv")]
    wind_csv: PathBuf,

    #[arg(long, default_value = "rainfall_processed.csv")]
    rainfall_csv: PathBuf,

    #[arg(long, default_value = "7.svg")]
    output: PathBuf,

    #[arg(long, default_value = "Rainfall & Wind Summary (Kai Tak)")]
    title: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    cli::init();
    let args = Cli::parse();

    let summary = summarize_files(&args.wind_csv, &args.rainfall_csv)?;
    info!(
        "Mean wind: {:?} km/h, total rainfall: {:?} mm",
        summary.mean_wind, summary.total_rain
    );

    std::fs::write(&args.output, summary_svg(&summary, &args.title))?;
    println!("Wrote {}", args.output.display());

    Ok(())
}
