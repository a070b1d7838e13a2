use std::path::PathBuf;

use clap::Parser;
use hko_station_data::chart::{summarize_files, summary_svg};
use hko_station_data::cli::{self, create_spinner, SourceArgs};
use hko_station_data::output::write_rainfall_csv;
use hko_station_data::Dataset;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "fetch-rainfall")]
#[command(about = "Extract one station's daily rainfall from the HKO station-block CSV and refresh the summary image", long_about = None)]
struct Cli {
    #[command(flatten)]
    source: SourceArgs,

    /// Output CSV
    #[arg(long, default_value = "rainfall_processed.csv")]
    output: PathBuf,

    /// Daily wind CSV used for the summary image
    #[arg(long, default_value = "kaitak_wind_2010_2025.csv")]
    wind_csv: PathBuf,

    /// Summary image to regenerate
    #[arg(long, default_value = "7.svg")]
    summary: PathBuf,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    cli::init();
    let args = Cli::parse();

    let config = args.source.resolve(Dataset::Rainfall, false)?;
    info!("Fetching rainfall CSV from: {}", config.source_url);

    let spinner = create_spinner("Downloading rainfall CSV...".to_string());
    let extraction = match args.source.fetcher().fetch_extraction(&config).await {
        Ok(extraction) => extraction,
        Err(e) => {
            spinner.finish_and_clear();
            error!("Error fetching CSV: {}", e);
            return Err(e.into());
        }
    };
    spinner.finish_with_message("Rainfall CSV ready");

    let written = write_rainfall_csv(&args.output, &extraction.records)?;
    println!(
        "Wrote {} with {} records ({} rows skipped)",
        args.output.display(),
        written,
        extraction.skipped_rows
    );

    info!("Regenerating {}", args.summary.display());
    let summary = summarize_files(&args.wind_csv, &args.output)?;
    std::fs::write(
        &args.summary,
        summary_svg(&summary, "Rainfall & Wind Summary (Kai Tak)"),
    )?;
    println!("Wrote {}", args.summary.display());

    Ok(())
}
