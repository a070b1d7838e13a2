use std::path::PathBuf;

use clap::Parser;
use hko_station_data::cli::{self, create_spinner, SourceArgs};
use hko_station_data::output::write_wind_csv;
use hko_station_data::Dataset;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "fetch-wind")]
#[command(about = "Extract one station's daily mean wind speed from the HKO station-block CSV", long_about = None)]
struct Cli {
    #[command(flatten)]
    source: SourceArgs,

    /// Output CSV (default: kaitak_wind_{start}_{end}.csv)
    #[arg(long)]
    output: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    cli::init();
    let args = Cli::parse();

    let config = args.source.resolve(Dataset::Wind, false)?;
    info!("Fetching wind CSV from: {}", config.source_url);

    let spinner = create_spinner("Downloading wind CSV...".to_string());
    let extraction = match args.source.fetcher().fetch_extraction(&config).await {
        Ok(extraction) => extraction,
        Err(e) => {
            spinner.finish_and_clear();
            error!("Error fetching CSV: {}", e);
            return Err(e.into());
        }
    };
    spinner.finish_with_message("Wind CSV ready");

    info!(
        "Found {} matching records for station '{}' between {} and {}",
        extraction.records.len(),
        config.station_query,
        config.start_year,
        config.end_year
    );

    let output = args.output.unwrap_or_else(|| {
        PathBuf::from(format!(
            "kaitak_wind_{}_{}.csv",
            config.start_year, config.end_year
        ))
    });
    let written = write_wind_csv(&output, &extraction.records)?;

    println!(
        "Processed CSV written: {} ({} records, {} rows skipped)",
        output.display(),
        written,
        extraction.skipped_rows
    );

    Ok(())
}
