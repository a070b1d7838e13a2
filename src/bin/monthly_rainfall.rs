use std::path::PathBuf;

use clap::Parser;
use hko_station_data::aggregate::{aggregate_monthly, aggregate_monthly_over, DailyValue};
use hko_station_data::chart::monthly_chart_svg;
use hko_station_data::cli::{self, create_spinner, SourceArgs};
use hko_station_data::output::write_monthly_rainfall_csv;
use hko_station_data::Dataset;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "monthly-rainfall")]
#[command(about = "Aggregate one station's daily rainfall into monthly totals (RAINFALL_URL required)", long_about = None)]
struct Cli {
    #[command(flatten)]
    source: SourceArgs,

    /// Output CSV (default: kaitak_monthly_rainfall_{start}_{end}.csv)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Skip the SVG chart
    #[arg(long)]
    no_chart: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    cli::init();
    let args = Cli::parse();

    // No default source here: a missing RAINFALL_URL stops the run before any I/O
    let config = args.source.resolve(Dataset::Rainfall, true)?;
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
    info!(
        "Processed {} daily records for station {}",
        extraction.records.len(),
        config.station_query
    );

    let daily: Vec<DailyValue> = extraction.records.iter().map(DailyValue::from).collect();
    // Every month of the observed years, empty months at zero
    let totals = aggregate_monthly(&[], &daily);

    let output = args.output.unwrap_or_else(|| {
        PathBuf::from(format!(
            "kaitak_monthly_rainfall_{}_{}.csv",
            config.start_year, config.end_year
        ))
    });
    write_monthly_rainfall_csv(&output, &totals)?;
    println!("Wrote monthly CSV: {} ({} months)", output.display(), totals.len());

    if totals.is_empty() {
        println!("No monthly data to plot");
        return Ok(());
    }
    if args.no_chart {
        return Ok(());
    }

    let months = aggregate_monthly_over(&[], &daily, config.year_range());

    let chart = PathBuf::from(format!(
        "monthly_rainfall_{}_{}_{}.svg",
        config.station_query, config.start_year, config.end_year
    ));
    let title = format!(
        "Monthly Rainfall - {} ({}-{})",
        config.station_query, config.start_year, config.end_year
    );
    std::fs::write(&chart, monthly_chart_svg(&months, &title))?;
    println!("Saved chart: {}", chart.display());

    Ok(())
}
