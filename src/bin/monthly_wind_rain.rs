use std::path::PathBuf;

use clap::Parser;
use hko_station_data::aggregate::aggregate_monthly;
use hko_station_data::chart::monthly_chart_svg;
use hko_station_data::cli;
use hko_station_data::output::write_monthly_wind_rain_csv;
use hko_station_data::series::{read_rainfall_csv, read_wind_csv};
use tracing::warn;

#[derive(Parser)]
#[command(name = "monthly-wind-rain")]
#[command(about = "Monthly rainfall totals and mean wind from the processed daily CSVs", long_about = None)]
struct Cli {
    /// Daily wind CSV (date,station,mean_wspd)
    #[arg(long, default_value = "kaitak_wind_2010_2025.csv")]
    wind_csv: PathBuf,

    /// Daily rainfall CSV (datetime,rainfall_mm,...)
    #[arg(long, default_value = "rainfall_processed.csv")]
    rainfall_csv: PathBuf,

    /// Output CSV
    #[arg(long, default_value = "monthly_wind_rain.csv")]
    output: PathBuf,

    /// Output chart
    #[arg(long, default_value = "monthly_wind_rain.svg")]
    chart: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    cli::init();
    let args = Cli::parse();

    let wind = read_wind_csv(&args.wind_csv)?;
    let rain = read_rainfall_csv(&args.rainfall_csv)?;

    let months = aggregate_monthly(&wind, &rain);
    if months.is_empty() {
        warn!("No wind or rainfall data found; nothing to write");
        return Ok(());
    }

    write_monthly_wind_rain_csv(&args.output, &months)?;
    std::fs::write(
        &args.chart,
        monthly_chart_svg(&months, "Monthly Rainfall (bars) and Mean Wind (line) - Kai Tak"),
    )?;
    println!("Wrote {} and {}", args.output.display(), args.chart.display());

    Ok(())
}
