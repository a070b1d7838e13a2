use std::path::PathBuf;

use clap::Parser;
use hko_station_data::cli::{self, create_spinner};
use hko_station_data::fetcher::StationDataFetcher;
use hko_station_data::tides::parse_tide_table;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "parse-tides")]
#[command(about = "Fetch a tide table page (cached on disk) and print its readings", long_about = None)]
struct Cli {
    /// Tide table page URL
    #[arg(long, env = "URL")]
    url: String,

    /// Year the table belongs to
    #[arg(long, env = "YEAR", default_value_t = 2024)]
    year: i32,

    /// Cache file name (default: crawled-page-{year}.html)
    #[arg(long, env = "FILENAME")]
    filename: Option<String>,

    /// CSS selector for table rows
    #[arg(long, env = "ROW_SELECTOR", default_value = "table tr")]
    row_selector: String,

    /// CSS selector for cells within a row
    #[arg(long, env = "COL_SELECTOR", default_value = "td")]
    col_selector: String,

    #[arg(long, env = "CACHE_DIR", default_value = ".cache")]
    cache_dir: PathBuf,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    cli::init();
    let args = Cli::parse();

    let filename = args
        .filename
        .unwrap_or_else(|| format!("crawled-page-{}.html", args.year));
    let fetcher = StationDataFetcher::new().with_cache_dir(&args.cache_dir);

    let spinner = create_spinner(format!("Fetching {}...", args.url));
    let html = match fetcher.fetch_text(&args.url, &filename).await {
        Ok(html) => html,
        Err(e) => {
            spinner.finish_and_clear();
            error!("Error fetching tide page: {}", e);
            return Err(e.into());
        }
    };
    spinner.finish_and_clear();

    let readings = parse_tide_table(&html, &args.row_selector, &args.col_selector, args.year)?;
    info!("Parsed {} tide readings", readings.len());

    for reading in &readings {
        println!("{},{}", reading.datetime.format("%Y-%m-%d %H:%M"), reading.value);
    }

    Ok(())
}
