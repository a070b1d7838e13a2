//! Helpers shared by the command line tools
use std::path::PathBuf;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use crate::config::{Config, ConfigError, Dataset};
use crate::fetcher::StationDataFetcher;

/// Load `.env` (if any) and install the fmt subscriber, `RUST_LOG` defaulting to `info`
pub fn init() {
    // Load .env file if it exists (ignore errors if not found)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

/// Creates a spinner.
pub fn create_spinner(message: String) -> ProgressBar {
    let bar = ProgressBar::new_spinner().with_message(message);
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg} [{elapsed}]") {
        bar.set_style(style);
    }
    bar.enable_steady_tick(Duration::from_millis(100));

    bar
}

/// Source options shared by the fetch tools. Flags override the environment.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Station-block CSV URL (overrides WIND_URL / RAINFALL_URL)
    #[arg(long)]
    pub url: Option<String>,

    /// Station name or substring, matched ignoring case, spaces and punctuation
    #[arg(long)]
    pub station: Option<String>,

    /// First year to keep (overrides START_YEAR)
    #[arg(long)]
    pub start_year: Option<i32>,

    /// Last year to keep (overrides END_YEAR)
    #[arg(long)]
    pub end_year: Option<i32>,

    /// Directory for cached downloads
    #[arg(long, env = "CACHE_DIR", default_value = ".cache")]
    pub cache_dir: PathBuf,

    /// Always download, ignoring and not writing the cache
    #[arg(long)]
    pub no_cache: bool,
}

impl SourceArgs {
    /// Build a validated [`Config`], taking flags first and environment second
    pub fn resolve(&self, dataset: Dataset, require_url: bool) -> Result<Config, ConfigError> {
        Config::from_lookup(dataset, require_url, |name| {
            let flag = match name {
                n if n == dataset.url_var() => self.url.clone(),
                n if n == dataset.station_var() => self.station.clone(),
                "START_YEAR" => self.start_year.map(|y| y.to_string()),
                "END_YEAR" => self.end_year.map(|y| y.to_string()),
                _ => None,
            };
            flag.or_else(|| std::env::var(name).ok())
        })
    }

    pub fn fetcher(&self) -> StationDataFetcher {
        let fetcher = StationDataFetcher::new();
        if self.no_cache {
            fetcher
        } else {
            fetcher.with_cache_dir(&self.cache_dir)
        }
    }
}
