pub mod aggregate;
pub mod chart;
pub mod cli;
pub mod config;
pub mod fetch_error;
pub mod fetcher;
pub mod output;
pub mod rainfall_csv;
pub mod series;
pub mod station_block;
pub mod tides;
pub mod utils;

pub use config::{Config, ConfigError, Dataset};
pub use station_block::{extract, BlockLayout, Extraction, StationBlockExtractor, StationRecord};
