use clap::Parser;
use hko_station_data::{cli, Config, Dataset};

#[derive(Parser)]
#[command(name = "show-config")]
#[command(about = "Load .env and print the configuration each tool would use", long_about = None)]
struct Cli {}

fn print_config(dataset: Dataset) {
    println!("[{dataset}]");
    match Config::from_env(dataset) {
        Ok(config) => {
            println!("  {} = {}", dataset.url_var(), config.source_url);
            println!("  {} = {}", dataset.station_var(), config.station_query);
            println!("  START_YEAR = {}", config.start_year);
            println!("  END_YEAR = {}", config.end_year);
        }
        Err(e) => println!("  invalid: {e}"),
    }
}

fn main() {
    cli::init();
    let _cli = Cli::parse();

    println!("Reloaded .env into the process environment");
    print_config(Dataset::Wind);
    print_config(Dataset::Rainfall);

    let humidity = std::env::var("HUMIDITY_URL").unwrap_or_else(|_| "(unset)".to_string());
    println!("HUMIDITY_URL = {humidity}");
}
