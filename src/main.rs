mod input;
mod models;
mod output;
mod pool;
mod scrapers;
mod settings;

use std::path::Path;

use chrono::Local;
use scrapers::{ChromeDriver, HomesScraper};
use settings::Settings;
use tracing::{info, Level};

const SETTINGS_FILE: &str = "settings.json";
const INPUT_XLSX: &str = "input.xlsx";
const INPUT_CSV: &str = "input.csv";
const OUTPUT_FILE: &str = "output.csv";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let start = Local::now();
    info!("Script starts at: {}", start.format("%d-%m-%Y %H:%M:%S %p"));

    let settings = Settings::load(SETTINGS_FILE)?;

    let input_path = if Path::new(INPUT_XLSX).exists() {
        INPUT_XLSX
    } else {
        INPUT_CSV
    };
    let queries = input::load_queries(input_path)?;

    let driver_path = settings.driver_path.clone();
    let timeout = settings.page_load_timeout;
    let records = pool::run_pool(queries, settings.workers, move |chunk| {
        let driver = ChromeDriver::new(&driver_path)?;
        Ok(HomesScraper::new(driver, timeout).run(&chunk))
    })
    .await;

    output::write_records(OUTPUT_FILE, &records)?;

    let end = Local::now();
    info!("Script ends at: {}", end.format("%d-%m-%Y %H:%M:%S %p"));
    let elapsed = (end - start).num_seconds() as f64 / 60.0;
    info!("Time Elapsed: {:.4} minutes", elapsed);

    Ok(())
}
