use std::fs;
use std::path::PathBuf;

use clap::Parser;
use tracing::{info, warn};

use ukrag::catalog;
use ukrag::config::AppConfig;
use ukrag::error::AppError;
use ukrag::fetch::HttpFetcher;
use ukrag::record::{Category, MetricRecord};
use ukrag::telemetry;

#[derive(Parser, Debug)]
#[command(
    name = "fetcher",
    about = "Fetch UK government statistics and emit RAG-classified metric records as JSON",
    version
)]
struct Cli {
    /// Emit one record per historical period instead of the latest only
    #[arg(long)]
    historical: bool,
    /// Also write the JSON array to a file
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,
    /// Categories to run (default: all)
    #[arg(value_name = "CATEGORY")]
    categories: Vec<Category>,
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let categories: Vec<Category> = if cli.categories.is_empty() {
        Category::ALL.to_vec()
    } else {
        cli.categories
    };

    let fetcher = HttpFetcher::new(&config.http.user_agent)?;
    let registry = catalog::registry();

    let mut records: Vec<MetricRecord> = Vec::new();
    for category in &categories {
        info!(%category, historical = cli.historical, "running category batch");
        let batch = catalog::run_category(
            *category,
            &fetcher,
            &registry,
            &config.http,
            cli.historical,
        );
        if batch.is_empty() {
            warn!(%category, "category produced no records");
        }
        records.extend(batch);
    }
    info!(records = records.len(), "batch complete");

    let json = serde_json::to_string_pretty(&records)?;
    println!("{json}");
    if let Some(path) = &cli.output {
        fs::write(path, &json)?;
        info!(path = %path.display(), "wrote output file");
    }
    Ok(())
}
