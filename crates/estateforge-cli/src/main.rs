use std::path::PathBuf;

use clap::Parser;
use estateforge_generate::{DatasetConfig, GenerationEngine, GenerationError};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
enum CliError {
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(
    name = "estateforge",
    version,
    about = "Generate a synthetic real-estate listing dataset"
)]
struct Cli {
    /// Destination CSV file.
    #[arg(long, default_value = "real_estate_data.csv")]
    out: PathBuf,
    /// Rows to generate before duplicate injection.
    #[arg(long, default_value_t = 300)]
    rows: usize,
    /// Seed for the reproducible random stream.
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Optional path for the run report as JSON.
    #[arg(long, value_name = "PATH")]
    report_json: Option<PathBuf>,
}

fn main() -> Result<(), CliError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = DatasetConfig::default();
    config.out_path = cli.out;
    config.rows = cli.rows;
    config.seed = cli.seed;

    let engine = GenerationEngine::new(config);
    let result = engine.run()?;

    if let Some(path) = cli.report_json {
        std::fs::write(&path, serde_json::to_vec_pretty(&result.report)?)?;
    }

    print!("{}", result.report.render());
    Ok(())
}
