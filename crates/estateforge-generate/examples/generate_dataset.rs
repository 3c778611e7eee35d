use std::env;
use std::path::PathBuf;

use estateforge_generate::{DatasetConfig, GenerationEngine};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = DatasetConfig::default();

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--out" => {
                config.out_path = args.next().map(PathBuf::from).ok_or("missing --out value")?;
            }
            "--rows" => {
                config.rows = args.next().ok_or("missing --rows value")?.parse()?;
            }
            "--seed" => {
                config.seed = args.next().ok_or("missing --seed value")?.parse()?;
            }
            _ => return Err(format!("unexpected argument '{arg}'").into()),
        }
    }

    let engine = GenerationEngine::new(config);
    let result = engine.run()?;
    print!("{}", result.report.render());
    Ok(())
}
