use anyhow::{Context, Result};
use clap::Parser;
use forward_returns::config::{Config, SettingsFile};
use forward_returns::logging;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "forward-returns")]
#[command(about = "Compute 30-day forward returns from intraday prices of one symbol")]
#[command(version)]
struct Cli {
    /// Headerless CSV of timestamp,symbol,price rows
    input_path: PathBuf,

    /// Where the forward return CSV is written
    output_path: PathBuf,

    /// Optional YAML file with loader settings
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging();

    let mut config = Config::new(cli.input_path, cli.output_path);
    if let Some(path) = &cli.config {
        let settings = SettingsFile::load(path)
            .with_context(|| format!("loading settings from {}", path.display()))?;
        config = config.with_settings_file(settings);
    }

    forward_returns::run(&config).with_context(|| {
        format!(
            "computing forward returns for {}",
            config.input_path.display()
        )
    })?;

    println!(
        "30-day future returns calculated and saved to {}",
        config.output_path.display()
    );
    Ok(())
}
