pub mod analysis;
pub mod config;
pub mod data;
pub mod logging;
pub mod output;

use analysis::{DailyForwardReturnCalculator, ForwardReturnSummary};
use config::Config;
use data::loader::DataLoader;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    #[error(transparent)]
    Data(#[from] data::DataError),
    #[error(transparent)]
    Output(#[from] output::OutputError),
}

/// Loads `config.input_path`, computes forward returns and writes them to
/// `config.output_path`.
pub fn run(config: &Config) -> Result<ForwardReturnSummary, PipelineError> {
    config.validate()?;

    let loader = DataLoader::new(&config.loader);
    let observations = loader.load_observations(&config.input_path)?;

    let records = DailyForwardReturnCalculator::compute(&observations)?;
    let summary = DailyForwardReturnCalculator::summarize(&records);
    info!(
        records = summary.records,
        mean_return_pct = ?summary.mean_return_pct,
        min_return_pct = ?summary.min_return_pct,
        max_return_pct = ?summary.max_return_pct,
        "Forward return summary"
    );

    output::writer::write_records(&config.output_path, &records)?;
    Ok(summary)
}
