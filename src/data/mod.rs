pub mod loader;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::path::PathBuf;
use thiserror::Error;

/// A single intraday price print, in the order it was read from the input file.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceObservation {
    pub timestamp: NaiveDateTime,
    pub symbol: String,
    pub price: f64,
}

impl PriceObservation {
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    pub fn is_midnight(&self) -> bool {
        self.timestamp.time() == NaiveTime::MIN
    }
}

#[derive(Debug, Error)]
pub enum DataError {
    #[error("Failed to read {}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Parse error on line {line}: {message}")]
    Parse { line: u64, message: String },
    #[error("Input contains no price observations")]
    EmptyInput,
}

pub type Result<T> = std::result::Result<T, DataError>;
