use super::{DataError, PriceObservation, Result};
use crate::config::LoaderSettings;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

// Date-only values become midnight timestamps
const DATE_ONLY_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

pub struct DataLoader<'a> {
    settings: &'a LoaderSettings,
}

impl<'a> DataLoader<'a> {
    pub fn new(settings: &'a LoaderSettings) -> Self {
        Self { settings }
    }

    /// Reads a headerless `timestamp,symbol,price` file.
    pub fn load_observations<P: AsRef<Path>>(&self, path: P) -> Result<Vec<PriceObservation>> {
        let path = path.as_ref();
        info!("Loading price observations from {}", path.display());

        let file = File::open(path).map_err(|source| DataError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let observations = self.read_observations(file)?;

        info!("Read {} price observations", observations.len());
        Ok(observations)
    }

    pub fn read_observations<R: Read>(&self, reader: R) -> Result<Vec<PriceObservation>> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut observations = Vec::new();
        for result in rdr.records() {
            let record = result?;
            observations.push(self.parse_record(&record)?);
        }

        if observations.is_empty() {
            return Err(DataError::EmptyInput);
        }
        Ok(observations)
    }

    fn parse_record(&self, record: &StringRecord) -> Result<PriceObservation> {
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let parse_error = |message: String| DataError::Parse { line, message };

        if record.len() != 3 {
            return Err(parse_error(format!(
                "expected 3 fields (timestamp, symbol, price), found {}",
                record.len()
            )));
        }

        let timestamp = self
            .parse_timestamp(&record[0])
            .ok_or_else(|| parse_error(format!("unrecognised timestamp '{}'", &record[0])))?;
        let price = record[2]
            .parse::<f64>()
            .map_err(|e| parse_error(format!("invalid price '{}': {}", &record[2], e)))?;
        if !price.is_finite() {
            return Err(parse_error(format!("non-finite price '{}'", &record[2])));
        }

        Ok(PriceObservation {
            timestamp,
            symbol: record[1].to_string(),
            price,
        })
    }

    /// Tries RFC 3339, then the configured formats, then date-only formats.
    pub fn parse_timestamp(&self, value: &str) -> Option<NaiveDateTime> {
        // Offsets are dropped, keeping the wall-clock time the feed reported
        if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
            return Some(dt.naive_local());
        }

        for fmt in &self.settings.timestamp_formats {
            if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
                return Some(dt);
            }
        }

        for fmt in DATE_ONLY_FORMATS {
            if let Ok(d) = NaiveDate::parse_from_str(value, fmt) {
                debug!("Timestamp '{}' has no time component", value);
                return Some(d.and_time(NaiveTime::MIN));
            }
        }

        None
    }
}
