use super::{OutputError, Result};
use crate::analysis::ForwardReturnRecord;
use csv::Writer;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use tracing::info;

pub const HEADER: [&str; 6] = [
    "symbol",
    "date",
    "price",
    "close_date",
    "price_at_close_date",
    "30_day_future_return",
];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Shortest round-trip form; whole numbers keep `.0`, non-finite values
/// come out as `inf`, `-inf` or `NaN`.
///
/// Magnitudes below 1e-4 or from 1e16 up use a signed two-digit exponent
/// (`1e-05`, `1.5e+16`).
pub fn format_decimal(value: f64) -> String {
    let magnitude = value.abs();
    if value.is_finite() && value != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let formatted = format!("{:e}", value);
        if let Some((mantissa, exponent)) = formatted.split_once('e') {
            if let Ok(exponent) = exponent.parse::<i32>() {
                let sign = if exponent < 0 { '-' } else { '+' };
                return format!("{}e{}{:02}", mantissa, sign, exponent.abs());
            }
        }
        return formatted;
    }

    let formatted = value.to_string();
    if value.is_finite() && !formatted.contains('.') {
        format!("{}.0", formatted)
    } else {
        formatted
    }
}

// Write failures on the underlying file are reported against its path
fn write_error(path: &Path, err: csv::Error) -> OutputError {
    if !err.is_io_error() {
        return OutputError::Csv(err);
    }
    let source = match err.into_kind() {
        csv::ErrorKind::Io(source) => source,
        other => io::Error::other(format!("{:?}", other)),
    };
    OutputError::FileWrite {
        path: path.to_path_buf(),
        source,
    }
}

pub fn write_records<P: AsRef<Path>>(path: P, records: &[ForwardReturnRecord]) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| OutputError::FileWrite {
        path: path.to_path_buf(),
        source,
    })?;

    write_to(file, path, records)?;

    info!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}

/// Writes the CSV to any sink; `destination` names it in errors.
pub fn write_to<W: Write>(
    writer: W,
    destination: &Path,
    records: &[ForwardReturnRecord],
) -> Result<()> {
    let mut wtr = Writer::from_writer(writer);
    wtr.write_record(HEADER)
        .map_err(|e| write_error(destination, e))?;

    for record in records {
        wtr.write_record([
            record.symbol.clone(),
            record.open_date.format(DATE_FORMAT).to_string(),
            format_decimal(record.open_price),
            record.close_date.format(DATE_FORMAT).to_string(),
            format_decimal(record.close_price),
            format_decimal(record.forward_return_pct),
        ])
        .map_err(|e| write_error(destination, e))?;
    }

    wtr.flush().map_err(|source| OutputError::FileWrite {
        path: destination.to_path_buf(),
        source,
    })?;
    Ok(())
}
