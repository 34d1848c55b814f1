use crate::data::PriceObservation;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyClose {
    pub date: NaiveDate,
    pub price: f64,
}

/// Reduces intraday observations to one close per calendar date, sorted by date.
///
/// Rows stamped exactly 00:00:00 are ignored. The close is the price of the
/// last remaining row for that date in input order, not the row with the
/// latest time of day.
pub fn extract_daily_closes(observations: &[PriceObservation]) -> Vec<DailyClose> {
    let mut closes: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    let mut midnight_rows = 0usize;

    for observation in observations {
        if observation.is_midnight() {
            midnight_rows += 1;
            continue;
        }
        // Later rows overwrite earlier ones for the same date
        closes.insert(observation.date(), observation.price);
    }

    debug!(
        "Excluded {} midnight rows, {} distinct dates remain",
        midnight_rows,
        closes.len()
    );

    closes
        .into_iter()
        .map(|(date, price)| DailyClose { date, price })
        .collect()
}
