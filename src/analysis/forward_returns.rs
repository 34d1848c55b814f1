use super::daily_close::{extract_daily_closes, DailyClose};
use crate::data::{DataError, PriceObservation, Result};
use chrono::NaiveDate;
use tracing::info;

/// Number of daily closes between the open and close of each record.
pub const FORWARD_HORIZON: usize = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct ForwardReturnRecord {
    pub symbol: String,
    pub open_date: NaiveDate,
    pub open_price: f64,
    pub close_date: NaiveDate,
    pub close_price: f64,
    pub forward_return_pct: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForwardReturnSummary {
    pub records: usize,
    pub mean_return_pct: Option<f64>,
    pub min_return_pct: Option<f64>,
    pub max_return_pct: Option<f64>,
}

pub fn percent_return(open_price: f64, close_price: f64) -> f64 {
    // A zero open price yields inf or NaN and is passed through untouched
    (close_price - open_price) / open_price * 100.0
}

/// Pairs each close with the close `FORWARD_HORIZON` positions later.
///
/// `closes` must already be sorted by date. The offset is positional, so
/// weekends and other gaps are skipped rather than backfilled.
pub fn pair_forward_returns(symbol: &str, closes: &[DailyClose]) -> Vec<ForwardReturnRecord> {
    closes
        .iter()
        .zip(closes.iter().skip(FORWARD_HORIZON))
        .map(|(open, close)| ForwardReturnRecord {
            symbol: symbol.to_string(),
            open_date: open.date,
            open_price: open.price,
            close_date: close.date,
            close_price: close.price,
            forward_return_pct: percent_return(open.price, close.price),
        })
        .collect()
}

pub struct DailyForwardReturnCalculator;

impl DailyForwardReturnCalculator {
    /// Runs the full pipeline over one symbol's observations.
    ///
    /// The symbol is taken from the first observation. Fewer than
    /// `FORWARD_HORIZON + 1` distinct dates gives an empty result, not an error.
    pub fn compute(observations: &[PriceObservation]) -> Result<Vec<ForwardReturnRecord>> {
        let symbol = observations
            .first()
            .map(|o| o.symbol.as_str())
            .ok_or(DataError::EmptyInput)?;

        let closes = extract_daily_closes(observations);
        info!("Derived {} daily closes for {}", closes.len(), symbol);

        let records = pair_forward_returns(symbol, &closes);
        info!(
            "Computed {} forward returns ({} closes without a {}-day pair)",
            records.len(),
            closes.len() - records.len(),
            FORWARD_HORIZON
        );
        Ok(records)
    }

    pub fn summarize(records: &[ForwardReturnRecord]) -> ForwardReturnSummary {
        let finite: Vec<f64> = records
            .iter()
            .map(|r| r.forward_return_pct)
            .filter(|r| r.is_finite())
            .collect();

        let mean_return_pct = if finite.is_empty() {
            None
        } else {
            Some(finite.iter().sum::<f64>() / finite.len() as f64)
        };

        ForwardReturnSummary {
            records: records.len(),
            mean_return_pct,
            min_return_pct: finite.iter().copied().reduce(f64::min),
            max_return_pct: finite.iter().copied().reduce(f64::max),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{Datelike, Duration, NaiveTime, Weekday};

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn observation(date: NaiveDate, hour: u32, price: f64) -> PriceObservation {
        PriceObservation {
            timestamp: date.and_hms_opt(hour, 0, 0).unwrap(),
            symbol: "BTC".to_string(),
            price,
        }
    }

    fn consecutive_days(n: usize) -> Vec<PriceObservation> {
        (0..n)
            .map(|i| observation(start() + Duration::days(i as i64), 16, 100.0 + i as f64))
            .collect()
    }

    #[test]
    fn test_thirty_five_days_gives_five_records() {
        let observations = consecutive_days(35);

        let records = DailyForwardReturnCalculator::compute(&observations).unwrap();

        assert_eq!(records.len(), 5);
        let first = &records[0];
        assert_eq!(first.symbol, "BTC");
        assert_eq!(first.open_date, start());
        assert_eq!(first.open_price, 100.0);
        assert_eq!(first.close_date, start() + Duration::days(30));
        assert_eq!(first.close_price, 130.0);
        assert_relative_eq!(first.forward_return_pct, 30.0, epsilon = 1e-9);
    }

    #[test]
    fn test_record_count_is_dates_minus_horizon() {
        for n in [0usize, 1, 29, 30, 31, 45] {
            let closes: Vec<DailyClose> = (0..n)
                .map(|i| DailyClose {
                    date: start() + Duration::days(i as i64),
                    price: 10.0,
                })
                .collect();

            let records = pair_forward_returns("X", &closes);

            assert_eq!(records.len(), n.saturating_sub(FORWARD_HORIZON), "n = {n}");
        }
    }

    #[test]
    fn test_thirty_dates_is_empty_not_error() {
        let records = DailyForwardReturnCalculator::compute(&consecutive_days(30)).unwrap();

        assert!(records.is_empty());
    }

    #[test]
    fn test_offset_counts_trading_days_not_calendar_days() {
        // Weekdays only, so 30 positions spans six calendar weeks
        let weekdays: Vec<NaiveDate> = start()
            .iter_days()
            .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
            .take(40)
            .collect();
        let observations: Vec<PriceObservation> = weekdays
            .iter()
            .enumerate()
            .map(|(i, d)| observation(*d, 15, 50.0 + i as f64))
            .collect();

        let records = DailyForwardReturnCalculator::compute(&observations).unwrap();

        assert_eq!(records.len(), 10);
        for (i, record) in records.iter().enumerate() {
            assert_eq!(record.open_date, weekdays[i]);
            assert_eq!(record.close_date, weekdays[i + FORWARD_HORIZON]);
            assert_relative_eq!(
                record.forward_return_pct,
                (record.close_price - record.open_price) / record.open_price * 100.0,
                epsilon = 1e-9
            );
        }
        assert_eq!(records[0].close_date - records[0].open_date, Duration::days(42));
        assert!(records.windows(2).all(|w| w[0].open_date < w[1].open_date));
    }

    #[test]
    fn test_midnight_rows_do_not_count_as_dates() {
        let mut observations = consecutive_days(31);
        // A midnight-only date adds no close
        observations.push(PriceObservation {
            timestamp: (start() - Duration::days(1)).and_time(NaiveTime::MIN),
            symbol: "BTC".to_string(),
            price: 1.0,
        });

        let records = DailyForwardReturnCalculator::compute(&observations).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].open_date, start());
    }

    #[test]
    fn test_zero_open_price_is_emitted() {
        let mut observations = consecutive_days(31);
        observations[0].price = 0.0;

        let records = DailyForwardReturnCalculator::compute(&observations).unwrap();

        assert_eq!(records.len(), 1);
        assert!(records[0].forward_return_pct.is_infinite());
        assert!(percent_return(0.0, 0.0).is_nan());
    }

    #[test]
    fn test_symbol_from_first_row() {
        let mut observations = consecutive_days(32);
        observations[1].symbol = "OTHER".to_string();

        let records = DailyForwardReturnCalculator::compute(&observations).unwrap();

        assert!(records.iter().all(|r| r.symbol == "BTC"));
    }

    #[test]
    fn test_empty_observations_is_error() {
        let err = DailyForwardReturnCalculator::compute(&[]).unwrap_err();

        assert!(matches!(err, DataError::EmptyInput));
    }

    #[test]
    fn test_summary_ignores_non_finite_returns() {
        let mut observations = consecutive_days(33);
        observations[0].price = 0.0;
        let records = DailyForwardReturnCalculator::compute(&observations).unwrap();

        let summary = DailyForwardReturnCalculator::summarize(&records);

        assert_eq!(summary.records, 3);
        // Remaining opens are 101 and 102 with closes 131 and 132
        let a = 30.0 / 101.0 * 100.0;
        let b = 30.0 / 102.0 * 100.0;
        assert_relative_eq!(summary.mean_return_pct.unwrap(), (a + b) / 2.0, epsilon = 1e-9);
        assert_relative_eq!(summary.min_return_pct.unwrap(), b, epsilon = 1e-9);
        assert_relative_eq!(summary.max_return_pct.unwrap(), a, epsilon = 1e-9);
    }

    #[test]
    fn test_summary_of_nothing() {
        let summary = DailyForwardReturnCalculator::summarize(&[]);

        assert_eq!(summary.records, 0);
        assert_eq!(summary.mean_return_pct, None);
    }
}
