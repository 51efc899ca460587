//! Kline domain: raw OHLCV candles as reported by the exchange.

#[cfg(feature = "http")]
pub mod client;
mod convert;
pub mod wire;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One exchange-reported OHLCV record for a fixed interval.
///
/// Immutable once received; every value is a finite float.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawCandle {
    pub open_time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl RawCandle {
    /// Calendar day (UTC) the candle opened on.
    pub fn day(&self) -> NaiveDate {
        self.open_time.date_naive()
    }
}

// ─── Validation ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum KlineError {
    InvalidNumber { field: &'static str, value: String },
    InvalidTimestamp(i64),
}

impl fmt::Display for KlineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KlineError::InvalidNumber { field, value } => {
                write!(f, "Invalid {field} value: {value:?}")
            }
            KlineError::InvalidTimestamp(ms) => write!(f, "Invalid open time: {ms}"),
        }
    }
}

impl std::error::Error for KlineError {}

/// Convert a batch of wire rows, failing on the first malformed row.
pub fn candles_from_rows(rows: Vec<wire::KlineRow>) -> Result<Vec<RawCandle>, KlineError> {
    rows.into_iter().map(RawCandle::try_from).collect()
}
