//! Conversion: KlineRow → RawCandle (TryFrom + validation).

use super::wire::KlineRow;
use super::{KlineError, RawCandle};
use chrono::{DateTime, Utc};

fn parse_field(field: &'static str, value: &str) -> Result<f64, KlineError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| KlineError::InvalidNumber {
            field,
            value: value.to_string(),
        })
}

impl TryFrom<KlineRow> for RawCandle {
    type Error = KlineError;

    fn try_from(row: KlineRow) -> Result<Self, Self::Error> {
        let open_time = DateTime::<Utc>::from_timestamp_millis(row.open_time)
            .ok_or(KlineError::InvalidTimestamp(row.open_time))?;

        Ok(RawCandle {
            open_time,
            open: parse_field("open", &row.open)?,
            high: parse_field("high", &row.high)?,
            low: parse_field("low", &row.low)?,
            close: parse_field("close", &row.close)?,
            volume: parse_field("volume", &row.volume)?,
        })
    }
}
