//! Klines sub-client: daily OHLCV queries for a calendar span.

use crate::client::DashboardClient;
use crate::domain::calendar::DateRange;
use crate::domain::kline::{candles_from_rows, RawCandle};
use crate::error::DashboardError;
use crate::shared::{Interval, Symbol};

/// Upper bound the exchange accepts per kline request.
pub const MAX_KLINES_PER_REQUEST: u32 = 1000;

/// Sub-client for kline operations.
pub struct Klines<'a> {
    pub(crate) client: &'a DashboardClient,
}

impl<'a> Klines<'a> {
    /// Raw candles for an arbitrary interval and time window (epoch ms, inclusive).
    pub async fn get(
        &self,
        symbol: &Symbol,
        interval: Interval,
        start_ms: i64,
        end_ms: i64,
        limit: u32,
    ) -> Result<Vec<RawCandle>, DashboardError> {
        let limit = limit.min(MAX_KLINES_PER_REQUEST);
        let rows = self
            .client
            .http
            .get_klines(symbol.as_str(), interval, start_ms, end_ms, limit)
            .await?;
        candles_from_rows(rows).map_err(|e| DashboardError::Validation(e.to_string()))
    }

    /// One-day candles covering every day of `range`.
    pub async fn daily(
        &self,
        symbol: &Symbol,
        range: DateRange,
    ) -> Result<Vec<RawCandle>, DashboardError> {
        let candles = self
            .get(
                symbol,
                Interval::Day1,
                range.start_ms(),
                range.end_ms(),
                MAX_KLINES_PER_REQUEST,
            )
            .await?;
        tracing::debug!(
            symbol = %symbol,
            start = %range.start,
            end = %range.end,
            count = candles.len(),
            "Fetched daily klines"
        );
        Ok(candles)
    }
}
