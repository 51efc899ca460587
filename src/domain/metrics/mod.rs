//! Metrics domain: per-day volatility, performance and volume derived from candles.

pub mod kind;
pub mod state;

pub use kind::{Direction, MetricKind, Tone, VolatilityBand};
pub use state::MetricsMap;

use crate::domain::kline::RawCandle;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Format of the calendar-day key used throughout the dashboard.
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Calendar-day key (`yyyy-mm-dd`) for a date.
pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// Metrics for one calendar day. Derived, never mutated after creation.
///
/// `volatility` and `performance` are percentages. Both are `NaN` when the
/// day opened at zero, in which case [`DayMetrics::is_defined`] is false.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayMetrics {
    pub date: NaiveDate,
    pub open: f64,
    pub close: f64,
    pub high: f64,
    pub low: f64,
    pub volume: f64,
    pub volatility: f64,
    pub performance: f64,
}

impl DayMetrics {
    /// Derive metrics from a raw candle.
    ///
    /// `volatility = (high - low) / open * 100`,
    /// `performance = (close - open) / open * 100`.
    pub fn derive(candle: &RawCandle) -> Self {
        let (volatility, performance) = if candle.open == 0.0 {
            (f64::NAN, f64::NAN)
        } else {
            (
                (candle.high - candle.low) / candle.open * 100.0,
                (candle.close - candle.open) / candle.open * 100.0,
            )
        };

        Self {
            date: candle.day(),
            open: candle.open,
            close: candle.close,
            high: candle.high,
            low: candle.low,
            volume: candle.volume,
            volatility,
            performance,
        }
    }

    /// `yyyy-mm-dd` key of this day.
    pub fn key(&self) -> String {
        date_key(self.date)
    }

    /// False when the ratios could not be computed (zero open price).
    pub fn is_defined(&self) -> bool {
        self.volatility.is_finite() && self.performance.is_finite()
    }

    pub fn volatility_band(&self) -> VolatilityBand {
        VolatilityBand::from_volatility(self.volatility)
    }

    pub fn direction(&self) -> Direction {
        Direction::from_performance(self.performance)
    }

    /// Width of the volume bar as a percentage of the cell width.
    pub fn volume_bar_width(&self) -> f64 {
        kind::volume_bar_width(self.volume)
    }

    /// Values for the detail chart: one bar per metric kind.
    pub fn chart_bars(&self) -> [(MetricKind, f64); 3] {
        [
            (MetricKind::Volatility, self.volatility),
            (MetricKind::Volume, self.volume),
            (MetricKind::Performance, self.performance),
        ]
    }
}

/// Metrics deriver as a free function.
pub fn derive(candle: &RawCandle) -> DayMetrics {
    DayMetrics::derive(candle)
}
