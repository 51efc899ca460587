//! Calendar cells: what the grid renders for each visible day.

use super::ViewState;
use crate::domain::metrics::{date_key, DayMetrics, Direction, MetricKind, MetricsMap, Tone, VolatilityBand};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// Column headers of the grid; weeks start on Sunday.
pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// One visible day.
///
/// `metrics` is `None` for the "no data" state: either nothing was fetched
/// for the day or its ratios are undefined.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarCell {
    pub date: NaiveDate,
    pub key: String,
    pub metrics: Option<DayMetrics>,
    pub is_today: bool,
    pub is_selected: bool,
    /// False for the padding days of a month grid.
    pub in_anchor_month: bool,
}

impl CalendarCell {
    pub fn has_data(&self) -> bool {
        self.metrics.is_some()
    }

    /// Day-of-month number printed in the corner.
    pub fn day_number(&self) -> u32 {
        self.date.day()
    }

    pub fn label(&self, kind: MetricKind) -> Option<String> {
        self.metrics.as_ref().map(|m| kind.cell_label(m))
    }

    pub fn tone(&self, kind: MetricKind) -> Option<Tone> {
        self.metrics.as_ref().map(|m| kind.tone(m))
    }

    pub fn band(&self) -> Option<VolatilityBand> {
        self.metrics.as_ref().map(DayMetrics::volatility_band)
    }

    pub fn direction(&self) -> Option<Direction> {
        self.metrics.as_ref().map(DayMetrics::direction)
    }

    pub fn volume_bar_width(&self) -> Option<f64> {
        self.metrics.as_ref().map(DayMetrics::volume_bar_width)
    }
}

/// Build the cells for every listed day of `view`.
pub fn build_cells(view: &ViewState, metrics: &MetricsMap, today: NaiveDate) -> Vec<CalendarCell> {
    view.days()
        .into_iter()
        .map(|date| CalendarCell {
            date,
            key: date_key(date),
            metrics: metrics.get(date).filter(|m| m.is_defined()).copied(),
            is_today: date == today,
            is_selected: date == view.selected,
            in_anchor_month: date.year() == view.anchor.year() && date.month() == view.anchor.month(),
        })
        .collect()
}

/// Grid heading, e.g. `BTC/USDT - May 2024`.
pub fn title(pair: &str, anchor: NaiveDate) -> String {
    format!("{} - {}", pair, anchor.format("%B %Y"))
}
