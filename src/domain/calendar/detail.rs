//! Detail panel (drawer) showing the selected day's metrics.

use crate::domain::metrics::{DayMetrics, MetricKind};
use crate::shared::fmt;

/// Open/closed drawer plus the metrics it shows.
///
/// Once a day has been selected the drawer follows it: [`DetailPanel::refresh`]
/// re-reads the metrics and opens it when data shows up, until it is closed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailPanel {
    open: bool,
    /// A day was selected and the drawer has not been closed since.
    requested: bool,
    metrics: Option<DayMetrics>,
}

impl DetailPanel {
    /// Surface a day's metrics and open the drawer. `None` leaves it closed.
    pub fn show(&mut self, metrics: Option<DayMetrics>) {
        self.requested = true;
        self.open = metrics.is_some();
        self.metrics = metrics;
    }

    /// Replace the shown metrics after the data behind them changed.
    /// No-op unless a day is selected and the drawer was not closed.
    pub fn refresh(&mut self, metrics: Option<DayMetrics>) {
        if self.requested {
            self.open = metrics.is_some();
            self.metrics = metrics;
        }
    }

    /// Drop the shown metrics, keeping the selection request.
    pub fn clear(&mut self) {
        self.open = false;
        self.metrics = None;
    }

    pub fn close(&mut self) {
        self.open = false;
        self.requested = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn metrics(&self) -> Option<&DayMetrics> {
        self.metrics.as_ref()
    }

    /// Label/value rows, two decimals each.
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        let Some(m) = self.metrics.as_ref() else {
            return Vec::new();
        };
        vec![
            ("Open", fmt::fixed(m.open, 2)),
            ("Close", fmt::fixed(m.close, 2)),
            ("High", fmt::fixed(m.high, 2)),
            ("Low", fmt::fixed(m.low, 2)),
            ("Volume", fmt::fixed(m.volume, 2)),
            ("Volatility", fmt::percent(m.volatility, 2)),
            ("Performance", fmt::percent(m.performance, 2)),
        ]
    }

    /// Bars for the detail chart.
    pub fn chart(&self) -> Vec<(MetricKind, f64)> {
        self.metrics
            .as_ref()
            .map(|m| m.chart_bars().to_vec())
            .unwrap_or_default()
    }
}
