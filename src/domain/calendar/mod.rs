//! Calendar domain: view modes, visible date spans, navigation and the
//! calendar view-model.

#[cfg(feature = "http")]
pub mod client;
pub mod cells;
pub mod detail;
pub mod nav;
pub mod range;
pub mod state;

pub use cells::{build_cells, title, CalendarCell, WEEKDAY_LABELS};
pub use detail::DetailPanel;
pub use nav::{step_key, next, prev, NavKey};
pub use range::{list_days, resolve_range};
pub use state::{CalendarViewModel, FetchStatus, FetchTicket};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Calendar granularity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Day,
    Week,
    #[default]
    Month,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        }
    }
}

impl std::fmt::Display for ViewMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            other => Err(format!("Unknown view mode: {}", other)),
        }
    }
}

/// View mode plus the two reference dates every range computation needs.
///
/// `anchor` picks the visible month (month view) or week (week view);
/// `selected` is the highlighted day and the whole span in day view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ViewState {
    pub view_mode: ViewMode,
    pub anchor: NaiveDate,
    pub selected: NaiveDate,
}

impl ViewState {
    /// Month view anchored and selected on `today`.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            view_mode: ViewMode::Month,
            anchor: today,
            selected: today,
        }
    }

    pub fn range(&self) -> DateRange {
        resolve_range(self.view_mode, self.anchor, self.selected)
    }

    pub fn days(&self) -> Vec<NaiveDate> {
        list_days(self.view_mode, self.anchor, self.selected)
    }
}

/// Inclusive span of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of days in the span, both ends included.
    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// 00:00:00.000 UTC of the first day, in epoch milliseconds.
    pub fn start_ms(&self) -> i64 {
        self.start
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc().timestamp_millis())
            .unwrap_or_default()
    }

    /// 23:59:59.999 UTC of the last day, in epoch milliseconds.
    pub fn end_ms(&self) -> i64 {
        self.end
            .and_hms_milli_opt(23, 59, 59, 999)
            .map(|dt| dt.and_utc().timestamp_millis())
            .unwrap_or_default()
    }
}
