//! Date-range resolver: the visible span and cell list for a view.
//!
//! Weeks run Sunday to Saturday. Month grids are padded out to whole weeks.

use super::{DateRange, ViewMode};
use chrono::{Datelike, Days, NaiveDate};

/// Sunday on or before `date`.
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    let back = date.weekday().num_days_from_sunday() as u64;
    date.checked_sub_days(Days::new(back)).unwrap_or(date)
}

/// Saturday on or after `date`.
pub fn end_of_week(date: NaiveDate) -> NaiveDate {
    let forward = 6 - date.weekday().num_days_from_sunday() as u64;
    date.checked_add_days(Days::new(forward)).unwrap_or(date)
}

pub fn start_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn end_of_month(date: NaiveDate) -> NaiveDate {
    let first = start_of_month(date);
    first
        .checked_add_months(chrono::Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(date)
}

/// Visible span for a view.
///
/// - month: whole weeks covering the anchor's month
/// - week: the week containing the anchor
/// - day: just the selected date
pub fn resolve_range(view: ViewMode, anchor: NaiveDate, selected: NaiveDate) -> DateRange {
    match view {
        ViewMode::Month => DateRange::new(
            start_of_week(start_of_month(anchor)),
            end_of_week(end_of_month(anchor)),
        ),
        ViewMode::Week => DateRange::new(start_of_week(anchor), end_of_week(anchor)),
        ViewMode::Day => DateRange::new(selected, selected),
    }
}

/// Every day of the visible span, ascending.
pub fn list_days(view: ViewMode, anchor: NaiveDate, selected: NaiveDate) -> Vec<NaiveDate> {
    if view == ViewMode::Day {
        return vec![selected];
    }
    let range = resolve_range(view, anchor, selected);
    range
        .start
        .iter_days()
        .take_while(|d| *d <= range.end)
        .collect()
}
