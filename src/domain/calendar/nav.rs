//! Navigation stepper: prev/next by one unit of the current view, plus
//! keyboard movement of the selected day.

use super::{list_days, ViewMode};
use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Step back one unit of `view`. Returns the new `(anchor, selected)`.
///
/// Month steps use calendar-month arithmetic, clamping the day of month to
/// the target month's length (Mar 31 → Feb 29).
pub fn prev(view: ViewMode, anchor: NaiveDate, selected: NaiveDate) -> (NaiveDate, NaiveDate) {
    match view {
        ViewMode::Month => (
            anchor.checked_sub_months(Months::new(1)).unwrap_or(anchor),
            selected,
        ),
        ViewMode::Week => (
            anchor.checked_sub_days(Days::new(7)).unwrap_or(anchor),
            selected,
        ),
        ViewMode::Day => (
            anchor,
            selected.checked_sub_days(Days::new(1)).unwrap_or(selected),
        ),
    }
}

/// Step forward one unit of `view`. Mirror of [`prev`].
pub fn next(view: ViewMode, anchor: NaiveDate, selected: NaiveDate) -> (NaiveDate, NaiveDate) {
    match view {
        ViewMode::Month => (
            anchor.checked_add_months(Months::new(1)).unwrap_or(anchor),
            selected,
        ),
        ViewMode::Week => (
            anchor.checked_add_days(Days::new(7)).unwrap_or(anchor),
            selected,
        ),
        ViewMode::Day => (
            anchor,
            selected.checked_add_days(Days::new(1)).unwrap_or(selected),
        ),
    }
}

/// Arrow keys accepted by the calendar grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NavKey {
    Left,
    Right,
    Up,
    Down,
}

impl NavKey {
    /// Day offset of the key: ∓1 horizontally, ∓7 vertically.
    pub fn offset(&self) -> i64 {
        match self {
            Self::Left => -1,
            Self::Right => 1,
            Self::Up => -7,
            Self::Down => 7,
        }
    }
}

/// Move `selected` by the key's offset, regardless of view mode.
///
/// The move only applies if the target is one of the currently listed
/// days; otherwise `selected` comes back unchanged.
pub fn step_key(
    key: NavKey,
    view: ViewMode,
    anchor: NaiveDate,
    selected: NaiveDate,
) -> NaiveDate {
    let offset = key.offset();
    let target = if offset < 0 {
        selected.checked_sub_days(Days::new(offset.unsigned_abs()))
    } else {
        selected.checked_add_days(Days::new(offset as u64))
    };

    match target {
        Some(t) if list_days(view, anchor, selected).contains(&t) => t,
        _ => selected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_steps_cross_year() {
        let (a, s) = prev(ViewMode::Month, date(2024, 1, 15), date(2024, 1, 20));
        assert_eq!(a, date(2023, 12, 15));
        assert_eq!(s, date(2024, 1, 20));
        let (a, _) = next(ViewMode::Month, date(2024, 12, 1), date(2024, 12, 1));
        assert_eq!(a, date(2025, 1, 1));
    }

    #[test]
    fn test_month_step_clamps_day() {
        let (a, _) = prev(ViewMode::Month, date(2024, 3, 31), date(2024, 3, 31));
        assert_eq!(a, date(2024, 2, 29));
    }

    #[test]
    fn test_round_trip_month_and_week() {
        let selected = date(2024, 6, 6);
        let mut anchor = date(2023, 1, 1);
        while anchor < date(2025, 1, 1) {
            let (pa, ps) = prev(ViewMode::Week, anchor, selected);
            assert_eq!(next(ViewMode::Week, pa, ps), (anchor, selected));

            let (pa, ps) = prev(ViewMode::Month, anchor, selected);
            let (na, ns) = next(ViewMode::Month, pa, ps);
            assert_eq!(ns, selected);
            assert_eq!((na.year(), na.month()), (anchor.year(), anchor.month()));
            if anchor.day() <= 28 {
                assert_eq!(na, anchor);
            }
            anchor = anchor.succ_opt().unwrap();
        }
    }

    #[test]
    fn test_day_steps_selected_only() {
        let anchor = date(2024, 5, 1);
        let (a, s) = prev(ViewMode::Day, anchor, date(2024, 3, 1));
        assert_eq!(a, anchor);
        assert_eq!(s, date(2024, 2, 29));
        let (_, s) = next(ViewMode::Day, anchor, date(2024, 12, 31));
        assert_eq!(s, date(2025, 1, 1));
    }

    #[test]
    fn test_keyboard_moves_within_grid() {
        // May 2024 grid: Apr 28 .. Jun 1.
        let anchor = date(2024, 5, 15);
        let sel = date(2024, 5, 15);
        assert_eq!(step_key(NavKey::Left, ViewMode::Month, anchor, sel), date(2024, 5, 14));
        assert_eq!(step_key(NavKey::Right, ViewMode::Month, anchor, sel), date(2024, 5, 16));
        assert_eq!(step_key(NavKey::Up, ViewMode::Month, anchor, sel), date(2024, 5, 8));
        assert_eq!(step_key(NavKey::Down, ViewMode::Month, anchor, sel), date(2024, 5, 22));
    }

    #[test]
    fn test_keyboard_outside_grid_is_noop() {
        let anchor = date(2024, 5, 15);
        let first = date(2024, 4, 28);
        assert_eq!(step_key(NavKey::Left, ViewMode::Month, anchor, first), first);
        assert_eq!(step_key(NavKey::Up, ViewMode::Month, anchor, date(2024, 5, 1)), date(2024, 5, 1));
        let last = date(2024, 6, 1);
        assert_eq!(step_key(NavKey::Down, ViewMode::Month, anchor, last), last);
    }

    #[test]
    fn test_keyboard_in_week_and_day_views() {
        // Week of May 12..18 2024.
        let anchor = date(2024, 5, 15);
        let sel = date(2024, 5, 18);
        assert_eq!(step_key(NavKey::Right, ViewMode::Week, anchor, sel), sel);
        assert_eq!(step_key(NavKey::Left, ViewMode::Week, anchor, sel), date(2024, 5, 17));
        assert_eq!(step_key(NavKey::Down, ViewMode::Week, anchor, date(2024, 5, 12)), date(2024, 5, 12));
        // Day view lists only the selected day, so nothing moves.
        assert_eq!(step_key(NavKey::Right, ViewMode::Day, anchor, sel), sel);
    }
}
