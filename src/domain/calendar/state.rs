//! Calendar view-model: app-owned state, SDK-provided transitions.
//!
//! Status moves `Idle → Fetching → Ready | Error`. Every trigger that
//! changes what must be fetched hands back a [`FetchTicket`]; the caller
//! runs the request and passes the outcome to [`CalendarViewModel::complete`].
//! Only the most recently issued ticket may update state, so an older
//! response that lands late is dropped.

use super::cells::{self, CalendarCell};
use super::detail::DetailPanel;
use super::nav::{self, NavKey};
use super::{DateRange, ViewMode, ViewState};
use crate::domain::kline::RawCandle;
use crate::domain::metrics::{DayMetrics, MetricKind, MetricsMap};
use crate::shared::Symbol;
use chrono::NaiveDate;
use std::fmt::Display;

/// Fetch lifecycle of the calendar.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FetchStatus {
    #[default]
    Idle,
    Fetching,
    Ready,
    /// Last fetch failed; the previous map is still displayed.
    Error(String),
}

/// A request the caller must run: daily candles for `symbol` over `range`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: u64,
    pub symbol: Symbol,
    pub range: DateRange,
}

#[derive(Debug, Clone)]
pub struct CalendarViewModel {
    symbol: Symbol,
    metric: MetricKind,
    view: ViewState,
    metrics: MetricsMap,
    status: FetchStatus,
    /// Sequence number of the newest ticket handed out.
    seq: u64,
    detail: DetailPanel,
}

impl CalendarViewModel {
    pub fn new(symbol: Symbol, today: NaiveDate) -> Self {
        Self {
            symbol,
            metric: MetricKind::default(),
            view: ViewState::new(today),
            metrics: MetricsMap::new(),
            status: FetchStatus::Idle,
            seq: 0,
            detail: DetailPanel::default(),
        }
    }

    // ── Accessors ────────────────────────────────────────────────────────

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn metric(&self) -> MetricKind {
        self.metric
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn metrics(&self) -> &MetricsMap {
        &self.metrics
    }

    pub fn status(&self) -> &FetchStatus {
        &self.status
    }

    /// Inline error message while in the error state.
    pub fn error(&self) -> Option<&str> {
        match &self.status {
            FetchStatus::Error(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn detail(&self) -> &DetailPanel {
        &self.detail
    }

    pub fn range(&self) -> DateRange {
        self.view.range()
    }

    pub fn cells(&self, today: NaiveDate) -> Vec<CalendarCell> {
        cells::build_cells(&self.view, &self.metrics, today)
    }

    /// Heading for the visible span. Day view follows the selected day,
    /// the other views the anchor.
    pub fn title(&self) -> String {
        let month_of = match self.view.view_mode {
            ViewMode::Day => self.view.selected,
            ViewMode::Week | ViewMode::Month => self.view.anchor,
        };
        cells::title(&self.symbol.display_pair(), month_of)
    }

    // ── Fetch lifecycle ──────────────────────────────────────────────────

    /// Issue a new ticket for the current symbol and span, superseding any
    /// ticket still in flight.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.seq += 1;
        self.status = FetchStatus::Fetching;
        FetchTicket {
            seq: self.seq,
            symbol: self.symbol.clone(),
            range: self.range(),
        }
    }

    /// Whether `ticket` is still the newest one.
    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        ticket.seq == self.seq
    }

    /// Apply a fetch outcome. Returns false if the ticket was stale and ignored.
    ///
    /// Success replaces the metrics map wholesale. Failure keeps the last
    /// good map and records the message.
    pub fn complete<E: Display>(
        &mut self,
        ticket: &FetchTicket,
        result: Result<Vec<RawCandle>, E>,
    ) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(
                stale = ticket.seq,
                current = self.seq,
                symbol = %ticket.symbol,
                "Discarding stale kline response"
            );
            return false;
        }

        match result {
            Ok(candles) => {
                self.metrics = MetricsMap::from_candles(&candles);
                self.status = FetchStatus::Ready;
                self.detail.refresh(self.selected_metrics());
                tracing::debug!(symbol = %ticket.symbol, days = self.metrics.len(), "Calendar metrics ready");
            }
            Err(e) => {
                tracing::warn!(symbol = %ticket.symbol, "Kline fetch failed: {}", e);
                self.status = FetchStatus::Error(e.to_string());
            }
        }
        true
    }

    // ── Triggers ─────────────────────────────────────────────────────────
    //
    // Each returns a ticket when the instrument or the visible span changed.

    pub fn set_instrument(&mut self, symbol: Symbol) -> Option<FetchTicket> {
        if symbol == self.symbol {
            return None;
        }
        tracing::info!(from = %self.symbol, to = %symbol, "Calendar instrument changed");
        self.symbol = symbol;
        self.detail.clear();
        Some(self.begin_fetch())
    }

    /// Display-only; never triggers a fetch.
    pub fn set_metric(&mut self, metric: MetricKind) {
        self.metric = metric;
    }

    pub fn set_view_mode(&mut self, view_mode: ViewMode) -> Option<FetchTicket> {
        self.update_view(|v| v.view_mode = view_mode)
    }

    pub fn prev(&mut self) -> Option<FetchTicket> {
        self.update_view(|v| (v.anchor, v.selected) = nav::prev(v.view_mode, v.anchor, v.selected))
    }

    pub fn next(&mut self) -> Option<FetchTicket> {
        self.update_view(|v| (v.anchor, v.selected) = nav::next(v.view_mode, v.anchor, v.selected))
    }

    /// Jump the anchor (visible month/week) to `date`.
    pub fn set_anchor(&mut self, date: NaiveDate) -> Option<FetchTicket> {
        self.update_view(|v| v.anchor = date)
    }

    /// Select a day (cell click) and surface its metrics in the detail panel.
    pub fn select(&mut self, date: NaiveDate) -> Option<FetchTicket> {
        let ticket = self.update_view(|v| v.selected = date);
        self.detail.show(self.selected_metrics());
        ticket
    }

    /// Keyboard navigation; a step leaving the visible days is a no-op.
    /// Returns true if the selection moved.
    pub fn handle_key(&mut self, key: NavKey) -> bool {
        let v = self.view;
        let target = nav::step_key(key, v.view_mode, v.anchor, v.selected);
        if target == v.selected {
            return false;
        }
        self.view.selected = target;
        self.detail.refresh(self.selected_metrics());
        true
    }

    pub fn close_detail(&mut self) {
        self.detail.close();
    }

    /// Metrics of the selected day, if it has defined values.
    fn selected_metrics(&self) -> Option<DayMetrics> {
        self.metrics
            .get(self.view.selected)
            .filter(|m| m.is_defined())
            .copied()
    }

    fn update_view(&mut self, f: impl FnOnce(&mut ViewState)) -> Option<FetchTicket> {
        let before = self.range();
        f(&mut self.view);
        if self.range() == before {
            return None;
        }
        Some(self.begin_fetch())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn candles(month: u32, days: std::ops::RangeInclusive<u32>, open: f64) -> Vec<RawCandle> {
        days.map(|d| RawCandle {
            open_time: Utc.with_ymd_and_hms(2024, month, d, 0, 0, 0).unwrap(),
            open,
            high: open * 1.1,
            low: open * 0.95,
            close: open * 1.05,
            volume: 10.0,
        })
        .collect()
    }

    fn ready_vm() -> CalendarViewModel {
        let mut vm = CalendarViewModel::new(Symbol::from("BTCUSDT"), date(2024, 5, 15));
        let ticket = vm.begin_fetch();
        assert!(vm.complete::<String>(&ticket, Ok(candles(5, 1..=31, 100.0))));
        vm
    }

    #[test]
    fn test_initial_state() {
        let vm = CalendarViewModel::new(Symbol::default(), date(2024, 5, 15));
        assert_eq!(vm.status(), &FetchStatus::Idle);
        assert_eq!(vm.view().view_mode, ViewMode::Month);
        assert!(vm.metrics().is_empty());
        assert_eq!(vm.title(), "BTC/USDT - May 2024");
    }

    #[test]
    fn test_fetch_success_replaces_map() {
        let mut vm = ready_vm();
        assert_eq!(vm.status(), &FetchStatus::Ready);
        assert_eq!(vm.metrics().len(), 31);

        let ticket = vm.begin_fetch();
        assert_eq!(vm.status(), &FetchStatus::Fetching);
        assert_eq!(ticket.range.start, date(2024, 4, 28));
        vm.complete::<String>(&ticket, Ok(candles(5, 1..=3, 200.0)));
        assert_eq!(vm.metrics().len(), 3);
        assert_eq!(vm.metrics().get(date(2024, 5, 1)).unwrap().open, 200.0);
    }

    #[test]
    fn test_fetch_failure_keeps_last_good_map() {
        let mut vm = ready_vm();
        let before = vm.metrics().clone();

        let ticket = vm.begin_fetch();
        assert!(vm.complete(&ticket, Err("HTTP error: Timeout")));
        assert_eq!(vm.status(), &FetchStatus::Error("HTTP error: Timeout".to_string()));
        assert_eq!(vm.error(), Some("HTTP error: Timeout"));
        assert_eq!(vm.metrics(), &before);
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut vm = CalendarViewModel::new(Symbol::default(), date(2024, 5, 15));
        let first = vm.begin_fetch();
        let second = vm.next().expect("month change triggers a fetch");

        // Newer response lands first, older one afterwards.
        assert!(vm.complete::<String>(&second, Ok(candles(6, 1..=30, 300.0))));
        assert!(!vm.complete::<String>(&first, Ok(candles(5, 1..=31, 100.0))));
        assert_eq!(vm.metrics().len(), 30);
        assert_eq!(vm.status(), &FetchStatus::Ready);

        // A stale failure cannot flip the state to error either.
        assert!(!vm.complete(&first, Err("boom")));
        assert_eq!(vm.status(), &FetchStatus::Ready);
    }

    #[test]
    fn test_triggers() {
        let mut vm = ready_vm();

        assert!(vm.set_instrument(Symbol::from("BTCUSDT")).is_none());
        let t = vm.set_instrument(Symbol::from("ETHUSDT")).unwrap();
        assert_eq!(t.symbol.as_str(), "ETHUSDT");

        let t = vm.set_view_mode(ViewMode::Week).unwrap();
        assert_eq!(t.range.len_days(), 7);
        assert!(vm.set_view_mode(ViewMode::Week).is_none());

        let t = vm.prev().unwrap();
        assert_eq!(t.range.start, date(2024, 5, 5));

        let t = vm.set_view_mode(ViewMode::Day).unwrap();
        assert_eq!(t.range.start, date(2024, 5, 15));
        let t = vm.next().unwrap();
        assert_eq!(t.range.start, date(2024, 5, 16));

        vm.set_metric(MetricKind::Volume);
        assert_eq!(vm.metric(), MetricKind::Volume);
    }

    #[test]
    fn test_select_opens_detail() {
        let mut vm = ready_vm();
        assert!(vm.select(date(2024, 5, 3)).is_none());
        assert!(vm.detail().is_open());
        assert_eq!(vm.detail().metrics().unwrap().date, date(2024, 5, 3));
        assert_eq!(vm.view().selected, date(2024, 5, 3));

        vm.close_detail();
        assert!(!vm.detail().is_open());

        // Padding day with no data: selected, drawer stays closed.
        vm.select(date(2024, 4, 28));
        assert!(!vm.detail().is_open());
        assert_eq!(vm.view().selected, date(2024, 4, 28));
    }

    #[test]
    fn test_keyboard_navigation() {
        let mut vm = ready_vm();
        assert!(vm.handle_key(NavKey::Down));
        assert_eq!(vm.view().selected, date(2024, 5, 22));
        assert!(vm.handle_key(NavKey::Down));
        assert!(!vm.handle_key(NavKey::Down));
        assert_eq!(vm.view().selected, date(2024, 5, 29));
    }

    #[test]
    fn test_detail_follows_instrument_switch() {
        let mut vm = ready_vm();
        vm.select(date(2024, 5, 3));
        assert_eq!(vm.detail().metrics().unwrap().open, 100.0);

        let ticket = vm.set_instrument(Symbol::from("ETHUSDT")).unwrap();
        assert!(!vm.detail().is_open());
        assert!(vm.detail().metrics().is_none());

        assert!(vm.complete::<String>(&ticket, Ok(candles(5, 1..=31, 3000.0))));
        assert!(vm.detail().is_open());
        assert_eq!(vm.detail().metrics().unwrap().open, 3000.0);
        assert_eq!(vm.detail().metrics().unwrap().date, date(2024, 5, 3));
    }

    #[test]
    fn test_detail_opens_when_day_view_data_arrives() {
        let mut vm = CalendarViewModel::new(Symbol::default(), date(2024, 5, 15));
        let t = vm.set_view_mode(ViewMode::Day).unwrap();
        assert!(vm.select(date(2024, 5, 15)).is_none());
        assert!(!vm.detail().is_open());

        vm.complete::<String>(&t, Ok(candles(5, 15..=15, 100.0)));
        assert!(vm.detail().is_open());
        assert_eq!(vm.detail().metrics().unwrap().date, date(2024, 5, 15));

        // A closed drawer stays closed across later fetches.
        vm.close_detail();
        let t = vm.next().unwrap();
        vm.complete::<String>(&t, Ok(candles(5, 16..=16, 100.0)));
        assert!(!vm.detail().is_open());
    }

    #[test]
    fn test_keyboard_moves_open_detail() {
        let mut vm = ready_vm();
        vm.select(date(2024, 5, 3));
        assert!(vm.handle_key(NavKey::Right));
        assert_eq!(vm.detail().metrics().unwrap().date, date(2024, 5, 4));
    }

    #[test]
    fn test_title_follows_selected_day_in_day_view() {
        let mut vm = CalendarViewModel::new(Symbol::default(), date(2024, 5, 31));
        vm.set_view_mode(ViewMode::Day);
        assert_eq!(vm.title(), "BTC/USDT - May 2024");
        vm.next();
        assert_eq!(vm.view().selected, date(2024, 6, 1));
        assert_eq!(vm.title(), "BTC/USDT - June 2024");
        vm.set_view_mode(ViewMode::Month);
        assert_eq!(vm.title(), "BTC/USDT - May 2024");
    }
}
