//! Application state, constructed once at startup and passed to whatever
//! renders the dashboard. Nothing here is global.

use crate::domain::calendar::{CalendarViewModel, FetchTicket};
use crate::domain::metrics::MetricKind;
use crate::domain::orderbook::{FeedSubscription, OrderBookViewModel};
use crate::domain::theme::{Preferences, Theme};
use crate::error::PrefsError;
use crate::shared::{supported_instruments, Symbol};
use chrono::NaiveDate;
use std::path::PathBuf;

/// Work the caller must start after an instrument change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstrumentChange {
    /// Kline fetch for the calendar, if its span or symbol changed.
    pub fetch: Option<FetchTicket>,
    /// Depth stream to open after closing the previous one.
    pub feed: Option<FeedSubscription>,
}

/// Everything the dashboard shows, owned by the app.
#[derive(Debug, Clone)]
pub struct AppState {
    theme: Theme,
    prefs_path: Option<PathBuf>,
    instruments: Vec<Symbol>,
    pub calendar: CalendarViewModel,
    pub orderbook: OrderBookViewModel,
}

impl AppState {
    /// Build the state for `today`, restoring the theme from `prefs_path`.
    ///
    /// With `None` the theme is not persisted.
    pub fn new(today: NaiveDate, prefs_path: Option<PathBuf>) -> Self {
        let theme = prefs_path
            .as_deref()
            .map(Preferences::load_or_default)
            .unwrap_or_default()
            .theme;
        let instruments = supported_instruments();
        let symbol = instruments.first().cloned().unwrap_or_default();
        tracing::info!(%symbol, theme = theme.as_str(), "dashboard state initialised");

        Self {
            theme,
            prefs_path,
            instruments,
            calendar: CalendarViewModel::new(symbol.clone(), today),
            orderbook: OrderBookViewModel::new(symbol),
        }
    }

    /// Like [`AppState::new`], using the platform preferences location.
    pub fn with_default_prefs(today: NaiveDate) -> Self {
        let path = Preferences::default_path()
            .map_err(|e| tracing::warn!(error = %e, "theme will not be persisted"))
            .ok();
        Self::new(today, path)
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Apply and persist a theme. The in-memory theme changes even if saving fails.
    pub fn set_theme(&mut self, theme: Theme) -> Result<(), PrefsError> {
        self.theme = theme;
        match &self.prefs_path {
            Some(path) => Preferences { theme }.save_to(path),
            None => Ok(()),
        }
    }

    pub fn instruments(&self) -> &[Symbol] {
        &self.instruments
    }

    pub fn symbol(&self) -> &Symbol {
        self.calendar.symbol()
    }

    /// Switch the calendar and the order book to `symbol`.
    pub fn set_instrument(&mut self, symbol: Symbol) -> InstrumentChange {
        let feed = (self.orderbook.symbol() != &symbol)
            .then(|| self.orderbook.switch_instrument(symbol.clone()));
        let fetch = self.calendar.set_instrument(symbol);
        InstrumentChange { fetch, feed }
    }

    pub fn set_metric(&mut self, metric: MetricKind) {
        self.calendar.set_metric(metric);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::calendar::FetchStatus;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 15).unwrap()
    }

    fn prefs_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("market-calendar-app-{}-{}", name, std::process::id()))
            .join("preferences.json")
    }

    #[test]
    fn test_defaults() {
        let app = AppState::new(today(), None);
        assert_eq!(app.theme(), Theme::Default);
        assert_eq!(app.symbol(), &Symbol::from("BTCUSDT"));
        assert_eq!(app.instruments().len(), 2);
        assert_eq!(app.calendar.status(), &FetchStatus::Idle);
    }

    #[test]
    fn test_theme_survives_restart() {
        let path = prefs_path("theme");
        let mut app = AppState::new(today(), Some(path.clone()));
        app.set_theme(Theme::HighContrast).unwrap();

        let restored = AppState::new(today(), Some(path.clone()));
        assert_eq!(restored.theme(), Theme::HighContrast);
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_set_instrument_switches_both_panels() {
        let mut app = AppState::new(today(), None);
        let change = app.set_instrument(Symbol::from("ETHUSDT"));

        let ticket = change.fetch.unwrap();
        assert_eq!(ticket.symbol, Symbol::from("ETHUSDT"));
        let feed = change.feed.unwrap();
        assert_eq!(feed.stream_name(), "ethusdt@depth");
        assert_eq!(app.orderbook.symbol(), &Symbol::from("ETHUSDT"));

        let again = app.set_instrument(Symbol::from("ETHUSDT"));
        assert!(again.fetch.is_none());
        assert!(again.feed.is_none());
    }

    #[test]
    fn test_set_metric_issues_no_fetch() {
        let mut app = AppState::new(today(), None);
        app.set_metric(MetricKind::Performance);
        assert_eq!(app.calendar.metric(), MetricKind::Performance);
        assert_eq!(app.calendar.status(), &FetchStatus::Idle);
    }
}
