//! # Market Calendar
//!
//! Core of a market-data dashboard: a calendar heatmap of daily OHLCV
//! metrics, a live top-of-book panel and export of what is on screen.
//!
//! ## Architecture
//!
//! The crate is organized in layers:
//!
//! 1. **Core**: Shared types, domain slices (klines, metrics, calendar,
//!    orderbook, theme), exports and the scoped `AppState`
//! 2. **HTTP API**: `ExchangeHttp` with a configurable retry policy
//! 3. **WebSocket**: Depth-stream events; `tokio-tungstenite` transport behind `ws-native`
//! 4. **High-Level Client**: `DashboardClient` with nested sub-clients
//!
//! View-models never perform I/O. Their triggers hand back a ticket or a
//! subscription describing the work to do, and the app feeds the outcome back.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use market_calendar::prelude::*;
//!
//! let client = DashboardClient::builder().build()?;
//! let mut app = AppState::with_default_prefs(today);
//!
//! client.calendar().refresh(&mut app.calendar).await?;
//! for cell in app.calendar.cells(today) {
//!     println!("{} {:?}", cell.key, cell.label(app.calendar.metric()));
//! }
//!
//! if let Some(ticket) = app.calendar.next() {
//!     client.calendar().run(&mut app.calendar, ticket).await?;
//! }
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Shared newtypes and formatting helpers used across all domains.
pub mod shared;

/// Domain modules (vertical slices): types, wire types, conversions, state.
pub mod domain;

/// CSV / PDF / image export.
pub mod export;

/// Scoped application state.
pub mod app;

/// Unified error types.
pub mod error;

/// Network URL constants.
pub mod network;

// ── Layer 2: HTTP API ────────────────────────────────────────────────────────

/// HTTP client with retry policies.
#[cfg(feature = "http")]
pub mod http;

// ── Layer 3: WebSocket ───────────────────────────────────────────────────────

/// WebSocket events, config and transport.
pub mod ws;

// ── Layer 4: High-Level Client ───────────────────────────────────────────────

/// `DashboardClient`: the primary entry point for exchange access.
#[cfg(feature = "http")]
pub mod client;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Shared newtypes
    pub use crate::shared::{supported_instruments, Interval, Symbol};

    // Domain types: klines + metrics
    pub use crate::domain::kline::RawCandle;
    pub use crate::domain::metrics::{
        DayMetrics, Direction, MetricKind, MetricsMap, Tone, VolatilityBand,
    };

    // Domain types: calendar
    pub use crate::domain::calendar::{
        CalendarCell, CalendarViewModel, DateRange, DetailPanel, FetchStatus, FetchTicket,
        NavKey, ViewMode, ViewState,
    };

    // Domain types: orderbook
    pub use crate::domain::orderbook::{
        FeedStatus, FeedSubscription, OrderBookSnapshot, OrderBookViewModel, PriceLevel,
    };

    // Domain types: theme
    pub use crate::domain::theme::{Preferences, Theme};

    // App state + export
    pub use crate::app::{AppState, InstrumentChange};
    pub use crate::export::ExportFormat;

    // Errors
    pub use crate::error::{DashboardError, ExportError, HttpError, PrefsError, WsError};

    // Network
    pub use crate::network::{DEFAULT_API_URL, DEFAULT_WS_URL};

    // HTTP client + sub-clients
    #[cfg(feature = "http")]
    pub use crate::client::{
        CalendarClient, DashboardClient, DashboardClientBuilder, KlinesClient, OrderbooksClient,
    };
    #[cfg(feature = "http")]
    pub use crate::http::retry::{RetryConfig, RetryPolicy};

    // WebSocket types
    pub use crate::ws::{ReadyState, WsConfig, WsEvent};
    #[cfg(feature = "ws-native")]
    pub use crate::ws::native::WsClient;
}
