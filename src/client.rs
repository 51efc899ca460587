//! High-level client: `DashboardClient` with nested sub-client accessors.
//!
//! Each domain has its own sub-client in `domain/<name>/client.rs`.
//! This module keeps the builder and accessor methods.

use crate::domain::calendar::client::Calendar;
use crate::domain::kline::client::Klines;
use crate::domain::orderbook::client::Orderbooks;
use crate::error::DashboardError;
use crate::http::{ExchangeHttp, RetryPolicy};
use crate::ws::WsConfig;

// Re-export sub-client types for convenience.
pub use crate::domain::calendar::client::Calendar as CalendarClient;
pub use crate::domain::kline::client::Klines as KlinesClient;
pub use crate::domain::orderbook::client::Orderbooks as OrderbooksClient;

/// The primary entry point for exchange access.
///
/// Provides nested sub-client accessors for each domain:
/// `client.klines()`, `client.calendar()`, `client.orderbooks()`.
#[derive(Clone)]
pub struct DashboardClient {
    pub(crate) http: ExchangeHttp,
    pub(crate) ws_config: WsConfig,
}

impl DashboardClient {
    pub fn builder() -> DashboardClientBuilder {
        DashboardClientBuilder::default()
    }

    // ── Sub-client accessors ─────────────────────────────────────────────

    pub fn klines(&self) -> Klines<'_> {
        Klines { client: self }
    }

    pub fn calendar(&self) -> Calendar<'_> {
        Calendar { client: self }
    }

    pub fn orderbooks(&self) -> Orderbooks<'_> {
        Orderbooks { client: self }
    }

    /// Get a WS config for opening a depth stream.
    ///
    /// The WS client is not embedded in `DashboardClient`: its lifetime
    /// follows the order-book panel and the selected instrument.
    pub fn ws_config(&self) -> &WsConfig {
        &self.ws_config
    }

    /// Create a new native WS client from the current config.
    #[cfg(feature = "ws-native")]
    pub fn ws_native(&self) -> crate::ws::native::WsClient {
        crate::ws::native::WsClient::new(self.ws_config.clone())
    }

    /// Open the depth stream for `symbol` on a fresh client.
    ///
    /// Drop (or `disconnect`) the previous feed before calling this on an
    /// instrument change.
    #[cfg(feature = "ws-native")]
    pub async fn depth_feed(
        &self,
        symbol: &crate::shared::Symbol,
    ) -> Result<crate::ws::native::WsClient, DashboardError> {
        let mut ws = self.ws_native();
        ws.connect(symbol).await?;
        Ok(ws)
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

pub struct DashboardClientBuilder {
    base_url: String,
    ws_url: String,
    retry: RetryPolicy,
    ws_reconnect: bool,
}

impl Default for DashboardClientBuilder {
    fn default() -> Self {
        Self {
            base_url: crate::network::DEFAULT_API_URL.to_string(),
            ws_url: crate::network::DEFAULT_WS_URL.to_string(),
            retry: RetryPolicy::default(),
            ws_reconnect: false,
        }
    }
}

impl DashboardClientBuilder {
    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    pub fn ws_url(mut self, url: &str) -> Self {
        self.ws_url = url.to_string();
        self
    }

    pub fn retry(mut self, policy: RetryPolicy) -> Self {
        self.retry = policy;
        self
    }

    /// Let the depth stream reconnect by itself after a drop.
    pub fn ws_reconnect(mut self, enabled: bool) -> Self {
        self.ws_reconnect = enabled;
        self
    }

    pub fn build(self) -> Result<DashboardClient, DashboardError> {
        if self.base_url.trim().is_empty() {
            return Err(DashboardError::Validation("base_url must not be empty".into()));
        }
        Ok(DashboardClient {
            http: ExchangeHttp::new(&self.base_url, self.retry)?,
            ws_config: WsConfig {
                url: self.ws_url,
                reconnect: self.ws_reconnect,
                ..WsConfig::default()
            },
        })
    }
}
