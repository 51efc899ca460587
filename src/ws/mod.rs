//! WebSocket layer: depth-stream events, configuration, frame parsing.
//!
//! The transport lives in `native.rs` behind the `ws-native` feature
//! (`tokio-tungstenite`). The types here are always available so state
//! containers can consume events without pulling in tokio.

#[cfg(feature = "ws-native")]
pub mod native;

use crate::domain::orderbook::wire::DepthUpdate;
use crate::error::WsError;
use crate::shared::Symbol;

// ─── Connection state ────────────────────────────────────────────────────────

/// Mirrors the browser `WebSocket.readyState` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum ReadyState {
    Connecting = 0,
    Open = 1,
    Closing = 2,
    Closed = 3,
}

impl From<u16> for ReadyState {
    fn from(v: u16) -> Self {
        match v {
            0 => ReadyState::Connecting,
            1 => ReadyState::Open,
            2 => ReadyState::Closing,
            _ => ReadyState::Closed,
        }
    }
}

// ─── WsEvent ─────────────────────────────────────────────────────────────────

/// Events emitted by the depth stream to the consumer.
#[derive(Debug, Clone, PartialEq)]
pub enum WsEvent {
    /// Connection established.
    Connected,
    /// A parsed depth update.
    Depth(DepthUpdate),
    /// Connection lost.
    Disconnected { code: Option<u16>, reason: String },
    /// A frame failed to parse, or the connection could not be opened.
    Error(String),
    /// Reconnection was enabled and gave up.
    MaxReconnectReached,
}

// ─── Config ──────────────────────────────────────────────────────────────────

/// Configuration for the WS client.
///
/// The dashboard never reconnects on its own: a closed feed stays closed
/// until the instrument changes. `reconnect` exists for long-running consumers.
#[derive(Debug, Clone)]
pub struct WsConfig {
    pub url: String,
    pub reconnect: bool,
    pub base_reconnect_delay_ms: u32,
    pub max_reconnect_attempts: u32,
    pub event_buffer: usize,
}

impl Default for WsConfig {
    fn default() -> Self {
        Self {
            url: crate::network::DEFAULT_WS_URL.to_string(),
            reconnect: false,
            base_reconnect_delay_ms: 1000,
            max_reconnect_attempts: 5,
            event_buffer: 256,
        }
    }
}

impl WsConfig {
    /// Raw stream URL for `symbol`, e.g. `wss://…/ws/btcusdt@depth`.
    pub fn stream_url(&self, symbol: &Symbol) -> String {
        format!("{}/{}", self.url.trim_end_matches('/'), symbol.stream_name())
    }
}

/// Decode one text frame of the depth stream.
pub fn parse_frame(text: &str) -> Result<DepthUpdate, WsError> {
    serde_json::from_str(text).map_err(|e| WsError::DeserializationError(e.to_string()))
}
