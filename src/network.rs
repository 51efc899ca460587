//! Network URL constants for the exchange endpoints.

/// Default REST API base URL.
pub const DEFAULT_API_URL: &str = "https://api.binance.com";

/// Default WebSocket base URL for raw streams (`{url}/{symbol}@depth`).
pub const DEFAULT_WS_URL: &str = "wss://stream.binance.com:9443/ws";
