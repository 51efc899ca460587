//! Wire types for depth responses (REST + WS).

use crate::shared::Symbol;
use serde::{Deserialize, Serialize};

/// `[price, quantity]`, both as strings.
pub type WireLevel = [String; 2];

// ─── REST wire types ─────────────────────────────────────────────────────────

/// REST response for `GET /api/v3/depth`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DepthResponse {
    pub last_update_id: u64,
    pub bids: Vec<WireLevel>,
    pub asks: Vec<WireLevel>,
}

// ─── WS wire types ───────────────────────────────────────────────────────────

/// A depth-update message from the `<symbol>@depth` stream.
///
/// Only `b` and `a` are needed; a missing side is treated as empty.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DepthUpdate {
    #[serde(rename = "e", default)]
    pub event_type: Option<String>,
    #[serde(rename = "E", default)]
    pub event_time: Option<u64>,
    #[serde(rename = "s", default)]
    pub symbol: Option<Symbol>,
    #[serde(rename = "U", default)]
    pub first_update_id: Option<u64>,
    #[serde(rename = "u", default)]
    pub final_update_id: Option<u64>,
    #[serde(rename = "b", default)]
    pub bids: Vec<WireLevel>,
    #[serde(rename = "a", default)]
    pub asks: Vec<WireLevel>,
}
