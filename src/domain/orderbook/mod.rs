//! Orderbook domain: top-of-book price levels from the depth feed.

#[cfg(feature = "http")]
pub mod client;
mod convert;
pub mod state;
pub mod wire;

pub use state::{FeedStatus, FeedSubscription, OrderBookViewModel};

use crate::shared::fmt;
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

/// Levels kept per side.
pub const TOP_LEVELS: usize = 10;

/// One price level as delivered by the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceLevel {
    pub price: Decimal,
    pub size: Decimal,
}

impl PriceLevel {
    /// Price with two decimals.
    pub fn price_label(&self) -> String {
        fmt::fixed(self.price.to_f64().unwrap_or(f64::NAN), 2)
    }

    /// Size with four decimals.
    pub fn size_label(&self) -> String {
        fmt::fixed(self.size.to_f64().unwrap_or(f64::NAN), 4)
    }
}

/// Top bids and asks, each capped at [`TOP_LEVELS`] in feed order.
///
/// Replaced wholesale on every message; never merged or re-sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBookSnapshot {
    pub bids: Vec<PriceLevel>,
    pub asks: Vec<PriceLevel>,
}

impl OrderBookSnapshot {
    /// First bid as delivered (the feed lists best first).
    pub fn best_bid(&self) -> Option<Decimal> {
        self.bids.first().map(|l| l.price)
    }

    /// First ask as delivered.
    pub fn best_ask(&self) -> Option<Decimal> {
        self.asks.first().map(|l| l.price)
    }

    pub fn mid_price(&self) -> Option<Decimal> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some((bid + ask) / Decimal::from(2)),
            _ => None,
        }
    }

    pub fn spread(&self) -> Option<Decimal> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some(ask - bid),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }
}

// ─── Validation ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum DepthError {
    Malformed(String),
    InvalidLevel { side: &'static str, index: usize, value: String },
}

impl std::fmt::Display for DepthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DepthError::Malformed(m) => write!(f, "Malformed depth message: {m}"),
            DepthError::InvalidLevel { side, index, value } => {
                write!(f, "Invalid {side} level #{index}: {value:?}")
            }
        }
    }
}

impl std::error::Error for DepthError {}
