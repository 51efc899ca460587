//! Shared newtypes and utilities used across all domain modules.
//!
//! These types are serialization-transparent: they serialize/deserialize identically
//! to the raw format the exchange sends, so they can be used directly in wire types
//! without conversion overhead.

pub mod fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

/// Quote assets recognised when splitting a symbol into `BASE/QUOTE`.
const KNOWN_QUOTES: [&str; 5] = ["USDT", "USDC", "BUSD", "BTC", "ETH"];

// ─── Symbol ──────────────────────────────────────────────────────────────────

/// Newtype for exchange trading-pair symbols (e.g. `"BTCUSDT"`).
///
/// Always stored upper-case, which is what the REST API expects. The
/// stream name uses the lower-case form (see [`Symbol::stream_name`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into().trim().to_ascii_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split into `(base, quote)` when the symbol ends with a known quote asset.
    pub fn split(&self) -> Option<(&str, &str)> {
        KNOWN_QUOTES.iter().find_map(|quote| {
            let base = self.0.strip_suffix(quote)?;
            (!base.is_empty()).then(|| (base, *quote))
        })
    }

    /// Human label, `BTC/USDT` for `BTCUSDT`. Falls back to the raw symbol.
    pub fn display_pair(&self) -> String {
        match self.split() {
            Some((base, quote)) => format!("{}/{}", base, quote),
            None => self.0.clone(),
        }
    }

    /// Name of the raw depth stream for this symbol (`btcusdt@depth`).
    pub fn stream_name(&self) -> String {
        format!("{}@depth", self.0.to_ascii_lowercase())
    }
}

impl Default for Symbol {
    fn default() -> Self {
        Symbol::from("BTCUSDT")
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl FromStr for Symbol {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Symbol::new(s))
    }
}

impl Serialize for Symbol {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Symbol {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Symbol::new(s))
    }
}

// ─── Instruments ─────────────────────────────────────────────────────────────

/// Instruments offered by the instrument filter, in display order.
pub fn supported_instruments() -> Vec<Symbol> {
    vec![Symbol::from("BTCUSDT"), Symbol::from("ETHUSDT")]
}

// ─── Interval ────────────────────────────────────────────────────────────────

/// Kline interval. The calendar always requests [`Interval::Day1`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "1m")]
    Minute1,
    #[serde(rename = "15m")]
    Minute15,
    #[serde(rename = "1h")]
    Hour1,
    #[serde(rename = "4h")]
    Hour4,
    #[default]
    #[serde(rename = "1d")]
    Day1,
    #[serde(rename = "1w")]
    Week1,
}

impl Interval {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Minute1 => "1m",
            Self::Minute15 => "15m",
            Self::Hour1 => "1h",
            Self::Hour4 => "4h",
            Self::Day1 => "1d",
            Self::Week1 => "1w",
        }
    }

    /// Duration of one candle in milliseconds.
    pub fn millis(&self) -> i64 {
        match self {
            Self::Minute1 => 60_000,
            Self::Minute15 => 900_000,
            Self::Hour1 => 3_600_000,
            Self::Hour4 => 14_400_000,
            Self::Day1 => 86_400_000,
            Self::Week1 => 604_800_000,
        }
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
