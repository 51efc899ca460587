//! Conversion: depth wire messages → OrderBookSnapshot (TryFrom + validation).

use super::wire::{DepthResponse, DepthUpdate, WireLevel};
use super::{DepthError, OrderBookSnapshot, PriceLevel, TOP_LEVELS};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse the first [`TOP_LEVELS`] entries of one side, in delivered order.
fn top_levels(side: &'static str, levels: &[WireLevel]) -> Result<Vec<PriceLevel>, DepthError> {
    levels
        .iter()
        .take(TOP_LEVELS)
        .enumerate()
        .map(|(index, [price, size])| {
            let invalid = || DepthError::InvalidLevel {
                side,
                index,
                value: format!("{}@{}", size, price),
            };
            Ok(PriceLevel {
                price: Decimal::from_str(price.trim()).map_err(|_| invalid())?,
                size: Decimal::from_str(size.trim()).map_err(|_| invalid())?,
            })
        })
        .collect()
}

impl TryFrom<&DepthUpdate> for OrderBookSnapshot {
    type Error = DepthError;

    fn try_from(update: &DepthUpdate) -> Result<Self, Self::Error> {
        Ok(OrderBookSnapshot {
            bids: top_levels("bid", &update.bids)?,
            asks: top_levels("ask", &update.asks)?,
        })
    }
}

impl TryFrom<&DepthResponse> for OrderBookSnapshot {
    type Error = DepthError;

    fn try_from(resp: &DepthResponse) -> Result<Self, Self::Error> {
        Ok(OrderBookSnapshot {
            bids: top_levels("bid", &resp.bids)?,
            asks: top_levels("ask", &resp.asks)?,
        })
    }
}

impl OrderBookSnapshot {
    /// Parse a raw depth-stream text frame.
    pub fn from_message(text: &str) -> Result<Self, DepthError> {
        let update: DepthUpdate =
            serde_json::from_str(text).map_err(|e| DepthError::Malformed(e.to_string()))?;
        OrderBookSnapshot::try_from(&update)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wire(n: usize, base: u32) -> Vec<WireLevel> {
        (0..n)
            .map(|i| [format!("{}.50", base - i as u32), "2.0".to_string()])
            .collect()
    }

    #[test]
    fn test_takes_first_ten_in_input_order() {
        let update = DepthUpdate {
            event_type: None,
            event_time: None,
            symbol: None,
            first_update_id: None,
            final_update_id: None,
            bids: wire(11, 100),
            asks: wire(3, 200),
        };
        let snap = OrderBookSnapshot::try_from(&update).unwrap();
        assert_eq!(snap.bids.len(), 10);
        assert_eq!(snap.asks.len(), 3);
        for (i, level) in snap.bids.iter().enumerate() {
            assert_eq!(level.price, Decimal::from_str(&update.bids[i][0]).unwrap());
        }
        assert_eq!(snap.bids[0].price_label(), "100.50");
    }

    #[test]
    fn test_no_resorting() {
        let text = r#"{"b":[["1.0","1"],["3.0","1"],["2.0","1"]],"a":[]}"#;
        let snap = OrderBookSnapshot::from_message(text).unwrap();
        let prices: Vec<String> = snap.bids.iter().map(|l| l.price.to_string()).collect();
        assert_eq!(prices, vec!["1.0", "3.0", "2.0"]);
    }

    #[test]
    fn test_invalid_level_reports_side() {
        let err = OrderBookSnapshot::from_message(r#"{"b":[],"a":[["x","1"]]}"#).unwrap_err();
        assert!(matches!(err, DepthError::InvalidLevel { side: "ask", index: 0, .. }));
    }

    #[test]
    fn test_malformed_json() {
        let err = OrderBookSnapshot::from_message("not json").unwrap_err();
        assert!(matches!(err, DepthError::Malformed(_)));
        let err = OrderBookSnapshot::from_message(r#"{"b":[["1.0"]]}"#).unwrap_err();
        assert!(matches!(err, DepthError::Malformed(_)));
    }
}
