//! Orderbooks sub-client: REST depth snapshots.

use crate::client::DashboardClient;
use crate::domain::orderbook::wire::DepthResponse;
use crate::domain::orderbook::{FeedSubscription, OrderBookSnapshot, OrderBookViewModel};
use crate::error::DashboardError;
use crate::shared::Symbol;

/// Default number of levels requested from the REST depth endpoint.
pub const DEFAULT_DEPTH_LIMIT: u32 = 5;

/// Sub-client for orderbook operations.
pub struct Orderbooks<'a> {
    pub(crate) client: &'a DashboardClient,
}

impl<'a> Orderbooks<'a> {
    /// Raw depth response (never cached: always fresh).
    pub async fn depth(
        &self,
        symbol: &Symbol,
        limit: Option<u32>,
    ) -> Result<DepthResponse, DashboardError> {
        let limit = limit.unwrap_or(DEFAULT_DEPTH_LIMIT);
        Ok(self.client.http.get_depth(symbol.as_str(), limit).await?)
    }

    /// Depth converted to a top-of-book snapshot.
    pub async fn snapshot(
        &self,
        symbol: &Symbol,
        limit: Option<u32>,
    ) -> Result<OrderBookSnapshot, DashboardError> {
        let resp = self.depth(symbol, limit).await?;
        OrderBookSnapshot::try_from(&resp).map_err(|e| DashboardError::Validation(e.to_string()))
    }

    /// Fetch a REST snapshot and seed the view model for `sub`.
    pub async fn seed(
        &self,
        vm: &mut OrderBookViewModel,
        sub: &FeedSubscription,
    ) -> Result<(), DashboardError> {
        let resp = self.depth(&sub.symbol, None).await?;
        vm.seed(sub, &resp)
            .map_err(|e| DashboardError::Validation(e.to_string()))
    }
}
