//! Orderbook state containers: app-owned, crate-provided update logic.

use super::wire::{DepthResponse, DepthUpdate};
use super::{DepthError, OrderBookSnapshot};
use crate::shared::Symbol;
use crate::ws::WsEvent;

/// Lifecycle of the live depth feed for the selected instrument.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FeedStatus {
    #[default]
    Connecting,
    Streaming,
    Error(String),
}

/// Identifies one feed subscription. Messages carrying an older generation
/// belong to a torn-down connection and are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedSubscription {
    pub symbol: Symbol,
    pub generation: u64,
}

impl FeedSubscription {
    pub fn stream_name(&self) -> String {
        self.symbol.stream_name()
    }
}

/// Live orderbook view for one instrument at a time.
///
/// The app owns this and feeds it raw frames; the snapshot is replaced
/// wholesale on every valid message and frozen while in [`FeedStatus::Error`].
#[derive(Debug, Clone, Default)]
pub struct OrderBookViewModel {
    symbol: Symbol,
    generation: u64,
    status: FeedStatus,
    snapshot: OrderBookSnapshot,
}

impl OrderBookViewModel {
    pub fn new(symbol: Symbol) -> Self {
        Self {
            symbol,
            ..Default::default()
        }
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn status(&self) -> &FeedStatus {
        &self.status
    }

    pub fn snapshot(&self) -> &OrderBookSnapshot {
        &self.snapshot
    }

    pub fn is_streaming(&self) -> bool {
        self.status == FeedStatus::Streaming
    }

    /// The subscription the caller should currently have open.
    pub fn subscription(&self) -> FeedSubscription {
        FeedSubscription {
            symbol: self.symbol.clone(),
            generation: self.generation,
        }
    }

    /// Start (or restart) the feed for `symbol`. The caller must close the
    /// previous connection before opening the one described by the result.
    pub fn switch_instrument(&mut self, symbol: Symbol) -> FeedSubscription {
        tracing::debug!(from = %self.symbol, to = %symbol, "orderbook instrument switch");
        self.symbol = symbol;
        self.generation += 1;
        self.status = FeedStatus::Connecting;
        self.snapshot = OrderBookSnapshot::default();
        self.subscription()
    }

    /// Apply one raw text frame. Returns `false` when the frame is stale or malformed.
    pub fn apply_message(&mut self, sub: &FeedSubscription, text: &str) -> bool {
        if !self.accepts(sub) {
            return false;
        }
        match OrderBookSnapshot::from_message(text) {
            Ok(snapshot) => {
                self.snapshot = snapshot;
                self.status = FeedStatus::Streaming;
                true
            }
            Err(e) => {
                self.fail(&e);
                false
            }
        }
    }

    /// Apply an already-decoded depth update.
    pub fn apply_update(&mut self, sub: &FeedSubscription, update: &DepthUpdate) -> bool {
        if !self.accepts(sub) {
            return false;
        }
        match OrderBookSnapshot::try_from(update) {
            Ok(snapshot) => {
                self.snapshot = snapshot;
                self.status = FeedStatus::Streaming;
                true
            }
            Err(e) => {
                self.fail(&e);
                false
            }
        }
    }

    /// Route one depth-stream event. Returns `true` if the snapshot changed.
    pub fn apply_event(&mut self, sub: &FeedSubscription, event: &WsEvent) -> bool {
        match event {
            WsEvent::Connected => false,
            WsEvent::Depth(update) => self.apply_update(sub, update),
            WsEvent::Error(message) => {
                self.on_feed_error(sub, message.clone());
                false
            }
            WsEvent::Disconnected { reason, .. } => {
                self.on_feed_error(sub, format!("Connection closed: {}", reason));
                false
            }
            WsEvent::MaxReconnectReached => {
                self.on_feed_error(sub, "Reconnect attempts exhausted");
                false
            }
        }
    }

    /// Seed the book from a REST depth snapshot while the stream connects.
    /// Does not change the feed status.
    pub fn seed(&mut self, sub: &FeedSubscription, resp: &DepthResponse) -> Result<(), DepthError> {
        if !self.accepts(sub) {
            return Ok(());
        }
        self.snapshot = OrderBookSnapshot::try_from(resp)?;
        Ok(())
    }

    /// Connection-level failure. The last snapshot stays visible.
    pub fn on_feed_error(&mut self, sub: &FeedSubscription, message: impl Into<String>) {
        if !self.accepts(sub) {
            return;
        }
        let message = message.into();
        tracing::warn!(symbol = %self.symbol, error = %message, "depth feed error");
        self.status = FeedStatus::Error(message);
    }

    fn accepts(&self, sub: &FeedSubscription) -> bool {
        if sub.generation != self.generation || sub.symbol != self.symbol {
            tracing::trace!(generation = sub.generation, "dropping stale depth frame");
            return false;
        }
        true
    }

    fn fail(&mut self, e: &DepthError) {
        tracing::warn!(symbol = %self.symbol, error = %e, "depth message rejected");
        self.status = FeedStatus::Error(e.to_string());
    }
}
