//! Integration tests for the native depth-stream client.
//!
//! These tests connect to the public exchange stream and exercise the
//! connect → receive → switch instrument → disconnect lifecycle.
//!
//! All tests are `#[ignore]` because they require network access.
//!
//! Run with:
//! ```bash
//! cargo test --features ws-native --test ws_native_integration -- --ignored
//! ```

#![cfg(feature = "ws-native")]

use std::time::Duration;

use futures_util::StreamExt;
use tokio::time::timeout;

use market_calendar::domain::orderbook::{FeedStatus, OrderBookViewModel, TOP_LEVELS};
use market_calendar::shared::Symbol;
use market_calendar::ws::native::WsClient;
use market_calendar::ws::{WsConfig, WsEvent};

const TEST_TIMEOUT: Duration = Duration::from_secs(15);

fn test_config() -> WsConfig {
    WsConfig {
        reconnect: false,
        ..Default::default()
    }
}

/// Connect and wait for the `Connected` event.
async fn connected_client(symbol: &Symbol) -> WsClient {
    let mut client = WsClient::new(test_config());
    client.connect(symbol).await.expect("connect should succeed");
    next_matching(&client, |ev| matches!(ev, WsEvent::Connected)).await;
    client
}

/// Wait for the next event that matches the predicate, ignoring others.
/// The events stream is created and dropped within this call.
async fn next_matching(client: &WsClient, predicate: impl Fn(&WsEvent) -> bool) -> WsEvent {
    let events = client.events();
    tokio::pin!(events);

    timeout(TEST_TIMEOUT, async {
        while let Some(ev) = events.next().await {
            if predicate(&ev) {
                return ev;
            }
        }
        panic!("event stream ended without a matching event");
    })
    .await
    .expect("timed out waiting for matching event")
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[tokio::test]
#[ignore]
async fn connect_and_receive_connected_event() {
    let mut client = connected_client(&Symbol::from("BTCUSDT")).await;
    assert!(client.is_connected());
    assert_eq!(client.symbol(), Some(&Symbol::from("BTCUSDT")));
    client.disconnect().await.unwrap();
}

#[tokio::test]
#[ignore]
async fn depth_update_drives_view_model() {
    let symbol = Symbol::from("BTCUSDT");
    let mut client = connected_client(&symbol).await;
    let mut vm = OrderBookViewModel::new(symbol);
    let sub = vm.subscription();

    let event = next_matching(&client, |ev| matches!(ev, WsEvent::Depth(_))).await;
    assert!(vm.apply_event(&sub, &event));
    assert_eq!(vm.status(), &FeedStatus::Streaming);
    assert!(vm.snapshot().bids.len() <= TOP_LEVELS);
    assert!(vm.snapshot().asks.len() <= TOP_LEVELS);

    client.disconnect().await.unwrap();
}

#[tokio::test]
#[ignore]
async fn switching_symbol_replaces_stream() {
    let mut client = connected_client(&Symbol::from("BTCUSDT")).await;

    client.connect(&Symbol::from("ETHUSDT")).await.unwrap();
    next_matching(&client, |ev| matches!(ev, WsEvent::Connected)).await;
    assert_eq!(client.symbol(), Some(&Symbol::from("ETHUSDT")));

    let event = next_matching(&client, |ev| matches!(ev, WsEvent::Depth(_))).await;
    match event {
        WsEvent::Depth(update) => {
            if let Some(s) = update.symbol {
                assert_eq!(s, Symbol::from("ETHUSDT"));
            }
        }
        other => panic!("expected Depth, got: {other:?}"),
    }

    client.disconnect().await.unwrap();
}

#[tokio::test]
#[ignore]
async fn graceful_disconnect() {
    let mut client = connected_client(&Symbol::from("ETHUSDT")).await;
    assert!(client.is_connected());

    client
        .disconnect()
        .await
        .expect("disconnect should succeed");
    assert!(!client.is_connected());
    assert!(client.symbol().is_none());
}

#[cfg(feature = "http")]
#[tokio::test]
#[ignore]
async fn depth_feed_from_dashboard_client() {
    let client = market_calendar::client::DashboardClient::builder()
        .build()
        .expect("client should build");
    let mut feed = client
        .depth_feed(&Symbol::from("BTCUSDT"))
        .await
        .expect("feed should open");

    next_matching(&feed, |ev| matches!(ev, WsEvent::Depth(_))).await;
    feed.disconnect().await.unwrap();
}
