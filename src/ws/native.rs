//! Native WebSocket client: `tokio-tungstenite`.
//!
//! One client follows one raw depth stream (`<symbol>@depth`):
//! - Background tokio task owns the socket
//! - Server pings are answered; every text frame becomes a `WsEvent`
//! - Optional exponential backoff reconnection with jitter (off by default)
//! - Stream-based event delivery to consumer; depth frames are dropped when
//!   the consumer lags, connection events never are

use std::pin::Pin;
use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::{SplitSink, SplitStream, Stream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::error::WsError;
use crate::shared::Symbol;
use crate::ws::{parse_frame, ReadyState, WsConfig, WsEvent};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

// ─── Commands from public API to background task ─────────────────────────────

enum Command {
    Disconnect,
}

// ─── Disconnect reasons for reconnection decision ────────────────────────────

#[derive(Debug)]
enum DisconnectReason {
    UserRequested,
    NormalClose,
    Error(String),
}

// ─── Background task state ───────────────────────────────────────────────────

/// Buffer slots depth frames may not use, so a close or error always fits.
const RESERVED_SLOTS: usize = 1;

struct TaskState {
    config: WsConfig,
    url: String,
    event_tx: mpsc::Sender<WsEvent>,
    cmd_rx: mpsc::Receiver<Command>,
    reconnect_attempts: u32,
    ready_state: Arc<AtomicU16>,
}

impl TaskState {
    /// Queue an event without waiting.
    ///
    /// Depth frames replace each other, so one is dropped when only the
    /// reserved slots are left.
    fn emit(&self, event: WsEvent) {
        if matches!(event, WsEvent::Depth(_)) && self.event_tx.capacity() <= RESERVED_SLOTS {
            tracing::debug!(url = %self.url, "WS event buffer full, dropping depth frame");
            return;
        }
        if self.event_tx.try_send(event).is_err() {
            tracing::warn!(url = %self.url, "WS event buffer full, dropping event");
        }
    }

    /// Queue a connection event, waiting for room if needed.
    async fn deliver(&self, event: WsEvent) {
        if self.event_tx.send(event).await.is_err() {
            tracing::debug!(url = %self.url, "WS event receiver gone");
        }
    }

    fn should_reconnect(&self) -> bool {
        self.config.reconnect && self.reconnect_attempts < self.config.max_reconnect_attempts
    }
}

// ─── Public WsClient ─────────────────────────────────────────────────────────

/// Native depth-stream client using `tokio-tungstenite`.
///
/// Uses a background tokio task for connection management.
/// The public API communicates with it via mpsc channels. Dropping the
/// client aborts the task and with it the socket.
pub struct WsClient {
    config: WsConfig,
    symbol: Option<Symbol>,
    cmd_tx: Option<mpsc::Sender<Command>>,
    event_rx: tokio::sync::Mutex<mpsc::Receiver<WsEvent>>,
    task_handle: Option<JoinHandle<()>>,
    ready_state: Arc<AtomicU16>,
}

impl WsClient {
    /// Create a new WS client. Does not connect yet.
    pub fn new(config: WsConfig) -> Self {
        Self {
            config,
            symbol: None,
            cmd_tx: None,
            event_rx: closed_events(),
            task_handle: None,
            ready_state: Arc::new(AtomicU16::new(ReadyState::Closed as u16)),
        }
    }

    /// Open the depth stream for `symbol`.
    ///
    /// A client follows one symbol at a time: connecting to a different
    /// symbol closes the current stream first. Each connection gets a new
    /// event channel, so events still queued from the previous symbol are
    /// discarded.
    pub async fn connect(&mut self, symbol: &Symbol) -> Result<(), WsError> {
        if self.cmd_tx.is_some() {
            if self.symbol.as_ref() == Some(symbol) {
                return Ok(());
            }
            // Old events are stale; closing the channel also frees a task
            // waiting for room in it.
            self.event_rx = closed_events();
            self.disconnect().await?;
        }

        let url = self.config.stream_url(symbol);
        if !(url.starts_with("ws://") || url.starts_with("wss://")) {
            return Err(WsError::InvalidUrl(url));
        }
        tracing::info!(%url, "Opening depth stream");

        let (cmd_tx, cmd_rx) = mpsc::channel(8);
        let (event_tx, event_rx) =
            mpsc::channel(self.config.event_buffer.max(RESERVED_SLOTS + 1));
        self.event_rx = tokio::sync::Mutex::new(event_rx);
        self.cmd_tx = Some(cmd_tx);
        self.symbol = Some(symbol.clone());
        self.ready_state
            .store(ReadyState::Connecting as u16, Ordering::SeqCst);

        let state = TaskState {
            config: self.config.clone(),
            url,
            event_tx,
            cmd_rx,
            reconnect_attempts: 0,
            ready_state: Arc::clone(&self.ready_state),
        };

        self.task_handle = Some(tokio::spawn(run_task(state)));
        Ok(())
    }

    /// Close the stream.
    ///
    /// Sends a graceful close to the background task and waits for it to finish.
    pub async fn disconnect(&mut self) -> Result<(), WsError> {
        if let Some(tx) = self.cmd_tx.take() {
            let _ = tx.send(Command::Disconnect).await;
        }

        if let Some(handle) = self.task_handle.take() {
            let abort = handle.abort_handle();
            if tokio::time::timeout(Duration::from_secs(5), handle).await.is_err() {
                tracing::warn!("depth stream task did not stop in time, aborting");
                abort.abort();
            }
        }

        self.symbol = None;
        self.ready_state
            .store(ReadyState::Closed as u16, Ordering::SeqCst);
        Ok(())
    }

    /// Symbol of the stream currently opened, if any.
    pub fn symbol(&self) -> Option<&Symbol> {
        self.symbol.as_ref()
    }

    /// Whether the WebSocket is currently open.
    pub fn is_connected(&self) -> bool {
        self.ready_state() == ReadyState::Open
    }

    /// Current connection state.
    pub fn ready_state(&self) -> ReadyState {
        ReadyState::from(self.ready_state.load(Ordering::SeqCst))
    }

    /// Get a stream of events from the WebSocket connection.
    ///
    /// The returned stream borrows `self`, so it must be dropped
    /// before calling `disconnect()`.
    pub fn events(&self) -> Pin<Box<dyn Stream<Item = WsEvent> + Send + '_>> {
        Box::pin(futures_util::stream::unfold(
            &self.event_rx,
            |rx| async move {
                let mut guard = rx.lock().await;
                guard.recv().await.map(|event| (event, rx))
            },
        ))
    }
}

impl Drop for WsClient {
    fn drop(&mut self) {
        if let Some(handle) = self.task_handle.take() {
            handle.abort();
        }
    }
}

// ─── Background task ─────────────────────────────────────────────────────────

async fn run_task(mut state: TaskState) {
    loop {
        let reason = match attempt_connect(&state.url).await {
            Ok((sink, stream)) => {
                state.reconnect_attempts = 0;
                state.ready_state.store(ReadyState::Open as u16, Ordering::SeqCst);
                state.deliver(WsEvent::Connected).await;
                run_connected(&mut state, sink, stream).await
            }
            Err(e) => {
                tracing::error!(url = %state.url, "WebSocket connection failed: {}", e);
                state
                    .deliver(WsEvent::Error(format!("Connection failed: {}", e)))
                    .await;
                DisconnectReason::Error(e)
            }
        };

        state.ready_state.store(ReadyState::Closed as u16, Ordering::SeqCst);
        if !retry_after(&mut state, reason).await {
            break;
        }
    }
}

/// Decide whether to reconnect and wait out the backoff if so.
async fn retry_after(state: &mut TaskState, reason: DisconnectReason) -> bool {
    let DisconnectReason::Error(e) = reason else {
        return false;
    };
    tracing::debug!(url = %state.url, error = %e, "depth stream dropped");

    if !state.config.reconnect {
        return false;
    }
    if !state.should_reconnect() {
        state.deliver(WsEvent::MaxReconnectReached).await;
        return false;
    }
    state
        .ready_state
        .store(ReadyState::Connecting as u16, Ordering::SeqCst);
    backoff_sleep(state).await
}

/// What the connected loop does after one inbound frame.
#[derive(Debug)]
enum Flow {
    Continue,
    Reply(Message),
    /// Connection is over; the event must reach the consumer.
    Stop(DisconnectReason, WsEvent),
}

/// Turn one inbound frame into events; pure apart from `emit`.
fn handle_inbound(
    state: &TaskState,
    msg: Option<Result<Message, tokio_tungstenite::tungstenite::Error>>,
) -> Flow {
    match msg {
        Some(Ok(Message::Text(text))) => {
            let raw: &str = text.as_ref();
            match parse_frame(raw) {
                Ok(update) => state.emit(WsEvent::Depth(update)),
                Err(e) => {
                    tracing::warn!(url = %state.url, "Rejected depth frame: {}", e);
                    state.emit(WsEvent::Error(e.to_string()));
                }
            }
            Flow::Continue
        }
        Some(Ok(Message::Ping(data))) => Flow::Reply(Message::Pong(data)),
        Some(Ok(Message::Close(frame))) => {
            let (code, reason) = extract_close(frame.as_ref());
            let event = WsEvent::Disconnected {
                code: Some(code),
                reason: reason.clone(),
            };
            let why = if code == 1000 {
                DisconnectReason::NormalClose
            } else {
                DisconnectReason::Error(reason)
            };
            Flow::Stop(why, event)
        }
        Some(Ok(_)) => Flow::Continue,
        Some(Err(e)) => {
            let reason = e.to_string();
            tracing::error!(url = %state.url, "WebSocket error: {}", reason);
            let event = WsEvent::Disconnected {
                code: None,
                reason: reason.clone(),
            };
            Flow::Stop(DisconnectReason::Error(reason), event)
        }
        None => {
            let event = WsEvent::Disconnected {
                code: None,
                reason: "Stream ended".into(),
            };
            Flow::Stop(DisconnectReason::Error("Stream ended".into()), event)
        }
    }
}

/// The inner connected loop: runs until the connection breaks.
async fn run_connected(
    state: &mut TaskState,
    mut sink: SplitSink<WsStream, Message>,
    mut stream: SplitStream<WsStream>,
) -> DisconnectReason {
    loop {
        tokio::select! {
            msg = stream.next() => match handle_inbound(state, msg) {
                Flow::Continue => {}
                Flow::Reply(reply) => {
                    let _ = sink.send(reply).await;
                }
                Flow::Stop(reason, event) => {
                    state.deliver(event).await;
                    return reason;
                }
            },

            cmd = state.cmd_rx.recv() => {
                // `None` means the WsClient was dropped.
                if let Some(Command::Disconnect) = cmd {
                    let _ = sink.send(Message::Close(Some(CloseFrame {
                        code: CloseCode::Normal,
                        reason: "Client disconnect".into(),
                    }))).await;
                }
                return DisconnectReason::UserRequested;
            }
        }
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// A receiver whose sender is already gone; `events()` on it ends at once.
fn closed_events() -> tokio::sync::Mutex<mpsc::Receiver<WsEvent>> {
    let (_, event_rx) = mpsc::channel(1);
    tokio::sync::Mutex::new(event_rx)
}

/// Attempt to establish a WebSocket connection with a 30-second timeout.
async fn attempt_connect(
    url: &str,
) -> Result<(SplitSink<WsStream, Message>, SplitStream<WsStream>), String> {
    let (ws_stream, _) = tokio::time::timeout(Duration::from_secs(30), connect_async(url))
        .await
        .map_err(|_| "Connection timeout".to_string())?
        .map_err(|e| e.to_string())?;

    Ok(ws_stream.split())
}

/// Close code and reason; a missing frame is reported as 1006 (abnormal).
fn extract_close(frame: Option<&CloseFrame>) -> (u16, String) {
    frame.map_or_else(
        || (1006, "No close frame".into()),
        |f| (f.code.into(), f.reason.to_string()),
    )
}

// ─── Reconnection backoff ────────────────────────────────────────────────────

/// Sleep before the next attempt. Returns `false` if a disconnect arrived meanwhile.
async fn backoff_sleep(state: &mut TaskState) -> bool {
    state.reconnect_attempts += 1;
    let delay = reconnect_delay_ms(
        state.config.base_reconnect_delay_ms,
        state.reconnect_attempts,
        rand::random::<u32>() % 500,
    );
    tracing::info!(
        attempt = state.reconnect_attempts,
        max = state.config.max_reconnect_attempts,
        delay_ms = delay,
        "Reconnecting depth stream"
    );

    tokio::select! {
        _ = tokio::time::sleep(Duration::from_millis(delay as u64)) => true,
        _ = state.cmd_rx.recv() => false,
    }
}

/// Exponential delay for `attempt` (1-based), capped at 60 seconds.
fn reconnect_delay_ms(base_ms: u32, attempt: u32, jitter_ms: u32) -> u32 {
    let exp = attempt.saturating_sub(1).min(10);
    base_ms
        .saturating_mul(1u32 << exp)
        .saturating_add(jitter_ms)
        .min(60_000)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
