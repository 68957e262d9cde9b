//! WebSocket implementation of [`LedgerClient`].
//!
//! A single connection is shared by all in-flight queries: a driver task owns
//! the socket, writes outgoing requests, and routes responses back to the
//! waiting caller by the echoed request id. Reuse therefore never serializes
//! concurrent queries. If the connection dies, every pending request fails
//! with a network error; callers decide whether to retry.

use crate::error::LedgerError;
use crate::ledger::LedgerClient;
use crate::protocol::{self, ResponseEnvelope, DEFAULT_PAGE_LIMIT};

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, warn};
use trustscan_types::{AccountId, TrustLine};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type Responder = oneshot::Sender<Result<Value, LedgerError>>;

/// Outgoing request handed to the driver task.
struct Pending {
    id: u64,
    payload: Value,
    respond: Responder,
}

/// Ledger client over a multiplexed WebSocket connection.
pub struct WsLedgerClient {
    request_tx: mpsc::Sender<Pending>,
    next_id: AtomicU64,
    page_limit: u32,
}

impl WsLedgerClient {
    /// Connect to the endpoint and spawn the connection driver.
    ///
    /// Fails fast if the endpoint is unreachable, so a bad URL surfaces as a
    /// run-level setup error before any verification task is scheduled.
    pub async fn connect(url: &str) -> Result<Self, LedgerError> {
        let (ws, _response) = connect_async(url)
            .await
            .map_err(|e| LedgerError::Network(format!("connect to {url} failed: {e}")))?;
        debug!(%url, "ledger connection established");

        let (request_tx, request_rx) = mpsc::channel(64);
        tokio::spawn(drive_connection(ws, request_rx));

        Ok(Self {
            request_tx,
            next_id: AtomicU64::new(1),
            page_limit: DEFAULT_PAGE_LIMIT,
        })
    }

    /// Override the per-page line limit (mainly for tests).
    pub fn with_page_limit(mut self, limit: u32) -> Self {
        self.page_limit = limit;
        self
    }

    /// Send one request and wait for its routed response payload.
    async fn request(&self, id: u64, payload: Value) -> Result<Value, LedgerError> {
        let (respond, response_rx) = oneshot::channel();
        self.request_tx
            .send(Pending {
                id,
                payload,
                respond,
            })
            .await
            .map_err(|_| LedgerError::Network("ledger connection closed".into()))?;
        response_rx
            .await
            .map_err(|_| LedgerError::Network("ledger connection closed".into()))?
    }
}

#[async_trait]
impl LedgerClient for WsLedgerClient {
    async fn account_lines(&self, account: &AccountId) -> Result<Vec<TrustLine>, LedgerError> {
        let mut lines = Vec::new();
        let mut marker: Option<Value> = None;
        loop {
            let id = self.next_id.fetch_add(1, Ordering::Relaxed);
            let payload =
                protocol::account_lines_request(id, account, self.page_limit, marker.as_ref());
            let result = self.request(id, payload).await?;
            let page = protocol::parse_lines_page(&result)?;
            lines.extend(page.lines);
            match page.marker {
                Some(next) => marker = Some(next),
                None => break,
            }
        }
        Ok(lines)
    }
}

/// Own the socket: write requests, route responses by id, answer pings.
async fn drive_connection(ws: WsStream, mut request_rx: mpsc::Receiver<Pending>) {
    let (mut sink, mut stream) = ws.split();
    let mut pending: HashMap<u64, Responder> = HashMap::new();

    loop {
        tokio::select! {
            request = request_rx.recv() => match request {
                Some(Pending { id, payload, respond }) => {
                    if let Err(e) = sink.send(Message::Text(payload.to_string())).await {
                        let _ = respond.send(Err(LedgerError::Network(format!(
                            "send failed: {e}"
                        ))));
                        fail_pending(&mut pending, "connection lost");
                        break;
                    }
                    pending.insert(id, respond);
                }
                // Client handle dropped; nothing more to do.
                None => break,
            },
            message = stream.next() => match message {
                Some(Ok(Message::Text(text))) => route_response(&mut pending, &text),
                Some(Ok(Message::Ping(data))) => {
                    let _ = sink.send(Message::Pong(data)).await;
                }
                Some(Ok(Message::Close(_))) | None => {
                    fail_pending(&mut pending, "connection closed by server");
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    fail_pending(&mut pending, &format!("read failed: {e}"));
                    break;
                }
            },
        }
    }
}

/// Match a response to its waiting caller via the echoed id.
fn route_response(pending: &mut HashMap<u64, Responder>, raw: &str) {
    let envelope = match ResponseEnvelope::parse(raw) {
        Ok(envelope) => envelope,
        Err(e) => {
            warn!("dropping unparseable ledger message: {e}");
            return;
        }
    };
    let Some(id) = envelope.id else {
        debug!("ignoring ledger message without id");
        return;
    };
    match pending.remove(&id) {
        Some(respond) => {
            let _ = respond.send(envelope.into_result());
        }
        None => debug!(id, "response for unknown request id"),
    }
}

/// Fail every outstanding request with a network error.
fn fail_pending(pending: &mut HashMap<u64, Responder>, reason: &str) {
    for (_, respond) in pending.drain() {
        let _ = respond.send(Err(LedgerError::Network(reason.to_string())));
    }
}
