//! OpenAI realtime session bridged into a call.
//!
//! The websocket is owned by a background task so the session keeps running
//! after the webhook request that opened it has returned. Outgoing client
//! events are queued through a channel; incoming server events are logged.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tokio::net::TcpStream;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{handshake::client::Request, Message},
    MaybeTlsStream, WebSocketStream,
};
use tracing::{debug, info, warn};

const OUTBOUND_BUFFER: usize = 32;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

#[async_trait]
pub trait RealtimeSession: Send + Sync {
    /// Replace the agent's system instructions for the rest of the call.
    async fn update_session(&self, instructions: &str) -> Result<()>;
}

/// Handle to a live realtime websocket.
pub struct RealtimeClient {
    outbound: mpsc::Sender<String>,
    label: String,
}

impl RealtimeClient {
    /// Open the websocket described by `request` and start pumping it.
    pub async fn connect(request: Request, label: impl Into<String>) -> Result<Self> {
        let label = label.into();
        let (ws_stream, response) = connect_async(request)
            .await
            .with_context(|| format!("Failed to open realtime session for {}", label))?;

        info!(
            "Realtime session connected for {} (status {})",
            label,
            response.status()
        );

        let (outbound, rx) = mpsc::channel(OUTBOUND_BUFFER);
        tokio::spawn(pump(ws_stream, rx, label.clone()));

        Ok(Self { outbound, label })
    }

    async fn send_event(&self, event: Value) -> Result<()> {
        self.outbound
            .send(event.to_string())
            .await
            .map_err(|_| anyhow!("Realtime session for {} is closed", self.label))
    }
}

#[async_trait]
impl RealtimeSession for RealtimeClient {
    async fn update_session(&self, instructions: &str) -> Result<()> {
        debug!("Updating realtime session instructions for {}", self.label);
        self.send_event(session_update_event(instructions)).await
    }
}

pub fn session_update_event(instructions: &str) -> Value {
    json!({
        "type": "session.update",
        "session": {
            "instructions": instructions,
        },
    })
}

async fn pump(ws_stream: WsStream, mut rx: mpsc::Receiver<String>, label: String) {
    let (mut sink, mut stream) = ws_stream.split();
    let mut outbound_open = true;

    loop {
        tokio::select! {
            outgoing = rx.recv(), if outbound_open => match outgoing {
                Some(text) => {
                    if let Err(e) = sink.send(Message::Text(text)).await {
                        warn!("Realtime session {} send failed: {}", label, e);
                        break;
                    }
                }
                // Handle dropped; keep the call bridged until the server closes
                None => outbound_open = false,
            },
            incoming = stream.next() => match incoming {
                Some(Ok(Message::Text(text))) => log_server_event(&label, &text),
                Some(Ok(Message::Close(frame))) => {
                    info!("Realtime session {} closed by server: {:?}", label, frame);
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!("Realtime session {} errored: {}", label, e);
                    break;
                }
                None => break,
            },
        }
    }

    info!("Realtime session {} ended", label);
}

fn log_server_event(label: &str, text: &str) {
    let Ok(event) = serde_json::from_str::<Value>(text) else {
        debug!("Realtime session {} sent non-JSON frame", label);
        return;
    };

    let event_type = event.get("type").and_then(Value::as_str).unwrap_or("unknown");
    if event_type == "error" {
        let message = event
            .pointer("/error/message")
            .and_then(Value::as_str)
            .unwrap_or("no message");
        warn!("Realtime session {} error event: {}", label, message);
    } else {
        debug!("Realtime session {} event: {}", label, event_type);
    }
}
