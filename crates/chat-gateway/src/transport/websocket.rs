//! WebSocket transport backed by tokio-tungstenite

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use super::{CloseReason, EventSink, Transport};
use crate::error::TransportError;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const CLOSE_TIMEOUT: Duration = Duration::from_secs(1);

/// WebSocket client transport
///
/// One read task per connection forwards text frames to the sink; it is
/// aborted when the connection is closed or replaced. Connecting and the
/// close handshake are both bounded in time.
pub struct WebSocketTransport {
    sink: Option<SplitSink<WsStream, Message>>,
    reader: Option<JoinHandle<()>>,
    open: Arc<AtomicBool>,
    connect_timeout: Duration,
}

impl Default for WebSocketTransport {
    fn default() -> Self {
        Self::with_connect_timeout(DEFAULT_CONNECT_TIMEOUT)
    }
}

impl WebSocketTransport {
    /// Create a transport with no connection
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport that gives up connecting after `connect_timeout`
    #[must_use]
    pub fn with_connect_timeout(connect_timeout: Duration) -> Self {
        Self {
            sink: None,
            reader: None,
            open: Arc::new(AtomicBool::new(false)),
            connect_timeout,
        }
    }

    async fn read_loop(mut stream: SplitStream<WsStream>, events: EventSink, open: Arc<AtomicBool>) {
        while let Some(message) = stream.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    if !events.frame(text) {
                        break;
                    }
                }
                Ok(Message::Close(frame)) => {
                    open.store(false, Ordering::SeqCst);
                    let reason = frame.map(|f| CloseReason::new(u16::from(f.code), f.reason.to_string()));
                    events.closed(reason);
                    return;
                }
                Ok(Message::Binary(data)) => {
                    tracing::debug!(len = data.len(), "Ignoring binary frame");
                }
                // Pings are answered by tungstenite itself
                Ok(_) => {}
                Err(e) => {
                    open.store(false, Ordering::SeqCst);
                    events.error(e.to_string());
                    return;
                }
            }
        }

        open.store(false, Ordering::SeqCst);
        events.closed(None);
    }
}

#[async_trait]
impl Transport for WebSocketTransport {
    async fn open(&mut self, url: &str, events: EventSink) -> Result<(), TransportError> {
        if self.sink.is_some() || self.reader.is_some() {
            self.close().await;
        }

        let connect_error = |reason: String| TransportError::Connect {
            url: url.to_string(),
            reason,
        };
        let (stream, _response) = timeout(self.connect_timeout, connect_async(url))
            .await
            .map_err(|_| {
                connect_error(format!(
                    "timed out after {}ms",
                    self.connect_timeout.as_millis()
                ))
            })?
            .map_err(|e| connect_error(e.to_string()))?;

        tracing::info!(url, generation = events.generation(), "WebSocket connected");

        let (sink, stream) = stream.split();
        let open = Arc::new(AtomicBool::new(true));

        self.reader = Some(tokio::spawn(Self::read_loop(stream, events, open.clone())));
        self.sink = Some(sink);
        self.open = open;

        Ok(())
    }

    async fn send(&mut self, text: String) -> Result<(), TransportError> {
        if !self.is_open() {
            return Err(TransportError::NotConnected);
        }
        let sink = self.sink.as_mut().ok_or(TransportError::NotConnected)?;
        sink.send(Message::Text(text))
            .await
            .map_err(|e| TransportError::Send(e.to_string()))
    }

    async fn close(&mut self) {
        self.open.store(false, Ordering::SeqCst);

        if let Some(reader) = self.reader.take() {
            reader.abort();
        }
        if let Some(mut sink) = self.sink.take() {
            let handshake = async {
                let _ = sink.send(Message::Close(None)).await;
                let _ = sink.close().await;
            };
            if timeout(CLOSE_TIMEOUT, handshake).await.is_err() {
                tracing::debug!("WebSocket close handshake timed out");
            }
        }
    }

    fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst) && self.sink.is_some()
    }
}

impl Drop for WebSocketTransport {
    fn drop(&mut self) {
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }
    }
}
