use super::traits::{Oracle, OracleFuture};
use super::verdict::{Verdict, parse_reply};
use crate::encoding::CanonicalMessage;
use crate::error::{ConfigError, OracleError};
use crate::observability::{Observer, ObserverEvent, ObserverMetric};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

type OracleStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Reconnect-and-retry rounds allowed per query after a transport failure.
pub const MAX_RECONNECTS: usize = 1;

/// Session-scoped WebSocket connection to the verdict service.
///
/// The connection lives in a slot behind an async mutex that is held for a
/// whole request/reply exchange, so queries on one client never interleave.
/// During an exchange the stream is moved out of the slot and only put back
/// once a complete reply has been read; a failed or cancelled exchange drops
/// the socket, and with it any reply still in flight.
pub struct WsOracleClient {
    endpoint: String,
    connection: Mutex<Option<OracleStream>>,
    observer: Arc<dyn Observer>,
}

impl WsOracleClient {
    pub fn new(endpoint: impl Into<String>, observer: Arc<dyn Observer>) -> Result<Self, ConfigError> {
        let endpoint = endpoint.into().trim().to_string();
        crate::config::validate_endpoint(&endpoint)?;

        Ok(Self {
            endpoint,
            connection: Mutex::new(None),
            observer,
        })
    }

    /// Open the connection now instead of on the first query.
    pub async fn connect(&self, timeout: Duration) -> Result<(), OracleError> {
        let mut slot = self.connection.lock().await;
        if slot.is_none() {
            *slot = Some(self.open(timeout).await?);
        }
        Ok(())
    }

    pub async fn is_connected(&self) -> bool {
        self.connection.lock().await.is_some()
    }

    /// Send a close frame and release the socket. Safe to call when idle.
    pub async fn close(&self) {
        let Some(mut stream) = self.connection.lock().await.take() else {
            return;
        };
        if let Err(e) = stream.close(None).await {
            tracing::debug!(endpoint = %self.endpoint, "oracle close handshake failed: {e}");
        }
        tracing::info!(endpoint = %self.endpoint, "oracle connection closed");
    }

    pub async fn query_verdict(
        &self,
        message: &CanonicalMessage,
        timeout: Duration,
    ) -> Result<Verdict, OracleError> {
        let payload = message
            .to_json()
            .map_err(|e| OracleError::Encode(e.to_string()))?;

        let mut slot = self.connection.lock().await;
        let deadline = Instant::now() + timeout;
        let mut last_error = None;

        for attempt in 0..=MAX_RECONNECTS {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            if attempt > 0 {
                self.observer.record_metric(&ObserverMetric::OracleReconnect);
                tracing::info!(endpoint = %self.endpoint, "reconnecting to oracle");
            }

            match tokio::time::timeout(remaining, self.round_trip(&mut slot, &payload)).await {
                Ok(Ok(reply)) => return parse_reply(&reply),
                Ok(Err(error)) if !error.is_transport() => return Err(error),
                Ok(Err(error)) => {
                    tracing::debug!(endpoint = %self.endpoint, attempt, "oracle round trip failed: {error}");
                    last_error = Some(error);
                }
                Err(_) => {
                    last_error = Some(OracleError::transport(
                        &self.endpoint,
                        format!("no reply within {}ms", timeout.as_millis()),
                    ));
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            OracleError::transport(
                &self.endpoint,
                format!("no reply within {}ms", timeout.as_millis()),
            )
        }))
    }

    /// One request/reply exchange. The stream returns to `slot` once a reply
    /// frame has been read, even an unusable one; transport failures and
    /// cancellation drop it.
    async fn round_trip(
        &self,
        slot: &mut Option<OracleStream>,
        payload: &str,
    ) -> Result<String, OracleError> {
        let mut stream = match slot.take() {
            Some(stream) => stream,
            None => self.connect_stream().await?,
        };

        let reply = self.exchange(&mut stream, payload).await;
        if !matches!(&reply, Err(error) if error.is_transport()) {
            *slot = Some(stream);
        }
        reply
    }

    async fn open(&self, timeout: Duration) -> Result<OracleStream, OracleError> {
        tokio::time::timeout(timeout, self.connect_stream())
            .await
            .map_err(|_| {
                OracleError::transport(
                    &self.endpoint,
                    format!("connect timed out after {}ms", timeout.as_millis()),
                )
            })?
    }

    async fn connect_stream(&self) -> Result<OracleStream, OracleError> {
        let (stream, _) = tokio_tungstenite::connect_async(self.endpoint.as_str())
            .await
            .map_err(|e| OracleError::transport(&self.endpoint, format!("connect: {e}")))?;

        tracing::info!(endpoint = %self.endpoint, "oracle connection established");
        self.observer.record_event(&ObserverEvent::OracleConnected {
            endpoint: self.endpoint.clone(),
        });
        Ok(stream)
    }

    async fn exchange(&self, stream: &mut OracleStream, payload: &str) -> Result<String, OracleError> {
        stream
            .send(Message::Text(payload.to_string().into()))
            .await
            .map_err(|e| OracleError::transport(&self.endpoint, format!("send: {e}")))?;

        while let Some(frame) = stream.next().await {
            let frame =
                frame.map_err(|e| OracleError::transport(&self.endpoint, format!("read: {e}")))?;

            match frame {
                Message::Text(text) => return Ok(text.as_str().to_owned()),
                Message::Binary(bytes) => {
                    return String::from_utf8(bytes.to_vec()).map_err(|_| OracleError::Protocol {
                        reply: format!("<{} bytes of non-UTF-8 binary>", bytes.len()),
                    });
                }
                Message::Close(_) => break,
                _ => {}
            }
        }

        Err(OracleError::transport(
            &self.endpoint,
            "connection closed before reply",
        ))
    }
}

impl Oracle for WsOracleClient {
    fn name(&self) -> &str {
        "websocket"
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn query<'a>(&'a self, message: &'a CanonicalMessage, timeout: Duration) -> OracleFuture<'a> {
        Box::pin(self.query_verdict(message, timeout))
    }
}
