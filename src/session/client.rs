//! WebSocket session against the backend

use std::time::Duration;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::common::{Error, Result};

use super::transport;
use super::{Connection, Frame, Received, Stimulus};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Upper bound on the close handshake so a dead peer cannot stall cleanup
const CLOSE_TIMEOUT: Duration = Duration::from_secs(2);

/// One WebSocket connection for one scenario attempt
pub struct Session {
    stream: Option<WsStream>,
    endpoint: String,
    session_id: Option<String>,
}

impl Session {
    /// Open a connection, embedding the session token in the query string
    pub async fn open(
        endpoint: &str,
        session_id: Option<&str>,
        connect_timeout: Duration,
    ) -> Result<Self> {
        let url = transport::build_endpoint(endpoint, session_id)?;

        tracing::debug!(endpoint = %url, "Opening session");

        let (stream, response) = tokio::time::timeout(connect_timeout, connect_async(url.as_str()))
            .await
            .map_err(|_| Error::ConnectTimeout(connect_timeout))?
            .map_err(|e| Error::connection_failed(url.as_str(), e))?;

        tracing::debug!(status = %response.status(), "Session established");

        Ok(Self {
            stream: Some(stream),
            endpoint: url.to_string(),
            session_id: session_id.map(str::to_string),
        })
    }

    /// The endpoint this session connected to, including the query string
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Connection for Session {
    async fn send(&mut self, stimulus: &Stimulus) -> Result<()> {
        let payload = stimulus.encode(self.session_id.as_deref())?;
        let stream = self.stream.as_mut().ok_or(Error::SessionClosed)?;

        tracing::debug!(bytes = payload.len(), envelope = stimulus.is_envelope(), "Sending stimulus");

        stream
            .send(Message::Text(payload))
            .await
            .map_err(|e| Error::SendFailed(e.to_string()))
    }

    async fn receive(&mut self, timeout: Duration) -> Result<Received> {
        let stream = self.stream.as_mut().ok_or(Error::SessionClosed)?;
        let deadline = tokio::time::Instant::now() + timeout;

        // Control frames are not frames of the conversation; keep waiting
        // against the same deadline.
        loop {
            let next = match tokio::time::timeout_at(deadline, stream.next()).await {
                Ok(next) => next,
                Err(_) => return Ok(Received::Timeout),
            };

            match next {
                Some(Ok(Message::Text(text))) => return Ok(Received::Frame(Frame::new(text))),
                Some(Ok(Message::Binary(bytes))) => {
                    return Ok(Received::Frame(Frame::new(
                        String::from_utf8_lossy(&bytes).into_owned(),
                    )))
                }
                Some(Ok(Message::Close(reason))) => {
                    tracing::debug!(?reason, "Backend closed the connection");
                    return Ok(Received::Closed);
                }
                Some(Ok(Message::Ping(_) | Message::Pong(_) | Message::Frame(_))) => continue,
                Some(Err(WsError::ConnectionClosed | WsError::AlreadyClosed)) | None => {
                    return Ok(Received::Closed)
                }
                Some(Err(e)) => return Err(Error::ReceiveFailed(e.to_string())),
            }
        }
    }

    async fn close(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            match tokio::time::timeout(CLOSE_TIMEOUT, stream.close(None)).await {
                Ok(Ok(())) | Ok(Err(WsError::ConnectionClosed | WsError::AlreadyClosed)) => {}
                Ok(Err(e)) => tracing::debug!(error = %e, "Close handshake failed"),
                Err(_) => tracing::debug!("Close handshake timed out"),
            }
            tracing::debug!(endpoint = %self.endpoint, "Session closed");
        }
    }
}
