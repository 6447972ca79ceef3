//! Persistent connection to the conversational backend
//!
//! One [`Session`] owns one WebSocket for the duration of one scenario
//! attempt. The runner drives it through the [`Connection`] trait so the
//! receive loop can be exercised without a network.

pub mod client;
pub mod protocol;
pub mod transport;

use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::common::Result;

pub use client::Session;
pub use protocol::{Envelope, InboundFrame};

/// Outbound stimulus, selected per scenario
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stimulus {
    /// The literal user instruction
    Text(String),
    /// `{type: "message", content, session_id}` envelope
    Envelope(String),
}

impl Stimulus {
    /// The instruction text regardless of encoding
    pub fn content(&self) -> &str {
        match self {
            Stimulus::Text(content) | Stimulus::Envelope(content) => content,
        }
    }

    /// Whether this stimulus is sent as a structured envelope
    pub fn is_envelope(&self) -> bool {
        matches!(self, Stimulus::Envelope(_))
    }

    /// Encode for the wire.
    ///
    /// Envelopes carry the session token (empty if the session has none).
    pub fn encode(&self, session_id: Option<&str>) -> Result<String> {
        match self {
            Stimulus::Text(content) => Ok(content.clone()),
            Stimulus::Envelope(content) => Ok(serde_json::to_string(&Envelope::message(
                content.as_str(),
                session_id.unwrap_or_default(),
            ))?),
        }
    }
}

/// One inbound message
#[derive(Debug, Clone)]
pub struct Frame {
    /// Payload as text (binary payloads are decoded lossily)
    pub raw: String,
    /// When the frame came off the wire
    pub received_at: Instant,
}

impl Frame {
    pub fn new(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            received_at: Instant::now(),
        }
    }

    /// Structured view of the payload, if it decodes as one
    pub fn parsed(&self) -> Option<InboundFrame> {
        InboundFrame::decode(&self.raw)
    }
}

/// Result of a single receive call
#[derive(Debug)]
pub enum Received {
    /// The next inbound frame
    Frame(Frame),
    /// Nothing arrived before the wait elapsed
    Timeout,
    /// The remote closed the connection
    Closed,
}

/// A connection the scenario runner can drive
#[async_trait]
pub trait Connection: Send {
    /// Send one stimulus as one outbound frame
    async fn send(&mut self, stimulus: &Stimulus) -> Result<()>;

    /// Wait for the next inbound frame, at most `timeout`
    async fn receive(&mut self, timeout: Duration) -> Result<Received>;

    /// Release the connection. Calling it again is a no-op.
    async fn close(&mut self);
}
