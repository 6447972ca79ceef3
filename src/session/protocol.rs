//! Wire message types
//!
//! Outbound stimuli are either the literal instruction text or a JSON
//! envelope. Inbound frames are either structured JSON or legacy plain text;
//! only the structured shape is modelled here, plain text stays a string.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Structured outbound message
///
/// ```json
/// { "type": "message", "content": "...", "session_id": "..." }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Always "message"
    #[serde(rename = "type")]
    pub kind: String,
    /// The user instruction
    pub content: String,
    /// Correlation token, matches the `session` query parameter
    pub session_id: String,
}

impl Envelope {
    /// Create a message envelope
    pub fn message(content: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            kind: "message".to_string(),
            content: content.into(),
            session_id: session_id.into(),
        }
    }
}

/// Structured inbound frame
///
/// ```json
/// { "type": "message" | "error" | "progress", "content": "...", "error": "..." }
/// ```
///
/// Any JSON object with a `type` key is structured. A non-string `type`
/// leaves `kind` empty so it classifies as unknown; non-string text fields
/// are kept in their JSON form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundFrame {
    pub kind: String,
    pub content: Option<String>,
    pub error: Option<String>,
}

impl InboundFrame {
    /// Attempt to decode a raw payload as a structured frame
    pub fn decode(raw: &str) -> Option<Self> {
        let value: Value = serde_json::from_str(raw).ok()?;
        let kind = value.get("type")?;

        Some(Self {
            kind: kind.as_str().unwrap_or_default().to_string(),
            content: text_field(&value, "content"),
            error: text_field(&value, "error"),
        })
    }
}

fn text_field(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}
