//! Frame classification
//!
//! The backend may interleave structured JSON frames with legacy plain-text
//! frames in one stream. Classification first attempts a structured decode
//! and falls back to keyword heuristics over the raw text.

use crate::session::{Frame, InboundFrame};

/// Glyph the backend prefixes successful results with
pub const SUCCESS_MARKER: &str = "✅";
/// Glyph the backend prefixes failures with
pub const ERROR_MARKER: &str = "❌";

/// Semantic kind of one inbound frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Assistant output. `likely_complete` is set by the plain-text path when
    /// the text already reads as a finished result.
    Message { text: String, likely_complete: bool },
    Progress(String),
    Error(String),
    /// Unrecognised frame, kept as raw text
    Unknown(String),
}

impl Classification {
    pub fn text(&self) -> &str {
        match self {
            Classification::Message { text, .. } => text,
            Classification::Progress(text)
            | Classification::Error(text)
            | Classification::Unknown(text) => text,
        }
    }

    /// Short label for console output
    pub fn label(&self) -> &'static str {
        match self {
            Classification::Message { .. } => "message",
            Classification::Progress(_) => "progress",
            Classification::Error(_) => "error",
            Classification::Unknown(_) => "unknown",
        }
    }
}

/// Classify a received frame
pub fn classify(frame: &Frame) -> Classification {
    classify_raw(&frame.raw)
}

/// Classify a raw payload
pub fn classify_raw(raw: &str) -> Classification {
    match InboundFrame::decode(raw) {
        Some(structured) => classify_structured(structured, raw),
        None => classify_text(raw),
    }
}

fn classify_structured(frame: InboundFrame, raw: &str) -> Classification {
    match frame.kind.as_str() {
        "message" => Classification::Message {
            text: frame.content.unwrap_or_default(),
            likely_complete: false,
        },
        "error" => Classification::Error(
            frame
                .content
                .or(frame.error)
                .unwrap_or_else(|| "Unknown error".to_string()),
        ),
        "progress" => Classification::Progress(frame.content.unwrap_or_default()),
        _ => Classification::Unknown(raw.to_string()),
    }
}

fn classify_text(raw: &str) -> Classification {
    let lower = raw.to_lowercase();

    if raw.contains(SUCCESS_MARKER) || lower.contains("saved to") {
        Classification::Message {
            text: raw.to_string(),
            likely_complete: true,
        }
    } else if raw.contains(ERROR_MARKER) || lower.contains("error") {
        Classification::Error(raw.to_string())
    } else {
        Classification::Unknown(raw.to_string())
    }
}
