//! Scenario definition

use std::path::PathBuf;
use std::time::Duration;

use crate::session::Stimulus;

/// One named test: a stimulus plus an optional expected artifact.
///
/// Names are for display only; duplicates are allowed and independent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    pub name: String,
    pub description: Option<String>,
    pub stimulus: Stimulus,
    pub expected_artifact: Option<PathBuf>,
    /// Correlation token; envelope scenarios get a generated one when unset
    pub session_id: Option<String>,
    /// Overrides the configured scenario ceiling
    pub timeout: Option<Duration>,
    /// Overrides the configured frame cap
    pub max_frames: Option<usize>,
}

impl Scenario {
    pub fn new(name: impl Into<String>, stimulus: Stimulus) -> Self {
        Self {
            name: name.into(),
            description: None,
            stimulus,
            expected_artifact: None,
            session_id: None,
            timeout: None,
            max_frames: None,
        }
    }

    /// Scenario sending the instruction as plain text
    pub fn text(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, Stimulus::Text(message.into()))
    }

    /// Scenario sending the instruction inside a message envelope
    pub fn envelope(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, Stimulus::Envelope(message.into()))
    }

    pub fn expecting(mut self, path: impl Into<PathBuf>) -> Self {
        self.expected_artifact = Some(path.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_max_frames(mut self, max_frames: usize) -> Self {
        self.max_frames = Some(max_frames);
        self
    }

    /// Token to correlate this attempt with the backend session.
    ///
    /// The declared token if any; otherwise a fresh UUID for envelope
    /// stimuli and nothing for plain text.
    pub fn correlation_token(&self) -> Option<String> {
        self.session_id.clone().or_else(|| {
            self.stimulus
                .is_envelope()
                .then(|| uuid::Uuid::new_v4().to_string())
        })
    }
}
