//! Completion detection for one scenario attempt
//!
//! A small state machine: `Running` until the first terminal transition,
//! after which the state never changes again. Rules are evaluated in a fixed
//! priority order on every classified frame:
//!
//! 1. backend error frame → `Failure`
//! 2. expected artifact exists → `Success`
//! 3. message with a completion marker → `Success`
//! 4. scenario ceiling elapsed → `TimedOut`
//! 5. frame cap exceeded → `TimedOut`
//! 6. otherwise keep running
//!
//! Timer ticks (receive wait expiry, connection closure) evaluate only the
//! rules that do not need a frame.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use super::artifact;
use super::classifier::{Classification, SUCCESS_MARKER};

/// Words that mark a message as the final answer
const COMPLETION_WORDS: [&str; 3] = ["completed", "finished", "done"];

/// Why a scenario attempt succeeded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuccessSignal {
    /// The expected artifact was on disk at evaluation time
    ArtifactPresent,
    /// The backend sent a message claiming completion
    CompletionMessage,
}

/// Which deadline ended a scenario attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutReason {
    /// The whole-scenario ceiling elapsed
    ScenarioCeiling,
    /// A single receive waited too long
    ReceiveWait,
    /// The stream sent more frames than allowed
    FrameLimit,
}

impl fmt::Display for TimeoutReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeoutReason::ScenarioCeiling => write!(f, "scenario ceiling reached"),
            TimeoutReason::ReceiveWait => write!(f, "no frame within receive timeout"),
            TimeoutReason::FrameLimit => write!(f, "frame limit exceeded"),
        }
    }
}

/// Detector state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetectorState {
    Running,
    Success(SuccessSignal),
    Failure(String),
    TimedOut {
        elapsed: Duration,
        reason: TimeoutReason,
    },
}

impl DetectorState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, DetectorState::Running)
    }
}

/// Whether a message text claims the work is complete
pub fn has_completion_marker(text: &str) -> bool {
    if text.contains(SUCCESS_MARKER) {
        return true;
    }
    let lower = text.to_lowercase();
    COMPLETION_WORDS.iter().any(|word| lower.contains(word))
}

/// Decides when a scenario attempt is over
#[derive(Debug)]
pub struct CompletionDetector {
    expected_artifact: Option<PathBuf>,
    ceiling: Duration,
    max_frames: usize,
    frames_seen: usize,
    state: DetectorState,
}

impl CompletionDetector {
    pub fn new(expected_artifact: Option<PathBuf>, ceiling: Duration, max_frames: usize) -> Self {
        Self {
            expected_artifact,
            ceiling,
            max_frames,
            frames_seen: 0,
            state: DetectorState::Running,
        }
    }

    pub fn state(&self) -> &DetectorState {
        &self.state
    }

    pub fn ceiling(&self) -> Duration {
        self.ceiling
    }

    pub fn frames_seen(&self) -> usize {
        self.frames_seen
    }

    /// Feed one classified frame
    pub fn evaluate(&mut self, classification: &Classification, elapsed: Duration) -> &DetectorState {
        if self.state.is_terminal() {
            return &self.state;
        }
        self.frames_seen += 1;

        let next = if let Classification::Error(reason) = classification {
            DetectorState::Failure(reason.clone())
        } else if self.artifact_present() {
            DetectorState::Success(SuccessSignal::ArtifactPresent)
        } else if Self::claims_completion(classification) {
            DetectorState::Success(SuccessSignal::CompletionMessage)
        } else if elapsed >= self.ceiling {
            DetectorState::TimedOut {
                elapsed,
                reason: TimeoutReason::ScenarioCeiling,
            }
        } else if self.frames_seen > self.max_frames {
            DetectorState::TimedOut {
                elapsed,
                reason: TimeoutReason::FrameLimit,
            }
        } else {
            DetectorState::Running
        };

        self.transition(next)
    }

    /// Timer tick without a frame: artifact and ceiling rules only
    pub fn tick(&mut self, elapsed: Duration) -> &DetectorState {
        if self.state.is_terminal() {
            return &self.state;
        }

        let next = if self.artifact_present() {
            DetectorState::Success(SuccessSignal::ArtifactPresent)
        } else if elapsed >= self.ceiling {
            DetectorState::TimedOut {
                elapsed,
                reason: TimeoutReason::ScenarioCeiling,
            }
        } else {
            DetectorState::Running
        };

        self.transition(next)
    }

    /// A receive wait expired. Never retried: anything short of a terminal
    /// tick becomes a receive timeout.
    pub fn receive_timed_out(&mut self, elapsed: Duration) -> &DetectorState {
        if self.tick(elapsed).is_terminal() {
            return &self.state;
        }
        self.transition(DetectorState::TimedOut {
            elapsed,
            reason: TimeoutReason::ReceiveWait,
        })
    }

    /// The backend closed the connection before any terminal signal
    pub fn connection_closed(&mut self, elapsed: Duration) -> &DetectorState {
        if self.tick(elapsed).is_terminal() {
            return &self.state;
        }
        self.transition(DetectorState::Failure(
            "connection closed by backend before completion".to_string(),
        ))
    }

    fn claims_completion(classification: &Classification) -> bool {
        match classification {
            Classification::Message {
                text,
                likely_complete,
            } => *likely_complete || has_completion_marker(text),
            _ => false,
        }
    }

    fn artifact_present(&self) -> bool {
        self.expected_artifact
            .as_deref()
            .is_some_and(|path| artifact::probe(path).found)
    }

    fn transition(&mut self, next: DetectorState) -> &DetectorState {
        if next.is_terminal() {
            tracing::debug!(state = ?next, frames = self.frames_seen, "Scenario reached terminal state");
        }
        self.state = next;
        &self.state
    }
}
