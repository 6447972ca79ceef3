//! Scenario outcomes and suite aggregation

use std::fmt;
use std::time::Duration;

use super::artifact::ArtifactStatus;
use super::detector::{DetectorState, TimeoutReason};

/// Terminal verdict of one scenario attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScenarioOutcome {
    Success,
    Failure(String),
    TimedOut {
        elapsed: Duration,
        reason: TimeoutReason,
    },
    ConnectionError(String),
}

impl ScenarioOutcome {
    /// Outcome for a terminal detector state, `None` while still running
    pub fn from_state(state: &DetectorState) -> Option<Self> {
        match state {
            DetectorState::Running => None,
            DetectorState::Success(_) => Some(ScenarioOutcome::Success),
            DetectorState::Failure(reason) => Some(ScenarioOutcome::Failure(reason.clone())),
            DetectorState::TimedOut { elapsed, reason } => Some(ScenarioOutcome::TimedOut {
                elapsed: *elapsed,
                reason: *reason,
            }),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ScenarioOutcome::Success)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScenarioOutcome::Success => "PASS",
            ScenarioOutcome::Failure(_) => "FAIL",
            ScenarioOutcome::TimedOut { .. } => "TIMEOUT",
            ScenarioOutcome::ConnectionError(_) => "ERROR",
        }
    }
}

impl fmt::Display for ScenarioOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScenarioOutcome::Success => write!(f, "success"),
            ScenarioOutcome::Failure(reason) => write!(f, "failed: {}", reason),
            ScenarioOutcome::TimedOut { elapsed, reason } => {
                write!(f, "timed out after {:.1}s ({})", elapsed.as_secs_f64(), reason)
            }
            ScenarioOutcome::ConnectionError(cause) => write!(f, "connection error: {}", cause),
        }
    }
}

/// Result of one scenario attempt
#[derive(Debug, Clone)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub outcome: ScenarioOutcome,
    pub artifact_found: bool,
    pub artifact_size: Option<u64>,
    pub elapsed: Duration,
    /// Frames classified before the terminal state
    pub frames_received: usize,
}

impl ScenarioResult {
    pub fn new(
        scenario_name: impl Into<String>,
        outcome: ScenarioOutcome,
        artifact: ArtifactStatus,
        elapsed: Duration,
        frames_received: usize,
    ) -> Self {
        Self {
            scenario_name: scenario_name.into(),
            outcome,
            artifact_found: artifact.found,
            artifact_size: artifact.size,
            elapsed,
            frames_received,
        }
    }

    pub fn passed(&self) -> bool {
        self.outcome.is_success()
    }
}

/// Aggregate over a finished suite
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuiteSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    /// Rounded integer percentage, 0 for an empty suite
    pub pass_rate: u32,
}

impl SuiteSummary {
    pub fn from_results(results: &[ScenarioResult]) -> Self {
        let total = results.len();
        let passed = results.iter().filter(|r| r.passed()).count();
        let pass_rate = if total == 0 {
            0
        } else {
            // round half up in integer arithmetic
            ((200 * passed + total) / (2 * total)) as u32
        };

        Self {
            total,
            passed,
            failed: total - passed,
            pass_rate,
        }
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}
