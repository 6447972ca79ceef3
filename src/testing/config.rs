//! Suite file configuration types
//!
//! Defines the data structures for deserializing YAML suite files.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::common::{Error, Result};
use crate::session::Stimulus;

use super::scenario::Scenario;

/// A suite of scenarios loaded from a YAML file
#[derive(Deserialize, Debug)]
pub struct SuiteFile {
    /// Name of the suite
    pub name: String,
    /// Optional description of what the suite covers
    pub description: Option<String>,
    /// WebSocket endpoint, overrides the configured one
    pub endpoint: Option<String>,
    /// Directory relative artifact paths resolve against.
    /// Relative values are taken from the suite file's directory.
    pub artifact_root: Option<PathBuf>,
    /// Scenarios in run order
    pub scenarios: Vec<ScenarioSpec>,
}

/// How a scenario's message goes on the wire
#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StimulusFormat {
    /// Literal text frame
    #[default]
    Text,
    /// `{type: "message", content, session_id}` JSON envelope
    Envelope,
}

/// A single scenario entry
#[derive(Deserialize, Debug)]
pub struct ScenarioSpec {
    /// Display name
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// The instruction sent to the backend
    pub message: String,
    /// Wire format of the message (default: text)
    #[serde(default)]
    pub format: StimulusFormat,
    /// Fixed correlation token
    pub session_id: Option<String>,
    /// File the backend is expected to produce
    pub expected_file: Option<PathBuf>,
    /// Scenario ceiling in seconds
    pub timeout_secs: Option<u64>,
    /// Frame cap
    pub max_frames: Option<usize>,
}

impl From<ScenarioSpec> for Scenario {
    fn from(spec: ScenarioSpec) -> Self {
        let stimulus = match spec.format {
            StimulusFormat::Text => Stimulus::Text(spec.message),
            StimulusFormat::Envelope => Stimulus::Envelope(spec.message),
        };

        Scenario {
            name: spec.name,
            description: spec.description,
            stimulus,
            expected_artifact: spec.expected_file,
            session_id: spec.session_id,
            timeout: spec.timeout_secs.map(Duration::from_secs),
            max_frames: spec.max_frames,
        }
    }
}

impl SuiteFile {
    /// Load and parse a suite file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;

        let mut suite: SuiteFile =
            serde_yaml::from_str(&content).map_err(|e| Error::scenario_parse(path, e))?;

        if let Some(root) = suite.artifact_root.take() {
            let suite_dir = path.parent().unwrap_or(Path::new("."));
            suite.artifact_root = Some(if root.is_relative() {
                suite_dir.join(root)
            } else {
                root
            });
        }

        Ok(suite)
    }

    /// Convert entries into runnable scenarios, preserving order
    pub fn into_scenarios(self) -> Vec<Scenario> {
        self.scenarios.into_iter().map(Scenario::from).collect()
    }
}
