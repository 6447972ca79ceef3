//! Configuration file handling

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::paths::config_path;
use super::Result;

/// Main configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Backend endpoints
    #[serde(default)]
    pub backend: BackendConfig,

    /// Timeout settings
    #[serde(default)]
    pub timeouts: Timeouts,

    /// Loop limits
    #[serde(default)]
    pub limits: Limits,

    /// Artifact output settings
    #[serde(default)]
    pub output: OutputConfig,
}

/// Backend endpoints
#[derive(Debug, Deserialize)]
pub struct BackendConfig {
    /// WebSocket endpoint for conversational scenarios
    #[serde(default = "default_ws_url")]
    pub ws_url: String,

    /// Base URL for the REST API
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            ws_url: default_ws_url(),
            base_url: default_base_url(),
        }
    }
}

fn default_ws_url() -> String {
    "ws://localhost:3000/ws".to_string()
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

/// Timeout settings
#[derive(Debug, Deserialize)]
pub struct Timeouts {
    /// Timeout for establishing the WebSocket connection
    #[serde(default = "default_connect")]
    pub connect_secs: u64,

    /// Longest wait for a single inbound frame
    #[serde(default = "default_receive")]
    pub receive_secs: u64,

    /// Ceiling for a whole scenario attempt
    #[serde(default = "default_scenario")]
    pub scenario_secs: u64,

    /// Wait before re-checking a missing artifact after a completion message
    #[serde(default = "default_settle")]
    pub settle_millis: u64,

    /// Pause between consecutive scenarios of a suite
    #[serde(default = "default_inter_scenario")]
    pub inter_scenario_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            connect_secs: default_connect(),
            receive_secs: default_receive(),
            scenario_secs: default_scenario(),
            settle_millis: default_settle(),
            inter_scenario_secs: default_inter_scenario(),
        }
    }
}

fn default_connect() -> u64 {
    10
}
fn default_receive() -> u64 {
    60
}
fn default_scenario() -> u64 {
    180
}
fn default_settle() -> u64 {
    1000
}
fn default_inter_scenario() -> u64 {
    3
}

/// Loop limits
#[derive(Debug, Deserialize)]
pub struct Limits {
    /// Frames accepted per scenario before giving up on a chatty stream
    #[serde(default = "default_max_frames")]
    pub max_frames: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_frames: default_max_frames(),
        }
    }
}

fn default_max_frames() -> usize {
    20
}

/// Artifact output configuration
#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    /// Directory relative artifact paths are resolved against
    #[serde(default = "default_artifact_root")]
    pub artifact_root: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            artifact_root: default_artifact_root(),
        }
    }
}

fn default_artifact_root() -> PathBuf {
    PathBuf::from(".")
}

impl Config {
    /// Load configuration from the default config file
    ///
    /// Returns default configuration if file doesn't exist
    pub fn load() -> Result<Self> {
        match config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| super::Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| super::Error::ConfigParse(e.to_string()))
    }
}

impl Timeouts {
    pub fn connect(&self) -> Duration {
        Duration::from_secs(self.connect_secs)
    }

    pub fn receive(&self) -> Duration {
        Duration::from_secs(self.receive_secs)
    }

    pub fn scenario(&self) -> Duration {
        Duration::from_secs(self.scenario_secs)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_millis)
    }

    pub fn inter_scenario(&self) -> Duration {
        Duration::from_secs(self.inter_scenario_secs)
    }
}
