//! Stream harness
//!
//! Scenario-driven test harness for conversational backends that stream
//! replies over WebSocket and write artifacts to a shared filesystem.

pub mod api;
pub mod cli;
pub mod commands;
pub mod common;
pub mod session;
pub mod testing;

// Re-export commonly used types for tests
pub use common::{Error, Result};
pub use session::{Connection, Session, Stimulus};
pub use testing::{Scenario, ScenarioOutcome, ScenarioResult, ScenarioRunner};
