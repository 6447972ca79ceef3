//! Scenario harness
//!
//! Scenarios are sent to the backend over a WebSocket session, the response
//! stream is classified frame by frame, and a completion detector decides
//! when each scenario is over. Suites run scenarios sequentially.

pub mod artifact;
pub mod builtin;
pub mod classifier;
mod config;
pub mod detector;
pub mod outcome;
mod runner;
mod scenario;
mod suite;

pub use artifact::{ArtifactStatus, ArtifactVerifier};
pub use classifier::{classify, Classification};
pub use config::*;
pub use detector::{CompletionDetector, DetectorState, SuccessSignal, TimeoutReason};
pub use outcome::{ScenarioOutcome, ScenarioResult, SuiteSummary};
pub use runner::{print_result, RunSettings, ScenarioRunner};
pub use scenario::Scenario;
pub use suite::{print_report, SuiteReport, SuiteRunner};
