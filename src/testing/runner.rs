//! Scenario runner
//!
//! Drives one scenario end to end: open session, send the stimulus, classify
//! frames until the detector reaches a terminal state, verify the artifact on
//! success, close the session. Every error is folded into the result.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use colored::Colorize;

use crate::common::config::Config;
use crate::common::{paths, truncate_for_display};
use crate::session::{Connection, Received, Session};

use super::artifact::{ArtifactStatus, ArtifactVerifier};
use super::classifier::{classify, Classification};
use super::detector::{CompletionDetector, DetectorState, SuccessSignal};
use super::outcome::{ScenarioOutcome, ScenarioResult};
use super::scenario::Scenario;

/// Characters of frame text echoed per line when not verbose
const ECHO_WIDTH: usize = 100;

/// Settings shared by every scenario of a run
#[derive(Debug, Clone)]
pub struct RunSettings {
    /// WebSocket endpoint
    pub endpoint: String,
    pub connect_timeout: Duration,
    /// Longest wait for a single frame
    pub receive_timeout: Duration,
    /// Default ceiling for a whole scenario
    pub scenario_timeout: Duration,
    /// One-off wait before re-checking a missing artifact
    pub settle_delay: Duration,
    /// Default frame cap
    pub max_frames: usize,
    /// Base for relative artifact paths
    pub artifact_root: PathBuf,
    /// Echo full frame contents
    pub verbose: bool,
}

impl RunSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            endpoint: config.backend.ws_url.clone(),
            connect_timeout: config.timeouts.connect(),
            receive_timeout: config.timeouts.receive(),
            scenario_timeout: config.timeouts.scenario(),
            settle_delay: config.timeouts.settle(),
            max_frames: config.limits.max_frames,
            artifact_root: config.output.artifact_root.clone(),
            verbose: false,
        }
    }
}

/// Runs single scenarios
pub struct ScenarioRunner {
    settings: RunSettings,
    verifier: ArtifactVerifier,
}

impl ScenarioRunner {
    pub fn new(settings: RunSettings) -> Self {
        let verifier = ArtifactVerifier::new(settings.settle_delay);
        Self { settings, verifier }
    }

    pub fn settings(&self) -> &RunSettings {
        &self.settings
    }

    /// Run one scenario against the configured endpoint
    pub async fn run(&self, scenario: &Scenario) -> ScenarioResult {
        self.print_header(scenario);

        let started = Instant::now();
        let token = scenario.correlation_token();

        let result = match Session::open(
            &self.settings.endpoint,
            token.as_deref(),
            self.settings.connect_timeout,
        )
        .await
        {
            Ok(mut session) => {
                println!("  {} Connected to {}", "✓".green(), session.endpoint().dimmed());
                self.run_on(&mut session, scenario, started).await
            }
            Err(e) => {
                tracing::warn!(scenario = %scenario.name, error = %e, "Could not open session");
                ScenarioResult::new(
                    scenario.name.clone(),
                    ScenarioOutcome::ConnectionError(e.to_string()),
                    ArtifactStatus::default(),
                    started.elapsed(),
                    0,
                )
            }
        };

        print_result(&result);
        result
    }

    /// Run one scenario over an already open connection.
    ///
    /// The connection is closed before returning, whatever the outcome.
    pub async fn run_on<C: Connection + ?Sized>(
        &self,
        conn: &mut C,
        scenario: &Scenario,
        started: Instant,
    ) -> ScenarioResult {
        let artifact_path = scenario
            .expected_artifact
            .as_deref()
            .map(|path| paths::resolve_artifact(&self.settings.artifact_root, path));

        let mut detector = CompletionDetector::new(
            artifact_path.clone(),
            scenario.timeout.unwrap_or(self.settings.scenario_timeout),
            scenario.max_frames.unwrap_or(self.settings.max_frames),
        );

        let outcome = self.drive(conn, scenario, &mut detector, started).await;

        let artifact = match (detector.state(), artifact_path.as_deref()) {
            (DetectorState::Success(signal), Some(path)) => {
                self.verifier
                    .check(path, *signal == SuccessSignal::CompletionMessage)
                    .await
            }
            _ => ArtifactStatus::default(),
        };
        let elapsed = started.elapsed();

        conn.close().await;

        ScenarioResult::new(
            scenario.name.clone(),
            outcome,
            artifact,
            elapsed,
            detector.frames_seen(),
        )
    }

    /// Send the stimulus and consume frames until a terminal outcome
    async fn drive<C: Connection + ?Sized>(
        &self,
        conn: &mut C,
        scenario: &Scenario,
        detector: &mut CompletionDetector,
        started: Instant,
    ) -> ScenarioOutcome {
        if let Err(e) = conn.send(&scenario.stimulus).await {
            return ScenarioOutcome::ConnectionError(e.to_string());
        }
        println!("  {} Stimulus sent, waiting for responses...", "→".cyan());

        loop {
            let remaining = detector.ceiling().saturating_sub(started.elapsed());
            let wait = self.settings.receive_timeout.min(remaining);

            let state = match conn.receive(wait).await {
                Ok(Received::Frame(frame)) => {
                    let classification = classify(&frame);
                    let at = frame.received_at.saturating_duration_since(started);
                    self.echo(&classification, at);
                    detector.evaluate(&classification, started.elapsed())
                }
                Ok(Received::Timeout) => detector.receive_timed_out(started.elapsed()),
                Ok(Received::Closed) => detector.connection_closed(started.elapsed()),
                Err(e) => {
                    tracing::warn!(scenario = %scenario.name, error = %e, "Receive failed");
                    return ScenarioOutcome::ConnectionError(e.to_string());
                }
            };

            if let Some(outcome) = ScenarioOutcome::from_state(state) {
                return outcome;
            }
        }
    }

    fn echo(&self, classification: &Classification, at: Duration) {
        tracing::debug!(kind = classification.label(), text = classification.text(), "Frame");

        let text = if self.settings.verbose {
            classification.text().to_string()
        } else {
            truncate_for_display(classification.text(), ECHO_WIDTH)
        };
        let label = format!("{:<8}", classification.label());
        let label = match classification {
            Classification::Message { .. } => label.green(),
            Classification::Progress(_) => label.cyan(),
            Classification::Error(_) => label.red(),
            Classification::Unknown(_) => label.dimmed(),
        };

        println!("  [{:>6.1}s] {} {}", at.as_secs_f64(), label, text);
    }

    fn print_header(&self, scenario: &Scenario) {
        println!(
            "\n{} {}",
            "Running Scenario:".blue().bold(),
            scenario.name.white().bold()
        );
        if let Some(desc) = &scenario.description {
            println!("  {}", desc.dimmed());
        }
        println!("  Message: {}", scenario.stimulus.content().dimmed());
        if let Some(path) = &scenario.expected_artifact {
            println!("  Expected output: {}", path.display().to_string().dimmed());
        }
    }
}

/// Print the verdict line and artifact status for one scenario
pub fn print_result(result: &ScenarioResult) {
    let secs = result.elapsed.as_secs_f64();
    if result.passed() {
        println!(
            "  {} {} ({:.1}s)",
            "✓".green().bold(),
            "Scenario Passed".green().bold(),
            secs
        );
    } else {
        println!(
            "  {} {} ({:.1}s): {}",
            "✗".red().bold(),
            "Scenario Failed".red().bold(),
            secs,
            result.outcome
        );
    }

    let artifact = ArtifactStatus {
        found: result.artifact_found,
        size: result.artifact_size,
    };
    if artifact.is_populated() {
        let size = artifact.size.unwrap_or_default();
        println!(
            "  {} Artifact verified: {} bytes ({:.2} KB)",
            "✓".green(),
            size,
            size as f64 / 1024.0
        );
    } else if artifact.found {
        println!("  {} Artifact exists but is empty", "⚠".yellow());
    } else if result.passed() {
        println!(
            "  {} Artifact not found at expected location",
            "⚠".yellow()
        );
    }
}
