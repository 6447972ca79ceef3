//! Suite runner
//!
//! Runs scenarios strictly one after another with a fixed pause between
//! them. A failing scenario never stops the suite.

use std::time::Duration;

use colored::Colorize;

use super::outcome::{ScenarioResult, SuiteSummary};
use super::runner::ScenarioRunner;
use super::scenario::Scenario;

/// Results of a finished suite
#[derive(Debug, Clone)]
pub struct SuiteReport {
    pub name: String,
    pub results: Vec<ScenarioResult>,
    pub summary: SuiteSummary,
}

impl SuiteReport {
    pub fn new(name: impl Into<String>, results: Vec<ScenarioResult>) -> Self {
        let summary = SuiteSummary::from_results(&results);
        Self {
            name: name.into(),
            results,
            summary,
        }
    }
}

/// Sequences scenarios over one [`ScenarioRunner`]
pub struct SuiteRunner {
    runner: ScenarioRunner,
    pause: Duration,
}

impl SuiteRunner {
    pub fn new(runner: ScenarioRunner, pause: Duration) -> Self {
        Self { runner, pause }
    }

    pub async fn run(&self, name: &str, scenarios: &[Scenario]) -> SuiteReport {
        let total = scenarios.len();

        println!("{}", "=".repeat(80));
        println!("{} {}", "Suite:".blue().bold(), name.white().bold());
        println!("{}", "=".repeat(80));
        println!(
            "Running {} scenario(s) against {}",
            total,
            self.runner.settings().endpoint
        );
        tracing::info!(suite = name, scenarios = total, "Starting suite");

        let mut results = Vec::with_capacity(total);
        for (i, scenario) in scenarios.iter().enumerate() {
            println!("\n{}", format!("# Scenario {}/{}", i + 1, total).dimmed());

            let result = self.runner.run(scenario).await;
            tracing::info!(
                scenario = %result.scenario_name,
                outcome = result.outcome.label(),
                elapsed_ms = result.elapsed.as_millis() as u64,
                "Scenario finished"
            );
            results.push(result);

            if i + 1 < total && !self.pause.is_zero() {
                println!(
                    "\n{}",
                    format!("Waiting {:.0}s before next scenario...", self.pause.as_secs_f64()).dimmed()
                );
                tokio::time::sleep(self.pause).await;
            }
        }

        let report = SuiteReport::new(name, results);
        print_report(&report);
        report
    }
}

/// Print every scenario's verdict, then the aggregate
pub fn print_report(report: &SuiteReport) {
    println!("\n{}", "=".repeat(80));
    println!("{}", "Results Summary".blue().bold());
    println!("{}", "=".repeat(80));

    for result in &report.results {
        if result.passed() {
            println!("{} {}", format!("✓ {}", result.outcome.label()).green(), result.scenario_name);
            if !result.artifact_found {
                println!("    ↳ {}", "artifact not found".yellow());
            }
        } else {
            println!("{} {}", format!("✗ {}", result.outcome.label()).red(), result.scenario_name);
            println!("    ↳ {}", result.outcome.to_string().dimmed());
        }
    }

    let summary = &report.summary;
    println!("\n{}", "=".repeat(80));
    println!(
        "Final score: {}/{} passed, {} failed ({}%)",
        summary.passed, summary.total, summary.failed, summary.pass_rate
    );
    println!("{}", "=".repeat(80));

    if summary.all_passed() {
        println!("{}", "All scenarios passed".green().bold());
    } else {
        println!(
            "{}",
            format!("{} scenario(s) failed", summary.failed).red().bold()
        );
    }
}
