//! Stream harness CLI
//!
//! Runs scripted scenarios against a conversational WebSocket backend and
//! reports which ones produced their expected artifact.

use std::process::ExitCode;

use clap::Parser;
use harness::cli;
use harness::commands::{Commands, GlobalArgs};
use harness::common::logging;

#[derive(Parser)]
#[command(name = "harness", about = "Scenario-driven WebSocket test harness")]
#[command(version, long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Held until return so the file writer flushes on every exit path
    let (log_path, _guard) = logging::init_cli(cli.global.verbose, cli.global.log_file);
    if let Some(path) = log_path {
        tracing::debug!(path = %path.display(), "Writing log file");
    }

    match cli::dispatch(cli.command, cli.global).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
