//! Logging and tracing configuration
//!
//! Console logging goes to stderr so it never interleaves with the scenario
//! report on stdout. An optional log file captures frame-level detail.

use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use super::paths;

/// Initialize tracing for the CLI
///
/// Logs are controlled by the `RUST_LOG` environment variable.
/// Default level is INFO for this crate (DEBUG with `verbose`), WARN for dependencies.
///
/// When `log_file` is set, a second layer writes everything at DEBUG and above
/// to `<data_dir>/logs/harness.log`. The returned guard must be held until exit
/// so buffered lines are flushed.
pub fn init_cli(verbose: bool, log_file: bool) -> (Option<PathBuf>, Option<WorkerGuard>) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("harness=debug,warn")
        } else {
            EnvFilter::new("harness=info,warn")
        }
    });

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact();

    let file_target = if log_file {
        paths::log_dir().filter(|dir| std::fs::create_dir_all(dir).is_ok())
    } else {
        None
    };

    match file_target {
        Some(dir) => {
            let appender = tracing_appender::rolling::never(&dir, "harness.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);

            let file_layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true);

            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .with(file_layer)
                .init();

            (Some(dir.join("harness.log")), Some(guard))
        }
        None => {
            if log_file {
                eprintln!("Warning: Could not create log directory, logging to stderr only");
            }
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .init();
            (None, None)
        }
    }
}
