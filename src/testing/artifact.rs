//! Artifact verification
//!
//! The harness only reads the output location: existence and byte size.
//! Content is never inspected.

use std::path::Path;
use std::time::Duration;

/// What was found at an expected artifact path
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArtifactStatus {
    pub found: bool,
    pub size: Option<u64>,
}

impl ArtifactStatus {
    /// Found and non-empty
    pub fn is_populated(&self) -> bool {
        self.found && self.size.unwrap_or(0) > 0
    }
}

/// Check a path right now, without waiting
pub fn probe(path: &Path) -> ArtifactStatus {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() => ArtifactStatus {
            found: true,
            size: Some(meta.len()),
        },
        _ => ArtifactStatus::default(),
    }
}

/// Checks an artifact with a single bounded re-check
#[derive(Debug, Clone)]
pub struct ArtifactVerifier {
    settle_delay: Duration,
}

impl ArtifactVerifier {
    pub fn new(settle_delay: Duration) -> Self {
        Self { settle_delay }
    }

    /// Check `path`; if it is missing and a completion signal just fired,
    /// wait the settle delay once and check again.
    pub async fn check(&self, path: &Path, signal_fired: bool) -> ArtifactStatus {
        let status = probe(path);
        if status.found || !signal_fired {
            return status;
        }

        tracing::debug!(
            path = %path.display(),
            delay_ms = self.settle_delay.as_millis() as u64,
            "Artifact missing after completion signal, re-checking after settle delay"
        );
        tokio::time::sleep(self.settle_delay).await;

        let status = probe(path);
        if !status.found {
            tracing::warn!(path = %path.display(), "Artifact not found after settle delay");
        }
        status
    }
}
