use std::path::PathBuf;

use serde::Serialize;
use tracing::{info, warn};

/// A document that could not be extracted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedDocument {
    /// Document path.
    pub path: PathBuf,
    /// Extraction error message.
    pub reason: String,
}

/// Outcome of a corpus load, one line per discovered document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// Documents whose text was extracted.
    pub succeeded: Vec<PathBuf>,
    /// Documents that failed extraction and were skipped.
    pub failed: Vec<FailedDocument>,
    /// Characters of concatenated corpus text.
    pub total_chars: usize,
    /// Passages produced by the chunker (filled in by [`super::initialize_index`]).
    pub passages: usize,
}

impl LoadReport {
    /// Number of documents discovered.
    pub fn discovered(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    /// Returns `true` if at least one document failed.
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    /// Logs every failure at `warn` and a one-line summary at `info`.
    pub fn log_summary(&self) {
        for failure in &self.failed {
            warn!(
                path = %failure.path.display(),
                reason = %failure.reason,
                "Skipped document"
            );
        }

        info!(
            discovered = self.discovered(),
            succeeded = self.succeeded.len(),
            failed = self.failed.len(),
            total_chars = self.total_chars,
            passages = self.passages,
            "Corpus load complete"
        );
    }
}
