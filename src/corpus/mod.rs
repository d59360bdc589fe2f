//! Corpus discovery, text extraction, and one-shot index initialization.
//!
//! The loader scans a single directory (non-recursively) for supported documents, extracts
//! each one independently, and concatenates the results in sorted path order. A document
//! that fails extraction is recorded in the [`LoadReport`] and skipped; it never aborts the
//! load.

mod error;
pub mod extract;
mod report;


pub use error::{CorpusError, CorpusResult, ExtractError};
pub use extract::{FileExtractor, SUPPORTED_EXTENSIONS, TextExtractor};
pub use report::{FailedDocument, LoadReport};

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};
use walkdir::WalkDir;

use crate::chunking::Chunker;
use crate::embedding::SharedEmbedder;
use crate::index::CorpusIndex;

/// Appended after each document's text.
pub const DOCUMENT_SEPARATOR: &str = "\n";

/// Concatenated corpus text plus the per-document outcome.
#[derive(Debug, Clone)]
pub struct LoadedCorpus {
    /// All extracted text, in document order.
    pub text: String,
    /// Which documents were loaded or skipped.
    pub report: LoadReport,
}

/// Discovers and extracts the documents of one corpus directory.
#[derive(Debug, Clone)]
pub struct CorpusLoader<X = FileExtractor> {
    root: PathBuf,
    extractor: X,
}

impl CorpusLoader<FileExtractor> {
    /// Creates a loader over `root` using the default [`FileExtractor`].
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_extractor(root, FileExtractor)
    }
}

impl<X: TextExtractor> CorpusLoader<X> {
    /// Creates a loader with a custom extractor.
    pub fn with_extractor(root: impl Into<PathBuf>, extractor: X) -> Self {
        Self {
            root: root.into(),
            extractor,
        }
    }

    /// The corpus directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lists supported documents directly under the root, sorted by path.
    pub fn discover(&self) -> CorpusResult<Vec<PathBuf>> {
        if !self.root.exists() {
            return Err(CorpusError::RootNotFound {
                path: self.root.clone(),
            });
        }
        if !self.root.is_dir() {
            return Err(CorpusError::NotADirectory {
                path: self.root.clone(),
            });
        }

        let mut documents = Vec::new();
        for entry in WalkDir::new(&self.root).min_depth(1).max_depth(1) {
            let entry = entry?;
            if entry.file_type().is_file() && extract::is_supported(entry.path()) {
                documents.push(entry.into_path());
            }
        }
        documents.sort();

        debug!(root = %self.root.display(), documents = documents.len(), "Corpus discovery complete");
        Ok(documents)
    }

    /// Extracts every discovered document and concatenates the text.
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub fn load(&self) -> CorpusResult<LoadedCorpus> {
        let documents = self.discover()?;
        let mut report = LoadReport::default();
        let mut text = String::new();

        for path in documents {
            match self.extractor.extract(&path) {
                Ok(document) => {
                    debug!(path = %path.display(), chars = document.chars().count(), "Extracted document");
                    if !document.is_empty() {
                        text.push_str(&document);
                        text.push_str(DOCUMENT_SEPARATOR);
                    }
                    report.succeeded.push(path);
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Failed to extract document");
                    report.failed.push(FailedDocument {
                        path,
                        reason: e.to_string(),
                    });
                }
            }
        }

        report.total_chars = text.chars().count();
        Ok(LoadedCorpus { text, report })
    }
}

/// Loads the corpus, chunks it, and builds the index.
///
/// An empty corpus (no documents, or only failed ones) yields an uninitialized index rather
/// than an error; the caller decides how loudly to report that.
pub fn initialize_index<X: TextExtractor>(
    loader: &CorpusLoader<X>,
    chunker: &Chunker,
    embedder: SharedEmbedder,
) -> CorpusResult<(CorpusIndex, LoadReport)> {
    let LoadedCorpus { text, mut report } = loader.load()?;

    let passages = chunker.chunk(&text);
    report.passages = passages.len();
    info!(
        passages = passages.len(),
        size = chunker.size(),
        step = chunker.step(),
        "Corpus chunked"
    );

    let index = CorpusIndex::build(passages, embedder)?;
    Ok((index, report))
}
