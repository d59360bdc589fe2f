//! Per-document text extraction.

use std::path::Path;

use super::error::ExtractError;

/// File extensions the loader picks up (lowercase, without the dot).
pub const SUPPORTED_EXTENSIONS: &[&str] = &["pdf", "txt", "md"];

/// Turns one document into plain text.
pub trait TextExtractor: Send + Sync {
    /// Extracts the full text of the document at `path`.
    fn extract(&self, path: &Path) -> Result<String, ExtractError>;
}

/// Extracts PDFs with `pdf-extract` and reads plain-text files as UTF-8.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileExtractor;

impl TextExtractor for FileExtractor {
    fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        match document_extension(path).as_deref() {
            Some("pdf") => {
                let bytes = std::fs::read(path).map_err(|source| ExtractError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                // pdf-extract panics on some malformed fonts; treat that as a bad document.
                let extracted =
                    std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(&bytes))
                        .map_err(|_| ExtractError::Pdf {
                            path: path.to_path_buf(),
                            reason: "PDF parser panicked".to_string(),
                        })?;
                extracted.map_err(|e| ExtractError::Pdf {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                })
            }
            Some("txt") | Some("md") => {
                std::fs::read_to_string(path).map_err(|source| ExtractError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
            _ => Err(ExtractError::Unsupported {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Lowercased extension of `path`, if any.
pub(crate) fn document_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}

/// Returns `true` if the loader should pick up `path`.
pub fn is_supported(path: &Path) -> bool {
    document_extension(path).is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
}
