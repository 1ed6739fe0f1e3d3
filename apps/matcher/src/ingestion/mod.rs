//! Ingestion: turns a job description or résumé file into `CleanText`.
//!
//! Flow: validate path → extract by extension → sanitize.
//! Deterministic and synchronous; callers on an async runtime should run
//! `ingest` on a blocking thread.

pub mod extract;
pub mod sanitize;

use std::fmt;
use std::path::Path;

use tracing::{debug, info};

use crate::errors::InputError;

/// The three container formats the extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Txt,
}

impl DocumentFormat {
    /// Case-insensitive lookup; `ext` may carry a leading dot.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            "txt" => Some(Self::Txt),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Pdf => "PDF",
            Self::Docx => "DOCX",
            Self::Txt => "TXT",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Sanitized, non-empty text ready for prompt construction.
///
/// Only constructed by the sanitizer, so it never contains markup tags or
/// denylisted prompt-control tokens, and whitespace is collapsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanText(String);

impl CleanText {
    pub(crate) fn new(text: String) -> Result<Self, InputError> {
        if text.is_empty() {
            return Err(InputError::Empty("Sanitized text is empty".to_string()));
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for CleanText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validates, extracts and sanitizes a single input file.
pub fn ingest(path: impl AsRef<Path>) -> Result<CleanText, InputError> {
    let path = path.as_ref();
    let format = extract::validate_path(path)?;
    info!("Extracting {format} text from {}", path.display());

    let raw = extract::extract(path, format)?;
    debug!("Extracted {} chars from {}", raw.chars().count(), path.display());

    let clean = sanitize::sanitize(&raw)?;
    debug!("Sanitized text is {} bytes", clean.len());
    Ok(clean)
}
