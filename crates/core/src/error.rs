//! Error types for newsletter operations.
//!
//! This module defines the main error type [`NewsletterError`] which represents
//! everything that can go wrong while fetching sources, extracting text,
//! talking to the text-generation backend, and validating a composed newsletter.
//!
//! # Example
//!
//! ```rust
//! use newsletter_core::{NewsletterError, Result};
//!
//! fn require_content(text: &str) -> Result<&str> {
//!     if text.trim().is_empty() {
//!         return Err(NewsletterError::NoContent);
//!     }
//!     Ok(text)
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for extraction and composition.
///
/// # Example
///
/// ```rust
/// use newsletter_core::NewsletterError;
///
/// let err = NewsletterError::Incomplete { missing: vec!["title".to_string()] };
/// assert_eq!(err.to_string(), "Local model generation failed to produce: title");
/// ```
#[derive(Error, Debug)]
pub enum NewsletterError {
    /// HTTP request errors from reqwest.
    ///
    /// Wraps network errors, DNS failures, rejected statuses, and other
    /// HTTP-related problems.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Request timeout.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// HTML parsing errors, usually an invalid CSS selector.
    #[error("Failed to parse HTML: {0}")]
    HtmlParseError(String),

    /// The source parsed but held no usable text.
    #[error("No content could be extracted from the document")]
    NoContent,

    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// File read and write errors.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// File extension is neither `pdf` nor `docx`.
    #[error("Unsupported file type: {0}. Only PDF and DOCX files are supported")]
    UnsupportedFileType(String),

    /// PDF could not be opened or decoded.
    #[error("Failed to read PDF: {0}")]
    PdfError(String),

    /// DOCX archive or its document part could not be read.
    #[error("Failed to read DOCX: {0}")]
    DocxError(String),

    /// Extraction produced nothing for the named source.
    ///
    /// Every extraction failure (network, parse, file access, empty result)
    /// collapses to this variant once it reaches the pipeline.
    #[error("Could not extract content from {0}")]
    ExtractionFailed(String),

    /// Content rejected before any model call.
    #[error("Content too short or empty ({length} characters, need at least {minimum})")]
    ContentTooShort { length: usize, minimum: usize },

    /// The text-generation backend raised.
    #[error("Text generation failed: {0}")]
    Generation(String),

    /// The model path produced a newsletter missing required fields.
    #[error("Local model generation failed to produce: {}", missing.join(", "))]
    Incomplete { missing: Vec<String> },

    /// Settings file is missing or malformed.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// JSON serialization errors.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl NewsletterError {
    /// Whether the failure is the caller's fault rather than the service's.
    ///
    /// Used by the HTTP adapter to pick between 400 and 500.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            NewsletterError::InvalidUrl(_)
                | NewsletterError::FileNotFound(_)
                | NewsletterError::UnsupportedFileType(_)
                | NewsletterError::ExtractionFailed(_)
        )
    }
}

/// Result type alias for NewsletterError.
pub type Result<T> = std::result::Result<T, NewsletterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = NewsletterError::InvalidUrl("not a url".to_string());
        assert!(err.to_string().contains("Invalid URL"));
    }

    #[test]
    fn test_incomplete_lists_fields() {
        let err = NewsletterError::Incomplete { missing: vec!["title".to_string(), "introduction".to_string()] };
        assert_eq!(
            err.to_string(),
            "Local model generation failed to produce: title, introduction"
        );
    }

    #[test]
    fn test_content_too_short_error() {
        let err = NewsletterError::ContentTooShort { length: 12, minimum: 50 };
        assert!(err.to_string().contains("12"));
        assert!(err.to_string().contains("50"));
    }

    #[test]
    fn test_client_error_classification() {
        assert!(NewsletterError::ExtractionFailed("URL".to_string()).is_client_error());
        assert!(NewsletterError::UnsupportedFileType("txt".to_string()).is_client_error());
        assert!(!NewsletterError::Generation("boom".to_string()).is_client_error());
        assert!(!NewsletterError::Incomplete { missing: vec![] }.is_client_error());
    }

    #[test]
    fn test_timeout_error() {
        let err = NewsletterError::Timeout { timeout: 10 };
        assert!(err.to_string().contains("10"));
    }
}
