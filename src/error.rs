//! Error types for the analysis pipeline.
//!
//! Every failure path ends in `main`, which prints the message and exits
//! with status 1, so variants carry enough context to stand on their own.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("{0} not found in environment variables")]
    MissingCredential(&'static str),

    #[error("Invalid configuration for {name}: {message}")]
    InvalidConfig { name: &'static str, message: String },

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Declared format '{declared}' does not match file extension '{extension}'")]
    FormatMismatch { declared: String, extension: String },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("PDF extraction failed: {0}")]
    PdfExtraction(String),

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Document analysis service error ({status}): {message}")]
    Service { status: u16, message: String },

    #[error("Document analysis failed: {0}")]
    AnalysisFailed(String),

    #[error("Unexpected response from analysis service: {0}")]
    InvalidResponse(String),

    #[error("Document analysis did not finish after {0} status checks")]
    Timeout(u32),

    #[error("Failed to write report: {0}")]
    Output(String),
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;

impl AnalyzerError {
    pub fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}
