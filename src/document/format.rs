//! File-type dispatch

use crate::error::{AnalyzerError, Result};
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// The two input families the pipeline knows how to analyze
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFormat {
    /// Text is extracted per page and analyzed page by page
    Pdf,
    /// Raw bytes are analyzed in a single call
    Image,
}

impl DocumentFormat {
    pub fn from_extension(ext: &str) -> Result<Self> {
        match ext.to_lowercase().as_str() {
            "pdf" => Ok(Self::Pdf),
            "jpg" | "jpeg" | "png" => Ok(Self::Image),
            other => Err(AnalyzerError::UnsupportedFormat(other.to_string())),
        }
    }

    /// Dispatch on the file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => Self::from_extension(ext),
            None => Err(AnalyzerError::UnsupportedFormat("(no extension)".to_string())),
        }
    }

    /// Dispatch on the extension and cross-check a format given on the command line
    pub fn resolve(path: &Path, declared: Option<Self>) -> Result<Self> {
        let detected = Self::from_path(path)?;

        match declared {
            Some(declared) if declared != detected => Err(AnalyzerError::FormatMismatch {
                declared: declared.to_string(),
                extension: path
                    .extension()
                    .map(|e| e.to_string_lossy().to_lowercase())
                    .unwrap_or_default(),
            }),
            _ => Ok(detected),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Image => "image",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// MIME type sent with image uploads
pub fn image_content_type(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}
