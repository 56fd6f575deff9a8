//! Document Loader
//!
//! Reads the input file and turns it into what the analysis service receives:
//! - PDF: one cleaned text block per page via pdf-extract
//! - Images: the raw bytes, after checking they actually decode

use super::format::{image_content_type, DocumentFormat};
use crate::error::{AnalyzerError, Result};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Facts about the analyzed file, carried into the report
#[derive(Debug, Clone, Serialize)]
pub struct SourceInfo {
    pub path: String,
    pub format: DocumentFormat,
    pub size_bytes: u64,
    pub sha256: String,
}

#[derive(Debug, Clone)]
pub enum DocumentContent {
    /// Extracted text, one entry per page (empty pages included)
    Pdf { pages: Vec<String> },
    /// Raw image bytes and their MIME type
    Image { bytes: Vec<u8>, content_type: String },
}

#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub source: SourceInfo,
    pub content: DocumentContent,
}

/// Loads PDFs and images from disk
pub struct DocumentParser;

impl DocumentParser {
    pub fn new() -> Self {
        Self
    }

    /// Read and prepare a document for analysis
    pub async fn load(&self, path: &Path, declared: Option<DocumentFormat>) -> Result<LoadedDocument> {
        let format = DocumentFormat::resolve(path, declared)?;

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| AnalyzerError::io(path, e))?;

        tracing::debug!(
            "[DocumentParser] Read {} ({} bytes, {})",
            path.display(),
            bytes.len(),
            format
        );

        let source = SourceInfo {
            path: path.display().to_string(),
            format,
            size_bytes: bytes.len() as u64,
            sha256: hex::encode(Sha256::digest(&bytes)),
        };

        let content = match format {
            DocumentFormat::Pdf => DocumentContent::Pdf {
                pages: self.pdf_pages(&bytes)?,
            },
            DocumentFormat::Image => {
                self.validate_image(&bytes)?;
                DocumentContent::Image {
                    bytes,
                    content_type: image_content_type(path),
                }
            }
        };

        Ok(LoadedDocument { source, content })
    }

    /// Extract text per page
    /// Wrapped in catch_unwind to handle panics from malformed PDFs
    pub fn pdf_pages(&self, bytes: &[u8]) -> Result<Vec<String>> {
        // The pdf_extract crate (and its cff-parser dependency) can panic on certain fonts/glyphs
        let pages = match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem_by_pages(bytes)
        })) {
            Ok(Ok(pages)) => pages,
            Ok(Err(e)) => {
                tracing::warn!("[DocumentParser] PDF extraction failed: {}", e);
                return Err(AnalyzerError::PdfExtraction(e.to_string()));
            }
            Err(_panic) => {
                tracing::error!("[DocumentParser] PDF extraction panicked - likely malformed font/glyph");
                return Err(AnalyzerError::PdfExtraction(
                    "extraction panicked - likely contains malformed fonts".to_string(),
                ));
            }
        };

        if pages.is_empty() {
            return Err(AnalyzerError::PdfExtraction("document has no pages".to_string()));
        }

        let pages: Vec<String> = pages.iter().map(|p| Self::clean_text(p)).collect();

        let empty = pages.iter().filter(|p| p.is_empty()).count();
        if empty > 0 {
            tracing::warn!(
                "[DocumentParser] {} of {} page(s) have no extractable text - likely scanned",
                empty,
                pages.len()
            );
        }

        tracing::info!("[DocumentParser] Extracted text from {} page(s)", pages.len());
        Ok(pages)
    }

    /// Make sure the bytes decode as an image before paying for an API call
    pub fn validate_image(&self, bytes: &[u8]) -> Result<()> {
        let img = image::load_from_memory(bytes)
            .map_err(|e| AnalyzerError::InvalidImage(e.to_string()))?;

        tracing::debug!(
            "[DocumentParser] Image decoded: {}x{}",
            img.width(),
            img.height()
        );
        Ok(())
    }

    /// Clean extracted text
    fn clean_text(text: &str) -> String {
        text.lines()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for DocumentParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::pdf_with_pages;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn png_bytes() -> Vec<u8> {
        let img = image::RgbImage::from_pixel(8, 8, image::Rgb([200, 30, 30]));
        let mut buffer = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut std::io::Cursor::new(&mut buffer), image::ImageFormat::Png)
            .unwrap();
        buffer
    }

    #[test]
    fn test_clean_text() {
        let messy = "  Line 1  \n\n  Line 2  \n  \n  Line 3  ";
        assert_eq!(DocumentParser::clean_text(messy), "Line 1\nLine 2\nLine 3");
        assert_eq!(DocumentParser::clean_text(" \n \n"), "");
    }

    #[test]
    fn test_validate_image() {
        let parser = DocumentParser::new();
        assert!(parser.validate_image(&png_bytes()).is_ok());

        let err = parser.validate_image(b"definitely not an image").unwrap_err();
        assert!(matches!(err, AnalyzerError::InvalidImage(_)));
    }

    #[test]
    fn test_garbage_pdf_is_an_error() {
        let parser = DocumentParser::new();
        let err = parser.pdf_pages(b"%PDF-1.4\nthis is not really a pdf").unwrap_err();
        assert!(matches!(err, AnalyzerError::PdfExtraction(_)));
    }

    #[test]
    fn test_pdf_pages_one_entry_per_page() {
        let pdf = pdf_with_pages(&["PASSPORT PAGE ONE", "SECOND PAGE TEXT"]);

        let pages = DocumentParser::new().pdf_pages(&pdf).unwrap();

        assert_eq!(pages.len(), 2);
        assert!(pages[0].contains("PASSPORT PAGE ONE"), "{:?}", pages);
        assert!(pages[1].contains("SECOND PAGE TEXT"), "{:?}", pages);
        assert!(pages.iter().all(|p| p.trim() == p.as_str()));
    }

    #[tokio::test]
    async fn test_load_pdf() {
        let pdf = pdf_with_pages(&["ONLY PAGE"]);
        let mut file = NamedTempFile::with_suffix(".pdf").unwrap();
        file.write_all(&pdf).unwrap();

        let loaded = DocumentParser::new()
            .load(file.path(), Some(DocumentFormat::Pdf))
            .await
            .unwrap();

        assert_eq!(loaded.source.format, DocumentFormat::Pdf);
        assert_eq!(loaded.source.size_bytes, pdf.len() as u64);
        match loaded.content {
            DocumentContent::Pdf { pages } => assert_eq!(pages.len(), 1),
            other => panic!("expected pdf content, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_load_image() {
        let mut file = NamedTempFile::with_suffix(".png").unwrap();
        file.write_all(&png_bytes()).unwrap();

        let loaded = DocumentParser::new().load(file.path(), None).await.unwrap();

        assert_eq!(loaded.source.format, DocumentFormat::Image);
        assert_eq!(loaded.source.size_bytes, png_bytes().len() as u64);
        assert_eq!(loaded.source.sha256.len(), 64);
        match loaded.content {
            DocumentContent::Image { bytes, content_type } => {
                assert_eq!(bytes, png_bytes());
                assert_eq!(content_type, "image/png");
            }
            other => panic!("expected image content, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_load_rejects_mislabelled_image() {
        let mut file = NamedTempFile::with_suffix(".jpg").unwrap();
        writeln!(file, "plain text pretending to be a photo").unwrap();

        let err = DocumentParser::new().load(file.path(), None).await.unwrap_err();
        assert!(matches!(err, AnalyzerError::InvalidImage(_)));
    }

    #[tokio::test]
    async fn test_load_unsupported_extension_before_reading() {
        let err = DocumentParser::new()
            .load(Path::new("/nonexistent/file.docx"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AnalyzerError::UnsupportedFormat(_)));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let err = DocumentParser::new()
            .load(Path::new("/nonexistent/file.pdf"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AnalyzerError::Io { .. }));
    }
}
