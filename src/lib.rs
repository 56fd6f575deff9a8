//! Document fraud screening
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │  1. DISPATCH: PDF or image, by extension                      │
//! │  2. LOAD: per-page PDF text (pdf-extract) or raw image bytes  │
//! │  3. ANALYZE: Azure Document Intelligence, one call per page   │
//! │  4. EXTRACT: DocumentType, IssueDate, DocumentNumber, Name    │
//! │  5. CHECK: four fraud heuristics per result                   │
//! │  6. CONSOLIDATE: union indicators across pages                │
//! └───────────────────────────────────────────────────────────────┘
//! ```

pub mod analysis;
pub mod azure;
pub mod config;
pub mod document;
pub mod error;
pub mod fraud;
pub mod report;

#[cfg(test)]
mod test_support;

pub use analysis::{AnalysisReport, DocumentAnalyzer};
pub use config::AzureConfig;
pub use document::DocumentFormat;
pub use error::{AnalyzerError, Result};
pub use fraud::FraudIndicator;
