//! Remote document analysis
//!
//! The pipeline only talks to `AnalysisService`; `AzureClient` is the real
//! implementation backed by Azure AI Document Intelligence.

mod client;
pub mod types;

pub use client::AzureClient;
pub use types::{AnalyzeResult, AnalyzedDocument, DocumentField};

use crate::error::Result;
use async_trait::async_trait;

/// A service that turns document bytes into structured fields
#[async_trait]
pub trait AnalysisService: Send + Sync {
    async fn analyze(&self, content: Vec<u8>, content_type: &str) -> Result<AnalyzeResult>;
}
