//! Analysis pipeline
//!
//! ```text
//! path ──► DocumentParser::load ──► PDF: one service call per page ──► consolidate
//!                                └► image: one service call ─────────► single result
//! ```
//!
//! Calls are strictly sequential and the first failure aborts the run.

use super::extract::extract_information;
use super::result::{AnalysisOutcome, AnalysisReport, AnalysisResult, ConsolidatedResult};
use crate::azure::{AnalysisService, AzureClient};
use crate::config::AzureConfig;
use crate::document::{DocumentContent, DocumentFormat, DocumentParser};
use crate::error::Result;
use crate::fraud::FraudRules;
use std::path::Path;

/// Content type used when sending extracted page text
const PAGE_TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

pub struct DocumentAnalyzer<S: AnalysisService = AzureClient> {
    service: S,
    rules: FraudRules,
    parser: DocumentParser,
}

impl DocumentAnalyzer<AzureClient> {
    /// Production analyzer talking to Azure
    pub fn from_config(config: AzureConfig) -> Result<Self> {
        let rules = FraudRules::new(config.min_field_confidence);
        tracing::info!(
            "[DocumentAnalyzer] Using model {} at {}",
            config.model_id,
            config.endpoint
        );
        Ok(Self::new(AzureClient::new(config)?, rules))
    }
}

impl<S: AnalysisService> DocumentAnalyzer<S> {
    pub fn new(service: S, rules: FraudRules) -> Self {
        Self {
            service,
            rules,
            parser: DocumentParser::new(),
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Analyze a PDF or image file end to end
    pub async fn analyze_file(
        &self,
        path: &Path,
        declared: Option<DocumentFormat>,
    ) -> Result<AnalysisReport> {
        tracing::info!("[DocumentAnalyzer] Analyzing {}", path.display());

        let loaded = self.parser.load(path, declared).await?;

        let outcome = match loaded.content {
            DocumentContent::Pdf { pages } => {
                AnalysisOutcome::Consolidated(self.analyze_pages(&pages).await?)
            }
            DocumentContent::Image {
                bytes,
                content_type,
            } => AnalysisOutcome::Single(self.analyze_content(bytes, &content_type).await?),
        };

        let report = AnalysisReport::new(loaded.source, outcome);
        tracing::info!(
            "[DocumentAnalyzer] Done: {} fraud indicator(s)",
            report.fraud_indicators().len()
        );
        Ok(report)
    }

    /// Analyze extracted PDF page texts one by one and consolidate
    pub async fn analyze_pages(&self, pages: &[String]) -> Result<ConsolidatedResult> {
        let mut results = Vec::with_capacity(pages.len());

        for (index, text) in pages.iter().enumerate() {
            let page_number = index + 1;

            if text.is_empty() {
                tracing::warn!(
                    "[DocumentAnalyzer] Page {}/{} has no text, not sent for analysis",
                    page_number,
                    pages.len()
                );
                results.push(AnalysisResult::default());
                continue;
            }

            tracing::info!(
                "[DocumentAnalyzer] Page {}/{} ({} chars)",
                page_number,
                pages.len(),
                text.len()
            );
            let result = self
                .analyze_content(text.as_bytes().to_vec(), PAGE_TEXT_CONTENT_TYPE)
                .await?;
            results.push(result);
        }

        Ok(ConsolidatedResult::from_pages(results))
    }

    /// One remote call, then field extraction and rule evaluation
    pub async fn analyze_content(&self, content: Vec<u8>, content_type: &str) -> Result<AnalysisResult> {
        let response = self.service.analyze(content, content_type).await?;
        Ok(extract_information(&response, &self.rules))
    }
}
