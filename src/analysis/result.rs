//! Per-page results and their consolidation

use crate::document::SourceInfo;
use crate::fraud::FraudIndicator;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeSet;

/// Fields and indicators for one page (or one image)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub document_type: String,
    pub issue_date: String,
    pub document_number: String,
    pub holder_name: String,
    pub fraud_indicators: BTreeSet<FraudIndicator>,
}

/// A multi-page document folded into one result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsolidatedResult {
    /// First non-empty document type reported by any page
    pub document_type: String,

    /// Union of every page's indicators
    pub fraud_indicators: BTreeSet<FraudIndicator>,

    /// Always equal to `per_page_details.len()`
    pub pages_analyzed: usize,

    pub per_page_details: Vec<AnalysisResult>,
}

impl ConsolidatedResult {
    pub fn from_pages(pages: Vec<AnalysisResult>) -> Self {
        let fraud_indicators = pages
            .iter()
            .flat_map(|page| page.fraud_indicators.iter().copied())
            .collect();

        let document_type = pages
            .iter()
            .map(|page| page.document_type.as_str())
            .find(|t| !t.is_empty())
            .unwrap_or_default()
            .to_string();

        Self {
            document_type,
            fraud_indicators,
            pages_analyzed: pages.len(),
            per_page_details: pages,
        }
    }
}

/// Outcome of analyzing one file
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalysisOutcome {
    Single(AnalysisResult),
    Consolidated(ConsolidatedResult),
}

/// Everything one invocation reports
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub source: SourceInfo,
    pub analyzed_at: DateTime<Utc>,
    pub outcome: AnalysisOutcome,
}

impl AnalysisReport {
    pub fn new(source: SourceInfo, outcome: AnalysisOutcome) -> Self {
        Self {
            source,
            analyzed_at: Utc::now(),
            outcome,
        }
    }

    pub fn fraud_indicators(&self) -> &BTreeSet<FraudIndicator> {
        match &self.outcome {
            AnalysisOutcome::Single(result) => &result.fraud_indicators,
            AnalysisOutcome::Consolidated(result) => &result.fraud_indicators,
        }
    }

    pub fn has_fraud_indicators(&self) -> bool {
        !self.fraud_indicators().is_empty()
    }

    pub fn document_type(&self) -> &str {
        match &self.outcome {
            AnalysisOutcome::Single(result) => &result.document_type,
            AnalysisOutcome::Consolidated(result) => &result.document_type,
        }
    }
}
