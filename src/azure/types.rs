//! Wire types for the Document Intelligence analyze operation

use serde::Deserialize;
use std::collections::HashMap;

/// Body returned when polling `Operation-Location`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeOperation {
    pub status: OperationStatus,

    #[serde(default)]
    pub analyze_result: Option<AnalyzeResult>,

    #[serde(default)]
    pub error: Option<ServiceError>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OperationStatus {
    NotStarted,
    Running,
    Succeeded,
    Failed,
    Canceled,
    #[serde(other)]
    Unknown,
}

impl OperationStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Canceled)
    }
}

/// The analysis payload, reduced to what field extraction needs
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResult {
    #[serde(default)]
    pub model_id: Option<String>,

    #[serde(default)]
    pub content: Option<String>,

    #[serde(default)]
    pub documents: Vec<AnalyzedDocument>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzedDocument {
    #[serde(default)]
    pub doc_type: Option<String>,

    #[serde(default)]
    pub fields: HashMap<String, DocumentField>,

    #[serde(default)]
    pub confidence: Option<f32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentField {
    #[serde(rename = "type", default)]
    pub field_type: Option<String>,

    #[serde(default)]
    pub content: Option<String>,

    #[serde(default)]
    pub confidence: Option<f32>,
}

impl DocumentField {
    pub fn new(content: &str, confidence: f32) -> Self {
        Self {
            field_type: Some("string".to_string()),
            content: Some(content.to_string()),
            confidence: Some(confidence),
        }
    }

    /// Trimmed content, `None` when absent
    pub fn text(&self) -> Option<&str> {
        self.content.as_deref().map(str::trim)
    }
}

/// `error` object used by both the submit and poll responses
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceError {
    #[serde(default)]
    pub code: Option<String>,

    #[serde(default)]
    pub message: Option<String>,
}

impl ServiceError {
    pub fn describe(&self) -> String {
        match (&self.code, &self.message) {
            (Some(code), Some(message)) => format!("{}: {}", code, message),
            (None, Some(message)) => message.clone(),
            (Some(code), None) => code.clone(),
            (None, None) => "Unknown error".to_string(),
        }
    }
}

/// Wrapper for error bodies on non-2xx responses
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ServiceError,
}
