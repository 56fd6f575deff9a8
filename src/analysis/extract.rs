//! Field extraction from an analysis response

use super::result::AnalysisResult;
use crate::azure::AnalyzeResult;
use crate::fraud::rules::{
    FraudRules, FIELD_DOCUMENT_NUMBER, FIELD_DOCUMENT_TYPE, FIELD_ISSUE_DATE, FIELD_NAME,
};

/// Map the service's documents onto an `AnalysisResult`.
///
/// Documents are visited in order. A later document only overwrites the
/// fields it actually has, while its fraud indicators replace the previous
/// document's. No documents means no fields and no indicators.
pub fn extract_information(result: &AnalyzeResult, rules: &FraudRules) -> AnalysisResult {
    let mut info = AnalysisResult::default();

    for document in &result.documents {
        let fields = &document.fields;

        let targets: [(&str, &mut String); 4] = [
            (FIELD_DOCUMENT_TYPE, &mut info.document_type),
            (FIELD_ISSUE_DATE, &mut info.issue_date),
            (FIELD_DOCUMENT_NUMBER, &mut info.document_number),
            (FIELD_NAME, &mut info.holder_name),
        ];
        for (name, slot) in targets {
            if let Some(field) = fields.get(name) {
                *slot = field.text().unwrap_or_default().to_string();
            }
        }

        info.fraud_indicators = rules.evaluate(fields);
    }

    if result.documents.is_empty() {
        tracing::warn!("[Extract] Analysis returned no documents; no fields to check");
    }

    info
}
