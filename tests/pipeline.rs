//! End-to-end checks of the public pipeline with a local stand-in for the
//! remote analysis service.

use async_trait::async_trait;
use chrono::NaiveDate;
use fraudscan_lib::analysis::{AnalysisOutcome, ConsolidatedResult};
use fraudscan_lib::azure::{AnalysisService, AnalyzeResult, AnalyzedDocument, DocumentField};
use fraudscan_lib::fraud::FraudRules;
use fraudscan_lib::{report, AnalyzerError, AzureConfig, DocumentAnalyzer, DocumentFormat, FraudIndicator};
use std::collections::{BTreeSet, HashMap, VecDeque};
use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;

struct CannedService {
    responses: Mutex<VecDeque<AnalyzeResult>>,
    calls: Mutex<usize>,
}

impl CannedService {
    fn new(responses: Vec<AnalyzeResult>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: Mutex::new(0),
        }
    }

    fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl AnalysisService for CannedService {
    async fn analyze(&self, _content: Vec<u8>, _content_type: &str) -> fraudscan_lib::Result<AnalyzeResult> {
        *self.calls.lock().unwrap() += 1;
        Ok(self.responses.lock().unwrap().pop_front().unwrap_or_default())
    }
}

fn id_document(doc_type: &str, date: &str, number: &str, name: &str) -> AnalyzeResult {
    let fields: HashMap<String, DocumentField> = [
        ("DocumentType", doc_type),
        ("IssueDate", date),
        ("DocumentNumber", number),
        ("Name", name),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), DocumentField::new(v, 0.93)))
    .collect();

    AnalyzeResult {
        documents: vec![AnalyzedDocument {
            doc_type: Some("idDocument".to_string()),
            fields,
            confidence: Some(0.9),
        }],
        ..Default::default()
    }
}

fn analyzer(responses: Vec<AnalyzeResult>) -> DocumentAnalyzer<CannedService> {
    let rules = FraudRules::new(0.5).with_reference_date(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
    DocumentAnalyzer::new(CannedService::new(responses), rules)
}

#[tokio::test]
async fn consolidated_indicators_are_the_union_of_pages() {
    let analyzer = analyzer(vec![
        id_document("Passport", "2030-01-01", "PA9912345", "Joana Reis"),
        id_document("X", "2021-05-05", "PA9912345", "Joana Reis"),
        id_document("Passport", "2021-05-05", "55555", "Joana Reis"),
        id_document("Passport", "2030-01-01", "PA9912345", "Joana Reis"),
    ]);

    let pages: Vec<String> = (1..=4).map(|i| format!("page {} text", i)).collect();
    let consolidated: ConsolidatedResult = analyzer.analyze_pages(&pages).await.unwrap();

    let union: BTreeSet<FraudIndicator> = consolidated
        .per_page_details
        .iter()
        .flat_map(|p| p.fraud_indicators.iter().copied())
        .collect();

    assert_eq!(consolidated.fraud_indicators, union);
    assert_eq!(
        consolidated.fraud_indicators,
        [
            FraudIndicator::InvalidDate,
            FraudIndicator::SuspiciousNumber,
            FraudIndicator::InvalidFormat,
        ]
        .into_iter()
        .collect()
    );
    assert_eq!(consolidated.pages_analyzed, pages.len());
    assert_eq!(consolidated.pages_analyzed, consolidated.per_page_details.len());
    assert_eq!(analyzer.service().calls(), 4);
}

#[tokio::test]
async fn unsupported_extensions_always_error() {
    for suffix in [".gif", ".bmp", ".docx", ".txt", ".tif"] {
        let mut file = NamedTempFile::with_suffix(suffix).unwrap();
        file.write_all(b"content").unwrap();

        let analyzer = analyzer(vec![]);
        let err = analyzer.analyze_file(file.path(), None).await.unwrap_err();

        assert!(
            matches!(err, AnalyzerError::UnsupportedFormat(_)),
            "{} gave {:?}",
            suffix,
            err
        );
        assert_eq!(analyzer.service().calls(), 0);
    }
}

#[tokio::test]
async fn image_report_renders() {
    let img = image::RgbImage::from_pixel(6, 6, image::Rgb([240, 240, 240]));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    let mut file = NamedTempFile::with_suffix(".PNG").unwrap();
    file.write_all(&bytes).unwrap();

    let analyzer = analyzer(vec![id_document("Identity Card", "2019-11-20", "RG 12.345.678-9", "")]);
    let report_data = analyzer
        .analyze_file(file.path(), Some(DocumentFormat::Image))
        .await
        .unwrap();

    assert!(matches!(report_data.outcome, AnalysisOutcome::Single(_)));
    // The blank holder name counts as a possible modification
    assert_eq!(
        report_data.fraud_indicators().iter().copied().collect::<Vec<_>>(),
        vec![FraudIndicator::ModifiedContent]
    );

    let mut out = Vec::new();
    report::render_text(&report_data, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("- modified_content"));
    assert!(text.contains("Type: Identity Card"));
}

#[test]
fn missing_credentials_prevent_construction() {
    let only_key = |name: &str| (name == "AZURE_KEY").then(|| "secret".to_string());
    let only_endpoint =
        |name: &str| (name == "AZURE_ENDPOINT").then(|| "https://doc.example".to_string());

    assert!(matches!(
        AzureConfig::from_lookup(only_key),
        Err(AnalyzerError::MissingCredential("AZURE_ENDPOINT"))
    ));
    assert!(matches!(
        AzureConfig::from_lookup(only_endpoint),
        Err(AnalyzerError::MissingCredential("AZURE_KEY"))
    ));
    assert!(matches!(
        AzureConfig::from_lookup(|_: &str| None),
        Err(AnalyzerError::MissingCredential(_))
    ));
}
