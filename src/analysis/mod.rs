//! Document analysis: remote call, field extraction, consolidation

pub mod analyzer;
pub mod extract;
pub mod result;

pub use analyzer::DocumentAnalyzer;
pub use extract::extract_information;
pub use result::{AnalysisOutcome, AnalysisReport, AnalysisResult, ConsolidatedResult};
