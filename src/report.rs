//! Human-readable and JSON rendering of an analysis report

use crate::analysis::{AnalysisOutcome, AnalysisReport, AnalysisResult};
use crate::error::{AnalyzerError, Result};
use crate::fraud::FraudIndicator;
use std::collections::BTreeSet;
use std::io::Write;

const RULE: &str = "--------------------------------------------------";
const NOT_IDENTIFIED: &str = "Not identified";

pub fn render_text<W: Write>(report: &AnalysisReport, out: &mut W) -> Result<()> {
    write_text(report, out).map_err(|e| AnalyzerError::Output(e.to_string()))
}

pub fn render_json<W: Write>(report: &AnalysisReport, out: &mut W) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, report)
        .map_err(|e| AnalyzerError::Output(e.to_string()))?;
    writeln!(out).map_err(|e| AnalyzerError::Output(e.to_string()))
}

fn write_text<W: Write>(report: &AnalysisReport, out: &mut W) -> std::io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Analysis result:")?;
    writeln!(out, "{}", RULE)?;

    write_indicators(report.fraud_indicators(), out)?;

    writeln!(out)?;
    writeln!(out, "Document details:")?;

    match &report.outcome {
        AnalysisOutcome::Single(result) => write_fields(result, "", out)?,
        AnalysisOutcome::Consolidated(consolidated) => {
            writeln!(out, "Type: {}", or_unknown(&consolidated.document_type))?;
            writeln!(out, "Pages analyzed: {}", consolidated.pages_analyzed)?;

            for (index, page) in consolidated.per_page_details.iter().enumerate() {
                writeln!(out)?;
                writeln!(out, "Page {}:", index + 1)?;
                write_fields(page, "  ", out)?;
                writeln!(out, "  Indicators: {}", indicator_list(&page.fraud_indicators))?;
            }
        }
    }

    writeln!(out)?;
    writeln!(out, "Source:")?;
    writeln!(out, "File: {}", report.source.path)?;
    writeln!(out, "Format: {}", report.source.format)?;
    writeln!(out, "Size: {} bytes", report.source.size_bytes)?;
    writeln!(out, "SHA-256: {}", report.source.sha256)?;
    writeln!(
        out,
        "Analyzed at: {}",
        report.analyzed_at.format("%Y-%m-%d %H:%M:%S UTC")
    )?;

    Ok(())
}

fn write_indicators<W: Write>(indicators: &BTreeSet<FraudIndicator>, out: &mut W) -> std::io::Result<()> {
    writeln!(out)?;
    if indicators.is_empty() {
        return writeln!(out, "✅ No fraud indicators detected");
    }

    writeln!(out, "⚠️  FRAUD ALERTS DETECTED!")?;
    for indicator in indicators {
        writeln!(out, "- {} ({})", indicator, indicator.description())?;
    }
    Ok(())
}

fn write_fields<W: Write>(result: &AnalysisResult, indent: &str, out: &mut W) -> std::io::Result<()> {
    writeln!(out, "{}Type: {}", indent, or_unknown(&result.document_type))?;
    writeln!(out, "{}Issue date: {}", indent, or_unknown(&result.issue_date))?;
    writeln!(out, "{}Number: {}", indent, or_unknown(&result.document_number))?;
    writeln!(out, "{}Holder: {}", indent, or_unknown(&result.holder_name))
}

fn indicator_list(indicators: &BTreeSet<FraudIndicator>) -> String {
    if indicators.is_empty() {
        return "none".to_string();
    }
    indicators
        .iter()
        .map(FraudIndicator::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn or_unknown(value: &str) -> &str {
    if value.is_empty() {
        NOT_IDENTIFIED
    } else {
        value
    }
}
