//! Heuristic fraud checks over extracted document fields.
//!
//! Each rule looks at one aspect of the fields returned by the analysis
//! service and contributes at most one indicator. Rules are independent: a
//! document can trip all four.

use crate::azure::DocumentField;
use chrono::{Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

pub const FIELD_DOCUMENT_TYPE: &str = "DocumentType";
pub const FIELD_ISSUE_DATE: &str = "IssueDate";
pub const FIELD_DOCUMENT_NUMBER: &str = "DocumentNumber";
pub const FIELD_NAME: &str = "Name";

/// Fields whose confidence feeds the modification check
pub const TRACKED_FIELDS: [&str; 4] = [
    FIELD_DOCUMENT_TYPE,
    FIELD_ISSUE_DATE,
    FIELD_DOCUMENT_NUMBER,
    FIELD_NAME,
];

/// Accepted issue date layouts
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%Y/%m/%d",
    "%d %b %Y",
];

const MIN_NUMBER_LEN: usize = 5;
const MAX_NUMBER_LEN: usize = 20;
const MIN_TYPE_LEN: usize = 2;
const MAX_TYPE_LEN: usize = 64;

static NUMBER_SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s./\-]").unwrap());
static NUMBER_SHAPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9]+$").unwrap());
static DOCUMENT_TYPE_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\p{L}[\p{L}\p{N} ._\-]*$").unwrap());

/// A named heuristic flag raised when a validation rule fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FraudIndicator {
    InvalidDate,
    SuspiciousNumber,
    InvalidFormat,
    ModifiedContent,
}

impl FraudIndicator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidDate => "invalid_date",
            Self::SuspiciousNumber => "suspicious_number",
            Self::InvalidFormat => "invalid_format",
            Self::ModifiedContent => "modified_content",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::InvalidDate => "issue date is missing, malformed or out of range",
            Self::SuspiciousNumber => "document number is missing or implausible",
            Self::InvalidFormat => "document type is missing or malformed",
            Self::ModifiedContent => "fields were read with low confidence or are blank",
        }
    }
}

impl fmt::Display for FraudIndicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The rule set applied to every analyzed document
#[derive(Debug, Clone)]
pub struct FraudRules {
    min_field_confidence: f32,
    reference_date: Option<NaiveDate>,
}

impl FraudRules {
    pub fn new(min_field_confidence: f32) -> Self {
        Self {
            min_field_confidence,
            reference_date: None,
        }
    }

    /// Pin "today" for the future-date check
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    fn today(&self) -> NaiveDate {
        self.reference_date
            .unwrap_or_else(|| Local::now().date_naive())
    }

    /// Run every rule and collect the failures
    pub fn evaluate(&self, fields: &HashMap<String, DocumentField>) -> BTreeSet<FraudIndicator> {
        let text = |name: &str| fields.get(name).and_then(|f| f.text());

        let mut indicators = BTreeSet::new();

        if !self.is_valid_date(text(FIELD_ISSUE_DATE)) {
            indicators.insert(FraudIndicator::InvalidDate);
        }
        if !is_plausible_document_number(text(FIELD_DOCUMENT_NUMBER)) {
            indicators.insert(FraudIndicator::SuspiciousNumber);
        }
        if !is_valid_document_type(text(FIELD_DOCUMENT_TYPE)) {
            indicators.insert(FraudIndicator::InvalidFormat);
        }
        if self.detect_modifications(fields) {
            indicators.insert(FraudIndicator::ModifiedContent);
        }

        if !indicators.is_empty() {
            tracing::debug!("[FraudRules] Indicators raised: {:?}", indicators);
        }
        indicators
    }

    pub fn is_valid_date(&self, value: Option<&str>) -> bool {
        let Some(date) = value.and_then(parse_issue_date) else {
            return false;
        };

        let earliest = NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or(NaiveDate::MIN);
        date >= earliest && date <= self.today()
    }

    /// True when a tracked field is blank or was read below the confidence floor
    pub fn detect_modifications(&self, fields: &HashMap<String, DocumentField>) -> bool {
        TRACKED_FIELDS.iter().filter_map(|name| fields.get(*name)).any(|field| {
            let blank = field.text().map_or(true, str::is_empty);
            let low_confidence = field
                .confidence
                .is_some_and(|c| c < self.min_field_confidence);
            blank || low_confidence
        })
    }
}

impl Default for FraudRules {
    fn default() -> Self {
        Self::new(0.5)
    }
}

/// Parse a date in any of the accepted layouts
pub fn parse_issue_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
}

pub fn is_plausible_document_number(value: Option<&str>) -> bool {
    let Some(value) = value else {
        return false;
    };

    let normalized = NUMBER_SEPARATORS.replace_all(value, "");
    let len = normalized.len();

    if !(MIN_NUMBER_LEN..=MAX_NUMBER_LEN).contains(&len) || !NUMBER_SHAPE.is_match(&normalized) {
        return false;
    }
    if !normalized.chars().any(|c| c.is_ascii_digit()) {
        return false;
    }

    let bytes = normalized.as_bytes();
    if bytes.iter().all(|b| b.eq_ignore_ascii_case(&bytes[0])) {
        return false;
    }

    !is_digit_run(bytes)
}

/// `12345`, `98765` and friends
fn is_digit_run(bytes: &[u8]) -> bool {
    if !bytes.iter().all(u8::is_ascii_digit) {
        return false;
    }

    let steps: Vec<i16> = bytes
        .windows(2)
        .map(|w| w[1] as i16 - w[0] as i16)
        .collect();

    steps.iter().all(|&s| s == 1) || steps.iter().all(|&s| s == -1)
}

pub fn is_valid_document_type(value: Option<&str>) -> bool {
    let Some(value) = value else {
        return false;
    };

    let len = value.chars().count();
    (MIN_TYPE_LEN..=MAX_TYPE_LEN).contains(&len) && DOCUMENT_TYPE_SHAPE.is_match(value)
}
