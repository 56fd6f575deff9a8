//! Runtime configuration for the Azure Document Intelligence client.
//!
//! Credentials come from the environment (a `.env` file is loaded by the
//! binary before this runs). Everything except the key and endpoint has a
//! default.

use crate::error::{AnalyzerError, Result};
use std::str::FromStr;
use std::time::Duration;

pub const ENV_KEY: &str = "AZURE_KEY";
pub const ENV_ENDPOINT: &str = "AZURE_ENDPOINT";
pub const ENV_MODEL_ID: &str = "AZURE_MODEL_ID";
pub const ENV_API_VERSION: &str = "AZURE_API_VERSION";
pub const ENV_POLL_INTERVAL_MS: &str = "AZURE_POLL_INTERVAL_MS";
pub const ENV_MAX_POLLS: &str = "AZURE_MAX_POLLS";
pub const ENV_TIMEOUT_SECS: &str = "AZURE_TIMEOUT_SECS";
pub const ENV_MIN_FIELD_CONFIDENCE: &str = "FRAUDSCAN_MIN_FIELD_CONFIDENCE";

/// Connection and tuning settings for the analysis service
#[derive(Debug, Clone)]
pub struct AzureConfig {
    /// Resource endpoint, e.g. https://my-resource.cognitiveservices.azure.com
    pub endpoint: String,

    /// Subscription key sent as `Ocp-Apim-Subscription-Key`
    pub api_key: String,

    /// Model to analyze with (default: prebuilt-document)
    pub model_id: String,

    /// REST API version (default: 2023-07-31)
    pub api_version: String,

    /// Delay between status checks when the service sends no Retry-After
    pub poll_interval: Duration,

    /// Maximum number of status checks before giving up
    pub max_polls: u32,

    /// Per-request HTTP timeout
    pub request_timeout: Duration,

    /// Fields reported below this confidence count as possibly modified
    pub min_field_confidence: f32,
}

impl Default for AzureConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: String::new(),
            model_id: "prebuilt-document".to_string(),
            api_version: "2023-07-31".to_string(),
            poll_interval: Duration::from_millis(1000),
            max_polls: 120,
            request_timeout: Duration::from_secs(120),
            min_field_confidence: 0.5,
        }
    }
}

impl AzureConfig {
    /// Build from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_key = get(ENV_KEY).ok_or(AnalyzerError::MissingCredential(ENV_KEY))?;
        let endpoint = get(ENV_ENDPOINT)
            .ok_or(AnalyzerError::MissingCredential(ENV_ENDPOINT))?
            .trim_end_matches('/')
            .to_string();

        let defaults = Self::default();

        let poll_interval_ms: u64 = parse_or(
            ENV_POLL_INTERVAL_MS,
            get(ENV_POLL_INTERVAL_MS),
            defaults.poll_interval.as_millis() as u64,
        )?;
        let timeout_secs: u64 = parse_or(
            ENV_TIMEOUT_SECS,
            get(ENV_TIMEOUT_SECS),
            defaults.request_timeout.as_secs(),
        )?;
        let max_polls: u32 = parse_or(ENV_MAX_POLLS, get(ENV_MAX_POLLS), defaults.max_polls)?;
        let min_field_confidence: f32 = parse_or(
            ENV_MIN_FIELD_CONFIDENCE,
            get(ENV_MIN_FIELD_CONFIDENCE),
            defaults.min_field_confidence,
        )?;

        if max_polls == 0 {
            return Err(AnalyzerError::InvalidConfig {
                name: ENV_MAX_POLLS,
                message: "must be at least 1".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&min_field_confidence) {
            return Err(AnalyzerError::InvalidConfig {
                name: ENV_MIN_FIELD_CONFIDENCE,
                message: format!("{} is outside 0.0..=1.0", min_field_confidence),
            });
        }

        Ok(Self {
            endpoint,
            api_key,
            model_id: get(ENV_MODEL_ID).unwrap_or(defaults.model_id),
            api_version: get(ENV_API_VERSION).unwrap_or(defaults.api_version),
            poll_interval: Duration::from_millis(poll_interval_ms),
            max_polls,
            request_timeout: Duration::from_secs(timeout_secs),
            min_field_confidence,
        })
    }

    /// URL the document is POSTed to
    pub fn analyze_url(&self) -> String {
        format!(
            "{}/formrecognizer/documentModels/{}:analyze?api-version={}",
            self.endpoint, self.model_id, self.api_version
        )
    }
}

fn parse_or<T>(name: &'static str, raw: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value.parse().map_err(|e: T::Err| AnalyzerError::InvalidConfig {
            name,
            message: format!("'{}': {}", value, e),
        }),
    }
}
