//! Azure Document Intelligence REST client
//!
//! Analysis is a long-running operation:
//! - POST the document to `{model}:analyze`, get 202 + `Operation-Location`
//! - GET `Operation-Location` until the status is terminal

use super::types::*;
use super::AnalysisService;
use crate::config::AzureConfig;
use crate::error::{AnalyzerError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, CONTENT_TYPE, RETRY_AFTER};
use reqwest::{Client, Response};
use std::time::Duration;

const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
const OPERATION_LOCATION_HEADER: &str = "operation-location";

/// Upper bound for a server-provided Retry-After
const MAX_RETRY_AFTER: Duration = Duration::from_secs(30);

/// Accepted analyze request
struct Submission {
    operation_url: String,
    retry_after: Option<Duration>,
}

/// Client for one Document Intelligence resource
pub struct AzureClient {
    client: Client,
    config: AzureConfig,
}

impl AzureClient {
    pub fn new(config: AzureConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .tcp_nodelay(true)
            .build()?;

        Ok(Self::with_client(client, config))
    }

    fn with_client(client: Client, config: AzureConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &AzureConfig {
        &self.config
    }

    /// Submit the document; returns the URL to poll and the server's requested delay
    async fn submit(&self, content: Vec<u8>, content_type: &str) -> Result<Submission> {
        let url = self.config.analyze_url();
        tracing::debug!(
            "[AzureClient] Submitting {} bytes ({}) to model {}",
            content.len(),
            content_type,
            self.config.model_id
        );

        let resp = self
            .client
            .post(&url)
            .header(SUBSCRIPTION_KEY_HEADER, &self.config.api_key)
            .header(CONTENT_TYPE, content_type)
            .body(content)
            .send()
            .await?;

        let resp = check_status(resp).await?;

        let operation_url =
            operation_location(resp.headers()).ok_or_else(|| AnalyzerError::Service {
                status: resp.status().as_u16(),
                message: format!("no {} header in analyze response", OPERATION_LOCATION_HEADER),
            })?;

        Ok(Submission {
            operation_url,
            retry_after: retry_after(resp.headers()),
        })
    }

    /// Poll the operation until it succeeds, fails or runs out of attempts
    async fn poll(&self, operation_url: &str) -> Result<AnalyzeResult> {
        for attempt in 1..=self.config.max_polls {
            let resp = self
                .client
                .get(operation_url)
                .header(SUBSCRIPTION_KEY_HEADER, &self.config.api_key)
                .send()
                .await?;

            let resp = check_status(resp).await?;
            let wait = retry_after(resp.headers()).unwrap_or(self.config.poll_interval);

            let operation: AnalyzeOperation = resp
                .json()
                .await
                .map_err(|e| AnalyzerError::InvalidResponse(e.to_string()))?;

            tracing::debug!(
                "[AzureClient] Poll {}/{}: {:?}",
                attempt,
                self.config.max_polls,
                operation.status
            );

            match operation.status {
                OperationStatus::Succeeded => {
                    return operation.analyze_result.ok_or_else(|| {
                        AnalyzerError::InvalidResponse(
                            "operation succeeded without analyzeResult".to_string(),
                        )
                    });
                }
                OperationStatus::Failed | OperationStatus::Canceled => {
                    let message = operation
                        .error
                        .map(|e| e.describe())
                        .unwrap_or_else(|| format!("operation {:?}", operation.status));
                    return Err(AnalyzerError::AnalysisFailed(message));
                }
                _ => {}
            }

            if attempt < self.config.max_polls {
                tokio::time::sleep(wait).await;
            }
        }

        Err(AnalyzerError::Timeout(self.config.max_polls))
    }
}

#[async_trait]
impl AnalysisService for AzureClient {
    async fn analyze(&self, content: Vec<u8>, content_type: &str) -> Result<AnalyzeResult> {
        let submission = self.submit(content, content_type).await?;
        if let Some(wait) = submission.retry_after {
            tracing::debug!("[AzureClient] Service asked to wait {:?} before polling", wait);
            tokio::time::sleep(wait).await;
        }

        let result = self.poll(&submission.operation_url).await?;

        tracing::debug!(
            "[AzureClient] Analysis finished: {} document(s)",
            result.documents.len()
        );
        Ok(result)
    }
}

/// Turn a non-2xx response into a `Service` error with the best message available
async fn check_status(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    Err(AnalyzerError::Service {
        status: status.as_u16(),
        message: service_message(&body),
    })
}

fn service_message(body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
        return envelope.error.describe();
    }
    if body.trim().is_empty() {
        "Invalid key or endpoint?".to_string()
    } else {
        body.trim().to_string()
    }
}

fn operation_location(headers: &HeaderMap) -> Option<String> {
    headers
        .get(OPERATION_LOCATION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}

/// Retry-After in seconds, clamped to `MAX_RETRY_AFTER`
fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(|secs| Duration::from_secs(secs).min(MAX_RETRY_AFTER))
}
