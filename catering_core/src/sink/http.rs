//! Forwards submissions as JSON to an external endpoint

use super::{SinkError, Submission, SubmissionReceipt, SubmissionSink};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

pub const SUBMISSION_ID_HEADER: &str = "x-submission-id";

#[derive(Debug, Clone)]
pub struct HttpSink {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpSink {
    pub fn new(endpoint: &str, timeout_seconds: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SubmissionSink for HttpSink {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn send(&self, submission: &Submission) -> std::result::Result<SubmissionReceipt, SinkError> {
        let receipt = SubmissionReceipt::new();

        let resp = self
            .client
            .post(&self.endpoint)
            .header(SUBMISSION_ID_HEADER, receipt.id.to_string())
            .json(submission)
            .send()
            .await
            .map_err(|e| SinkError::Unavailable(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SinkError::Rejected {
                status: status.as_u16(),
            });
        }

        debug!(endpoint = %self.endpoint, status = status.as_u16(), "submission forwarded");
        Ok(receipt)
    }
}
