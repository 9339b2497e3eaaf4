//! HTTP relay client.
//!
//! Talks to a Lookout relay (or any server speaking the same contract):
//! - `POST {base}/api/find-object` for the search loop
//! - `POST {base}/api/analyze` for single-shot questions
//! - `GET  {base}/api/test` for health checks
//!
//! Each call carries its own timeout; an expired timeout is reported as
//! [`RecognitionError::Timeout`] so callers can treat it like any other
//! cycle failure.

use std::time::Duration;

use async_trait::async_trait;
use lookout_core::capture::CaptureResult;
use lookout_core::error::RecognitionError;
use lookout_core::recognizer::{Analyzer, RecognitionOutcome, Recognizer};
use lookout_core::relay::{
    ANALYZE_PATH, AnalyzeRequest, AnalyzeResponse, ErrorResponse, FIND_OBJECT_PATH,
    FindObjectRequest, FindObjectResponse, PROBE_PATH, ProbeResponse,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// A Recognizer and Analyzer backed by the relay HTTP API.
pub struct HttpRelay {
    base_url: String,
    client: reqwest::Client,
    find_timeout: Duration,
    analyze_timeout: Duration,
}

impl HttpRelay {
    /// Create a client with the default budgets (10s find, 20s analyze).
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
            find_timeout: Duration::from_secs(10),
            analyze_timeout: Duration::from_secs(20),
        }
    }

    /// Build from the `[relay]` config section.
    pub fn from_config(config: &lookout_config::RelayConfig) -> Self {
        Self::new(&config.base_url).with_timeouts(config.find_timeout(), config.analyze_timeout())
    }

    /// Override the per-call timeouts.
    pub fn with_timeouts(mut self, find: Duration, analyze: Duration) -> Self {
        self.find_timeout = find;
        self.analyze_timeout = analyze;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Probe `/api/test`. Returns the relay's message on success.
    pub async fn health_check(&self) -> Result<String, RecognitionError> {
        let url = format!("{}{}", self.base_url, PROBE_PATH);
        let timeout = self.find_timeout;

        let response = self
            .client
            .get(&url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| transport_error(e, timeout))?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            return Err(RecognitionError::Rejected {
                status_code: status,
                message: "health probe failed".into(),
            });
        }

        let probe: ProbeResponse = response
            .json()
            .await
            .map_err(|e| body_error(e, timeout))?;
        Ok(probe.message)
    }

    /// POST a JSON body and decode the 2xx response, mapping every failure
    /// into a `RecognitionError`.
    async fn post_json<B, R>(&self, path: &str, body: &B, timeout: Duration) -> Result<R, RecognitionError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .timeout(timeout)
            .json(body)
            .send()
            .await
            .map_err(|e| transport_error(e, timeout))?;

        let status = response.status().as_u16();

        if !response.status().is_success() {
            let error_body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&error_body)
                .map(|e| e.error)
                .unwrap_or(error_body);
            warn!(status, path, message = %message, "Relay returned error");
            return Err(RecognitionError::Rejected {
                status_code: status,
                message,
            });
        }

        response.json().await.map_err(|e| body_error(e, timeout))
    }
}

fn transport_error(e: reqwest::Error, timeout: Duration) -> RecognitionError {
    if e.is_timeout() {
        RecognitionError::Timeout {
            timeout_ms: timeout.as_millis() as u64,
        }
    } else {
        RecognitionError::Network(e.to_string())
    }
}

fn body_error(e: reqwest::Error, timeout: Duration) -> RecognitionError {
    if e.is_timeout() {
        RecognitionError::Timeout {
            timeout_ms: timeout.as_millis() as u64,
        }
    } else {
        RecognitionError::Protocol(format!("Failed to parse response: {e}"))
    }
}

#[async_trait]
impl Recognizer for HttpRelay {
    fn name(&self) -> &str {
        "relay"
    }

    async fn recognize(
        &self,
        image: &CaptureResult,
        target: &str,
    ) -> Result<RecognitionOutcome, RecognitionError> {
        let request = FindObjectRequest {
            image: image.to_base64(),
            object_name: target.to_string(),
        };

        debug!(target, image_bytes = image.len(), "Sending find-object request");

        let response: FindObjectResponse = self
            .post_json(FIND_OBJECT_PATH, &request, self.find_timeout)
            .await?;

        if !response.success {
            return Err(RecognitionError::Rejected {
                status_code: 200,
                message: response
                    .error
                    .unwrap_or_else(|| "relay reported failure".into()),
            });
        }

        Ok(RecognitionOutcome {
            found: response.found,
            guidance: response.guidance,
        })
    }
}

#[async_trait]
impl Analyzer for HttpRelay {
    fn name(&self) -> &str {
        "relay"
    }

    async fn analyze(&self, image: &CaptureResult, question: &str) -> Result<String, RecognitionError> {
        let request = AnalyzeRequest {
            image: image.to_base64(),
            question: question.to_string(),
        };

        debug!(image_bytes = image.len(), "Sending analyze request");

        let response: AnalyzeResponse = self
            .post_json(ANALYZE_PATH, &request, self.analyze_timeout)
            .await?;

        if !response.success {
            return Err(RecognitionError::Rejected {
                status_code: 200,
                message: response
                    .error
                    .unwrap_or_else(|| "Analysis failed".into()),
            });
        }

        Ok(response.answer)
    }
}
