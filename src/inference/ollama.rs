use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use super::InferenceBackend;

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_warn};

const AVAILABILITY_TIMEOUT_SECS: u64 = 2;

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("cannot reach inference server at {0} (is `ollama serve` running?)")]
    Connection(String),

    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("inference server returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    Http(String),

    #[error("failed to decode response body: {0}")]
    Decode(String),
}

/// Request body for /api/generate
#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    images: Vec<String>,
    stream: bool,
}

/// Response body from /api/generate
#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

/// Ollama HTTP client bound to one model.
pub struct OllamaClient {
    base_url: String,
    model: String,
    client: reqwest::Client,
    timeout_secs: u64,
}

impl OllamaClient {
    pub fn new(base_url: &str, model: &str, timeout_secs: u64) -> Result<Self, InferenceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| InferenceError::Http(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            client,
            timeout_secs,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn try_generate(
        &self,
        prompt: &str,
        images: &[Vec<u8>],
    ) -> Result<String, InferenceError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            images: images.iter().map(|bytes| STANDARD.encode(bytes)).collect(),
            stream: false,
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InferenceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| InferenceError::Decode(e.to_string()))?;

        Ok(parsed.response)
    }

    fn classify(&self, err: reqwest::Error) -> InferenceError {
        if err.is_connect() {
            InferenceError::Connection(self.base_url.clone())
        } else if err.is_timeout() {
            InferenceError::Timeout(self.timeout_secs)
        } else {
            InferenceError::Http(err.to_string())
        }
    }
}

#[async_trait]
impl InferenceBackend for OllamaClient {
    async fn generate(&self, prompt: &str, images: &[Vec<u8>]) -> String {
        match self.try_generate(prompt, images).await {
            Ok(text) => {
                log_debug!("{} answered with {} chars", self.model, text.len());
                text
            }
            Err(err) => {
                log_warn!("{} generate failed: {err}", self.model);
                String::new()
            }
        }
    }

    async fn is_available(&self) -> bool {
        self.client
            .get(format!("{}/api/tags", self.base_url))
            .timeout(Duration::from_secs(AVAILABILITY_TIMEOUT_SECS))
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }
}
