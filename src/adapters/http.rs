use crate::config::GatewayConfig;
use crate::domain::model::UpstreamGenerateRequest;
use crate::domain::ports::InferenceBackend;
use crate::utils::error::{GatewayError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Upper bound for a single readiness probe.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Talks to Ollama's REST API.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
    request_timeout: Duration,
}

impl OllamaClient {
    pub fn new(base_url: &str, request_timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            request_timeout,
        }
    }

    pub fn from_config(config: &GatewayConfig) -> Self {
        Self::new(config.backend_base_url(), config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl InferenceBackend for OllamaClient {
    async fn is_ready(&self) -> bool {
        let url = self.endpoint("/api/tags");
        match self.client.get(&url).timeout(PROBE_TIMEOUT).send().await {
            Ok(response) => {
                tracing::debug!("Readiness probe {} -> {}", url, response.status());
                response.status() == StatusCode::OK
            }
            Err(e) => {
                tracing::debug!("Readiness probe {} failed: {}", url, e);
                false
            }
        }
    }

    async fn generate(&self, request: &UpstreamGenerateRequest) -> Result<serde_json::Value> {
        let url = self.endpoint("/api/generate");
        tracing::debug!("Forwarding generation for model {} to {}", request.model, url);

        let response = self
            .client
            .post(&url)
            .timeout(self.request_timeout)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::BackendStatusError {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }
}
