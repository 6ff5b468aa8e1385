use crate::domain::model::{
    AskRequest, AskResponse, GenerateRequest, HealthResponse, UpstreamGenerateRequest,
};
use crate::domain::ports::InferenceBackend;
use crate::utils::error::Result;
use std::sync::Arc;

/// Request handling behind the HTTP routes. Holds no mutable state.
pub struct GatewayService {
    backend: Arc<dyn InferenceBackend>,
    model: String,
}

impl GatewayService {
    pub fn new(backend: Arc<dyn InferenceBackend>, model: impl Into<String>) -> Self {
        Self {
            backend,
            model: model.into(),
        }
    }

    pub fn health(&self) -> HealthResponse {
        HealthResponse {
            ok: true,
            model: self.model.clone(),
        }
    }

    /// Forwards the prompt and returns the backend's JSON untouched.
    pub async fn generate(&self, request: GenerateRequest) -> Result<serde_json::Value> {
        let upstream =
            UpstreamGenerateRequest::new(&self.model, request.prompt, request.temperature);
        self.backend.generate(&upstream).await
    }

    pub async fn ask(&self, request: AskRequest) -> Result<AskResponse> {
        let upstream =
            UpstreamGenerateRequest::new(&self.model, request.question, request.temperature);
        let data = self.backend.generate(&upstream).await?;

        // only a textual `response` counts as an answer; anything else reads as empty
        let answer = data
            .get("response")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();

        Ok(AskResponse {
            answer,
            model: self.model.clone(),
        })
    }
}
