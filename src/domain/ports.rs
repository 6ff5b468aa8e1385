use crate::domain::model::UpstreamGenerateRequest;
use crate::utils::error::Result;
use async_trait::async_trait;

/// HTTP API of the inference engine.
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    /// One readiness probe. Any error counts as "not ready".
    async fn is_ready(&self) -> bool;

    /// Returns the backend's JSON reply unchanged. A non-success status is an error.
    async fn generate(&self, request: &UpstreamGenerateRequest) -> Result<serde_json::Value>;
}

/// Local command-line control of the inference engine.
#[async_trait]
pub trait BackendProcess: Send + Sync {
    /// Starts the engine detached. The child is not tracked afterwards.
    fn launch(&self) -> Result<()>;

    /// Downloads `model` and waits for the command to finish.
    async fn pull_model(&self, model: &str) -> Result<()>;
}
