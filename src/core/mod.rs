pub mod bootstrap;
pub mod gateway;

pub use crate::domain::model::{AskRequest, AskResponse, GenerateRequest, HealthResponse};
pub use crate::domain::ports::{BackendProcess, InferenceBackend};
pub use crate::utils::error::Result;
