use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Backend request failed: {0}")]
    BackendError(#[from] reqwest::Error),

    #[error("Backend returned {status}: {body}")]
    BackendStatusError { status: u16, body: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Config file parsing error: {0}")]
    ConfigParseError(#[from] toml::de::Error),

    #[error("Invalid request: {message}")]
    InvalidRequestError { status: u16, message: String },

    #[error("Failed to run `{command}`: {message}")]
    ProcessError { command: String, message: String },
}

pub type Result<T> = std::result::Result<T, GatewayError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Backend,
    Request,
    System,
}

impl GatewayError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            GatewayError::ConfigError { .. }
            | GatewayError::InvalidConfigValueError { .. }
            | GatewayError::ConfigParseError(_) => ErrorCategory::Configuration,
            GatewayError::BackendError(_)
            | GatewayError::BackendStatusError { .. }
            | GatewayError::ProcessError { .. } => ErrorCategory::Backend,
            GatewayError::InvalidRequestError { .. } => ErrorCategory::Request,
            GatewayError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => {
                "Check PORT, OLLAMA_URL, MODEL and the config file for typos"
            }
            ErrorCategory::Backend => {
                "Make sure Ollama is installed and reachable at OLLAMA_URL"
            }
            ErrorCategory::Request => "Fix the request body and try again",
            ErrorCategory::System => "Check that the listen address is free and permitted",
        }
    }

    /// HTTP status reported to gateway callers.
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::InvalidRequestError { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::UNPROCESSABLE_ENTITY)
            }
            GatewayError::BackendError(e) if e.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
            GatewayError::BackendError(_) | GatewayError::BackendStatusError { .. } => {
                StatusCode::BAD_GATEWAY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::warn!("request failed ({:?}): {}", self.category(), self);
        }
        let body = Json(serde_json::json!({ "detail": self.to_string() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_status_maps_to_bad_gateway() {
        let err = GatewayError::BackendStatusError {
            status: 500,
            body: "model not found".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.category(), ErrorCategory::Backend);
        assert!(err.to_string().contains("model not found"));
    }

    #[test]
    fn test_invalid_request_keeps_status() {
        let err = GatewayError::InvalidRequestError {
            status: 400,
            message: "bad json".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.category(), ErrorCategory::Request);
    }

    #[test]
    fn test_config_errors_are_internal() {
        let err = GatewayError::ConfigError {
            message: "Cannot read gateway.toml".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.category(), ErrorCategory::Configuration);
    }
}
