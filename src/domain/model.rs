use serde::{Deserialize, Serialize};

pub const DEFAULT_TEMPERATURE: f64 = 0.7;

fn default_temperature() -> Option<f64> {
    Some(DEFAULT_TEMPERATURE)
}

/// Body of `POST /generate`.
///
/// A missing `temperature` defaults to 0.7; an explicit `null` is kept as
/// `None` and leaves the choice to the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
    #[serde(default = "default_temperature")]
    pub temperature: Option<f64>,
}

/// Body of `POST /ask`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskRequest {
    pub question: String,
    #[serde(default = "default_temperature")]
    pub temperature: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
    pub model: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub model: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerateOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

/// Body sent to the backend's `/api/generate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpstreamGenerateRequest {
    pub model: String,
    pub prompt: String,
    pub stream: bool,
    pub options: GenerateOptions,
}

impl UpstreamGenerateRequest {
    /// Non-streaming request: the gateway relays a single JSON document.
    pub fn new(model: &str, prompt: String, temperature: Option<f64>) -> Self {
        Self {
            model: model.to_string(),
            prompt,
            stream: false,
            options: GenerateOptions { temperature },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_temperature_defaults() {
        let req: GenerateRequest = serde_json::from_str(r#"{"prompt":"hi"}"#).unwrap();
        assert_eq!(req.temperature, Some(DEFAULT_TEMPERATURE));
    }

    #[test]
    fn test_explicit_null_temperature_is_none() {
        let req: AskRequest =
            serde_json::from_str(r#"{"question":"hi","temperature":null}"#).unwrap();
        assert_eq!(req.temperature, None);
    }

    #[test]
    fn test_missing_question_is_rejected() {
        assert!(serde_json::from_str::<AskRequest>(r#"{"prompt":"hi"}"#).is_err());
    }

    #[test]
    fn test_upstream_body_shape() {
        let body = UpstreamGenerateRequest::new("llama3.2:1b", "hi".to_string(), Some(0.2));
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({
                "model": "llama3.2:1b",
                "prompt": "hi",
                "stream": false,
                "options": {"temperature": 0.2}
            })
        );

        let no_temp = UpstreamGenerateRequest::new("m", "hi".to_string(), None);
        assert_eq!(
            serde_json::to_value(&no_temp).unwrap()["options"],
            serde_json::json!({})
        );
    }
}
