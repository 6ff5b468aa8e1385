use crate::config::GatewayConfig;
use crate::utils::error::{GatewayError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Optional TOML layer. Every key is optional; absent keys keep the lower layer's value.
///
/// ```toml
/// [server]
/// port = 8080
/// frontend_dir = "./dist"
///
/// [backend]
/// url = "${OLLAMA_HOST_URL}"
/// model = "llama3.2:1b"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub server: Option<ServerSection>,
    pub backend: Option<BackendSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub frontend_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BackendSection {
    pub url: Option<String>,
    pub model: Option<String>,
    pub binary: Option<String>,
    pub spawn: Option<bool>,
    pub pull_on_startup: Option<bool>,
    pub ready_timeout_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
}

impl FileConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| GatewayError::ConfigError {
            message: format!("Cannot read {}: {}", path.as_ref().display(), e),
        })?;
        Self::from_str(&content)
    }

    pub fn from_str(content: &str) -> Result<Self> {
        let processed = substitute_env_vars(content);
        Ok(toml::from_str(&processed)?)
    }

    pub fn apply(&self, config: &mut GatewayConfig) {
        if let Some(server) = &self.server {
            if let Some(host) = &server.host {
                config.host = host.clone();
            }
            if let Some(port) = server.port {
                config.port = port;
            }
            if let Some(dir) = &server.frontend_dir {
                config.frontend_dir = dir.clone();
            }
        }

        if let Some(backend) = &self.backend {
            if let Some(url) = &backend.url {
                config.ollama_url = url.clone();
            }
            if let Some(model) = &backend.model {
                config.model = model.clone();
            }
            if let Some(binary) = &backend.binary {
                config.ollama_bin = binary.clone();
            }
            if let Some(spawn) = backend.spawn {
                config.spawn_backend = spawn;
            }
            if let Some(pull) = backend.pull_on_startup {
                config.pull_on_startup = pull;
            }
            if let Some(secs) = backend.ready_timeout_secs {
                config.ready_timeout_secs = secs;
            }
            if let Some(secs) = backend.request_timeout_secs {
                config.request_timeout_secs = secs;
            }
        }
    }
}

/// Replaces `${VAR}` with the variable's value; unset variables are left as written.
fn substitute_env_vars(content: &str) -> String {
    static ENV_REF: OnceLock<Regex> = OnceLock::new();
    let re = ENV_REF.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid regex"));

    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    })
    .into_owned()
}
