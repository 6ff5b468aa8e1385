#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::utils::error::{GatewayError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

pub use toml_config::FileConfig;

/// Environment variable naming an optional TOML config file.
pub const CONFIG_FILE_ENV: &str = "GATEWAY_CONFIG";

/// Process-wide settings, read once at startup and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    pub ollama_url: String,
    pub model: String,
    pub frontend_dir: PathBuf,
    pub ollama_bin: String,
    pub spawn_backend: bool,
    pub pull_on_startup: bool,
    pub ready_timeout_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            ollama_url: "http://127.0.0.1:11434".to_string(),
            model: "llama3.2:1b".to_string(),
            frontend_dir: PathBuf::from("dist"),
            ollama_bin: "ollama".to_string(),
            spawn_backend: true,
            pull_on_startup: true,
            ready_timeout_secs: 60,
            request_timeout_secs: 180,
        }
    }
}

impl GatewayConfig {
    /// Defaults, then the optional TOML file, then environment variables.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        Self::load_with(file, |key| std::env::var(key).ok())
    }

    /// Same layering as [`GatewayConfig::load`], reading variables through `lookup`.
    pub fn load_with<F>(file: Option<&Path>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        let file = file
            .map(Path::to_path_buf)
            .or_else(|| lookup(CONFIG_FILE_ENV).map(PathBuf::from));
        if let Some(path) = file {
            tracing::debug!("Loading config file {}", path.display());
            FileConfig::from_file(&path)?.apply(&mut config);
        }

        config.apply_env_with(lookup)?;
        Ok(config)
    }

    /// Overlays whatever `lookup` returns for the recognised variable names.
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("GATEWAY_HOST") {
            self.host = v;
        }
        if let Some(v) = lookup("PORT") {
            self.port = parse_env("PORT", &v)?;
        }
        if let Some(v) = lookup("OLLAMA_URL") {
            self.ollama_url = v;
        }
        if let Some(v) = lookup("MODEL") {
            self.model = v;
        }
        if let Some(v) = lookup("FRONTEND_DIR") {
            self.frontend_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("OLLAMA_BIN") {
            self.ollama_bin = v;
        }
        if let Some(v) = lookup("SPAWN_BACKEND") {
            self.spawn_backend = parse_bool("SPAWN_BACKEND", &v)?;
        }
        if let Some(v) = lookup("PULL_MODEL") {
            self.pull_on_startup = parse_bool("PULL_MODEL", &v)?;
        }
        if let Some(v) = lookup("READY_TIMEOUT_SECS") {
            self.ready_timeout_secs = parse_env("READY_TIMEOUT_SECS", &v)?;
        }
        if let Some(v) = lookup("REQUEST_TIMEOUT_SECS") {
            self.request_timeout_secs = parse_env("REQUEST_TIMEOUT_SECS", &v)?;
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| GatewayError::InvalidConfigValueError {
                field: "host".to_string(),
                value: self.host.clone(),
                reason: format!("Not a valid listen address: {}", e),
            })
    }

    /// `ollama_url` without a trailing slash, ready for path joining.
    pub fn backend_base_url(&self) -> &str {
        self.ollama_url.trim_end_matches('/')
    }

    pub fn ready_timeout(&self) -> Duration {
        Duration::from_secs(self.ready_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn parse_env<T>(field: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| GatewayError::InvalidConfigValueError {
            field: field.to_string(),
            value: value.to_string(),
            reason: e.to_string(),
        })
}

fn parse_bool(field: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(GatewayError::InvalidConfigValueError {
            field: field.to_string(),
            value: value.to_string(),
            reason: "Expected true/false".to_string(),
        }),
    }
}

impl Validate for GatewayConfig {
    fn validate(&self) -> Result<()> {
        use crate::utils::validation::*;

        validate_url("ollama_url", &self.ollama_url)?;
        validate_non_empty_string("model", &self.model)?;
        validate_non_empty_string("ollama_bin", &self.ollama_bin)?;
        validate_non_empty_string("host", &self.host)?;
        validate_positive_number("port", u64::from(self.port), 1)?;
        validate_path("frontend_dir", &self.frontend_dir.to_string_lossy())?;
        validate_range("ready_timeout_secs", self.ready_timeout_secs, 1, 3600)?;
        validate_range("request_timeout_secs", self.request_timeout_secs, 1, 3600)?;
        self.listen_addr()?;

        tracing::debug!("Gateway configuration validation passed");
        Ok(())
    }
}
