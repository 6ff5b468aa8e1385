use crate::config::GatewayConfig;
use crate::utils::error::Result;
use clap::Parser;
use std::path::PathBuf;

/// Command-line flags. Anything given here wins over the config file and the environment.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "llm-gateway")]
#[command(about = "HTTP gateway in front of a local Ollama server")]
pub struct CliArgs {
    #[arg(long, help = "TOML config file (also GATEWAY_CONFIG)")]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub host: Option<String>,

    #[arg(long)]
    pub port: Option<u16>,

    #[arg(long)]
    pub ollama_url: Option<String>,

    #[arg(long)]
    pub model: Option<String>,

    #[arg(long, help = "Directory holding the prebuilt frontend bundle")]
    pub frontend_dir: Option<PathBuf>,

    #[arg(long, help = "Do not launch `ollama serve`; assume it is already running")]
    pub no_spawn: bool,

    #[arg(long, help = "Skip `ollama pull` at startup")]
    pub no_pull: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

impl CliArgs {
    pub fn resolve(&self) -> Result<GatewayConfig> {
        let mut config = GatewayConfig::load(self.config.as_deref())?;
        self.apply(&mut config);
        Ok(config)
    }

    pub fn apply(&self, config: &mut GatewayConfig) {
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(url) = &self.ollama_url {
            config.ollama_url = url.clone();
        }
        if let Some(model) = &self.model {
            config.model = model.clone();
        }
        if let Some(dir) = &self.frontend_dir {
            config.frontend_dir = dir.clone();
        }
        if self.no_spawn {
            config.spawn_backend = false;
        }
        if self.no_pull {
            config.pull_on_startup = false;
        }
    }
}
