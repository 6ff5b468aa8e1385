use anyhow::Context;
use clap::Parser;
use llm_gateway::core::{BackendProcess, InferenceBackend};
use llm_gateway::utils::{logger, validation::Validate};
use llm_gateway::{
    Bootstrap, CliArgs, GatewayConfig, GatewayError, GatewayService, OllamaCli, OllamaClient,
};
use std::sync::Arc;

fn report(e: &GatewayError) {
    tracing::error!("❌ {} (Category: {:?})", e, e.category());
    tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
}

fn load_config(args: &CliArgs) -> llm_gateway::Result<GatewayConfig> {
    let config = args.resolve()?;
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    logger::init_logger(args.verbose, args.json_logs);
    tracing::info!("Starting llm-gateway");

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            report(&e);
            return Err(e).context("invalid configuration");
        }
    };
    tracing::debug!("Gateway config: {:?}", config);

    let backend: Arc<dyn InferenceBackend> = Arc::new(OllamaClient::from_config(&config));
    let process: Arc<dyn BackendProcess> = Arc::new(OllamaCli::new(config.ollama_bin.clone()));

    // Requests are accepted while this runs; /generate fails until the backend is up.
    Bootstrap::new(&config, backend.clone(), process).spawn();

    let service = Arc::new(GatewayService::new(backend, config.model.clone()));
    if let Err(e) = llm_gateway::serve(&config, service).await {
        report(&e);
        return Err(e).context("gateway server failed");
    }

    Ok(())
}
