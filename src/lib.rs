pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliArgs;

pub use adapters::{OllamaCli, OllamaClient};
pub use app::server::{router, serve};
pub use config::GatewayConfig;
pub use crate::core::{
    bootstrap::{Bootstrap, BootstrapReport, Readiness},
    gateway::GatewayService,
};
pub use utils::error::{GatewayError, Result};
