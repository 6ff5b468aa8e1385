//! Axum front door: API routes, optional frontend bundle, graceful shutdown.

use crate::config::GatewayConfig;
use crate::core::gateway::GatewayService;
use crate::domain::model::{AskRequest, AskResponse, GenerateRequest, HealthResponse};
use crate::utils::error::{GatewayError, Result};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub type AppState = Arc<GatewayService>;

/// Builds the application router.
///
/// When `frontend_dir` points at an existing directory its files are served for
/// every path the API does not claim, with `/` resolving to `index.html`.
pub fn router(service: AppState, frontend_dir: Option<&Path>) -> Router {
    let api = Router::new()
        .route("/health", get(health))
        .route("/generate", post(generate))
        .route("/ask", post(ask))
        .with_state(service);

    let app = match frontend_dir.filter(|dir| dir.is_dir()) {
        Some(dir) => {
            tracing::info!("Serving frontend bundle from {}", dir.display());
            api.fallback_service(ServeDir::new(dir))
        }
        None => {
            tracing::debug!("No frontend bundle found, static files disabled");
            api
        }
    };

    app.layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn health(State(service): State<AppState>) -> Json<HealthResponse> {
    Json(service.health())
}

async fn generate(
    State(service): State<AppState>,
    payload: std::result::Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>> {
    let Json(request) = payload.map_err(rejected)?;
    Ok(Json(service.generate(request).await?))
}

async fn ask(
    State(service): State<AppState>,
    payload: std::result::Result<Json<AskRequest>, JsonRejection>,
) -> Result<Json<AskResponse>> {
    let Json(request) = payload.map_err(rejected)?;
    Ok(Json(service.ask(request).await?))
}

fn rejected(rejection: JsonRejection) -> GatewayError {
    GatewayError::InvalidRequestError {
        status: rejection.status().as_u16(),
        message: rejection.body_text(),
    }
}

/// Binds the listener and serves until Ctrl-C or SIGTERM.
pub async fn serve(config: &GatewayConfig, service: AppState) -> Result<()> {
    let listener = TcpListener::bind(config.listen_addr()?).await?;
    tracing::info!(
        "🚀 Gateway listening on http://{} (model {}, backend {})",
        listener.local_addr()?,
        config.model,
        config.backend_base_url()
    );

    let app = router(service, Some(&config.frontend_dir));
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl-C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
