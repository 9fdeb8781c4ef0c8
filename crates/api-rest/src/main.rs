//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the REST API server on its own.
//!
//! ## Intended use
//! This binary is useful for development and debugging when you only want the REST server (with
//! OpenAPI/Swagger UI). The workspace's main `tcm-run` binary runs both gRPC and REST concurrently.

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{router, AppState};
use api_shared::{CdssService, ServerConfig};

/// Main entry point for the TCM CDSS REST API server
///
/// # Environment Variables
/// - `TCM_REST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `TCM_KNOWLEDGE_BASE`: YAML knowledge base to load instead of the built-in one
/// - `TCM_MATCH_THRESHOLD`, `TCM_MIN_SCORE`, `TCM_MAX_RESULTS`: engine tuning
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the configuration or knowledge base is invalid,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tcm_core=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = ServerConfig::from_env()?;
    let cdss = CdssService::new(Arc::new(cfg.build_engine()?));

    tracing::info!("-- Starting TCM CDSS REST API on {}", cfg.rest_addr);

    let app = router(AppState::new(cdss));
    let listener = tokio::net::TcpListener::bind(cfg.rest_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
