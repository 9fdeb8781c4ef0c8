use std::sync::Arc;
use tonic::transport::Server;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_grpc::cdss_server;
use api_rest::{AppState, router};
use api_shared::{CdssService, ServerConfig};

/// Main entry point for the TCM CDSS application
///
/// Starts both gRPC and REST servers concurrently over one shared scoring engine:
/// - gRPC server on port 50051 (configurable via TCM_GRPC_ADDR)
/// - REST server on port 3000 (configurable via TCM_REST_ADDR)
///
/// The gRPC server checks the x-api-key header only when TCM_API_KEY is set.
/// The REST server provides open access with Swagger UI at `/swagger-ui`.
///
/// # Environment Variables
/// - `TCM_GRPC_ADDR`: gRPC server address (default: "0.0.0.0:50051")
/// - `TCM_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `TCM_KNOWLEDGE_BASE`: YAML knowledge base to load instead of the built-in one
/// - `TCM_MATCH_THRESHOLD`, `TCM_MIN_SCORE`, `TCM_MAX_RESULTS`: engine tuning
/// - `TCM_API_KEY`: optional API key for gRPC; unset leaves gRPC open
///
/// # Returns
/// * `Ok(())` - If servers start and run successfully
/// * `Err(anyhow::Error)` - If configuration, server startup or runtime fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tcm_core=info".parse()?)
                .add_directive("tcm_run=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = ServerConfig::from_env()?;
    let cdss = CdssService::new(Arc::new(cfg.build_engine()?));

    tracing::info!("++ Starting TCM CDSS gRPC on {}", cfg.grpc_addr);
    tracing::info!("++ Starting TCM CDSS REST on {}", cfg.rest_addr);

    let rest_app = router(AppState::new(cdss.clone()));
    let listener = tokio::net::TcpListener::bind(cfg.rest_addr).await?;
    let rest_server = tokio::spawn(async move { axum::serve(listener, rest_app).await });

    let grpc_server = Server::builder()
        .add_service(cdss_server(cdss, cfg.api_key.clone()))
        .serve(cfg.grpc_addr);

    let (rest_result, grpc_result) = tokio::join!(rest_server, grpc_server);
    if let Err(e) = &grpc_result {
        tracing::error!("gRPC server failed: {e}");
    }
    rest_result??;
    grpc_result?;

    Ok(())
}
