//! Standalone gRPC server binary.
//!
//! The workspace's main `tcm-run` binary runs both gRPC and REST concurrently; this one serves
//! gRPC only and can expose server reflection.

use std::sync::Arc;
use tonic::transport::Server;
use tonic_reflection::server::Builder;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_grpc::cdss_server;
use api_shared::{CdssService, ServerConfig, FILE_DESCRIPTOR_SET};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tcm_core=info".parse()?)
                .add_directive("api_grpc=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = ServerConfig::from_env()?;
    let cdss = CdssService::new(Arc::new(cfg.build_engine()?));

    tracing::info!("-- Starting TCM CDSS gRPC on {}", cfg.grpc_addr);

    let mut server_builder =
        Server::builder().add_service(cdss_server(cdss, cfg.api_key.clone()));

    if cfg.enable_reflection {
        let reflection_service = Builder::configure()
            .register_encoded_file_descriptor_set(FILE_DESCRIPTOR_SET)
            .build_v1()?;
        server_builder = server_builder.add_service(reflection_service);
        tracing::info!("gRPC server reflection enabled");
    } else {
        tracing::info!("gRPC server reflection disabled");
    }

    server_builder.serve(cfg.grpc_addr).await?;

    Ok(())
}
