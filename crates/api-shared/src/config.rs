//! Server startup configuration.
//!
//! Resolved once in `main` and passed down; request handlers never read the environment.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tcm_core::{
    engine_config_from_env_values, resolve_knowledge_base_path, CdssError, CdssResult,
    EngineConfig, KnowledgeBase, ScoringEngine,
};

pub const DEFAULT_GRPC_ADDR: &str = "0.0.0.0:50051";
pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:3000";

/// Everything the server binaries need to start.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// `None` selects the built-in knowledge base.
    pub knowledge_base: Option<PathBuf>,
    pub engine: EngineConfig,
    pub grpc_addr: SocketAddr,
    pub rest_addr: SocketAddr,
    /// Key expected in the gRPC `x-api-key` header.
    pub api_key: Option<String>,
    pub enable_reflection: bool,
}

impl ServerConfig {
    /// Read the `TCM_*` environment variables.
    pub fn from_env() -> CdssResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key/value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> CdssResult<Self> {
        Ok(Self {
            knowledge_base: resolve_knowledge_base_path(lookup("TCM_KNOWLEDGE_BASE"))?,
            engine: engine_config_from_env_values(
                lookup("TCM_MATCH_THRESHOLD"),
                lookup("TCM_MIN_SCORE"),
                lookup("TCM_MAX_RESULTS"),
            )?,
            grpc_addr: addr_from_env_value(lookup("TCM_GRPC_ADDR"), DEFAULT_GRPC_ADDR)?,
            rest_addr: addr_from_env_value(lookup("TCM_REST_ADDR"), DEFAULT_REST_ADDR)?,
            api_key: lookup("TCM_API_KEY").filter(|k| !k.trim().is_empty()),
            enable_reflection: flag_from_env_value(lookup("TCM_ENABLE_REFLECTION")),
        })
    }

    /// Load the knowledge base and build the engine.
    pub fn build_engine(&self) -> CdssResult<ScoringEngine> {
        let kb = KnowledgeBase::load_or_builtin(self.knowledge_base.as_deref())?;
        tracing::info!(
            "knowledge base '{}' v{} ready with {} syndromes",
            kb.metadata().db_name,
            kb.metadata().version,
            kb.len()
        );
        Ok(ScoringEngine::new(Arc::new(kb), self.engine.clone()))
    }
}

fn addr_from_env_value(value: Option<String>, default: &str) -> CdssResult<SocketAddr> {
    let raw = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string());

    raw.parse()
        .map_err(|e| CdssError::InvalidInput(format!("invalid socket address '{raw}': {e}")))
}

fn flag_from_env_value(value: Option<String>) -> bool {
    value
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(false)
}
