//! # API Shared
//!
//! Shared utilities and definitions for the TCM decision-support APIs.
//!
//! Contains:
//! - Protobuf-generated types (`pb` module)
//! - Shared services like `HealthService` and `CdssService`
//! - Conversions between engine results and wire messages
//! - Authentication utilities (usable by both gRPC and REST)
//! - Startup configuration shared by the server binaries
//!
//! Used by `api-grpc` and `api-rest` for common functionality.

// Re-export the generated protobuf module. The generated code will be placed
// into OUT_DIR at build time by the build script.
pub mod pb {
    tonic::include_proto!("tcm.v1");
}

pub mod auth;
pub mod config;
pub mod convert;
pub mod health;
pub mod service;

pub const FILE_DESCRIPTOR_SET: &[u8] = tonic::include_file_descriptor_set!("proto_descriptor");

pub use config::ServerConfig;
pub use health::HealthService;
pub use service::CdssService;
