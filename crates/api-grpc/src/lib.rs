//! # API gRPC
//!
//! gRPC server implementation for the TCM decision-support service.
//!
//! Handles:
//! - gRPC service setup and API-key authentication
//! - Service implementations delegating to the shared `CdssService`
//! - gRPC-specific concerns (interceptors, tonic integration)
//!
//! Uses `api-shared` for common types and utilities.

#![warn(rust_2018_idioms)]

pub use service::{cdss_server, pb, ApiKeyInterceptor, CdssGrpcService};

pub mod service;
