//! # API REST
//!
//! REST API implementation for the TCM decision-support service.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS)
//!
//! Uses `api-shared` for common types and utilities.

#![warn(rust_2018_idioms)]

use api_shared::pb;
use api_shared::{CdssService, HealthService};
use axum::{
    extract::{Path as AxumPath, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Application state shared across REST API handlers.
#[derive(Clone)]
pub struct AppState {
    cdss: CdssService,
}

impl AppState {
    pub fn new(cdss: CdssService) -> Self {
        Self { cdss }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(health, analyze, list_syndromes, get_syndrome),
    components(schemas(
        pb::HealthRes,
        pb::AnalyzeReq,
        pb::AnalyzeRes,
        pb::TongueObservation,
        pb::PulseObservation,
        pb::ScoredSyndrome,
        pb::RxPoint,
        pb::WuxingRelationship,
        pb::HerbalRecommendation,
        pb::ListSyndromesRes,
        pb::SyndromeSummary,
        pb::SyndromeDetailRes,
    ))
)]
pub struct ApiDoc;

/// Build the REST router with Swagger UI and permissive CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/analyze", post(analyze))
        .route("/syndromes", get(list_syndromes))
        .route("/syndromes/:id", get(get_syndrome))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = pb::HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Used for monitoring and load balancer health checks.
async fn health() -> Json<pb::HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    post,
    path = "/analyze",
    request_body = pb::AnalyzeReq,
    responses(
        (status = 200, description = "Ranked differential diagnosis", body = pb::AnalyzeRes),
        (status = 400, description = "Malformed JSON"),
        (status = 422, description = "Body does not match the request schema")
    )
)]
/// Rank the knowledge-base syndromes against one patient observation
///
/// Every field of the request is optional. An empty `results` list means no syndrome matched
/// strongly enough; it is not an error.
#[axum::debug_handler]
async fn analyze(
    State(state): State<AppState>,
    Json(req): Json<pb::AnalyzeReq>,
) -> Json<pb::AnalyzeRes> {
    Json(state.cdss.analyze(req))
}

#[utoipa::path(
    get,
    path = "/syndromes",
    responses(
        (status = 200, description = "Syndromes in catalog order", body = pb::ListSyndromesRes)
    )
)]
/// List every syndrome of the loaded knowledge base
#[axum::debug_handler]
async fn list_syndromes(State(state): State<AppState>) -> Json<pb::ListSyndromesRes> {
    Json(state.cdss.list_syndromes())
}

#[utoipa::path(
    get,
    path = "/syndromes/{id}",
    params(
        ("id" = String, Path, description = "Syndrome id, e.g. HEART_FIRE_BLAZING")
    ),
    responses(
        (status = 200, description = "Syndrome profile", body = pb::SyndromeDetailRes),
        (status = 404, description = "Syndrome not found")
    )
)]
/// Full profile of one syndrome, without scoring
///
/// # Errors
/// Returns `404 Not Found` if no syndrome has the given id.
#[axum::debug_handler]
async fn get_syndrome(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<pb::SyndromeDetailRes>, (StatusCode, &'static str)> {
    state
        .cdss
        .get_syndrome(&id)
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "Syndrome not found"))
}
