// Re-export the proto module from the shared `api-shared` crate so callers
// can reference `api_grpc::pb`.
pub use api_shared::pb;

use api_shared::auth;
use api_shared::pb::cdss_server::{Cdss, CdssServer};
use api_shared::pb::{
    AnalyzeReq, AnalyzeRes, GetSyndromeReq, HealthRes, ListSyndromesRes, SyndromeDetailRes,
};
use api_shared::{CdssService, HealthService};
use std::sync::Arc;
use tonic::codegen::InterceptedService;
use tonic::service::Interceptor;
use tonic::{Request, Response, Status};

/// Checks the `x-api-key` header of every request against the configured key, if any.
#[derive(Clone, Debug)]
pub struct ApiKeyInterceptor {
    expected: Option<Arc<str>>,
}

impl ApiKeyInterceptor {
    pub fn new(expected: Option<String>) -> Self {
        Self {
            expected: expected.map(Arc::from),
        }
    }
}

impl Interceptor for ApiKeyInterceptor {
    fn call(&mut self, req: Request<()>) -> Result<Request<()>, Status> {
        let api_key = req
            .metadata()
            .get("x-api-key")
            .and_then(|v| v.to_str().ok());

        auth::validate_api_key(api_key, self.expected.as_deref())?;
        Ok(req)
    }
}

/// The `Cdss` service behind the API-key interceptor, ready to add to a tonic server.
pub fn cdss_server(
    cdss: CdssService,
    api_key: Option<String>,
) -> InterceptedService<CdssServer<CdssGrpcService>, ApiKeyInterceptor> {
    CdssServer::with_interceptor(CdssGrpcService::new(cdss), ApiKeyInterceptor::new(api_key))
}

#[derive(Clone, Debug)]
pub struct CdssGrpcService {
    cdss: CdssService,
}

impl CdssGrpcService {
    pub fn new(cdss: CdssService) -> Self {
        Self { cdss }
    }
}

#[tonic::async_trait]
impl Cdss for CdssGrpcService {
    async fn health(&self, _req: Request<()>) -> Result<Response<HealthRes>, Status> {
        Ok(Response::new(HealthService::check_health()))
    }

    async fn analyze(&self, req: Request<AnalyzeReq>) -> Result<Response<AnalyzeRes>, Status> {
        Ok(Response::new(self.cdss.analyze(req.into_inner())))
    }

    async fn list_syndromes(
        &self,
        _req: Request<()>,
    ) -> Result<Response<ListSyndromesRes>, Status> {
        Ok(Response::new(self.cdss.list_syndromes()))
    }

    async fn get_syndrome(
        &self,
        req: Request<GetSyndromeReq>,
    ) -> Result<Response<SyndromeDetailRes>, Status> {
        let id = req.into_inner().id;
        self.cdss
            .get_syndrome(&id)
            .map(Response::new)
            .ok_or_else(|| Status::not_found(format!("Syndrome not found: {id}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api_shared::pb::{PulseObservation, TongueObservation};
    use tcm_core::{EngineConfig, KnowledgeBase, ScoringEngine};
    use tonic::metadata::MetadataValue;

    fn service() -> CdssGrpcService {
        let kb = KnowledgeBase::builtin().expect("builtin");
        let engine = ScoringEngine::new(Arc::new(kb), EngineConfig::default());
        CdssGrpcService::new(CdssService::new(Arc::new(engine)))
    }

    fn request_with_key(key: &'static str) -> Request<()> {
        let mut req = Request::new(());
        req.metadata_mut()
            .insert("x-api-key", MetadataValue::from_static(key));
        req
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let res = service().health(Request::new(())).await.expect("health");
        assert!(res.into_inner().ok);
    }

    #[tokio::test]
    async fn analyze_ranks_cold_invasion_of_the_stomach() {
        let req = AnalyzeReq {
            symptoms: "vomiting clear fluids, epigastric pain better with warmth".into(),
            tongue: Some(TongueObservation {
                body_color: "Pale".into(),
                coating_color: "Thick white".into(),
                ..Default::default()
            }),
            pulse: Some(PulseObservation {
                qualities: vec!["Deep".into(), "Tight".into()],
            }),
            ..Default::default()
        };

        let res = service()
            .analyze(Request::new(req))
            .await
            .expect("analyze")
            .into_inner();
        assert_eq!(res.results[0].id, "COLD_INVADING_STOMACH");
        assert!(res.results.iter().all(|r| r.score > 15));
        assert!(res.results.len() <= 5);
    }

    #[tokio::test]
    async fn get_syndrome_returns_not_found_for_unknown_id() {
        let status = service()
            .get_syndrome(Request::new(GetSyndromeReq {
                id: "UNKNOWN".into(),
            }))
            .await
            .expect_err("should be not found");
        assert_eq!(status.code(), tonic::Code::NotFound);
    }

    #[tokio::test]
    async fn list_syndromes_returns_catalog() {
        let res = service()
            .list_syndromes(Request::new(()))
            .await
            .expect("list")
            .into_inner();
        assert!(res.syndromes.iter().any(|s| s.id == "LIVER_QI_STAGNATION"));
    }

    #[test]
    fn interceptor_checks_api_key() {
        let mut interceptor = ApiKeyInterceptor::new(Some("secret".into()));
        assert!(interceptor.call(request_with_key("secret")).is_ok());

        let status = interceptor
            .call(request_with_key("wrong"))
            .expect_err("wrong key");
        assert_eq!(status.code(), tonic::Code::Unauthenticated);

        let status = interceptor
            .call(Request::new(()))
            .expect_err("missing header");
        assert_eq!(status.code(), tonic::Code::Unauthenticated);
    }

    #[test]
    fn interceptor_without_configured_key_is_open() {
        let mut interceptor = ApiKeyInterceptor::new(None);
        assert!(interceptor.call(Request::new(())).is_ok());
        assert!(interceptor.call(request_with_key("whatever")).is_ok());
    }
}
