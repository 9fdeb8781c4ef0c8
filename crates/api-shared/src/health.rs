use crate::pb::HealthRes;

/// Simple health service that can be used by both gRPC and REST APIs.
#[derive(Clone, Default)]
pub struct HealthService;

impl HealthService {
    /// Check health without creating an instance.
    pub fn check_health() -> HealthRes {
        HealthRes {
            ok: true,
            message: "TCM CDSS is alive".into(),
        }
    }
}
