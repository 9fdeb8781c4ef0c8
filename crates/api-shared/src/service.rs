//! Transport-independent CDSS operations shared by the gRPC and REST servers.

use crate::convert;
use crate::pb;
use std::sync::Arc;
use tcm_core::ScoringEngine;

/// Shared handle on the scoring engine.
///
/// Cloning is cheap; every request maps to one independent engine call.
#[derive(Clone, Debug)]
pub struct CdssService {
    engine: Arc<ScoringEngine>,
}

impl CdssService {
    pub fn new(engine: Arc<ScoringEngine>) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    /// Score the observation in `req` and wrap the ranked results in a response envelope.
    pub fn analyze(&self, req: pb::AnalyzeReq) -> pb::AnalyzeRes {
        let observation = convert::observation_from_pb(req);
        let results = self.engine.analyze(&observation);
        let res = convert::analyze_response(&results);

        tracing::info!(
            "analysis {} returned {} syndrome(s)",
            res.analysis_id,
            res.results.len()
        );
        res
    }

    /// Every syndrome of the knowledge base, in catalog order.
    pub fn list_syndromes(&self) -> pb::ListSyndromesRes {
        pb::ListSyndromesRes {
            syndromes: self
                .engine
                .knowledge_base()
                .syndromes()
                .iter()
                .map(Into::into)
                .collect(),
        }
    }

    /// Unscored profile of one syndrome, or `None` if the id is unknown.
    pub fn get_syndrome(&self, id: &str) -> Option<pb::SyndromeDetailRes> {
        self.engine
            .profile(id.trim())
            .map(|profile| convert::syndrome_detail(&profile))
    }
}
