//! Conversions between engine results and wire messages.

use crate::pb;
use tcm_core::{
    HerbalRecommendation, PatientObservation, PulseObservation, RxPoint, ScoredSyndrome, Syndrome,
    TongueObservation, WuxingRelationship,
};

/// Display ceiling for `confidence_percent`.
pub const MAX_CONFIDENCE_PERCENT: u32 = 100;

/// Raw scores are unbounded; the wire reports them capped for display.
pub fn confidence_percent(score: u32) -> u32 {
    score.min(MAX_CONFIDENCE_PERCENT)
}

/// Build the engine input from an analysis request. Missing sub-messages become empty.
pub fn observation_from_pb(req: pb::AnalyzeReq) -> PatientObservation {
    let tongue = req.tongue.unwrap_or_default();
    let pulse = req.pulse.unwrap_or_default();

    PatientObservation {
        symptoms: req.symptoms,
        selected_symptoms: req.selected_symptoms,
        tongue: TongueObservation {
            body_color: tongue.body_color,
            coating_color: tongue.coating_color,
            coating_quality: tongue.coating_quality,
            special_features: tongue.special_features,
        },
        pulse: PulseObservation {
            qualities: pulse.qualities,
        },
    }
}

impl From<&RxPoint> for pb::RxPoint {
    fn from(point: &RxPoint) -> Self {
        Self {
            code: point.code.clone(),
            role: point.role.clone(),
            source: point.source.clone(),
        }
    }
}

impl From<&WuxingRelationship> for pb::WuxingRelationship {
    fn from(rel: &WuxingRelationship) -> Self {
        Self {
            relationship_type: rel.relationship_type.to_string(),
            target_element: rel.target_element.to_string(),
            description: rel.description.to_string(),
        }
    }
}

impl From<&HerbalRecommendation> for pb::HerbalRecommendation {
    fn from(rec: &HerbalRecommendation) -> Self {
        Self {
            formula_name: rec.formula_name.clone(),
            chief_herbs: rec.chief_herbs.clone(),
            assistant_herbs: rec.assistant_herbs.clone(),
            avoid: rec.avoid.clone(),
        }
    }
}

impl From<&Syndrome> for pb::SyndromeSummary {
    fn from(s: &Syndrome) -> Self {
        Self {
            id: s.id.to_string(),
            name: s.name.clone(),
            name_en: s.name_en.clone(),
            primary_organs: s.primary_organs.clone(),
            wuxing_element: element_label(s),
            pattern_type: s.pattern_type.clone(),
        }
    }
}

impl From<&ScoredSyndrome<'_>> for pb::ScoredSyndrome {
    fn from(r: &ScoredSyndrome<'_>) -> Self {
        let s = r.syndrome;
        Self {
            id: s.id.to_string(),
            name: s.name.clone(),
            name_en: s.name_en.clone(),
            primary_organs: s.primary_organs.clone(),
            wuxing_element: element_label(s),
            pattern_type: s.pattern_type.clone(),
            score: r.score,
            confidence_percent: confidence_percent(r.score),
            match_details: r.match_details.iter().map(ToString::to_string).collect(),
            points: r.points.iter().map(Into::into).collect(),
            warnings: r.warnings.clone(),
            rationale: r.rationale.clone(),
            relationships: r.relationships.iter().map(Into::into).collect(),
            herbal_recommendation: r.herbal_recommendation.as_ref().map(Into::into),
        }
    }
}

/// Wrap ranked results in a response envelope with a fresh id and timestamp.
pub fn analyze_response(results: &[ScoredSyndrome<'_>]) -> pb::AnalyzeRes {
    pb::AnalyzeRes {
        analysis_id: uuid::Uuid::new_v4().to_string(),
        analysed_at: chrono::Utc::now().to_rfc3339(),
        results: results.iter().map(Into::into).collect(),
    }
}

/// Full syndrome profile as returned by `GetSyndrome`.
pub fn syndrome_detail(profile: &ScoredSyndrome<'_>) -> pb::SyndromeDetailRes {
    let s = profile.syndrome;
    pb::SyndromeDetailRes {
        summary: Some(s.into()),
        name_zh: s.name_zh.clone().unwrap_or_default(),
        transliteration: s.transliteration.clone().unwrap_or_default(),
        key_symptoms: s.key_symptoms.clone(),
        clinical_manifestations: s.clinical_manifestations.clone(),
        tongue: s.tongue.clone(),
        pulse: s.pulse.clone(),
        treatment_principle: s.treatment_principle.clone(),
        points: profile.points.iter().map(Into::into).collect(),
        needling_method: s.needling_method.clone().unwrap_or_default(),
        diagnostic_tip: s.diagnostic_tip.clone().unwrap_or_default(),
        warnings: profile.warnings.clone(),
        relationships: profile.relationships.iter().map(Into::into).collect(),
        herbal_recommendation: profile.herbal_recommendation.as_ref().map(Into::into),
        element_organs: s
            .wuxing_element
            .map(|e| e.organs().iter().map(|o| o.to_string()).collect())
            .unwrap_or_default(),
        pattern_nature: s
            .pattern_class()
            .nature()
            .into_iter()
            .map(String::from)
            .collect(),
    }
}

fn element_label(s: &Syndrome) -> String {
    s.wuxing_element.map(|e| e.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tcm_core::{EngineConfig, KnowledgeBase, ScoringEngine};

    fn engine() -> ScoringEngine {
        let kb = KnowledgeBase::builtin().expect("builtin");
        ScoringEngine::new(Arc::new(kb), EngineConfig::default())
    }

    #[test]
    fn confidence_is_capped_at_one_hundred() {
        assert_eq!(confidence_percent(35), 35);
        assert_eq!(confidence_percent(100), 100);
        assert_eq!(confidence_percent(185), 100);
    }

    #[test]
    fn missing_tongue_and_pulse_become_empty() {
        let obs = observation_from_pb(pb::AnalyzeReq {
            symptoms: "pusing".into(),
            ..Default::default()
        });
        assert_eq!(obs.symptoms, "pusing");
        assert_eq!(obs.tongue, TongueObservation::default());
        assert!(obs.pulse.qualities.is_empty());
    }

    #[test]
    fn analyze_response_carries_envelope_and_rendered_traces() {
        let engine = engine();
        let obs = observation_from_pb(pb::AnalyzeReq {
            symptoms: "red eyes, anger, bitter taste".into(),
            pulse: Some(pb::PulseObservation {
                qualities: vec!["Wiry".into(), "Rapid".into()],
            }),
            ..Default::default()
        });
        let results = engine.analyze(&obs);
        let res = analyze_response(&results);

        assert!(uuid::Uuid::parse_str(&res.analysis_id).is_ok());
        assert!(chrono::DateTime::parse_from_rfc3339(&res.analysed_at).is_ok());

        let top = &res.results[0];
        assert_eq!(top.id, "LIVER_FIRE_BLAZING");
        assert_eq!(top.wuxing_element, "Wood");
        assert!(top.score > 100);
        assert_eq!(top.confidence_percent, 100);
        assert!(top.match_details.contains(&"Key: Red eyes".to_string()));
        assert_eq!(top.points[0].code, "LR2");
        assert_eq!(top.relationships[0].relationship_type, "Overacting");
        assert_eq!(top.warnings.len(), 2);
    }

    #[test]
    fn syndrome_detail_flattens_optional_fields() {
        let engine = engine();
        let profile = engine.profile("HEART_FIRE_BLAZING").expect("profile");
        let detail = syndrome_detail(&profile);

        let summary = detail.summary.expect("summary");
        assert_eq!(summary.id, "HEART_FIRE_BLAZING");
        assert_eq!(summary.wuxing_element, "Fire");
        assert_eq!(detail.diagnostic_tip, "Look for the red tip of the tongue.");
        assert_eq!(detail.points[0].code, "HT9");
        let herbs = detail.herbal_recommendation.expect("herbs");
        assert_eq!(herbs.formula_name, "Clear Heat Formula");
        assert_eq!(
            detail.element_organs,
            vec!["Heart", "Small Intestine", "Pericardium", "San Jiao"]
        );
        assert_eq!(detail.pattern_nature, vec!["excess", "heat"]);
    }
}
