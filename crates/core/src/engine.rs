//! Syndrome scoring engine.
//!
//! Responsibilities:
//! - Derive the symptom, tongue and pulse pools from a [`PatientObservation`]
//! - Score every syndrome of the knowledge base against those pools
//! - Filter, rank and truncate the differential
//! - Enrich survivors with points, warnings, rationale, Five-Element relationships and herbs
//!
//! Notes:
//! - `analyze` is pure and synchronous; concurrent calls share the knowledge base read-only
//! - Equal scores keep knowledge-base order via an explicit catalog index

use crate::config::EngineConfig;
use crate::constants::{POINT_ROLE_CAUSAL, POINT_SOURCE_DB, RATIONALE_TRACE_LIMIT};
use crate::herbal::{herbal_recommendation, HerbalRecommendation};
use crate::knowledge_base::{KnowledgeBase, Syndrome};
use crate::matcher::FuzzyMatcher;
use crate::observation::PatientObservation;
use crate::synonyms::SynonymTable;
use crate::wuxing::{relationships_for, WuxingRelationship};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tcm_types::Element;

const LIVER_FIRE_WARNINGS: &[&str] = &[
    "Caution: rising Liver-Fire",
    "Risk of chronic hypertension",
];

/// Which trait list of a syndrome a match came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum TraitCategory {
    Key,
    Symptom,
    Tongue,
    Pulse,
}

impl TraitCategory {
    pub fn label(self) -> &'static str {
        match self {
            TraitCategory::Key => "Key",
            TraitCategory::Symptom => "Symptom",
            TraitCategory::Tongue => "Tongue",
            TraitCategory::Pulse => "Pulse",
        }
    }
}

/// A satisfied syndrome trait.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MatchTrace {
    pub category: TraitCategory,
    /// The trait as authored in the knowledge base.
    pub phrase: String,
}

impl fmt::Display for MatchTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.category.label(), self.phrase)
    }
}

/// A prescribed acupuncture point.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RxPoint {
    pub code: String,
    pub role: String,
    pub source: String,
}

/// One entry of the differential.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScoredSyndrome<'a> {
    pub syndrome: &'a Syndrome,
    /// Position of the syndrome in the knowledge base.
    pub catalog_index: usize,
    pub score: u32,
    pub match_details: Vec<MatchTrace>,
    pub points: Vec<RxPoint>,
    pub warnings: Vec<String>,
    pub rationale: Vec<String>,
    pub relationships: Vec<WuxingRelationship>,
    pub herbal_recommendation: Option<HerbalRecommendation>,
}

impl ScoredSyndrome<'_> {
    /// Number of key-symptom traces.
    pub fn key_matches(&self) -> usize {
        count_key(&self.match_details)
    }
}

/// Normalized inputs shared by every syndrome of one analysis.
struct InputPools {
    symptoms: Vec<String>,
    tongue: String,
    pulse: Vec<String>,
}

/// Running score of one syndrome.
#[derive(Default)]
struct Tally {
    score: u32,
    traces: Vec<MatchTrace>,
}

impl Tally {
    /// Add `weight` once for every trait satisfied by `hit`.
    fn add(
        &mut self,
        category: TraitCategory,
        traits: &[String],
        weight: u32,
        hit: impl Fn(&str) -> bool,
    ) {
        for phrase in traits.iter().filter(|t| hit(t.as_str())) {
            self.score = self.score.saturating_add(weight);
            self.traces.push(MatchTrace {
                category,
                phrase: phrase.clone(),
            });
        }
    }
}

/// Scores syndromes of one knowledge base against patient observations.
#[derive(Clone, Debug)]
pub struct ScoringEngine {
    kb: Arc<KnowledgeBase>,
    config: EngineConfig,
    matcher: FuzzyMatcher,
}

impl ScoringEngine {
    pub fn new(kb: Arc<KnowledgeBase>, config: EngineConfig) -> Self {
        let matcher = FuzzyMatcher::new(config.match_threshold(), SynonymTable::default());
        Self {
            kb,
            config,
            matcher,
        }
    }

    /// Replace the matcher, e.g. to use a custom synonym table.
    pub fn with_matcher(mut self, matcher: FuzzyMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.kb
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn matcher(&self) -> &FuzzyMatcher {
        &self.matcher
    }

    /// Rank the syndromes of the knowledge base against `observation`.
    ///
    /// Returns at most `max_results` entries, each scoring above `min_score_exclusive`, ordered
    /// by descending score and then by catalog order. An empty list means no syndrome matched
    /// strongly enough.
    pub fn analyze(&self, observation: &PatientObservation) -> Vec<ScoredSyndrome<'_>> {
        let pools = InputPools {
            symptoms: observation.symptom_pool(),
            tongue: observation.tongue_description(),
            pulse: observation.pulse_pool(),
        };

        let min_score = self.config.min_score_exclusive();
        let mut candidates: Vec<(usize, &Syndrome, u32, Vec<MatchTrace>)> = self
            .kb
            .syndromes()
            .iter()
            .enumerate()
            .filter_map(|(index, syndrome)| {
                let (score, traces) = self.score_syndrome(syndrome, &pools);
                tracing::debug!("scored {} at {score} ({} traces)", syndrome.id, traces.len());
                (score > min_score).then_some((index, syndrome, score, traces))
            })
            .collect();

        candidates.sort_by(|a, b| b.2.cmp(&a.2).then(a.0.cmp(&b.0)));
        candidates.truncate(self.config.max_results());

        tracing::debug!(
            "analysis: {} symptom phrases, {} pulse labels, {} of {} syndromes returned",
            pools.symptoms.len(),
            pools.pulse.len(),
            candidates.len(),
            self.kb.len()
        );

        candidates
            .into_iter()
            .map(|(index, syndrome, score, traces)| self.enrich(index, syndrome, score, traces))
            .collect()
    }

    /// Look up a syndrome by id and attach its points, warnings, relationships and herbs
    /// without scoring it.
    pub fn profile(&self, id: &str) -> Option<ScoredSyndrome<'_>> {
        let (index, syndrome) = self
            .kb
            .syndromes()
            .iter()
            .enumerate()
            .find(|(_, s)| s.id.as_str() == id)?;

        let mut profile = self.enrich(index, syndrome, 0, Vec::new());
        profile.rationale.clear();
        Some(profile)
    }

    fn score_syndrome(&self, syndrome: &Syndrome, pools: &InputPools) -> (u32, Vec<MatchTrace>) {
        let weights = self.config.weights();
        let mut tally = Tally::default();

        let any_symptom = |t: &str| pools.symptoms.iter().any(|s| self.matcher.matches(s, t));
        let any_pulse = |t: &str| pools.pulse.iter().any(|p| self.matcher.matches(p, t));

        tally.add(TraitCategory::Key, &syndrome.key_symptoms, weights.key_symptom, any_symptom);
        tally.add(
            TraitCategory::Symptom,
            &syndrome.clinical_manifestations,
            weights.manifestation,
            any_symptom,
        );
        tally.add(TraitCategory::Tongue, &syndrome.tongue, weights.tongue, |t| {
            self.matcher.matches(&pools.tongue, t)
        });
        tally.add(TraitCategory::Pulse, &syndrome.pulse, weights.pulse, any_pulse);

        (tally.score, tally.traces)
    }

    fn enrich<'a>(
        &'a self,
        catalog_index: usize,
        syndrome: &'a Syndrome,
        score: u32,
        match_details: Vec<MatchTrace>,
    ) -> ScoredSyndrome<'a> {
        let points = syndrome
            .acupuncture_points
            .iter()
            .map(|code| RxPoint {
                code: code.clone(),
                role: POINT_ROLE_CAUSAL.to_string(),
                source: POINT_SOURCE_DB.to_string(),
            })
            .collect();

        let key_count = count_key(&match_details);
        let rationale = std::iter::once(format!(
            "Maciocia-based analysis: strong match on {key_count} key symptom(s)."
        ))
        .chain(
            match_details
                .iter()
                .take(RATIONALE_TRACE_LIMIT)
                .map(ToString::to_string),
        )
        .collect();

        ScoredSyndrome {
            syndrome,
            catalog_index,
            score,
            points,
            warnings: warnings_for(syndrome),
            rationale,
            relationships: relationships_for(syndrome.wuxing_element, &syndrome.pattern_type),
            herbal_recommendation: herbal_recommendation(&self.kb, syndrome),
            match_details,
        }
    }
}

fn count_key(traces: &[MatchTrace]) -> usize {
    traces
        .iter()
        .filter(|t| t.category == TraitCategory::Key)
        .count()
}

fn warnings_for(syndrome: &Syndrome) -> Vec<String> {
    if syndrome.wuxing_element == Some(Element::Wood) && syndrome.pattern_class().signals_excess {
        LIVER_FIRE_WARNINGS.iter().map(|w| w.to_string()).collect()
    } else {
        Vec::new()
    }
}
