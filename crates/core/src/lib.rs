//! # TCM Core
//!
//! Symptom-to-syndrome matching and scoring for the TCM decision-support service.
//!
//! This crate contains the pure engine and its knowledge base:
//! - Text normalization, synonym bridging and fuzzy phrase matching
//! - The syndrome knowledge base with its YAML loader and built-in Maciocia catalog
//! - Weighted scoring, ranking and enrichment of the differential diagnosis
//! - Five-Element relationship inference and herbal formula resolution
//!
//! **No API concerns**: HTTP/gRPC servers, authentication and wire types belong in `api-grpc`,
//! `api-rest`, or `api-shared`.

pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod herbal;
pub mod knowledge_base;
pub mod matcher;
pub mod normalize;
pub mod observation;
pub mod pattern;
pub mod points;
pub mod synonyms;
pub mod wuxing;

pub use config::{
    engine_config_from_env_values, resolve_knowledge_base_path, EngineConfig, ScoreWeights,
};
pub use engine::{MatchTrace, RxPoint, ScoredSyndrome, ScoringEngine, TraitCategory};
pub use error::{CdssError, CdssResult};
pub use herbal::{herbal_recommendation, HerbalRecommendation};
pub use knowledge_base::{
    HerbalGuidelines, HerbalRule, KnowledgeBase, KnowledgeBaseMetadata, Syndrome,
};
pub use matcher::{matches, FuzzyMatcher};
pub use normalize::{normalize, split_phrases};
pub use observation::{PatientObservation, PulseObservation, TongueObservation};
pub use pattern::PatternClass;
pub use points::canonical_point_code;
pub use synonyms::SynonymTable;
pub use tcm_types::{Element, NonEmptyText};
pub use wuxing::{relationships_for, RelationshipType, WuxingRelationship};
