//! Constants used throughout the TCM core crate.
//!
//! Scoring constants were tuned by hand against the clinic's case notes. They are the defaults of
//! [`crate::EngineConfig`] and can be overridden at startup.

/// Score added when a key symptom of a syndrome is matched.
pub const KEY_SYMPTOM_WEIGHT: u32 = 50;

/// Score added when a clinical manifestation of a syndrome is matched.
pub const MANIFESTATION_WEIGHT: u32 = 15;

/// Score added when a tongue sign of a syndrome is matched.
pub const TONGUE_WEIGHT: u32 = 20;

/// Score added when a pulse sign of a syndrome is matched.
pub const PULSE_WEIGHT: u32 = 20;

/// Syndromes scoring at or below this value are dropped from the differential.
///
/// Equal to a single manifestation match, which alone must never surface a syndrome.
pub const MIN_SCORE_EXCLUSIVE: u32 = 15;

/// Maximum number of syndromes returned by one analysis.
pub const MAX_RESULTS: usize = 5;

/// Token-overlap ratio at or above which two phrases are considered to match.
pub const MATCH_THRESHOLD: f64 = 0.6;

/// Tokens of this many characters or fewer are ignored by token-overlap matching.
pub const MAX_NOISE_TOKEN_LEN: usize = 2;

/// Free-text phrases of this many characters or fewer are dropped from the symptom pool.
pub const MAX_NOISE_PHRASE_LEN: usize = 2;

/// Number of raw match traces quoted in a rationale after the summary sentence.
pub const RATIONALE_TRACE_LIMIT: usize = 4;

/// Role attached to points prescribed straight from the knowledge base.
pub const POINT_ROLE_CAUSAL: &str = "kausal";

/// Source attached to points prescribed straight from the knowledge base.
pub const POINT_SOURCE_DB: &str = "db";

/// Formula name used when a herbal rule carries no notes.
pub const DEFAULT_FORMULA_NAME: &str = "Standard protocol";

/// Precautions attached to a per-syndrome herbal override that lists none.
pub const DEFAULT_OVERRIDE_PRECAUTIONS: &[&str] =
    &["Avoid cold and raw foods", "Monitor blood pressure"];

/// Precautions attached to a pattern-type herbal rule that lists none.
pub const DEFAULT_PATTERN_PRECAUTIONS: &[&str] = &["Follow standard dosage"];

/// Built-in knowledge base compiled into the crate.
pub const BUILTIN_KNOWLEDGE_BASE_YAML: &str = include_str!("../knowledge/maciocia.yaml");
