//! Engine runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the
//! [`crate::ScoringEngine`]. Request handling never reads process-wide environment variables;
//! binaries call the `*_from_env_value` helpers below with whatever they read at startup.

use crate::constants::{
    KEY_SYMPTOM_WEIGHT, MANIFESTATION_WEIGHT, MATCH_THRESHOLD, MAX_RESULTS, MIN_SCORE_EXCLUSIVE,
    PULSE_WEIGHT, TONGUE_WEIGHT,
};
use crate::{CdssError, CdssResult};
use std::path::{Path, PathBuf};

/// Score contributed by one satisfied trait, per trait category.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScoreWeights {
    pub key_symptom: u32,
    pub manifestation: u32,
    pub tongue: u32,
    pub pulse: u32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            key_symptom: KEY_SYMPTOM_WEIGHT,
            manifestation: MANIFESTATION_WEIGHT,
            tongue: TONGUE_WEIGHT,
            pulse: PULSE_WEIGHT,
        }
    }
}

/// Scoring configuration resolved at startup.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    match_threshold: f64,
    min_score_exclusive: u32,
    max_results: usize,
    weights: ScoreWeights,
}

impl EngineConfig {
    /// Create a new `EngineConfig` with the default category weights.
    ///
    /// # Errors
    ///
    /// Returns `CdssError::InvalidInput` if `match_threshold` is not in `(0, 1]` or
    /// `max_results` is zero.
    pub fn new(
        match_threshold: f64,
        min_score_exclusive: u32,
        max_results: usize,
    ) -> CdssResult<Self> {
        if !(match_threshold > 0.0 && match_threshold <= 1.0) {
            return Err(CdssError::InvalidInput(format!(
                "match threshold must be in (0, 1], got {match_threshold}"
            )));
        }

        if max_results == 0 {
            return Err(CdssError::InvalidInput(
                "max results must be at least 1".into(),
            ));
        }

        Ok(Self {
            match_threshold,
            min_score_exclusive,
            max_results,
            weights: ScoreWeights::default(),
        })
    }

    /// Replace the category weights.
    pub fn with_weights(mut self, weights: ScoreWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn match_threshold(&self) -> f64 {
        self.match_threshold
    }

    pub fn min_score_exclusive(&self) -> u32 {
        self.min_score_exclusive
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }

    pub fn weights(&self) -> ScoreWeights {
        self.weights
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            match_threshold: MATCH_THRESHOLD,
            min_score_exclusive: MIN_SCORE_EXCLUSIVE,
            max_results: MAX_RESULTS,
            weights: ScoreWeights::default(),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse the token-overlap threshold from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns the default threshold.
pub fn match_threshold_from_env_value(value: Option<String>) -> CdssResult<f64> {
    match non_blank(value) {
        Some(v) => v
            .parse::<f64>()
            .map_err(|e| CdssError::InvalidInput(format!("invalid match threshold '{v}': {e}"))),
        None => Ok(MATCH_THRESHOLD),
    }
}

/// Parse an unsigned integer setting from an optional string value, falling back to `default`.
pub fn u32_from_env_value(value: Option<String>, default: u32) -> CdssResult<u32> {
    match non_blank(value) {
        Some(v) => v
            .parse::<u32>()
            .map_err(|e| CdssError::InvalidInput(format!("invalid integer '{v}': {e}"))),
        None => Ok(default),
    }
}

/// Parse a count setting from an optional string value, falling back to `default`.
pub fn usize_from_env_value(value: Option<String>, default: usize) -> CdssResult<usize> {
    match non_blank(value) {
        Some(v) => v
            .parse::<usize>()
            .map_err(|e| CdssError::InvalidInput(format!("invalid count '{v}': {e}"))),
        None => Ok(default),
    }
}

/// Build an [`EngineConfig`] from the raw values of `TCM_MATCH_THRESHOLD`, `TCM_MIN_SCORE` and
/// `TCM_MAX_RESULTS`.
pub fn engine_config_from_env_values(
    match_threshold: Option<String>,
    min_score: Option<String>,
    max_results: Option<String>,
) -> CdssResult<EngineConfig> {
    EngineConfig::new(
        match_threshold_from_env_value(match_threshold)?,
        u32_from_env_value(min_score, MIN_SCORE_EXCLUSIVE)?,
        usize_from_env_value(max_results, MAX_RESULTS)?,
    )
}

/// Resolve the knowledge-base override path without reading environment variables.
///
/// `None` (or a blank value) selects the built-in knowledge base. A provided path must point at
/// an existing file.
pub fn resolve_knowledge_base_path(value: Option<String>) -> CdssResult<Option<PathBuf>> {
    let Some(raw) = non_blank(value) else {
        return Ok(None);
    };

    let path = Path::new(&raw);
    if !path.is_file() {
        return Err(CdssError::InvalidInput(format!(
            "knowledge base override is not a file: {}",
            path.display()
        )));
    }

    Ok(Some(path.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_tuned_constants() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.match_threshold(), 0.6);
        assert_eq!(cfg.min_score_exclusive(), 15);
        assert_eq!(cfg.max_results(), 5);
        assert_eq!(
            cfg.weights(),
            ScoreWeights {
                key_symptom: 50,
                manifestation: 15,
                tongue: 20,
                pulse: 20,
            }
        );
    }

    #[test]
    fn new_rejects_out_of_range_threshold() {
        for bad in [0.0, -0.2, 1.5, f64::NAN] {
            let err = EngineConfig::new(bad, 15, 5).expect_err("should reject threshold");
            assert!(matches!(err, CdssError::InvalidInput(msg) if msg.contains("threshold")));
        }
    }

    #[test]
    fn new_rejects_zero_results() {
        let err = EngineConfig::new(0.6, 15, 0).expect_err("should reject zero");
        assert!(matches!(err, CdssError::InvalidInput(msg) if msg.contains("at least 1")));
    }

    #[test]
    fn env_values_fall_back_to_defaults_when_blank() {
        let cfg = engine_config_from_env_values(None, Some("  ".into()), None).expect("config");
        assert_eq!(cfg, EngineConfig::default());
    }

    #[test]
    fn env_values_are_parsed() {
        let cfg = engine_config_from_env_values(
            Some("0.75".into()),
            Some("20".into()),
            Some("3".into()),
        )
        .expect("config");
        assert_eq!(cfg.match_threshold(), 0.75);
        assert_eq!(cfg.min_score_exclusive(), 20);
        assert_eq!(cfg.max_results(), 3);
    }

    #[test]
    fn env_values_reject_garbage() {
        let err = match_threshold_from_env_value(Some("high".into())).expect_err("should fail");
        assert!(matches!(err, CdssError::InvalidInput(msg) if msg.contains("high")));

        let err = usize_from_env_value(Some("-1".into()), 5).expect_err("should fail");
        assert!(matches!(err, CdssError::InvalidInput(_)));
    }

    #[test]
    fn knowledge_base_path_must_be_a_file() {
        assert!(resolve_knowledge_base_path(None).expect("none").is_none());

        let dir = tempfile::tempdir().expect("tempdir");
        let err = resolve_knowledge_base_path(Some(dir.path().display().to_string()))
            .expect_err("directory should be rejected");
        assert!(matches!(err, CdssError::InvalidInput(msg) if msg.contains("not a file")));

        let file = dir.path().join("kb.yaml");
        std::fs::write(&file, "syndromes: []\n").expect("write");
        let resolved = resolve_knowledge_base_path(Some(file.display().to_string()))
            .expect("file should resolve");
        assert_eq!(resolved, Some(file));
    }
}
