//! Fuzzy phrase matching.
//!
//! Clinical phrasing varies a lot between colloquial Indonesian, textbook English and regional
//! terms, so a phrase pair is tested in three tiers and accepted by the first that succeeds:
//!
//! 1. containment of one normalized phrase in the other,
//! 2. a shared [`SynonymTable`] group,
//! 3. token overlap at or above the configured threshold.
//!
//! The result is symmetric: `matches(a, b) == matches(b, a)` for every pair.

use crate::constants::{MATCH_THRESHOLD, MAX_NOISE_TOKEN_LEN};
use crate::normalize::normalize;
use crate::synonyms::SynonymTable;
use std::sync::LazyLock;

static DEFAULT_MATCHER: LazyLock<FuzzyMatcher> = LazyLock::new(FuzzyMatcher::default);

/// Decide whether `input` matches `reference` using the default threshold and synonym table.
pub fn matches(input: &str, reference: &str) -> bool {
    DEFAULT_MATCHER.matches(input, reference)
}

/// Three-tier phrase matcher.
#[derive(Clone, Debug)]
pub struct FuzzyMatcher {
    threshold: f64,
    synonyms: SynonymTable,
}

impl FuzzyMatcher {
    pub fn new(threshold: f64, synonyms: SynonymTable) -> Self {
        Self {
            threshold,
            synonyms,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Decide whether two phrases match. Empty phrases never match anything.
    pub fn matches(&self, input: &str, reference: &str) -> bool {
        let input = normalize(input);
        let reference = normalize(reference);

        if input.is_empty() || reference.is_empty() {
            return false;
        }

        if input.contains(reference.as_str()) || reference.contains(input.as_str()) {
            return true;
        }

        if self.synonyms.bridges(&input, &reference) {
            return true;
        }

        let input_tokens = tokens(&input);
        let reference_tokens = tokens(&reference);
        if input_tokens.is_empty() || reference_tokens.is_empty() {
            return false;
        }

        self.overlap_met(&input_tokens, &reference_tokens)
            || self.overlap_met(&reference_tokens, &input_tokens)
    }

    /// Count tokens of `from` that contain, or are contained in, some token of `to`, and test the
    /// count against both token set sizes.
    fn overlap_met(&self, from: &[&str], to: &[&str]) -> bool {
        let matched = from
            .iter()
            .filter(|t| to.iter().any(|r| r.contains(**t) || t.contains(*r)))
            .count() as f64;

        matched / from.len() as f64 >= self.threshold || matched / to.len() as f64 >= self.threshold
    }
}

impl Default for FuzzyMatcher {
    fn default() -> Self {
        Self::new(MATCH_THRESHOLD, SynonymTable::default())
    }
}

fn tokens(normalized: &str) -> Vec<&str> {
    normalized
        .split_whitespace()
        .filter(|t| t.chars().count() > MAX_NOISE_TOKEN_LEN)
        .collect()
}
