//! Classification of free-form pattern-type tags.
//!
//! Knowledge-base authors write pattern types as short tags such as `full_heat_excess` or
//! `yin_deficiency_empty_heat`. Every rule that depends on excess/deficiency or cold/heat reads the
//! tag through [`PatternClass::classify`] so the keyword lists live in one place.

const EXCESS_KEYWORDS: &[&str] = &["excess", "full", "stagnation", "invasion", "fire"];
const DEFICIENCY_KEYWORDS: &[&str] = &["deficiency", "empty", "xu"];
const COLD_KEYWORDS: &[&str] = &["cold", "han"];
const HEAT_KEYWORDS: &[&str] = &["heat", "fire"];
const LITERAL_EXCESS: &str = "excess";

/// Keyword-derived nature of a pattern type.
///
/// The flags are independent; a tag may be both excess and deficient (for example
/// `deficiency_empty_fire`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PatternClass {
    pub is_excess: bool,
    /// The tag literally says `excess`; stagnation or invasion alone does not count.
    pub signals_excess: bool,
    pub is_deficiency: bool,
    pub is_cold: bool,
    pub is_heat: bool,
}

impl PatternClass {
    /// Classify a pattern-type tag. Matching is case-insensitive substring search.
    pub fn classify(pattern_type: &str) -> Self {
        let tag = pattern_type.to_lowercase();
        let any = |keywords: &[&str]| keywords.iter().any(|k| tag.contains(k));

        Self {
            is_excess: any(EXCESS_KEYWORDS),
            signals_excess: tag.contains(LITERAL_EXCESS),
            is_deficiency: any(DEFICIENCY_KEYWORDS),
            is_cold: any(COLD_KEYWORDS),
            is_heat: any(HEAT_KEYWORDS),
        }
    }

    /// True when the tag signals neither excess nor deficiency.
    pub fn is_unclassified(self) -> bool {
        !self.is_excess && !self.is_deficiency
    }

    /// Set flags as display labels, in the order excess, deficiency, cold, heat.
    pub fn nature(self) -> Vec<&'static str> {
        [
            (self.is_excess, "excess"),
            (self.is_deficiency, "deficiency"),
            (self.is_cold, "cold"),
            (self.is_heat, "heat"),
        ]
        .into_iter()
        .filter_map(|(set, label)| set.then_some(label))
        .collect()
    }
}
