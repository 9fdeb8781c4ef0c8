//! Canonical text form used for every comparison the engine makes.

use crate::constants::MAX_NOISE_PHRASE_LEN;

/// Canonicalize free text for comparison.
///
/// Lower-cases, turns every character that is not a letter, digit or whitespace into a
/// separator, collapses whitespace runs to a single space and trims. Never fails.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;

    for ch in text.chars().flat_map(char::to_lowercase) {
        if ch.is_alphanumeric() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(ch);
        } else {
            pending_space = true;
        }
    }

    out
}

/// Split a free-text narrative into normalized symptom phrases.
///
/// Phrases are delimited by newlines, commas and periods. Phrases of two characters or fewer
/// after normalization are dropped.
pub fn split_phrases(narrative: &str) -> Vec<String> {
    narrative
        .split(['\n', ',', '.'])
        .map(normalize)
        .filter(|p| p.chars().count() > MAX_NOISE_PHRASE_LEN)
        .collect()
}
