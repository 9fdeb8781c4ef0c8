//! Domain synonym table consulted by the fuzzy matcher.
//!
//! Each entry pairs a canonical (Indonesian) clinical term with colloquial, regional and English
//! equivalents. Two phrases are bridged by an entry when each of them mentions the key or any of
//! its variants; they need not use the same variant.

/// Built-in synonym groups: canonical key followed by its variants.
pub const DEFAULT_SYNONYMS: &[(&str, &[&str])] = &[
    ("pusing", &["dizziness", "vertigo", "puyeng", "keliyengan"]),
    ("nyeri", &["sakit", "pain", "achiness"]),
    (
        "lelah",
        &["letih", "lesu", "lemas", "tired", "fatigue", "exhaustion"],
    ),
    ("haus", &["thirst", "dry mouth"]),
    (
        "sulit tidur",
        &["insomnia", "sleeplessness", "susah tidur"],
    ),
    ("berdebar", &["palpitations", "palpitasi", "jantung berdebar"]),
    ("keringat malam", &["night sweating", "night sweats"]),
    ("kembung", &["bloating", "distension", "abdominal fullness"]),
];

#[derive(Clone, Debug, PartialEq, Eq)]
struct SynonymGroup {
    key: String,
    variants: Vec<String>,
}

impl SynonymGroup {
    fn mentioned_in(&self, normalized: &str) -> bool {
        normalized.contains(self.key.as_str())
            || self.variants.iter().any(|v| normalized.contains(v.as_str()))
    }
}

/// Lookup table of synonym groups.
///
/// Terms are stored normalized so they can be compared directly against normalized phrases.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SynonymTable {
    groups: Vec<SynonymGroup>,
}

impl SynonymTable {
    /// An empty table. Matching then relies on containment and token overlap only.
    pub fn empty() -> Self {
        Self { groups: Vec::new() }
    }

    /// Add a synonym group. Blank variants are ignored; a blank key adds nothing.
    pub fn with_group<I, S>(mut self, key: &str, variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let key = crate::normalize(key);
        if key.is_empty() {
            return self;
        }

        let variants = variants
            .into_iter()
            .map(|v| crate::normalize(v.as_ref()))
            .filter(|v| !v.is_empty())
            .collect();

        self.groups.push(SynonymGroup { key, variants });
        self
    }

    /// True if both normalized phrases mention the same synonym group.
    pub fn bridges(&self, a: &str, b: &str) -> bool {
        self.groups
            .iter()
            .any(|group| group.mentioned_in(a) && group.mentioned_in(b))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl Default for SynonymTable {
    fn default() -> Self {
        DEFAULT_SYNONYMS
            .iter()
            .fold(Self::empty(), |table, (key, variants)| {
                table.with_group(key, variants.iter())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_loads_every_group() {
        let table = SynonymTable::default();
        assert_eq!(table.len(), DEFAULT_SYNONYMS.len());
    }

    #[test]
    fn bridges_key_and_variant() {
        let table = SynonymTable::default();
        assert!(table.bridges("pusing berat", "dizziness and heaviness"));
        assert!(table.bridges("dizziness and heaviness", "pusing berat"));
    }

    #[test]
    fn bridges_two_different_variants() {
        let table = SynonymTable::default();
        assert!(table.bridges("susah tidur", "insomnia"));
        assert!(table.bridges("night sweats", "keringat malam"));
    }

    #[test]
    fn does_not_bridge_unrelated_groups() {
        let table = SynonymTable::default();
        assert!(!table.bridges("pusing", "insomnia"));
        assert!(!table.bridges("nafsu makan baik", "diare encer"));
    }

    #[test]
    fn custom_groups_are_normalized() {
        let table = SynonymTable::empty().with_group("Mual", ["Nausea", " ", "Queasy!"]);
        assert!(table.bridges("mual pagi hari", "queasy"));
        assert!(!SynonymTable::empty().bridges("mual", "nausea"));
    }
}
