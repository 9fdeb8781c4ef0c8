//! Syndrome knowledge base: domain model and YAML loader.
//!
//! Responsibilities:
//! - Define the read-only domain types the engine scores against
//! - Define a strict wire model for the on-disk YAML format
//! - Translate wire to domain, canonicalizing point codes and defaulting missing fields
//!
//! Notes:
//! - A knowledge base is immutable once built; share it behind an `Arc`
//! - Authoring smells (duplicate ids, unknown elements, blank pattern types) are logged, never
//!   rejected, so a single bad entry cannot take the engine down

use crate::constants::BUILTIN_KNOWLEDGE_BASE_YAML;
use crate::pattern::PatternClass;
use crate::points::canonical_point_code;
use crate::{CdssError, CdssResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use tcm_types::{Element, NonEmptyText};

// ============================================================================
// Public domain-level types
// ============================================================================

/// A named TCM diagnostic pattern (Zheng).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Syndrome {
    /// Unique identifier within the knowledge base, e.g. `HEART_FIRE_BLAZING`.
    pub id: NonEmptyText,

    /// Localized display name.
    pub name: String,

    /// English name.
    pub name_en: String,

    /// Chinese name in characters.
    pub name_zh: Option<String>,

    /// Pinyin transliteration.
    pub transliteration: Option<String>,

    pub primary_organs: Vec<String>,

    /// `None` when the authored element could not be recognised.
    pub wuxing_element: Option<Element>,

    /// Free-form tag such as `full_heat_excess`; empty when not authored.
    pub pattern_type: String,

    pub key_symptoms: Vec<String>,
    pub clinical_manifestations: Vec<String>,
    pub tongue: Vec<String>,
    pub pulse: Vec<String>,

    /// Informational only; never scored.
    pub treatment_principle: Vec<String>,

    /// Canonical point codes, e.g. `HT9`, `CV12`.
    pub acupuncture_points: Vec<String>,

    pub needling_method: Option<String>,
    pub diagnostic_tip: Option<String>,
}

impl Syndrome {
    /// Classification of this syndrome's pattern type.
    pub fn pattern_class(&self) -> PatternClass {
        PatternClass::classify(&self.pattern_type)
    }
}

/// An authored herbal prescription rule.
///
/// Optional fields stay `None` when omitted so the resolver can tell "not authored" from
/// "authored as empty".
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HerbalRule {
    #[serde(default)]
    pub suggest_chief: Option<Vec<String>>,
    #[serde(default)]
    pub suggest_assistants: Option<Vec<String>>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub contraindications: Option<Vec<String>>,
}

/// Herbal rules keyed by syndrome id (overrides) and by pattern type (defaults).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HerbalGuidelines {
    #[serde(default)]
    pub per_syndrome_overrides: BTreeMap<String, HerbalRule>,
    #[serde(default)]
    pub rules_by_pattern_type: BTreeMap<String, HerbalRule>,
}

/// Descriptive metadata about a knowledge base.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KnowledgeBaseMetadata {
    #[serde(default)]
    pub db_name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub sources_used: Vec<String>,
    #[serde(default)]
    pub scope_note: String,
}

/// Read-only catalog of syndromes and herbal rules.
///
/// Syndrome order is catalog order; the engine uses it to break score ties.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct KnowledgeBase {
    metadata: KnowledgeBaseMetadata,
    syndromes: Vec<Syndrome>,
    herbal_guidelines: HerbalGuidelines,
}

impl KnowledgeBase {
    /// Build a knowledge base from already-translated parts.
    pub fn new(
        metadata: KnowledgeBaseMetadata,
        syndromes: Vec<Syndrome>,
        herbal_guidelines: HerbalGuidelines,
    ) -> Self {
        Self {
            metadata,
            syndromes,
            herbal_guidelines,
        }
    }

    /// The knowledge base compiled into this crate.
    ///
    /// # Errors
    ///
    /// Only fails if the embedded YAML is broken, which the test suite guards against.
    pub fn builtin() -> CdssResult<Self> {
        Self::parse_yaml(BUILTIN_KNOWLEDGE_BASE_YAML)
    }

    /// Load a knowledge base from a YAML file.
    pub fn load(path: &Path) -> CdssResult<Self> {
        let text = std::fs::read_to_string(path).map_err(CdssError::FileRead)?;
        let kb = Self::parse_yaml(&text)?;
        tracing::info!(
            "loaded knowledge base '{}' ({} syndromes) from {}",
            kb.metadata.db_name,
            kb.syndromes.len(),
            path.display()
        );
        Ok(kb)
    }

    /// Load the file at `path` when given, the built-in knowledge base otherwise.
    pub fn load_or_builtin(path: Option<&Path>) -> CdssResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Self::builtin(),
        }
    }

    /// Parse a knowledge base from YAML text.
    ///
    /// This uses `serde_path_to_error` to surface the path (e.g. `syndromes.3.tongue`) of the
    /// failing field when the YAML does not match the wire schema.
    ///
    /// # Errors
    ///
    /// Returns [`CdssError`] if:
    /// - the YAML does not match the wire schema (wrong types, unknown keys),
    /// - a syndrome has a blank `id`.
    pub fn parse_yaml(yaml_text: &str) -> CdssResult<Self> {
        let deserializer = serde_yaml::Deserializer::from_str(yaml_text);

        let wire = match serde_path_to_error::deserialize::<_, KnowledgeBaseWire>(deserializer) {
            Ok(parsed) => parsed,
            Err(err) => {
                let path = err.path().to_string();
                let source = err.into_inner();
                let path = if path.is_empty() {
                    "<root>"
                } else {
                    path.as_str()
                };
                return Err(CdssError::Translation(format!(
                    "knowledge base schema mismatch at {path}: {source}"
                )));
            }
        };

        wire_to_domain(wire)
    }

    pub fn metadata(&self) -> &KnowledgeBaseMetadata {
        &self.metadata
    }

    /// Syndromes in catalog order.
    pub fn syndromes(&self) -> &[Syndrome] {
        &self.syndromes
    }

    pub fn herbal_guidelines(&self) -> &HerbalGuidelines {
        &self.herbal_guidelines
    }

    /// First syndrome with the given id, in catalog order.
    pub fn get(&self, id: &str) -> Option<&Syndrome> {
        self.syndromes.iter().find(|s| s.id.as_str() == id)
    }

    pub fn len(&self) -> usize {
        self.syndromes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.syndromes.is_empty()
    }
}

// ============================================================================
// Wire types (internal)
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct KnowledgeBaseWire {
    #[serde(default)]
    metadata: KnowledgeBaseMetadata,

    #[serde(default)]
    syndromes: Vec<SyndromeWire>,

    #[serde(default)]
    herbal_guidelines: HerbalGuidelines,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SyndromeWire {
    id: String,

    #[serde(default)]
    name_id: String,

    #[serde(default)]
    name_en: String,

    #[serde(default)]
    name_zh: Option<String>,

    #[serde(default)]
    name_pinyin: Option<String>,

    #[serde(default)]
    primary_organs: Vec<String>,

    #[serde(default)]
    wuxing_element: Option<String>,

    #[serde(default)]
    pattern_type: Option<String>,

    #[serde(default)]
    clinical_manifestations: Vec<String>,

    #[serde(default)]
    tongue: Vec<String>,

    #[serde(default)]
    pulse: Vec<String>,

    #[serde(default)]
    key_symptoms: Vec<String>,

    #[serde(default)]
    treatment_principle: Vec<String>,

    #[serde(default)]
    acupuncture_points: Vec<String>,

    #[serde(default)]
    needling_method: Option<String>,

    #[serde(default)]
    diagnostic_tip: Option<String>,
}

// ============================================================================
// Helper functions (internal)
// ============================================================================

fn wire_to_domain(wire: KnowledgeBaseWire) -> CdssResult<KnowledgeBase> {
    let mut seen = HashSet::new();
    let mut syndromes = Vec::with_capacity(wire.syndromes.len());

    for (index, s) in wire.syndromes.into_iter().enumerate() {
        let syndrome = syndrome_from_wire(index, s)?;
        if !seen.insert(syndrome.id.clone()) {
            tracing::warn!(
                "duplicate syndrome id '{}' at syndromes.{index}; both entries will be scored",
                syndrome.id
            );
        }
        syndromes.push(syndrome);
    }

    Ok(KnowledgeBase::new(
        wire.metadata,
        syndromes,
        wire.herbal_guidelines,
    ))
}

fn syndrome_from_wire(index: usize, wire: SyndromeWire) -> CdssResult<Syndrome> {
    let id = NonEmptyText::new(&wire.id).map_err(|e| {
        CdssError::Translation(format!("knowledge base syndromes.{index}.id: {e}"))
    })?;

    let wuxing_element = match wire.wuxing_element.as_deref() {
        Some(label) => {
            let element = Element::from_label(label);
            if element.is_none() {
                tracing::warn!("syndrome '{id}' has unrecognised wuxing_element '{label}'");
            }
            element
        }
        None => {
            tracing::warn!("syndrome '{id}' has no wuxing_element");
            None
        }
    };

    let pattern_type = wire.pattern_type.unwrap_or_default().trim().to_string();
    if pattern_type.is_empty() {
        tracing::warn!("syndrome '{id}' has no pattern_type; Five-Element inference disabled");
    }

    let acupuncture_points = wire
        .acupuncture_points
        .iter()
        .filter_map(|raw| canonical_point_code(raw))
        .collect();

    Ok(Syndrome {
        id,
        name: wire.name_id,
        name_en: wire.name_en,
        name_zh: wire.name_zh,
        transliteration: wire.name_pinyin,
        primary_organs: wire.primary_organs,
        wuxing_element,
        pattern_type,
        key_symptoms: wire.key_symptoms,
        clinical_manifestations: wire.clinical_manifestations,
        tongue: wire.tongue,
        pulse: wire.pulse,
        treatment_principle: wire.treatment_principle,
        acupuncture_points,
        needling_method: wire.needling_method,
        diagnostic_tip: wire.diagnostic_tip,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL_KB: &str = r#"metadata:
  db_name: Test KB
  version: "0.1"
syndromes:
  - id: LIVER_FIRE_BLAZING
    name_id: Api Hati Berkobar
    name_en: Liver Fire Blazing
    primary_organs: [Liver]
    wuxing_element: Wood
    pattern_type: full_heat_excess
    key_symptoms: [Red eyes, Anger]
    tongue: [Red body]
    pulse: [Wiry, Rapid]
    acupuncture_points: ["LIV-2 Xingjian", "Du-24 Shenting", "Taiyang"]
  - id: MYSTERY
    name_en: Mystery pattern
herbal_guidelines:
  rules_by_pattern_type:
    full_heat_excess:
      suggest_chief: [Huang Lian, Zhi Zi]
      notes: Clear Heat Formula
"#;

    #[test]
    fn parses_syndromes_in_catalog_order() {
        let kb = KnowledgeBase::parse_yaml(SMALL_KB).expect("parse yaml");
        assert_eq!(kb.len(), 2);
        assert_eq!(kb.metadata().db_name, "Test KB");
        let ids: Vec<&str> = kb.syndromes().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["LIVER_FIRE_BLAZING", "MYSTERY"]);
    }

    #[test]
    fn canonicalizes_point_codes_on_load() {
        let kb = KnowledgeBase::parse_yaml(SMALL_KB).expect("parse yaml");
        let liver = kb.get("LIVER_FIRE_BLAZING").expect("syndrome");
        assert_eq!(liver.acupuncture_points, vec!["LR2", "GV24", "Taiyang"]);
        assert_eq!(liver.wuxing_element, Some(Element::Wood));
        assert!(liver.pattern_class().is_excess);
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let kb = KnowledgeBase::parse_yaml(SMALL_KB).expect("parse yaml");
        let mystery = kb.get("MYSTERY").expect("syndrome");
        assert!(mystery.key_symptoms.is_empty());
        assert!(mystery.tongue.is_empty());
        assert!(mystery.pattern_type.is_empty());
        assert_eq!(mystery.wuxing_element, None);
    }

    #[test]
    fn unknown_element_degrades_to_none() {
        let yaml = "syndromes:\n  - id: X\n    wuxing_element: Aether\n";
        let kb = KnowledgeBase::parse_yaml(yaml).expect("parse yaml");
        assert_eq!(kb.syndromes()[0].wuxing_element, None);
    }

    #[test]
    fn rejects_blank_id() {
        let yaml = "syndromes:\n  - id: \"  \"\n";
        let err = KnowledgeBase::parse_yaml(yaml).expect_err("should reject blank id");
        match err {
            CdssError::Translation(msg) => assert!(msg.contains("syndromes.0.id")),
            other => panic!("expected Translation error, got {other:?}"),
        }
    }

    #[test]
    fn strict_validation_rejects_unknown_keys() {
        let yaml = "syndromes:\n  - id: X\n    tongeu: [Red]\n";
        let err = KnowledgeBase::parse_yaml(yaml).expect_err("should reject unknown key");
        match err {
            CdssError::Translation(msg) => assert!(msg.contains("tongeu")),
            other => panic!("expected Translation error, got {other:?}"),
        }
    }

    #[test]
    fn strict_validation_reports_path_of_wrong_type() {
        let yaml = "syndromes:\n  - id: X\n    pulse: \"Wiry\"\n";
        let err = KnowledgeBase::parse_yaml(yaml).expect_err("should reject wrong type");
        match err {
            CdssError::Translation(msg) => assert!(msg.contains("pulse")),
            other => panic!("expected Translation error, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_ids_are_kept() {
        let yaml = "syndromes:\n  - id: X\n    name_en: first\n  - id: X\n    name_en: second\n";
        let kb = KnowledgeBase::parse_yaml(yaml).expect("parse yaml");
        assert_eq!(kb.len(), 2);
        assert_eq!(kb.get("X").expect("syndrome").name_en, "first");
    }

    #[test]
    fn herbal_rules_keep_omitted_fields_as_none() {
        let kb = KnowledgeBase::parse_yaml(SMALL_KB).expect("parse yaml");
        let rule = kb
            .herbal_guidelines()
            .rules_by_pattern_type
            .get("full_heat_excess")
            .expect("rule");
        assert_eq!(
            rule.suggest_chief.as_deref(),
            Some(&["Huang Lian".to_string(), "Zhi Zi".to_string()][..])
        );
        assert_eq!(rule.suggest_assistants, None);
        assert_eq!(rule.contraindications, None);
    }

    #[test]
    fn builtin_knowledge_base_parses() {
        let kb = KnowledgeBase::builtin().expect("builtin knowledge base");
        assert!(!kb.is_empty());
        assert!(kb.get("HEART_FIRE_BLAZING").is_some());
        for syndrome in kb.syndromes() {
            assert!(syndrome.wuxing_element.is_some(), "{} has no element", syndrome.id);
            assert!(!syndrome.pattern_type.is_empty(), "{} has no pattern", syndrome.id);
            assert!(!syndrome.primary_organs.is_empty(), "{} has no organ", syndrome.id);
        }
    }

    #[test]
    fn load_reads_file_and_reports_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("kb.yaml");
        std::fs::write(&path, SMALL_KB).expect("write");
        let kb = KnowledgeBase::load(&path).expect("load");
        assert_eq!(kb.len(), 2);

        let err = KnowledgeBase::load(&dir.path().join("missing.yaml")).expect_err("missing");
        assert!(matches!(err, CdssError::FileRead(_)));
    }

    #[test]
    fn load_or_builtin_falls_back_to_builtin() {
        let kb = KnowledgeBase::load_or_builtin(None).expect("builtin");
        assert_eq!(kb, KnowledgeBase::builtin().expect("builtin"));
    }
}
