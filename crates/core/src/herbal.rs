//! Herbal formula resolution.

use crate::constants::{
    DEFAULT_FORMULA_NAME, DEFAULT_OVERRIDE_PRECAUTIONS, DEFAULT_PATTERN_PRECAUTIONS,
};
use crate::knowledge_base::{HerbalRule, KnowledgeBase, Syndrome};
use serde::Serialize;

/// A suggested formula for one syndrome.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HerbalRecommendation {
    pub formula_name: String,
    pub chief_herbs: Vec<String>,
    pub assistant_herbs: Vec<String>,
    pub avoid: Vec<String>,
}

/// Resolve the herbal recommendation for `syndrome`.
///
/// A per-syndrome override wins outright; otherwise the rule for the syndrome's pattern type is
/// used. `None` means no rule applies, which is an ordinary outcome.
pub fn herbal_recommendation(
    kb: &KnowledgeBase,
    syndrome: &Syndrome,
) -> Option<HerbalRecommendation> {
    let guidelines = kb.herbal_guidelines();

    if let Some(rule) = guidelines.per_syndrome_overrides.get(syndrome.id.as_str()) {
        return Some(from_rule(rule, DEFAULT_OVERRIDE_PRECAUTIONS));
    }

    guidelines
        .rules_by_pattern_type
        .get(syndrome.pattern_type.as_str())
        .map(|rule| from_rule(rule, DEFAULT_PATTERN_PRECAUTIONS))
}

fn from_rule(rule: &HerbalRule, fallback_avoid: &[&str]) -> HerbalRecommendation {
    HerbalRecommendation {
        formula_name: rule
            .notes
            .clone()
            .unwrap_or_else(|| DEFAULT_FORMULA_NAME.to_string()),
        chief_herbs: rule.suggest_chief.clone().unwrap_or_default(),
        assistant_herbs: rule.suggest_assistants.clone().unwrap_or_default(),
        avoid: rule
            .contraindications
            .clone()
            .unwrap_or_else(|| fallback_avoid.iter().map(|s| s.to_string()).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KB: &str = r#"syndromes:
  - id: HEART_FIRE_BLAZING
    pattern_type: full_heat_excess
  - id: LIVER_FIRE_BLAZING
    pattern_type: full_heat_excess
  - id: ODD_ONE
    pattern_type: wind_damp_bi
  - id: BARE_RULE
    pattern_type: bare
herbal_guidelines:
  per_syndrome_overrides:
    LIVER_FIRE_BLAZING:
      suggest_chief: [Long Dan Cao]
      notes: Long Dan Xie Gan Tang
  rules_by_pattern_type:
    full_heat_excess:
      suggest_chief: [Huang Lian, Zhi Zi]
      notes: Clear Heat Formula
    bare: {}
"#;

    fn kb() -> KnowledgeBase {
        KnowledgeBase::parse_yaml(KB).expect("parse yaml")
    }

    fn resolve(kb: &KnowledgeBase, id: &str) -> Option<HerbalRecommendation> {
        herbal_recommendation(kb, kb.get(id).expect("syndrome"))
    }

    #[test]
    fn pattern_rule_applies_without_override() {
        let kb = kb();
        let rec = resolve(&kb, "HEART_FIRE_BLAZING").expect("recommendation");
        assert_eq!(rec.formula_name, "Clear Heat Formula");
        assert_eq!(rec.chief_herbs, vec!["Huang Lian", "Zhi Zi"]);
        assert!(rec.assistant_herbs.is_empty());
        assert_eq!(rec.avoid, vec!["Follow standard dosage"]);
    }

    #[test]
    fn override_wins_and_gets_its_own_precautions() {
        let kb = kb();
        let rec = resolve(&kb, "LIVER_FIRE_BLAZING").expect("recommendation");
        assert_eq!(rec.formula_name, "Long Dan Xie Gan Tang");
        assert_eq!(rec.chief_herbs, vec!["Long Dan Cao"]);
        assert_eq!(
            rec.avoid,
            vec!["Avoid cold and raw foods", "Monitor blood pressure"]
        );
    }

    #[test]
    fn unknown_pattern_type_has_no_recommendation() {
        let kb = kb();
        assert_eq!(resolve(&kb, "ODD_ONE"), None);
    }

    #[test]
    fn empty_rule_uses_default_formula_name() {
        let kb = kb();
        let rec = resolve(&kb, "BARE_RULE").expect("recommendation");
        assert_eq!(rec.formula_name, "Standard protocol");
        assert!(rec.chief_herbs.is_empty());
    }

    #[test]
    fn builtin_recommendations_follow_authored_rules() {
        let kb = KnowledgeBase::builtin().expect("builtin");
        for syndrome in kb.syndromes() {
            let pattern = syndrome.pattern_type.as_str();
            let has_rule = kb
                .herbal_guidelines()
                .rules_by_pattern_type
                .contains_key(pattern)
                || kb
                    .herbal_guidelines()
                    .per_syndrome_overrides
                    .contains_key(syndrome.id.as_str());
            assert_eq!(herbal_recommendation(&kb, syndrome).is_some(), has_rule);
        }
    }
}
