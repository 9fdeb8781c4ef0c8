//! Five-Element (Wu Xing) pathology inference.
//!
//! Given a syndrome's element and pattern type, [`relationships_for`] names the neighbouring
//! elements the pathology is likely to spread to. The rules are a fixed clinical table, one
//! direction of inference per element and per branch (excess or deficiency).

use crate::pattern::PatternClass;
use serde::Serialize;
use std::fmt;
use tcm_types::Element;

/// The four canonical Five-Element interactions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum RelationshipType {
    /// Sheng: mother and child.
    Generating,
    /// Ke: normal restraint.
    Controlling,
    /// Cheng: restraint turned into attack.
    Overacting,
    /// Wu: the restrained element rebels against its controller.
    Insulting,
}

impl RelationshipType {
    pub fn as_str(self) -> &'static str {
        match self {
            RelationshipType::Generating => "Generating",
            RelationshipType::Controlling => "Controlling",
            RelationshipType::Overacting => "Overacting",
            RelationshipType::Insulting => "Insulting",
        }
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One inferred interaction between the syndrome's element and a neighbour.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct WuxingRelationship {
    pub relationship_type: RelationshipType,
    pub target_element: Element,
    pub description: &'static str,
}

impl WuxingRelationship {
    fn new(
        relationship_type: RelationshipType,
        target_element: Element,
        description: &'static str,
    ) -> Self {
        Self {
            relationship_type,
            target_element,
            description,
        }
    }
}

/// Infer Five-Element relationships for a syndrome.
///
/// Returns an empty list when the element is unknown or the pattern type signals neither excess
/// nor deficiency. A pattern that is both applies only the excess rules for Wood; every other
/// element applies both branches, excess first.
pub fn relationships_for(element: Option<Element>, pattern_type: &str) -> Vec<WuxingRelationship> {
    let Some(element) = element else {
        return Vec::new();
    };

    let class = PatternClass::classify(pattern_type);
    let mut out = Vec::new();

    if element == Element::Wood {
        if class.is_excess {
            out.extend(excess_rules(element));
        } else if class.is_deficiency {
            out.extend(deficiency_rules(element));
        }
        return out;
    }

    if class.is_excess {
        out.extend(excess_rules(element));
    }
    if class.is_deficiency {
        out.extend(deficiency_rules(element));
    }
    out
}

fn excess_rules(element: Element) -> Vec<WuxingRelationship> {
    use RelationshipType::{Insulting, Overacting};

    match element {
        Element::Wood => vec![
            WuxingRelationship::new(
                Overacting,
                Element::Earth,
                "Wood overacts on Earth (Cheng): excess Liver Qi overwhelms the Spleen and Stomach, \
                 disturbing digestion.",
            ),
            WuxingRelationship::new(
                Insulting,
                Element::Metal,
                "Wood insults Metal (Wu): Liver-Fire rebels upward against the Lung, causing \
                 cough or breathlessness.",
            ),
        ],
        Element::Fire => vec![
            WuxingRelationship::new(
                Overacting,
                Element::Metal,
                "Fire overacts on Metal (Cheng): Heart-Fire dries the Lung fluids.",
            ),
            WuxingRelationship::new(
                Insulting,
                Element::Water,
                "Fire insults Water (Wu): Heart-Fire defies the cooling control of the Kidney.",
            ),
        ],
        Element::Earth => vec![
            WuxingRelationship::new(
                Overacting,
                Element::Water,
                "Earth overacts on Water (Cheng): Spleen-Damp floods the Kidney, leading to \
                 oedema.",
            ),
            WuxingRelationship::new(
                Insulting,
                Element::Wood,
                "Earth insults Wood (Wu): Damp-Heat obstructs the free flow of Liver Qi.",
            ),
        ],
        Element::Metal => vec![WuxingRelationship::new(
            Overacting,
            Element::Wood,
            "Metal overacts on Wood (Cheng): Lung excess attacks the Liver, causing spasm and \
             rigidity.",
        )],
        Element::Water => vec![WuxingRelationship::new(
            Overacting,
            Element::Fire,
            "Water overacts on Fire (Cheng): Kidney-Cold extinguishes Heart-Fire and threatens \
             Heart-Yang.",
        )],
    }
}

fn deficiency_rules(element: Element) -> Vec<WuxingRelationship> {
    use RelationshipType::{Generating, Insulting};

    match element {
        Element::Wood => vec![
            WuxingRelationship::new(
                Generating,
                Element::Fire,
                "Mother fails to nourish child: Liver Blood deficiency fails to nourish Heart \
                 Blood.",
            ),
            WuxingRelationship::new(
                Insulting,
                Element::Water,
                "Child drains mother: chronic Liver deficiency drains the Kidney.",
            ),
        ],
        Element::Fire => vec![WuxingRelationship::new(
            Generating,
            Element::Earth,
            "Mother fails to nourish child: Heart-Yang deficiency fails to warm the Spleen.",
        )],
        Element::Earth => vec![WuxingRelationship::new(
            Generating,
            Element::Metal,
            "Mother fails to nourish child: Spleen deficiency precipitates Lung deficiency.",
        )],
        Element::Metal => vec![WuxingRelationship::new(
            Generating,
            Element::Water,
            "Mother fails to nourish child: Lung Qi fails to help the Kidney receive Qi.",
        )],
        Element::Water => vec![
            WuxingRelationship::new(
                Generating,
                Element::Wood,
                "Mother fails to nourish child: Kidney-Yin fails to nourish Liver-Yin, \
                 provoking rising Liver-Yang.",
            ),
            WuxingRelationship::new(
                Insulting,
                Element::Earth,
                "Earth insults Water (Wu): a weak Kidney is insulted by an unchecked Spleen.",
            ),
        ],
    }
}
