//! The five Wu Xing phases and their canonical cycles.
//!
//! Knowledge bases are authored by hand, so element labels are parsed leniently: any label that
//! contains one of the English phase names (case-insensitive) is accepted, as are the Indonesian
//! names used in the clinic's own material.

use std::fmt;
use std::str::FromStr;

/// Errors returned when an element label cannot be recognised.
#[derive(Debug, thiserror::Error)]
pub enum ElementError {
    #[error("unknown Wu Xing element: {0}")]
    Unknown(String),
}

/// One of the five Wu Xing phases.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Element {
    Wood,
    Fire,
    Earth,
    Metal,
    Water,
}

impl Element {
    /// All elements in Sheng (generating) order, starting from Wood.
    pub const ALL: [Element; 5] = [
        Element::Wood,
        Element::Fire,
        Element::Earth,
        Element::Metal,
        Element::Water,
    ];

    /// English label, as written in knowledge-base files and wire messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Element::Wood => "Wood",
            Element::Fire => "Fire",
            Element::Earth => "Earth",
            Element::Metal => "Metal",
            Element::Water => "Water",
        }
    }

    /// Parse a free-form element label.
    ///
    /// Returns `None` when no element can be recognised.
    pub fn from_label(label: &str) -> Option<Self> {
        let lower = label.trim().to_lowercase();
        if lower.is_empty() {
            return None;
        }

        if let Some(el) = Self::ALL
            .into_iter()
            .find(|el| lower.contains(&el.as_str().to_lowercase()))
        {
            return Some(el);
        }

        match lower.as_str() {
            "kayu" => Some(Element::Wood),
            "api" => Some(Element::Fire),
            "tanah" => Some(Element::Earth),
            "logam" => Some(Element::Metal),
            "air" => Some(Element::Water),
            _ => None,
        }
    }

    /// The child of this element in the Sheng (generating) cycle.
    pub fn generates(self) -> Self {
        match self {
            Element::Wood => Element::Fire,
            Element::Fire => Element::Earth,
            Element::Earth => Element::Metal,
            Element::Metal => Element::Water,
            Element::Water => Element::Wood,
        }
    }

    /// The mother of this element in the Sheng cycle.
    pub fn generated_by(self) -> Self {
        match self {
            Element::Wood => Element::Water,
            Element::Fire => Element::Wood,
            Element::Earth => Element::Fire,
            Element::Metal => Element::Earth,
            Element::Water => Element::Metal,
        }
    }

    /// The element this one restrains in the Ke (controlling) cycle.
    pub fn controls(self) -> Self {
        match self {
            Element::Wood => Element::Earth,
            Element::Earth => Element::Water,
            Element::Water => Element::Fire,
            Element::Fire => Element::Metal,
            Element::Metal => Element::Wood,
        }
    }

    /// The element that restrains this one in the Ke cycle.
    pub fn controlled_by(self) -> Self {
        match self {
            Element::Wood => Element::Metal,
            Element::Earth => Element::Wood,
            Element::Water => Element::Earth,
            Element::Fire => Element::Water,
            Element::Metal => Element::Fire,
        }
    }

    /// Zang-Fu organs belonging to this element.
    pub fn organs(self) -> &'static [&'static str] {
        match self {
            Element::Wood => &["Liver", "Gall Bladder"],
            Element::Fire => &["Heart", "Small Intestine", "Pericardium", "San Jiao"],
            Element::Earth => &["Spleen", "Stomach"],
            Element::Metal => &["Lung", "Large Intestine"],
            Element::Water => &["Kidney", "Bladder"],
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Element {
    type Err = ElementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| ElementError::Unknown(s.to_string()))
    }
}

impl serde::Serialize for Element {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> serde::Deserialize<'de> for Element {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_labels_leniently() {
        assert_eq!(Element::from_label("Wood"), Some(Element::Wood));
        assert_eq!(Element::from_label("  fire "), Some(Element::Fire));
        assert_eq!(Element::from_label("Earth (Spleen)"), Some(Element::Earth));
        assert_eq!(Element::from_label("Logam"), Some(Element::Metal));
        assert_eq!(Element::from_label("air"), Some(Element::Water));
        assert_eq!(Element::from_label(""), None);
        assert_eq!(Element::from_label("Aether"), None);
    }

    #[test]
    fn from_str_reports_unknown_label() {
        let err = "Aether".parse::<Element>().expect_err("should reject");
        assert!(matches!(err, ElementError::Unknown(label) if label == "Aether"));
    }

    #[test]
    fn sheng_cycle_closes_after_five_steps() {
        let mut el = Element::Wood;
        for expected in [
            Element::Fire,
            Element::Earth,
            Element::Metal,
            Element::Water,
            Element::Wood,
        ] {
            el = el.generates();
            assert_eq!(el, expected);
        }
    }

    #[test]
    fn ke_cycle_matches_classical_order() {
        assert_eq!(Element::Wood.controls(), Element::Earth);
        assert_eq!(Element::Earth.controls(), Element::Water);
        assert_eq!(Element::Water.controls(), Element::Fire);
        assert_eq!(Element::Fire.controls(), Element::Metal);
        assert_eq!(Element::Metal.controls(), Element::Wood);
    }

    #[test]
    fn inverse_cycles_agree() {
        for el in Element::ALL {
            assert_eq!(el.generates().generated_by(), el);
            assert_eq!(el.controls().controlled_by(), el);
        }
    }

    #[test]
    fn organs_follow_the_zang_fu_pairs() {
        assert_eq!(Element::Wood.organs(), ["Liver", "Gall Bladder"]);
        assert_eq!(Element::Fire.organs().len(), 4);
        assert!(Element::Water.organs().contains(&"Kidney"));
        assert!(Element::ALL.iter().all(|el| !el.organs().is_empty()));
    }

    #[test]
    fn serde_uses_english_labels() {
        let json = serde_json::to_string(&Element::Metal).expect("serialize");
        assert_eq!(json, "\"Metal\"");
        let parsed: Element = serde_json::from_str("\"water\"").expect("deserialize");
        assert_eq!(parsed, Element::Water);
    }
}
