//! Patient observation records.
//!
//! Every field is optional on the wire and defaults to empty, so a caller can send `{}` and get an
//! empty differential back rather than an error. Unknown keys are ignored, and the camelCase names
//! used by browser clients (`selectedSymptoms`, `bodyColor`, ...) are accepted as aliases.

use crate::normalize::{normalize, split_phrases};
use crate::CdssResult;
use serde::{Deserialize, Serialize};

/// Tongue inspection findings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TongueObservation {
    #[serde(alias = "bodyColor")]
    pub body_color: String,
    #[serde(alias = "coatingColor")]
    pub coating_color: String,
    /// Recorded for the practitioner; not part of the scored description.
    #[serde(alias = "coatingQuality")]
    pub coating_quality: String,
    #[serde(alias = "specialFeatures")]
    pub special_features: Vec<String>,
}

/// Pulse palpation findings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PulseObservation {
    pub qualities: Vec<String>,
}

/// Everything the practitioner recorded for one analysis.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatientObservation {
    /// Free-text narrative; phrases are delimited by newlines, commas or periods.
    pub symptoms: String,
    /// Checklist symptom labels.
    #[serde(alias = "selectedSymptoms")]
    pub selected_symptoms: Vec<String>,
    pub tongue: TongueObservation,
    pub pulse: PulseObservation,
}

impl PatientObservation {
    /// Parse an observation from JSON.
    pub fn from_json(text: &str) -> CdssResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Parse an observation from YAML.
    pub fn from_yaml(text: &str) -> CdssResult<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Normalized narrative phrases followed by normalized checklist labels, without duplicates.
    ///
    /// Short narrative fragments are dropped as noise; checklist labels are kept whatever their
    /// length.
    pub fn symptom_pool(&self) -> Vec<String> {
        let checklist = self
            .selected_symptoms
            .iter()
            .map(|label| normalize(label))
            .filter(|label| !label.is_empty());

        let mut pool: Vec<String> = Vec::new();
        for phrase in split_phrases(&self.symptoms).into_iter().chain(checklist) {
            if !pool.contains(&phrase) {
                pool.push(phrase);
            }
        }
        pool
    }

    /// Body colour, coating colour and special features as one normalized string.
    pub fn tongue_description(&self) -> String {
        let tongue = &self.tongue;
        let parts: Vec<&str> = [tongue.body_color.as_str(), tongue.coating_color.as_str()]
            .into_iter()
            .chain(tongue.special_features.iter().map(String::as_str))
            .collect();
        normalize(&parts.join(" "))
    }

    /// Normalized pulse qualities; blank labels are dropped.
    pub fn pulse_pool(&self) -> Vec<String> {
        self.pulse
            .qualities
            .iter()
            .map(|q| normalize(q))
            .filter(|q| !q.is_empty())
            .collect()
    }

    /// True when nothing at all was recorded.
    pub fn is_empty(&self) -> bool {
        self.symptom_pool().is_empty()
            && self.tongue_description().is_empty()
            && self.pulse_pool().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CdssError;

    #[test]
    fn empty_json_object_is_a_valid_observation() {
        let obs = PatientObservation::from_json("{}").expect("parse");
        assert_eq!(obs, PatientObservation::default());
        assert!(obs.is_empty());
    }

    #[test]
    fn symptom_pool_splits_normalizes_and_merges_checklist() {
        let obs = PatientObservation {
            symptoms: "Mudah lelah, jantung BERDEBAR.\nok".into(),
            selected_symptoms: vec![
                "berdebar".into(),
                "jantung berdebar".into(),
                " ".into(),
                "OK".into(),
            ],
            ..Default::default()
        };
        assert_eq!(
            obs.symptom_pool(),
            vec!["mudah lelah", "jantung berdebar", "berdebar", "ok"]
        );
    }

    #[test]
    fn tongue_description_skips_coating_quality() {
        let obs = PatientObservation {
            tongue: TongueObservation {
                body_color: "Pale".into(),
                coating_color: "White".into(),
                coating_quality: "Sticky".into(),
                special_features: vec!["Teeth-marks".into()],
            },
            ..Default::default()
        };
        assert_eq!(obs.tongue_description(), "pale white teeth marks");
    }

    #[test]
    fn pulse_pool_drops_blank_labels() {
        let obs = PatientObservation {
            pulse: PulseObservation {
                qualities: vec!["Thready/Fine".into(), "  ".into()],
            },
            ..Default::default()
        };
        assert_eq!(obs.pulse_pool(), vec!["thready fine"]);
    }

    #[test]
    fn parses_yaml_documents() {
        let yaml = "symptoms: pusing\ntongue:\n  body_color: Red\npulse:\n  qualities: [Wiry]\n";
        let obs = PatientObservation::from_yaml(yaml).expect("parse");
        assert_eq!(obs.tongue.body_color, "Red");
        assert_eq!(obs.pulse.qualities, vec!["Wiry"]);
    }

    #[test]
    fn accepts_camel_case_keys_and_ignores_unknown_ones() {
        let json = r#"{
            "symptoms": "pusing",
            "selectedSymptoms": ["marah"],
            "tongue": {"bodyColor": "Red", "coatingColor": "Yellow", "specialFeatures": ["Dry"]},
            "patientName": "ignored"
        }"#;
        let obs = PatientObservation::from_json(json).expect("parse");
        assert_eq!(obs.selected_symptoms, vec!["marah"]);
        assert_eq!(obs.tongue_description(), "red yellow dry");
    }

    #[test]
    fn rejects_wrongly_typed_fields() {
        let err = PatientObservation::from_json(r#"{"symptoms": 5}"#).expect_err("wrong type");
        assert!(matches!(err, CdssError::InvalidJson(_)));

        let err = PatientObservation::from_yaml("pulse: Wiry\n").expect_err("wrong shape");
        assert!(matches!(err, CdssError::InvalidYaml(_)));
    }
}
