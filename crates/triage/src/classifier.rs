//! Intent classification by ordered keyword sets.
//!
//! Each intent owns a keyword set. Sets are checked in a fixed priority
//! order (entity, facility, general condition) and the first set with a
//! case-insensitive substring hit wins; no hit means [`Intent::General`].
//! There is no scoring, so the same message always classifies the same way.

use crate::extractor::MIN_ENTITY_LEN;
use lifexia_core::intent::Intent;

/// Product words that mark a question about a specific drug. Bare
/// "medicine" is left out: it also names a hospital specialty.
pub const ENTITY_KEYWORDS: &[&str] = &[
    "drug",
    "medication",
    "tablet",
    "capsule",
    "syrup",
    "dose",
    "dosage",
    "side effect",
    "interaction",
    "prescription",
    "recall",
    "banned",
];

/// Location and urgent-care words.
pub const FACILITY_KEYWORDS: &[&str] = &[
    "hospital",
    "clinic",
    "emergency",
    "ambulance",
    "urgent care",
    "near me",
    "nearby",
    "nearest",
    "closest",
    "around me",
    "chest pain",
    "heart attack",
    "stroke",
    "unconscious",
    "not breathing",
    "can't breathe",
];

/// Symptoms and common conditions.
pub const CONDITION_KEYWORDS: &[&str] = &[
    "symptom",
    "fever",
    "headache",
    "migraine",
    "cough",
    "cold",
    "flu",
    "pain",
    "ache",
    "nausea",
    "vomit",
    "diarrhea",
    "rash",
    "allergy",
    "infection",
    "sore throat",
    "dizzy",
    "fatigue",
    "diabetes",
    "blood pressure",
    "asthma",
];

/// Classifies messages into intents. Cheap to clone; build once and share.
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    rules: Vec<(Intent, Vec<String>)>,
}

impl IntentClassifier {
    /// A classifier with the built-in keyword sets.
    pub fn new() -> Self {
        let owned = |words: &[&str]| words.iter().map(|w| w.to_string()).collect::<Vec<_>>();
        Self {
            rules: vec![
                (Intent::EntityInfo, owned(ENTITY_KEYWORDS)),
                (Intent::FacilitySearch, owned(FACILITY_KEYWORDS)),
                (Intent::GeneralAdvice, owned(CONDITION_KEYWORDS)),
            ],
        }
    }

    /// Add product names (typically the knowledge-base vocabulary) to the
    /// entity set. Terms the extractor would not accept as a candidate
    /// (blank, or no longer than [`MIN_ENTITY_LEN`]) are skipped.
    pub fn with_entity_terms<I, S>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if let Some((_, words)) = self.rules.iter_mut().find(|(i, _)| *i == Intent::EntityInfo) {
            for term in terms {
                let lower = term.as_ref().trim().to_lowercase();
                if lower.len() > MIN_ENTITY_LEN && !words.contains(&lower) {
                    words.push(lower);
                }
            }
        }
        self
    }

    /// Classify a message. Total: every input, including empty text,
    /// yields an intent.
    pub fn classify(&self, message: &str) -> Intent {
        let lower = message.to_lowercase();
        self.rules
            .iter()
            .find(|(_, words)| words.iter().any(|w| lower.contains(w.as_str())))
            .map(|(intent, _)| *intent)
            .unwrap_or(Intent::General)
    }
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> IntentClassifier {
        IntentClassifier::new().with_entity_terms(["aspirin", "acetylsalicylic acid", "metformin"])
    }

    #[test]
    fn known_drug_name_is_entity_info() {
        assert_eq!(classifier().classify("what is aspirin used for"), Intent::EntityInfo);
        assert_eq!(classifier().classify("Is METFORMIN safe?"), Intent::EntityInfo);
    }

    #[test]
    fn product_word_is_entity_info() {
        assert_eq!(classifier().classify("What are the side effects of this tablet"), Intent::EntityInfo);
    }

    #[test]
    fn emergency_is_facility_search() {
        assert_eq!(classifier().classify("I have chest pain emergency"), Intent::FacilitySearch);
        assert_eq!(classifier().classify("orthopedic hospital near me"), Intent::FacilitySearch);
    }

    #[test]
    fn symptoms_are_general_advice() {
        assert_eq!(classifier().classify("I have a fever and a cough"), Intent::GeneralAdvice);
    }

    #[test]
    fn nothing_matches_is_general() {
        assert_eq!(classifier().classify("hello there"), Intent::General);
        assert_eq!(classifier().classify(""), Intent::General);
    }

    #[test]
    fn entity_outranks_facility_and_condition() {
        // mentions a drug, a symptom and a hospital; entity set is checked first
        assert_eq!(
            classifier().classify("can I take aspirin for a headache before going to the hospital"),
            Intent::EntityInfo
        );
    }

    #[test]
    fn facility_outranks_condition() {
        assert_eq!(classifier().classify("nearest clinic for my fever"), Intent::FacilitySearch);
    }

    #[test]
    fn blank_vocabulary_terms_are_ignored() {
        let c = IntentClassifier::new().with_entity_terms(["", "  "]);
        assert_eq!(c.classify("hello"), Intent::General);
    }

    #[test]
    fn short_vocabulary_terms_are_ignored() {
        let c = IntentClassifier::new().with_entity_terms(["Em", "x"]);
        assert_eq!(c.classify("I have chest pain emergency"), Intent::FacilitySearch);
        assert_eq!(c.classify("say x"), Intent::General);
    }

    #[test]
    fn medicine_specialty_request_is_facility_search() {
        assert_eq!(classifier().classify("general medicine hospital near me"), Intent::FacilitySearch);
        assert_eq!(classifier().classify("internal medicine clinic nearby"), Intent::FacilitySearch);
    }

    #[test]
    fn product_phrasing_without_bare_medicine_is_entity_info() {
        assert_eq!(classifier().classify("is this medication safe"), Intent::EntityInfo);
    }

    #[test]
    fn classification_is_deterministic() {
        let c = classifier();
        let message = "tell me about metformin dosage near me";
        let first = c.classify(message);
        for _ in 0..10 {
            assert_eq!(c.classify(message), first);
        }
    }
}
