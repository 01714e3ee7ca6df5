//! Deterministic replies for facility-search requests.

use serde::Serialize;

/// Words that get the emergency preamble in front of the reply.
pub const EMERGENCY_KEYWORDS: &[&str] = &[
    "emergency",
    "ambulance",
    "chest pain",
    "heart attack",
    "stroke",
    "unconscious",
    "severe bleeding",
    "not breathing",
    "can't breathe",
    "seizure",
    "overdose",
    "poisoning",
];

pub const EMERGENCY_PREAMBLE: &str = "If this is a medical emergency, call your local emergency number \
(108 or 112 in India) or go to the nearest emergency department now. Do not wait for an online reply.";

/// Hospital specialties the finder can filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Specialty {
    Orthopaedic,
    Gynaecology,
    Multispeciality,
    Medicine,
    Skin,
}

impl Specialty {
    /// Checked in this order; the first specialty with a keyword hit wins.
    pub const ALL: [Specialty; 5] = [
        Specialty::Orthopaedic,
        Specialty::Gynaecology,
        Specialty::Multispeciality,
        Specialty::Medicine,
        Specialty::Skin,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Specialty::Orthopaedic => "orthopaedic",
            Specialty::Gynaecology => "gynaecology",
            Specialty::Multispeciality => "multispeciality",
            Specialty::Medicine => "medicine",
            Specialty::Skin => "skin",
        }
    }

    fn keywords(self) -> &'static [&'static str] {
        match self {
            Specialty::Orthopaedic => &["orthopedic", "orthopaedic", "ortho", "bone", "joint", "fracture"],
            Specialty::Gynaecology => &[
                "gynae",
                "gynec",
                "gynaec",
                "women",
                "pregnan",
                "maternity",
                "obstetr",
            ],
            Specialty::Multispeciality => &["multispeciality", "multispecialty", "multi specialty", "general hospital"],
            Specialty::Medicine => &["general medicine", "physician", "internal medicine", "medicine"],
            Specialty::Skin => &["skin", "derma"],
        }
    }

    /// The specialty named in `message`, if any.
    pub fn detect(message: &str) -> Option<Specialty> {
        let lower = message.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|s| s.keywords().iter().any(|k| lower.contains(k)))
    }
}

impl std::fmt::Display for Specialty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn is_emergency(message: &str) -> bool {
    let lower = message.to_lowercase();
    EMERGENCY_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// Facility guidance text for `message`.
pub fn guidance(message: &str) -> String {
    let finder = match Specialty::detect(message) {
        Some(specialty) => format!(
            "I can help you find {specialty} hospitals near you. Open the hospital map to see nearby options and directions."
        ),
        None => "I can help you find hospitals and clinics near you. Open the hospital map to see nearby options \
                 and directions."
            .to_string(),
    };

    if is_emergency(message) {
        format!("{EMERGENCY_PREAMBLE}\n\n{finder}")
    } else {
        finder
    }
}
