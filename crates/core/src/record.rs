//! Drug reference records held by the knowledge base.
//!
//! Records are immutable reference data: created at seed time, read by the
//! triage path, never written by it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Regulatory standing of a drug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DrugStatus {
    Approved,
    Banned,
    Recalled,
}

impl DrugStatus {
    /// Parse the spellings found in regulator feeds and seed files.
    ///
    /// Combined values such as `"BANNED/RECALLED"` resolve to `Recalled`.
    pub fn parse(raw: &str) -> Option<Self> {
        let lower = raw.trim().to_lowercase();
        if lower.contains("recall") {
            Some(Self::Recalled)
        } else if lower.contains("ban") {
            Some(Self::Banned)
        } else if lower.contains("approv") {
            Some(Self::Approved)
        } else {
            None
        }
    }

    /// Banned and recalled drugs must carry a warning banner.
    pub fn is_restricted(self) -> bool {
        matches!(self, Self::Banned | Self::Recalled)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Approved => "Approved",
            Self::Banned => "Banned",
            Self::Recalled => "Recalled",
        }
    }
}

impl std::fmt::Display for DrugStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for DrugStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("unknown drug status '{value}'"))
    }
}

impl From<DrugStatus> for String {
    fn from(status: DrugStatus) -> Self {
        status.as_str().to_string()
    }
}

/// Who regulates the drug and what they said about it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Regulation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agency: Option<String>,

    /// Free-text notes, shown in the warning banner for restricted drugs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// When the ban or recall took effect
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restricted_on: Option<NaiveDate>,
}

/// A structured drug reference record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrugRecord {
    /// Brand or common name (e.g., "Aspirin")
    pub name: String,

    /// Generic / chemical name
    pub generic_name: String,

    /// Therapeutic category, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    pub status: DrugStatus,

    #[serde(default)]
    pub regulation: Regulation,

    #[serde(default)]
    pub safety_alerts: Vec<String>,

    #[serde(default)]
    pub adverse_effects: Vec<String>,

    #[serde(default)]
    pub interactions: Vec<String>,

    #[serde(default)]
    pub timing_instructions: Vec<String>,

    /// Guidance on stopping the drug
    #[serde(default)]
    pub withdrawal_alerts: Vec<String>,
}

impl DrugRecord {
    /// A bare record with the given status and no alerts.
    pub fn new(name: impl Into<String>, generic_name: impl Into<String>, status: DrugStatus) -> Self {
        Self {
            name: name.into(),
            generic_name: generic_name.into(),
            category: None,
            status,
            regulation: Regulation::default(),
            safety_alerts: Vec::new(),
            adverse_effects: Vec::new(),
            interactions: Vec::new(),
            timing_instructions: Vec::new(),
            withdrawal_alerts: Vec::new(),
        }
    }

    pub fn is_restricted(&self) -> bool {
        self.status.is_restricted()
    }

    /// Case-insensitive substring match on the brand name.
    pub fn name_matches(&self, query_lower: &str) -> bool {
        self.name.to_lowercase().contains(query_lower)
    }

    /// Case-insensitive substring match on the generic name.
    pub fn generic_matches(&self, query_lower: &str) -> bool {
        self.generic_name.to_lowercase().contains(query_lower)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_feed_spellings() {
        assert_eq!(DrugStatus::parse("Approved"), Some(DrugStatus::Approved));
        assert_eq!(DrugStatus::parse("BANNED"), Some(DrugStatus::Banned));
        assert_eq!(DrugStatus::parse("RECALLED"), Some(DrugStatus::Recalled));
        assert_eq!(DrugStatus::parse("BANNED/RECALLED"), Some(DrugStatus::Recalled));
        assert_eq!(DrugStatus::parse("pending"), None);
    }

    #[test]
    fn restricted_statuses() {
        assert!(!DrugStatus::Approved.is_restricted());
        assert!(DrugStatus::Banned.is_restricted());
        assert!(DrugStatus::Recalled.is_restricted());
    }

    #[test]
    fn record_deserializes_with_missing_lists() {
        let json = r#"{"name":"Ranitidine","generic_name":"Ranitidine Hydrochloride","status":"BANNED/RECALLED"}"#;
        let record: DrugRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.status, DrugStatus::Recalled);
        assert!(record.safety_alerts.is_empty());
        assert!(record.regulation.notes.is_none());
    }

    #[test]
    fn unknown_status_is_rejected() {
        let json = r#"{"name":"X","generic_name":"Y","status":"maybe"}"#;
        assert!(serde_json::from_str::<DrugRecord>(json).is_err());
    }

    #[test]
    fn name_matching_is_substring() {
        let record = DrugRecord::new("Metformin", "Metformin Hydrochloride", DrugStatus::Approved);
        assert!(record.name_matches("metf"));
        assert!(record.generic_matches("hydrochloride"));
        assert!(!record.name_matches("aspirin"));
    }
}
