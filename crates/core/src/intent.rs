//! Request classification and reply provenance.

use serde::{Deserialize, Serialize};

/// Coarse category of what the user is asking for.
///
/// Derived per request, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Information about a specific drug or product
    EntityInfo,
    /// Finding a hospital, clinic or emergency care
    FacilitySearch,
    /// Symptoms and general health questions
    GeneralAdvice,
    /// Anything else
    General,
}

impl Intent {
    pub fn as_str(self) -> &'static str {
        match self {
            Intent::EntityInfo => "entity_info",
            Intent::FacilitySearch => "facility_search",
            Intent::GeneralAdvice => "general_advice",
            Intent::General => "general",
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which part of the pipeline produced the reply text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceTag {
    KnowledgeBase,
    Generation,
    FacilityGuidance,
}

impl SourceTag {
    pub fn as_str(self) -> &'static str {
        match self {
            SourceTag::KnowledgeBase => "knowledge-base",
            SourceTag::Generation => "generation",
            SourceTag::FacilityGuidance => "facility-guidance",
        }
    }
}

impl std::fmt::Display for SourceTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
