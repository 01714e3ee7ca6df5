//! Generator trait: the abstraction over text-generation backends.
//!
//! A Generator takes a prompt, a system prompt and an assembled context and
//! returns text. Unlike most fallible seams in this workspace, `generate`
//! never returns an error: every failure is folded into a
//! [`GenerationResult`] carrying a [`GenerationErrorKind`] and the fixed
//! apology text for that kind, which callers display verbatim.
//!
//! Implementations: Ollama-protocol HTTP backend, scripted test doubles.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::error::GenerationError;

/// Input to a single generation call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// The user's message
    pub prompt: String,

    /// Instructions that frame the assistant's behaviour
    pub system_prompt: String,

    /// Knowledge block and recent conversation, possibly empty
    pub context: String,
}

impl GenerationRequest {
    pub fn new(
        prompt: impl Into<String>,
        system_prompt: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            system_prompt: system_prompt.into(),
            context: context.into(),
        }
    }
}

/// The closed set of generation failure modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationErrorKind {
    Timeout,
    ConnectionFailure,
    QuotaExceeded,
    SafetyFiltered,
    EmptyResponse,
    Unknown,
}

impl GenerationErrorKind {
    pub const ALL: [GenerationErrorKind; 6] = [
        Self::Timeout,
        Self::ConnectionFailure,
        Self::QuotaExceeded,
        Self::SafetyFiltered,
        Self::EmptyResponse,
        Self::Unknown,
    ];

    /// The apology shown to the user in place of model output.
    ///
    /// These strings are displayed verbatim by every caller; changing one is
    /// a user-visible change.
    pub fn fallback_text(self) -> &'static str {
        match self {
            Self::Timeout => {
                "Request timed out. The AI model is taking longer than expected. Please try again."
            }
            Self::ConnectionFailure => {
                "Cannot connect to the AI service right now. Please ensure the service is running and try again."
            }
            Self::QuotaExceeded => "Rate limit reached. Please try again in a moment.",
            Self::SafetyFiltered => {
                "I apologize, but I cannot provide a response to this query due to safety guidelines."
            }
            Self::EmptyResponse => {
                "I apologize, but I couldn't generate a response. Please try again."
            }
            Self::Unknown => {
                "I apologize, but I encountered an error processing your request."
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::ConnectionFailure => "connection_failure",
            Self::QuotaExceeded => "quota_exceeded",
            Self::SafetyFiltered => "safety_filtered",
            Self::EmptyResponse => "empty_response",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for GenerationErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a generation call. `text` is always safe to show the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub text: String,
    pub succeeded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<GenerationErrorKind>,
}

impl GenerationResult {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            succeeded: true,
            error_kind: None,
        }
    }

    /// A failed result carrying the fixed apology for `kind`.
    pub fn failure(kind: GenerationErrorKind) -> Self {
        Self {
            text: kind.fallback_text().to_string(),
            succeeded: false,
            error_kind: Some(kind),
        }
    }

    /// Fold a backend outcome into a result, applying the empty-text rule.
    pub fn from_outcome(outcome: Result<String, GenerationError>) -> Self {
        match outcome {
            Ok(text) if text.trim().is_empty() => {
                Self::failure(GenerationErrorKind::EmptyResponse)
            }
            Ok(text) => Self::success(text),
            Err(e) => Self::failure(e.kind),
        }
    }
}

/// The core Generator trait.
///
/// Every text-generation backend implements this trait. The orchestrator
/// calls `generate()` without knowing which backend is in use.
#[async_trait]
pub trait Generator: Send + Sync {
    /// A human-readable name for this backend (e.g., "ollama").
    fn name(&self) -> &str;

    /// Generate text. Must not panic and never surfaces an error: failures
    /// come back as `succeeded == false` with the fallback text.
    async fn generate(&self, request: GenerationRequest) -> GenerationResult;

    /// Best-effort reachability probe; `false` on any failure.
    async fn check_health(&self) -> bool;

    /// Models the backend reports as available. Empty when unknown.
    async fn list_models(&self) -> Vec<String> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_has_distinct_fallback() {
        let mut texts: Vec<&str> = GenerationErrorKind::ALL
            .iter()
            .map(|k| k.fallback_text())
            .collect();
        texts.sort_unstable();
        texts.dedup();
        assert_eq!(texts.len(), GenerationErrorKind::ALL.len());
    }

    #[test]
    fn failure_uses_fixed_text() {
        let result = GenerationResult::failure(GenerationErrorKind::Timeout);
        assert!(!result.succeeded);
        assert_eq!(result.error_kind, Some(GenerationErrorKind::Timeout));
        assert_eq!(result.text, GenerationErrorKind::Timeout.fallback_text());
    }

    #[test]
    fn blank_output_is_empty_response() {
        let result = GenerationResult::from_outcome(Ok("  \n".into()));
        assert_eq!(result.error_kind, Some(GenerationErrorKind::EmptyResponse));
    }

    #[test]
    fn backend_error_keeps_its_kind() {
        let result = GenerationResult::from_outcome(Err(GenerationError::new(
            GenerationErrorKind::QuotaExceeded,
            "429",
        )));
        assert_eq!(result.error_kind, Some(GenerationErrorKind::QuotaExceeded));
        assert_eq!(result.text, "Rate limit reached. Please try again in a moment.");
    }

    #[test]
    fn kind_serializes_snake_case() {
        let json = serde_json::to_string(&GenerationErrorKind::ConnectionFailure).unwrap();
        assert_eq!(json, "\"connection_failure\"");
    }
}
