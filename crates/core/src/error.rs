//! Error types for the Lifexia domain.
//!
//! Each bounded context has its own `thiserror` type; there is no
//! catch-all error, callers convert at their own boundary.

use crate::generation::GenerationErrorKind;
use thiserror::Error;

// --- Bounded context errors ---

/// A message was rejected before entering the triage pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Message is required")]
    EmptyMessage,

    #[error("User id is required")]
    MissingUser,
}

/// A failed generation attempt, classified into one of the fixed kinds.
///
/// Backends produce this internally; it never crosses the `Generator`
/// boundary because `generate` folds it into a `GenerationResult`.
#[derive(Debug, Clone, Error)]
#[error("{kind}: {message}")]
pub struct GenerationError {
    pub kind: GenerationErrorKind,
    pub message: String,
}

impl GenerationError {
    pub fn new(kind: GenerationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(GenerationErrorKind::Unknown, message)
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),
}

#[derive(Debug, Error)]
pub enum KnowledgeError {
    #[error("Failed to read knowledge seed at {path}: {reason}")]
    ReadFailed { path: String, reason: String },

    #[error("Invalid knowledge record: {0}")]
    InvalidRecord(String),
}
