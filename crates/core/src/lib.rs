//! # Lifexia Core
//!
//! Domain types, traits, and error definitions for the Lifexia triage
//! assistant. Every collaborator of the triage pipeline (generation backend,
//! knowledge base, transcript store) is a trait here; implementations live in
//! their own crates and are injected into the orchestrator, which keeps them
//! substitutable with test doubles.

pub mod error;
pub mod generation;
pub mod intent;
pub mod knowledge;
pub mod record;
pub mod transcript;
pub mod turn;

// Re-export key types at crate root for ergonomics
pub use error::{GenerationError, KnowledgeError, StoreError, ValidationError};
pub use generation::{Generator, GenerationErrorKind, GenerationRequest, GenerationResult};
pub use intent::{Intent, SourceTag};
pub use knowledge::KnowledgeBase;
pub use record::{DrugRecord, DrugStatus, Regulation};
pub use transcript::TranscriptStore;
pub use turn::{ChatTurn, ConversationWindow, Role};
