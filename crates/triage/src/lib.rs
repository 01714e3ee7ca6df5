//! # Lifexia Triage
//!
//! The per-request pipeline: classify the message, answer drug questions
//! from the knowledge base, send everything else to the generator with a
//! bounded context, and log the exchange.
//!
//! ```text
//! message ─▶ IntentClassifier ─┬─▶ facility guidance
//!                              ├─▶ EntityExtractor ─▶ KnowledgeBase ─▶ ResponseFormatter
//!                              └─▶ ContextAssembler ─▶ Generator (time-boxed)
//!                                          │
//!                                          ▼
//!                                   TranscriptStore
//! ```

pub mod classifier;
pub mod context;
pub mod extractor;
pub mod facility;
pub mod formatter;
pub mod orchestrator;
pub mod prompt;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use classifier::IntentClassifier;
pub use context::ContextAssembler;
pub use extractor::EntityExtractor;
pub use facility::Specialty;
pub use formatter::{DISCLAIMER, ResponseFormatter};
pub use orchestrator::{TriageError, TriageOrchestrator, TriageReply, TriageState};
