//! Transcript stores and the drug knowledge base for Lifexia.

pub mod in_memory;
pub mod knowledge;
pub mod noop;
pub mod seed;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use in_memory::InMemoryTranscript;
pub use knowledge::StaticKnowledgeBase;
pub use noop::NoopTranscript;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteTranscript;
