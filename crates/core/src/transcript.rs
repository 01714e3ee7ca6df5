//! Transcript store trait: append-only chat log keyed by user.

use async_trait::async_trait;
use crate::error::StoreError;
use crate::turn::ChatTurn;

#[async_trait]
pub trait TranscriptStore: Send + Sync {
    /// A human-readable name for this store (e.g., "sqlite").
    fn name(&self) -> &str;

    /// Append a turn. Turns are never updated or deleted through this trait.
    async fn append_turn(&self, turn: &ChatTurn) -> Result<(), StoreError>;

    /// The most recent `limit` turns for `user_id`, oldest first.
    async fn list_turns(&self, user_id: &str, limit: usize) -> Result<Vec<ChatTurn>, StoreError>;

    /// Total number of turns stored for `user_id`.
    async fn count(&self, user_id: &str) -> Result<usize, StoreError>;
}
