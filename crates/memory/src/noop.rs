//! No-op transcript store: disables transcript persistence entirely.

use async_trait::async_trait;
use lifexia_core::error::StoreError;
use lifexia_core::transcript::TranscriptStore;
use lifexia_core::turn::ChatTurn;

/// A transcript store that keeps nothing.
pub struct NoopTranscript;

#[async_trait]
impl TranscriptStore for NoopTranscript {
    fn name(&self) -> &str { "none" }

    async fn append_turn(&self, _turn: &ChatTurn) -> Result<(), StoreError> {
        Ok(())
    }

    async fn list_turns(&self, _user_id: &str, _limit: usize) -> Result<Vec<ChatTurn>, StoreError> {
        Ok(Vec::new())
    }

    async fn count(&self, _user_id: &str) -> Result<usize, StoreError> {
        Ok(0)
    }
}
