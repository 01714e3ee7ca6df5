//! In-memory transcript store: useful for testing and ephemeral sessions.

use async_trait::async_trait;
use lifexia_core::error::StoreError;
use lifexia_core::transcript::TranscriptStore;
use lifexia_core::turn::ChatTurn;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Keeps every turn in a Vec, in append order.
#[derive(Clone)]
pub struct InMemoryTranscript {
    turns: Arc<RwLock<Vec<ChatTurn>>>,
}

impl InMemoryTranscript {
    pub fn new() -> Self {
        Self {
            turns: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Every stored turn for every user, in append order.
    pub async fn all(&self) -> Vec<ChatTurn> {
        self.turns.read().await.clone()
    }
}

impl Default for InMemoryTranscript {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TranscriptStore for InMemoryTranscript {
    fn name(&self) -> &str { "memory" }

    async fn append_turn(&self, turn: &ChatTurn) -> Result<(), StoreError> {
        self.turns.write().await.push(turn.clone());
        Ok(())
    }

    async fn list_turns(&self, user_id: &str, limit: usize) -> Result<Vec<ChatTurn>, StoreError> {
        let turns = self.turns.read().await;
        let mut mine: Vec<ChatTurn> = turns
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();

        // stable sort keeps append order for identical timestamps
        mine.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        if mine.len() > limit {
            mine.drain(..mine.len() - limit);
        }
        Ok(mine)
    }

    async fn count(&self, user_id: &str) -> Result<usize, StoreError> {
        Ok(self.turns.read().await.iter().filter(|t| t.user_id == user_id).count())
    }
}
