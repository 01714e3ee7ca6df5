//! Chat transcript value objects.
//!
//! A [`ChatTurn`] is one side of an exchange, written once and never
//! mutated. A [`ConversationWindow`] is the bounded, oldest-first slice of
//! prior turns used as generation context; it is recomputed per request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The person asking
    User,
    /// The assistant's reply
    Assistant,
}

impl Role {
    /// Label used when rendering history into a prompt.
    pub fn label(self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Assistant => "Assistant",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "user" => Some(Role::User),
            "assistant" | "bot" => Some(Role::Assistant),
            _ => None,
        }
    }
}

/// A single persisted transcript entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    /// Unique turn ID
    pub id: String,

    /// The user whose transcript this belongs to
    pub user_id: String,

    /// Who said it
    pub role: Role,

    /// What was said
    pub text: String,

    /// On user turns, the reply that was returned for this message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_text: Option<String>,

    /// When the turn was produced
    pub timestamp: DateTime<Utc>,
}

impl ChatTurn {
    /// A user message, timestamped now.
    pub fn user(user_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(user_id, Role::User, text)
    }

    /// An assistant reply, timestamped now.
    pub fn assistant(user_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(user_id, Role::Assistant, text)
    }

    fn new(user_id: impl Into<String>, role: Role, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            role,
            text: text.into(),
            response_text: None,
            timestamp: Utc::now(),
        }
    }

    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.response_text = Some(response.into());
        self
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// The most recent `capacity` turns for a user, oldest first.
///
/// Construction is the only way to fill a window, so it can never exceed
/// its capacity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversationWindow {
    turns: Vec<ChatTurn>,
    capacity: usize,
}

impl ConversationWindow {
    /// Default number of prior turns carried into context.
    pub const DEFAULT_CAPACITY: usize = 5;

    /// Build a window from turns in any order, keeping the newest
    /// `capacity` and returning them chronologically.
    pub fn from_turns(mut turns: Vec<ChatTurn>, capacity: usize) -> Self {
        // stable: equal timestamps keep store order
        turns.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        if turns.len() > capacity {
            turns.drain(..turns.len() - capacity);
        }
        Self { turns, capacity }
    }

    pub fn empty(capacity: usize) -> Self {
        Self {
            turns: Vec::new(),
            capacity,
        }
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn turns_at(n: usize) -> Vec<ChatTurn> {
        let base = Utc::now();
        (0..n)
            .map(|i| ChatTurn::user("u1", format!("msg {i}")).at(base + Duration::seconds(i as i64)))
            .collect()
    }

    #[test]
    fn window_keeps_newest_oldest_first() {
        let mut turns = turns_at(8);
        turns.reverse();
        let window = ConversationWindow::from_turns(turns, 5);
        assert_eq!(window.len(), 5);
        let texts: Vec<&str> = window.turns().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, ["msg 3", "msg 4", "msg 5", "msg 6", "msg 7"]);
    }

    #[test]
    fn window_smaller_than_capacity() {
        let window = ConversationWindow::from_turns(turns_at(2), 5);
        assert_eq!(window.len(), 2);
        assert_eq!(window.capacity(), 5);
    }

    #[test]
    fn zero_capacity_window_is_empty() {
        let window = ConversationWindow::from_turns(turns_at(3), 0);
        assert!(window.is_empty());
    }

    #[test]
    fn role_parse_accepts_legacy_bot() {
        assert_eq!(Role::parse("bot"), Some(Role::Assistant));
        assert_eq!(Role::parse("user"), Some(Role::User));
        assert_eq!(Role::parse("system"), None);
    }

    #[test]
    fn turn_serialization() {
        let turn = ChatTurn::user("u1", "hello").with_response("hi there");
        let json = serde_json::to_string(&turn).unwrap();
        assert!(json.contains("\"role\":\"user\""));
        let back: ChatTurn = serde_json::from_str(&json).unwrap();
        assert_eq!(back, turn);
    }
}
