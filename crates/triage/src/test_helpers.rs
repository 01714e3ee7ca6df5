//! Test doubles for the triage pipeline.

use async_trait::async_trait;
use lifexia_core::error::StoreError;
use lifexia_core::generation::{GenerationErrorKind, GenerationRequest, GenerationResult, Generator};
use lifexia_core::transcript::TranscriptStore;
use lifexia_core::turn::ChatTurn;
use std::sync::Mutex;
use std::time::Duration;

/// Returns a fixed result and records every request it receives.
pub struct ScriptedGenerator {
    result: GenerationResult,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedGenerator {
    pub fn replying(text: &str) -> Self {
        Self {
            result: GenerationResult::success(text),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(kind: GenerationErrorKind) -> Self {
        Self {
            result: GenerationResult::failure(kind),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Generator for ScriptedGenerator {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, request: GenerationRequest) -> GenerationResult {
        self.requests.lock().unwrap().push(request);
        self.result.clone()
    }

    async fn check_health(&self) -> bool {
        true
    }

    async fn list_models(&self) -> Vec<String> {
        vec!["scripted-model".into()]
    }
}

/// Never answers within any sane timeout.
pub struct StallingGenerator;

#[async_trait]
impl Generator for StallingGenerator {
    fn name(&self) -> &str {
        "stalling"
    }

    async fn generate(&self, _request: GenerationRequest) -> GenerationResult {
        tokio::time::sleep(Duration::from_secs(24 * 3600)).await;
        GenerationResult::success("too late")
    }

    async fn check_health(&self) -> bool {
        tokio::time::sleep(Duration::from_secs(24 * 3600)).await;
        true
    }
}

/// Every write and read fails.
pub struct FailingTranscript;

#[async_trait]
impl TranscriptStore for FailingTranscript {
    fn name(&self) -> &str {
        "failing"
    }

    async fn append_turn(&self, _turn: &ChatTurn) -> Result<(), StoreError> {
        Err(StoreError::Storage("disk full".into()))
    }

    async fn list_turns(&self, _user_id: &str, _limit: usize) -> Result<Vec<ChatTurn>, StoreError> {
        Err(StoreError::QueryFailed("database locked".into()))
    }

    async fn count(&self, _user_id: &str) -> Result<usize, StoreError> {
        Err(StoreError::QueryFailed("database locked".into()))
    }
}
