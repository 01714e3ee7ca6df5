//! Command implementations and the wiring they share.

pub mod ask;
pub mod chat;
pub mod doctor;
pub mod drugs;
pub mod history;
pub mod onboard;

use lifexia_config::AppConfig;
use lifexia_core::generation::Generator;
use lifexia_core::knowledge::KnowledgeBase;
use lifexia_core::transcript::TranscriptStore;
use lifexia_memory::{InMemoryTranscript, NoopTranscript, SqliteTranscript, StaticKnowledgeBase};
use lifexia_triage::TriageOrchestrator;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Exit code for rejected input.
pub const EXIT_INVALID_INPUT: i32 = 2;

pub fn config_file(path: Option<&Path>) -> PathBuf {
    path.map(Path::to_path_buf)
        .unwrap_or_else(|| AppConfig::config_dir().join("config.toml"))
}

pub fn load_config(path: Option<&Path>) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let path = config_file(path);
    AppConfig::load_with_env(&path).map_err(|e| format!("Failed to load config: {e}").into())
}

pub fn open_knowledge(config: &AppConfig) -> Result<Arc<dyn KnowledgeBase>, Box<dyn std::error::Error>> {
    let kb = StaticKnowledgeBase::load(config.knowledge.seed_path.as_deref())?;
    Ok(Arc::new(kb))
}

pub async fn open_transcript(config: &AppConfig) -> Result<Arc<dyn TranscriptStore>, Box<dyn std::error::Error>> {
    let store: Arc<dyn TranscriptStore> = match config.transcript.backend.as_str() {
        "memory" => Arc::new(InMemoryTranscript::new()),
        "none" => Arc::new(NoopTranscript),
        _ => {
            let path = config.transcript.resolved_path();
            if let Some(parent) = Path::new(&path).parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            Arc::new(SqliteTranscript::new(&path).await?)
        }
    };
    Ok(store)
}

/// Config → knowledge base + transcript store + generator → orchestrator.
pub async fn build_orchestrator(config: &AppConfig) -> Result<TriageOrchestrator, Box<dyn std::error::Error>> {
    let knowledge = open_knowledge(config)?;
    let transcript = open_transcript(config).await?;
    let generator = lifexia_providers::from_config(&config.generation)?;

    tracing::debug!(
        knowledge = knowledge.name(),
        transcript = transcript.name(),
        generator = generator.name(),
        model = %config.generation.model,
        "Triage pipeline wired"
    );

    Ok(TriageOrchestrator::from_config(config, generator, knowledge, transcript))
}
