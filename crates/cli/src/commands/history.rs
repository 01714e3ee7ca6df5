//! `lifexia history`: Show a user's recent turns.

use super::{EXIT_INVALID_INPUT, load_config, open_knowledge, open_transcript};
use lifexia_core::transcript::TranscriptStore;
use lifexia_core::turn::Role;
use lifexia_triage::{TriageError, TriageOrchestrator};
use std::path::Path;

pub async fn run(
    config_path: Option<&Path>,
    user: &str,
    limit: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    let transcript = open_transcript(&config).await?;
    let count = transcript.count(user).await.unwrap_or(0);

    let orchestrator = TriageOrchestrator::new(
        lifexia_providers::from_config(&config.generation)?,
        open_knowledge(&config)?,
        transcript,
    );

    let limit = limit.unwrap_or(config.history.list_limit);
    let turns = match orchestrator.history(user, limit).await {
        Ok(turns) => turns,
        Err(TriageError::Validation(e)) => {
            eprintln!("error: {e}");
            std::process::exit(EXIT_INVALID_INPUT);
        }
        Err(e) => return Err(e.into()),
    };

    if turns.is_empty() {
        println!("No conversation history for '{user}'.");
        return Ok(());
    }

    println!("Showing {} of {count} turns for '{user}':\n", turns.len());
    for turn in turns {
        let stamp = turn.timestamp.format("%Y-%m-%d %H:%M:%S");
        let speaker = match turn.role {
            Role::User => "You",
            Role::Assistant => "Lifexia",
        };
        let first_line = turn.text.lines().next().unwrap_or_default();
        println!("  [{stamp}] {speaker}: {first_line}");
    }

    Ok(())
}
