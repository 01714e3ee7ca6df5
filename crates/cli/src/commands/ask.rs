//! `lifexia ask`: Answer one message.

use super::{EXIT_INVALID_INPUT, build_orchestrator, load_config};
use lifexia_triage::TriageError;
use std::path::Path;

pub async fn run(
    config_path: Option<&Path>,
    user: &str,
    message: &str,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    let orchestrator = build_orchestrator(&config).await?;

    match orchestrator.handle(user, message).await {
        Ok(reply) if json => println!("{}", serde_json::to_string_pretty(&reply)?),
        Ok(reply) => {
            println!("{}", reply.text);
            eprintln!("  [{}]", reply.source);
        }
        Err(TriageError::Validation(e)) => {
            eprintln!("error: {e}");
            std::process::exit(EXIT_INVALID_INPUT);
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
