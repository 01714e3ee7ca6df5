//! `lifexia chat`: Interactive chat, one message per line.

use super::{build_orchestrator, load_config};
use lifexia_triage::TriageError;
use std::io::Write;
use std::path::Path;
use tokio::io::{AsyncBufReadExt, BufReader};

pub async fn run(config_path: Option<&Path>, user: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    let orchestrator = build_orchestrator(&config).await?;

    println!();
    println!("  Lifexia — ask about medicines, symptoms, or nearby hospitals.");
    println!("  Model:   {}", config.generation.model);
    println!("  History: last {} turns", orchestrator.window());
    println!("  Type 'exit' or Ctrl+D to quit.");
    println!();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("  You > ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if matches!(line.trim(), "exit" | "quit") {
            break;
        }

        match orchestrator.handle(user, &line).await {
            Ok(reply) => {
                println!();
                for text_line in reply.text.lines() {
                    println!("  Lifexia > {text_line}");
                }
                println!();
            }
            // blank lines are not worth ending the session over
            Err(TriageError::Validation(_)) => continue,
            Err(e) => eprintln!("  [Error] {e}"),
        }
    }

    println!();
    println!("  Take care!");
    Ok(())
}
