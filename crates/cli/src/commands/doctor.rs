//! `lifexia doctor`: Diagnose configuration, stores and the backend.

use super::{config_file, load_config, open_knowledge, open_transcript};
use lifexia_core::generation::Generator;
use lifexia_core::knowledge::KnowledgeBase;
use lifexia_core::transcript::TranscriptStore;
use std::path::Path;

pub async fn run(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    println!("Lifexia Doctor — System Diagnostics");
    println!("===================================\n");

    let mut issues = 0;

    let path = config_file(config_path);
    if !path.exists() {
        println!("  ⚠️  No config file at {} (defaults in use; run `lifexia onboard`)", path.display());
        issues += 1;
    }

    let config = match load_config(config_path) {
        Ok(config) => {
            println!("  ✅ Config valid");
            config
        }
        Err(e) => {
            println!("  ❌ {e}");
            println!("\n  1 blocking issue found.");
            return Ok(());
        }
    };

    match open_knowledge(&config) {
        Ok(kb) => {
            let records = kb.records();
            let restricted = records.iter().filter(|r| r.is_restricted()).count();
            println!("  ✅ Knowledge base: {} records ({restricted} restricted)", records.len());
        }
        Err(e) => {
            println!("  ❌ Knowledge base: {e}");
            issues += 1;
        }
    }

    match open_transcript(&config).await {
        Ok(store) => println!("  ✅ Transcript store: {}", store.name()),
        Err(e) => {
            println!("  ❌ Transcript store: {e}");
            issues += 1;
        }
    }

    match lifexia_providers::from_config(&config.generation) {
        Ok(generator) => {
            if generator.check_health().await {
                println!("  ✅ {} reachable at {}", generator.name(), config.generation.host);
                let models = generator.list_models().await;
                if models.iter().any(|m| m == &config.generation.model) {
                    println!("  ✅ Model '{}' available", config.generation.model);
                } else {
                    println!(
                        "  ⚠️  Model '{}' not found (available: {})",
                        config.generation.model,
                        if models.is_empty() { "none".to_string() } else { models.join(", ") }
                    );
                    issues += 1;
                }
            } else {
                println!("  ❌ {} not reachable at {}", generator.name(), config.generation.host);
                issues += 1;
            }
        }
        Err(e) => {
            println!("  ❌ Generation backend: {e}");
            issues += 1;
        }
    }

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
