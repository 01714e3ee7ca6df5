//! `lifexia drugs` / `lifexia drug`: Browse the knowledge base.

use super::{load_config, open_knowledge};
use lifexia_core::knowledge::KnowledgeBase;
use lifexia_triage::ResponseFormatter;
use std::path::Path;

pub fn list(config_path: Option<&Path>, restricted: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    let knowledge = open_knowledge(&config)?;

    let records = if restricted {
        knowledge.restricted()
    } else {
        knowledge.records()
    };

    if records.is_empty() {
        println!("No matching records.");
        return Ok(());
    }

    for record in &records {
        let marker = if record.is_restricted() { "!" } else { " " };
        println!(
            "{marker} {:<16} {:<28} {}",
            record.name, record.generic_name, record.status
        );
    }
    println!("\n{} record(s)", records.len());
    Ok(())
}

pub fn show(config_path: Option<&Path>, name: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    let knowledge = open_knowledge(&config)?;

    let record = knowledge
        .find_by_name(name)
        .ok_or_else(|| format!("No record matches '{name}'"))?;
    println!("{}", ResponseFormatter::new().format(&record));
    Ok(())
}
