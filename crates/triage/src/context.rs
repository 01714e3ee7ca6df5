//! Prompt context assembly.
//!
//! The context handed to the generator is built from up to two blocks: a
//! structured knowledge block for a resolved record, then the recent
//! conversation, oldest turn first. The window is taken as given; callers
//! build it before the in-flight turn is persisted, so that turn never
//! appears as history.

use lifexia_core::intent::Intent;
use lifexia_core::record::DrugRecord;
use lifexia_core::turn::ConversationWindow;

#[derive(Debug, Clone, Copy, Default)]
pub struct ContextAssembler;

impl ContextAssembler {
    pub fn new() -> Self {
        Self
    }

    /// Build the context string. Empty history with no record yields `""`.
    pub fn assemble(&self, history: &ConversationWindow, record: Option<&DrugRecord>, intent: Intent) -> String {
        let mut blocks: Vec<String> = Vec::new();

        if let Some(record) = record {
            blocks.push(knowledge_block(record));
        }

        if !history.is_empty() {
            let mut block = String::from("Recent conversation:");
            for turn in history.turns() {
                block.push('\n');
                block.push_str(turn.role.label());
                block.push_str(": ");
                block.push_str(turn.text.trim());
            }
            blocks.push(block);
        }

        if blocks.is_empty() {
            return String::new();
        }

        if let Some(note) = focus_note(intent, record.is_some()) {
            blocks.push(note.to_string());
        }

        blocks.join("\n\n")
    }
}

fn knowledge_block(record: &DrugRecord) -> String {
    let mut lines = vec![
        "Drug Information:".to_string(),
        format!("- Name: {}", record.name),
    ];
    if !record.generic_name.trim().is_empty() {
        lines.push(format!("- Generic name: {}", record.generic_name));
    }
    if let Some(category) = record.category.as_deref() {
        lines.push(format!("- Category: {category}"));
    }

    let mut status = format!("- Status: {}", record.status);
    if let Some(agency) = record.regulation.agency.as_deref() {
        status.push_str(&format!(" ({agency})"));
    }
    if let Some(notes) = record.regulation.notes.as_deref() {
        status.push_str(&format!(": {notes}"));
    }
    lines.push(status);

    list(&mut lines, "Safety alerts", &record.safety_alerts);
    list(&mut lines, "Withdrawal alerts", &record.withdrawal_alerts);
    list(&mut lines, "Side effects", &record.adverse_effects);
    if !record.interactions.is_empty() {
        lines.push(format!("- Interactions: {}", record.interactions.join(", ")));
    }

    lines.join("\n")
}

fn list(lines: &mut Vec<String>, label: &str, items: &[String]) {
    if !items.is_empty() {
        lines.push(format!("- {label}: {}", items.join("; ")));
    }
}

fn focus_note(intent: Intent, has_record: bool) -> Option<&'static str> {
    match intent {
        Intent::EntityInfo if has_record => {
            Some("Answer using the drug information above and mention any warnings it lists.")
        }
        Intent::GeneralAdvice => {
            Some("Give general guidance only and suggest seeing a doctor if symptoms persist or worsen.")
        }
        _ => None,
    }
}
