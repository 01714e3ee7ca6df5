//! Deterministic rendering of a drug record as a reply.

use lifexia_core::record::{DrugRecord, DrugStatus};

/// Closing line of every knowledge-base reply.
pub const DISCLAIMER: &str = "This information is for general awareness only. \
Always consult your doctor or pharmacist before starting, stopping, or changing any medicine.";

/// Renders [`DrugRecord`]s. Same record in, same text out.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseFormatter;

impl ResponseFormatter {
    pub fn new() -> Self {
        Self
    }

    /// Render `record`. A restricted record opens with a warning banner;
    /// an approved one opens with its title followed by a status line.
    /// Empty sections are left out.
    pub fn format(&self, record: &DrugRecord) -> String {
        let mut blocks: Vec<String> = Vec::new();

        if record.is_restricted() {
            blocks.push(banner(record));
            blocks.push(title(record));
        } else {
            blocks.push(format!("{}\n{}", title(record), status_line(record)));
        }

        push_bullets(&mut blocks, "Safety alerts", &record.safety_alerts);
        push_bullets(&mut blocks, "Withdrawal alerts", &record.withdrawal_alerts);
        push_bullets(&mut blocks, "Side effects", &record.adverse_effects);
        push_bullets(&mut blocks, "When to take", &record.timing_instructions);

        if !record.interactions.is_empty() {
            blocks.push(format!("Interactions: {}", record.interactions.join(", ")));
        }

        blocks.push(DISCLAIMER.to_string());
        blocks.join("\n\n")
    }
}

fn title(record: &DrugRecord) -> String {
    let generic = record.generic_name.trim();
    if generic.is_empty() {
        record.name.clone()
    } else {
        format!("{} ({})", record.name, generic)
    }
}

fn status_line(record: &DrugRecord) -> String {
    match agency(record) {
        Some(agency) => format!("Status: {} ({agency})", record.status),
        None => format!("Status: {}", record.status),
    }
}

fn banner(record: &DrugRecord) -> String {
    let verb = match record.status {
        DrugStatus::Recalled => "RECALLED",
        DrugStatus::Banned => "BANNED",
        DrugStatus::Approved => "RESTRICTED",
    };
    let mut line = format!("WARNING: {} HAS BEEN {verb}", record.name.to_uppercase());

    if let Some(agency) = agency(record) {
        line.push_str(&format!(" BY {}", agency.to_uppercase()));
    }
    if let Some(date) = record.regulation.restricted_on {
        line.push_str(&format!(" ON {}", date.format("%Y-%m-%d")));
    }
    line.push('.');

    let notes = record.regulation.notes.as_deref().map(str::trim).unwrap_or_default();
    if !notes.is_empty() {
        line.push(' ');
        line.push_str(notes);
        if !notes.ends_with('.') {
            line.push('.');
        }
    }
    line.push_str(" Do not use this medicine; ask your doctor about alternatives.");
    line
}

fn agency(record: &DrugRecord) -> Option<&str> {
    record.regulation.agency.as_deref().map(str::trim).filter(|a| !a.is_empty())
}

fn push_bullets(blocks: &mut Vec<String>, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let mut block = format!("{heading}:");
    for item in items {
        block.push_str("\n- ");
        block.push_str(item);
    }
    blocks.push(block);
}
