//! Knowledge base trait: read-only lookup of drug records.
//!
//! Reference data is loaded once at seed time, so lookups are synchronous
//! and infallible. Loading is where errors surface (see
//! [`KnowledgeError`](crate::error::KnowledgeError)).

use crate::record::DrugRecord;

pub trait KnowledgeBase: Send + Sync {
    /// A human-readable name for this store (e.g., "static").
    fn name(&self) -> &str;

    /// Case-insensitive substring match on `name`, then on `generic_name`.
    ///
    /// Returns the first hit in insertion order; `None` for a blank query.
    fn find_by_name(&self, query: &str) -> Option<DrugRecord>;

    /// All records in insertion order.
    fn records(&self) -> Vec<DrugRecord>;

    /// Banned and recalled records in insertion order.
    fn restricted(&self) -> Vec<DrugRecord> {
        self.records()
            .into_iter()
            .filter(DrugRecord::is_restricted)
            .collect()
    }

    /// Lowercased names and generic names, for keyword vocabularies.
    fn vocabulary(&self) -> Vec<String> {
        let mut terms = Vec::new();
        for record in self.records() {
            for term in [&record.name, &record.generic_name] {
                let lower = term.trim().to_lowercase();
                if !lower.is_empty() && !terms.contains(&lower) {
                    terms.push(lower);
                }
            }
        }
        terms
    }
}
