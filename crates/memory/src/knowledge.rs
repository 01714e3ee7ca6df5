//! Static knowledge base: an immutable, insertion-ordered record list.
//!
//! Loaded once from the built-in seed or a JSON file and shared read-only
//! between requests.

use crate::seed;
use lifexia_core::error::KnowledgeError;
use lifexia_core::knowledge::KnowledgeBase;
use lifexia_core::record::DrugRecord;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct StaticKnowledgeBase {
    records: Arc<Vec<DrugRecord>>,
}

impl StaticKnowledgeBase {
    /// Build from records. Names must be non-blank and unique
    /// (case-insensitive).
    pub fn new(records: Vec<DrugRecord>) -> Result<Self, KnowledgeError> {
        let mut seen: Vec<String> = Vec::with_capacity(records.len());
        for record in &records {
            let key = record.name.trim().to_lowercase();
            if key.is_empty() {
                return Err(KnowledgeError::InvalidRecord("record with empty name".into()));
            }
            if seen.contains(&key) {
                return Err(KnowledgeError::InvalidRecord(format!(
                    "duplicate record name '{}'",
                    record.name
                )));
            }
            seen.push(key);
        }

        Ok(Self {
            records: Arc::new(records),
        })
    }

    /// The built-in seed set.
    pub fn seeded() -> Self {
        Self {
            records: Arc::new(seed::default_records()),
        }
    }

    /// Load records from a JSON array file.
    pub fn from_json_file(path: &Path) -> Result<Self, KnowledgeError> {
        let content = std::fs::read_to_string(path).map_err(|e| KnowledgeError::ReadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let records: Vec<DrugRecord> = serde_json::from_str(&content)
            .map_err(|e| KnowledgeError::InvalidRecord(format!("{}: {e}", path.display())))?;

        info!(path = %path.display(), count = records.len(), "Loaded knowledge seed");
        Self::new(records)
    }

    /// The configured seed file if any, otherwise the built-in set.
    pub fn load(seed_path: Option<&str>) -> Result<Self, KnowledgeError> {
        match seed_path {
            Some(path) => Self::from_json_file(Path::new(path)),
            None => Ok(Self::seeded()),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl KnowledgeBase for StaticKnowledgeBase {
    fn name(&self) -> &str {
        "static"
    }

    fn find_by_name(&self, query: &str) -> Option<DrugRecord> {
        let query_lower = query.trim().to_lowercase();
        if query_lower.is_empty() {
            return None;
        }

        self.records
            .iter()
            .find(|r| r.name_matches(&query_lower))
            .or_else(|| self.records.iter().find(|r| r.generic_matches(&query_lower)))
            .cloned()
    }

    fn records(&self) -> Vec<DrugRecord> {
        self.records.as_ref().clone()
    }
}
