//! Drug-name extraction.
//!
//! A cascade of phrasing patterns runs over the lowercased message; each
//! pattern captures a single token. Captures of [`MIN_ENTITY_LEN`]
//! characters or fewer are skipped and the cascade continues. When no
//! pattern yields a candidate, the knowledge-base vocabulary is scanned for
//! a term that occurs in the message.

use regex_lite::Regex;

/// Captures must be strictly longer than this.
pub const MIN_ENTITY_LEN: usize = 2;

const TOKEN: &str = "([a-z0-9][a-z0-9-]*)";
const ARTICLE: &str = "(?:the |a |an )?";

/// Phrasing patterns, tried in order. `{ARTICLE}` and `{TOKEN}` are
/// substituted when the extractor is built.
const PATTERNS: &[&str] = &[
    r"\bwhat(?:'s| is| are) {ARTICLE}{TOKEN}",
    r"\btell me about {ARTICLE}{TOKEN}",
    r"\binformation (?:on|about) {ARTICLE}{TOKEN}",
    r"\b(?:side effects?|interactions?|dosage|dose|uses|warnings?) (?:of|for|with) {ARTICLE}{TOKEN}",
    r"\b{TOKEN} (?:drug|medicine|medication|tablets?|capsules?|syrup)\b",
];

#[derive(Debug, Clone)]
pub struct EntityExtractor {
    patterns: Vec<Regex>,
    vocabulary: Vec<String>,
}

impl EntityExtractor {
    /// Extractor with the built-in patterns and no vocabulary.
    pub fn new() -> Self {
        let patterns = PATTERNS
            .iter()
            .filter_map(|p| Regex::new(&expand(p)).ok())
            .collect();
        Self {
            patterns,
            vocabulary: Vec::new(),
        }
    }

    /// Terms for the final containment scan. Order is kept; the first term
    /// found in the message wins.
    pub fn with_vocabulary<I, S>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.vocabulary = terms
            .into_iter()
            .map(|t| t.as_ref().trim().to_lowercase())
            .filter(|t| t.len() > MIN_ENTITY_LEN)
            .collect();
        self
    }

    /// The most likely drug name in `message`, lowercased.
    pub fn extract(&self, message: &str) -> Option<String> {
        self.candidates(message).into_iter().next()
    }

    /// Every candidate, in the order the cascade produces them: pattern
    /// captures first, then vocabulary hits. Duplicates are removed.
    pub fn candidates(&self, message: &str) -> Vec<String> {
        let lower = message.to_lowercase();
        let mut found: Vec<String> = Vec::new();

        for re in &self.patterns {
            if let Some(capture) = re.captures(&lower).and_then(|c| c.get(1)) {
                let candidate = capture.as_str().trim_matches('-');
                if candidate.len() > MIN_ENTITY_LEN && !found.iter().any(|f| f == candidate) {
                    found.push(candidate.to_string());
                }
            }
        }

        for term in &self.vocabulary {
            if lower.contains(term.as_str()) && !found.contains(term) {
                found.push(term.clone());
            }
        }

        found
    }

    #[cfg(test)]
    fn pattern_count(&self) -> usize {
        self.patterns.len()
    }
}

impl Default for EntityExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn expand(pattern: &str) -> String {
    pattern.replace("{ARTICLE}", ARTICLE).replace("{TOKEN}", TOKEN)
}
