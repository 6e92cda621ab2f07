//! Canonical vocabulary lookups.

use serde::Deserialize;

/// Read-only list of canonical label strings (e.g. known spirit class
/// names). Used by the truncation heuristic to recognize cut-off labels
/// without ever completing them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct Vocabulary {
    entries: Vec<String>,
}

impl Vocabulary {
    pub fn new(entries: Vec<String>) -> Self {
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exact membership test, case-sensitive. Report text is upper-case
    /// at the source; callers pass it through unchanged.
    pub fn contains(&self, text: &str) -> bool {
        self.entries.iter().any(|e| e == text)
    }

    /// Whether `text` is a strict prefix of some entry: shorter than the
    /// entry and not itself an entry. This is the truncation signal.
    pub fn is_strict_prefix(&self, text: &str) -> bool {
        if text.is_empty() || self.contains(text) {
            return false;
        }
        self.entries
            .iter()
            .any(|e| e.len() > text.len() && e.starts_with(text))
    }
}
