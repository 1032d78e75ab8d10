use serde::{Deserialize, Serialize};

/// Tunable limits of the outline parser (config section `parse`).
///
/// The defaults reproduce the legacy generator; none of them is a structural invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParseOptions {
    /// Paragraph lines must be strictly longer than this to become a category.
    pub paragraph_min_chars: usize,
    /// Paragraph lines must be strictly shorter than this to become a category.
    pub paragraph_max_chars: usize,
    pub max_fallback_categories: usize,
    pub min_sentence_chars: usize,
    pub min_fragment_chars: usize,
    pub max_categories: Option<usize>,
    pub max_leaves_per_category: Option<usize>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            paragraph_min_chars: 5,
            paragraph_max_chars: 200,
            max_fallback_categories: 6,
            min_sentence_chars: 3,
            min_fragment_chars: 2,
            max_categories: None,
            max_leaves_per_category: None,
        }
    }
}

impl ParseOptions {
    pub(super) fn accepts_paragraph(&self, line: &str) -> bool {
        let len = line.chars().count();
        len > self.paragraph_min_chars && len < self.paragraph_max_chars
    }
}
