//! Keyword extraction.
//!
//! Turns free text into an ordered list of lowercase keywords: punctuation
//! other than hyphens is stripped, whitespace collapsed, and tokens shorter
//! than three characters, stopwords, pure digit runs and repeats are
//! discarded. No stemming is performed.

use std::collections::HashSet;
use std::sync::LazyLock;

use lexigraph_core::ContentNode;
use regex::Regex;

use crate::stopwords::{StopwordConfig, StopwordFilter};

/// Minimum token length (in characters) for a keyword.
pub const MIN_KEYWORD_LEN: usize = 3;

/// Largest vocabulary a concept map accepts.
pub const MAX_VOCABULARY: usize = 35;

static STRIP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s-]").expect("Invalid strip regex"));

static DIGITS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+$").expect("Invalid digits regex"));

/// Extracts keywords from text.
#[derive(Debug, Clone, Default)]
pub struct KeywordExtractor {
    stopwords: StopwordFilter,
    limit: Option<usize>,
}

impl KeywordExtractor {
    /// Creates an extractor with the built-in stopword list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an extractor with a configured stopword filter.
    pub fn with_stopwords(config: &StopwordConfig) -> Self {
        Self {
            stopwords: StopwordFilter::new(config),
            limit: None,
        }
    }

    /// Caps the number of keywords returned.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Extracts keywords in first-encounter order.
    pub fn extract(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        let stripped = STRIP_RE.replace_all(&lowered, " ");

        let mut seen = HashSet::new();
        let mut keywords = Vec::new();

        for token in stripped.split_whitespace() {
            if self.limit.is_some_and(|limit| keywords.len() >= limit) {
                break;
            }
            if token.chars().count() < MIN_KEYWORD_LEN
                || DIGITS_RE.is_match(token)
                || self.stopwords.is_stopword(token)
            {
                continue;
            }
            if seen.insert(token.to_string()) {
                keywords.push(token.to_string());
            }
        }

        log::debug!("extracted {} keywords", keywords.len());
        keywords
    }

    /// Extracts keywords from a node's title and note.
    pub fn extract_from_node(&self, node: &ContentNode) -> Vec<String> {
        self.extract(&node.text())
    }
}

// ============================================================================
// Tests
// ============================================================================
