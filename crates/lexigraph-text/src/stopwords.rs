//! Stopword filtering for keyword extraction.
//!
//! The built-in list holds ~150 common English function words. It can be
//! extended with custom stopwords, and individual words can be rescued with
//! an allowlist (e.g. domain acronyms that collide with function words).
//! With the `extended-stopwords` feature, the `stop-words` crate's English
//! list (~500 words) can be merged in.
//!
//! # Example
//!
//! ```rust
//! use lexigraph_text::stopwords::{StopwordConfig, StopwordFilter};
//!
//! let filter = StopwordFilter::new(&StopwordConfig::default());
//! assert!(filter.is_stopword("the"));
//! assert!(!filter.is_stopword("photosynthesis"));
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Built-in English stopwords.
pub const ENGLISH_STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "aren't", "as", "at", "be", "because", "been", "before", "being", "below", "between",
    "both", "but", "by", "can", "cannot", "could", "did", "didn't", "do", "does", "doesn't",
    "doing", "don't", "down", "during", "each", "etc", "even", "ever", "every", "few", "for",
    "from", "further", "get", "gets", "got", "had", "has", "have", "having", "he", "her", "here",
    "hers", "herself", "him", "himself", "his", "how", "however", "i", "if", "in", "into", "is",
    "isn't", "it", "its", "itself", "just", "let", "like", "make", "many", "may", "me", "might",
    "more", "most", "much", "must", "my", "myself", "never", "no", "nor", "not", "now", "of",
    "off", "often", "on", "once", "one", "only", "or", "other", "our", "ours", "ourselves", "out",
    "over", "own", "same", "see", "she", "should", "since", "so", "some", "still", "such", "than",
    "that", "the", "their", "theirs", "them", "themselves", "then", "there", "these", "they",
    "thing", "things", "this", "those", "through", "to", "too", "under", "until", "up", "upon",
    "use", "used", "using", "very", "want", "was", "way", "we", "well", "were", "what", "when",
    "where", "whether", "which", "while", "who", "whom", "why", "will", "with", "within",
    "without", "would", "yet", "you", "your", "yours", "yourself",
];

/// Stopword configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopwordConfig {
    /// Enable stopword filtering.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Merge the `stop-words` crate's English list (requires the
    /// `extended-stopwords` feature; ignored otherwise).
    #[serde(default)]
    pub extended: bool,

    /// Custom stopwords to add.
    #[serde(default)]
    pub custom_stopwords: Vec<String>,

    /// Words to preserve even if they are stopwords.
    #[serde(default)]
    pub allowlist: Vec<String>,
}

fn default_true() -> bool {
    true
}

impl Default for StopwordConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            extended: false,
            custom_stopwords: Vec::new(),
            allowlist: Vec::new(),
        }
    }
}

/// Stopword filter used by the keyword extractor.
#[derive(Clone)]
pub struct StopwordFilter {
    stopwords: HashSet<String>,
    allowlist: HashSet<String>,
    enabled: bool,
}

impl StopwordFilter {
    /// Create a new stopword filter from configuration.
    pub fn new(config: &StopwordConfig) -> Self {
        let mut stopwords: HashSet<String> =
            ENGLISH_STOPWORDS.iter().map(|s| (*s).to_string()).collect();

        if config.extended {
            extend_from_crate(&mut stopwords);
        }

        for word in &config.custom_stopwords {
            stopwords.insert(word.to_lowercase());
        }

        // Extracted tokens are lowercase, so the allowlist is too.
        let allowlist = config.allowlist.iter().map(|w| w.to_lowercase()).collect();

        Self {
            stopwords,
            allowlist,
            enabled: config.enabled,
        }
    }

    /// Create a disabled filter (treats no word as a stopword).
    pub fn disabled() -> Self {
        Self {
            stopwords: HashSet::new(),
            allowlist: HashSet::new(),
            enabled: false,
        }
    }

    /// Check if a word is a stopword (case-insensitive).
    pub fn is_stopword(&self, word: &str) -> bool {
        if !self.enabled {
            return false;
        }
        let lower = word.to_lowercase();
        !self.allowlist.contains(&lower) && self.stopwords.contains(&lower)
    }

    /// Get the number of stopwords in the filter.
    pub fn stopword_count(&self) -> usize {
        self.stopwords.len()
    }

    /// Check if filtering is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for StopwordFilter {
    fn default() -> Self {
        Self::new(&StopwordConfig::default())
    }
}

impl std::fmt::Debug for StopwordFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StopwordFilter")
            .field("enabled", &self.enabled)
            .field("stopword_count", &self.stopwords.len())
            .field("allowlist_count", &self.allowlist.len())
            .finish()
    }
}

#[cfg(feature = "extended-stopwords")]
fn extend_from_crate(stopwords: &mut HashSet<String>) {
    use stop_words::{get, LANGUAGE};

    stopwords.extend(get(LANGUAGE::English).iter().map(|s| s.to_lowercase()));
}

#[cfg(not(feature = "extended-stopwords"))]
fn extend_from_crate(_stopwords: &mut HashSet<String>) {
    log::debug!("extended stopwords requested but the `extended-stopwords` feature is off");
}

// ============================================================================
// Tests
// ============================================================================
