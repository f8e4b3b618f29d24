//! Text analysis for Lexigraph.
//!
//! - [`keywords`]: ordered, deduplicated keyword extraction
//! - [`stopwords`]: configurable stopword filtering
//! - [`relevance`]: whole-word keyword scoring and related-node ranking

pub mod keywords;
pub mod relevance;
pub mod stopwords;

pub use keywords::{KeywordExtractor, MAX_VOCABULARY, MIN_KEYWORD_LEN};
pub use relevance::{rank_related, RankedNode, Relevance, RelevanceScorer};
pub use stopwords::{StopwordConfig, StopwordFilter};
