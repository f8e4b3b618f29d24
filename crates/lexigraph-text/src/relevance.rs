//! Keyword relevance scoring.
//!
//! Each keyword is matched as a whole word, case-insensitively, against a
//! node's title and note. Every occurrence is worth 1 point and every
//! occurrence in the title is worth 2 more, so title hits count triple.

use std::cmp::Ordering;

use lexigraph_core::{ContentNode, Corpus};
use regex::Regex;
use serde::Serialize;

/// Extra points for each title occurrence on top of the base point.
pub const TITLE_BONUS: usize = 2;

/// Score and matched keywords for one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Relevance {
    /// Total score (always > 0 for a returned value).
    pub score: usize,
    /// Keywords with at least one whole-word match, in keyword order.
    pub matched: Vec<String>,
}

/// A corpus node together with its relevance.
#[derive(Debug, Clone, Serialize)]
pub struct RankedNode<'a> {
    /// The scored node.
    pub node: &'a ContentNode,
    /// Its relevance.
    #[serde(flatten)]
    pub relevance: Relevance,
}

/// Scores nodes against a fixed keyword list.
///
/// The whole-word patterns are compiled once in [`RelevanceScorer::new`].
#[derive(Debug, Clone)]
pub struct RelevanceScorer {
    patterns: Vec<(String, Regex)>,
}

impl RelevanceScorer {
    /// Compiles one whole-word pattern per non-empty keyword.
    pub fn new<S: AsRef<str>>(keywords: &[S]) -> Self {
        let patterns = keywords
            .iter()
            .map(|k| k.as_ref().trim())
            .filter(|k| !k.is_empty())
            .filter_map(|k| {
                let pattern = format!(r"(?i)\b{}\b", regex::escape(k));
                match Regex::new(&pattern) {
                    Ok(re) => Some((k.to_string(), re)),
                    Err(e) => {
                        log::warn!("skipping keyword {k:?}: {e}");
                        None
                    }
                }
            })
            .collect();
        Self { patterns }
    }

    /// Number of usable keywords.
    pub fn keyword_count(&self) -> usize {
        self.patterns.len()
    }

    /// Scores a node, returning `None` for the excluded source node or a
    /// zero score.
    pub fn score(&self, node: &ContentNode, source_id: Option<&str>) -> Option<Relevance> {
        if source_id == Some(node.id.as_str()) {
            return None;
        }

        let note = node.note.as_deref().unwrap_or("");
        let mut score = 0;
        let mut matched = Vec::new();

        for (keyword, re) in &self.patterns {
            let in_title = re.find_iter(&node.name).count();
            let in_note = re.find_iter(note).count();
            let total = in_title + in_note;
            if total > 0 {
                score += total + TITLE_BONUS * in_title;
                matched.push(keyword.clone());
            }
        }

        (score > 0).then_some(Relevance { score, matched })
    }

    /// Ranks every scoring node in the corpus by score (desc), then name,
    /// then id. A `limit` of `None` returns all scoring nodes.
    pub fn rank<'a>(
        &self,
        corpus: &'a Corpus,
        source_id: Option<&str>,
        limit: Option<usize>,
    ) -> Vec<RankedNode<'a>> {
        let mut ranked: Vec<RankedNode<'a>> = corpus
            .iter()
            .filter_map(|node| {
                self.score(node, source_id)
                    .map(|relevance| RankedNode { node, relevance })
            })
            .collect();

        ranked.sort_by(compare_ranked);
        if let Some(limit) = limit {
            ranked.truncate(limit);
        }
        ranked
    }
}

fn compare_ranked(a: &RankedNode<'_>, b: &RankedNode<'_>) -> Ordering {
    b.relevance
        .score
        .cmp(&a.relevance.score)
        .then_with(|| a.node.name.cmp(&b.node.name))
        .then_with(|| a.node.id.cmp(&b.node.id))
}

/// Ranks corpus nodes related to `keywords`, excluding `source_id`.
pub fn rank_related<'a, S: AsRef<str>>(
    corpus: &'a Corpus,
    keywords: &[S],
    source_id: Option<&str>,
    limit: Option<usize>,
) -> Vec<RankedNode<'a>> {
    RelevanceScorer::new(keywords).rank(corpus, source_id, limit)
}
