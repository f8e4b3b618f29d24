//! ConceptGraphBuilder: vocabulary + scoped corpus to a concept map.
//!
//! The build runs in four phases:
//!
//! 1. Resolve the vocabulary (explicit, or keywords of the designated node)
//!    and the scoped corpus.
//! 2. Scan the corpus once, collecting per-concept occurrences and hit
//!    depths, per-pair co-occurrence counts, and relationship votes.
//! 3. Split surviving concepts into major and detail tiers at the lower
//!    median of their mean hit depth, and assign each detail to a major.
//! 4. Emit nodes, implicit hierarchy edges, and one semantic edge per
//!    co-occurring pair.
//!
//! Validation problems are returned as [`BuildOutcome::Rejected`], never as
//! errors. Hitting a scan cap truncates the result instead of failing it.

use lexigraph_core::{concept_id, ContentNode, Corpus, Scope, CORE_ID};
use lexigraph_text::{KeywordExtractor, MAX_VOCABULARY};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::classifier::{PatternClassifier, RelationClassifier};
use crate::{ConceptEdge, ConceptMap, ConceptNode, Level, Relationship};

/// Smallest vocabulary that can produce a map.
pub const MIN_VOCABULARY: usize = 2;

/// Title used when neither the request nor a designated node provides one.
pub const DEFAULT_TITLE: &str = "Concept Map";

// ============================================================================
// Request types
// ============================================================================

/// One concept in an explicit vocabulary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VocabularyEntry {
    /// Concept label.
    pub label: String,
    /// Externally supplied importance; defaults to the occurrence count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub importance: Option<f32>,
    /// Label of the major this concept should sit under if it ends up as a
    /// detail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

impl VocabularyEntry {
    /// Creates an entry with just a label.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            importance: None,
            parent: None,
        }
    }

    /// Sets the importance.
    pub fn with_importance(mut self, importance: f32) -> Self {
        self.importance = Some(importance);
        self
    }

    /// Sets the preferred parent major.
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }
}

impl From<&str> for VocabularyEntry {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

impl From<String> for VocabularyEntry {
    fn from(label: String) -> Self {
        Self::new(label)
    }
}

/// Where the concept vocabulary comes from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vocabulary {
    /// Caller-supplied concepts.
    Explicit(Vec<VocabularyEntry>),
    /// Keywords of the designated node.
    Derived,
}

/// A single concept-map request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapRequest {
    /// Concept vocabulary.
    pub vocabulary: Vocabulary,
    /// Designated node; scopes other than `all` are relative to it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_id: Option<String>,
    /// Corpus scope.
    #[serde(default)]
    pub scope: Scope,
    /// Core node label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl MapRequest {
    /// Request with an explicit vocabulary over the whole corpus.
    pub fn explicit<I, E>(labels: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<VocabularyEntry>,
    {
        Self {
            vocabulary: Vocabulary::Explicit(labels.into_iter().map(Into::into).collect()),
            root_id: None,
            scope: Scope::All,
            title: None,
        }
    }

    /// Request deriving its vocabulary from a node, scoped to its subtree.
    pub fn derived(root_id: impl Into<String>) -> Self {
        Self {
            vocabulary: Vocabulary::Derived,
            root_id: Some(root_id.into()),
            scope: Scope::Children,
            title: None,
        }
    }

    /// Sets the designated node.
    pub fn with_root(mut self, root_id: impl Into<String>) -> Self {
        self.root_id = Some(root_id.into());
        self
    }

    /// Sets the scope.
    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    /// Sets the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Scan limits.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BuilderConfig {
    /// Maximum corpus nodes scanned.
    #[serde(default = "default_max_scanned_nodes")]
    pub max_scanned_nodes: usize,
    /// Maximum distinct co-occurring pairs.
    #[serde(default = "default_max_pairs")]
    pub max_pairs: usize,
}

fn default_max_scanned_nodes() -> usize {
    5_000
}

fn default_max_pairs() -> usize {
    1_000
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            max_scanned_nodes: default_max_scanned_nodes(),
            max_pairs: default_max_pairs(),
        }
    }
}

// ============================================================================
// Outcome types
// ============================================================================

/// Statistics from a build.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildStats {
    /// Concepts in the normalized vocabulary.
    pub vocabulary_size: usize,
    /// Empty or duplicate labels removed during normalization.
    pub duplicate_labels: usize,
    /// Corpus nodes in scope.
    pub nodes_in_scope: usize,
    /// Corpus nodes actually scanned.
    pub nodes_scanned: usize,
    /// Concepts found at least once.
    pub concepts_observed: usize,
    /// Concepts dropped for having no occurrences.
    pub concepts_dropped: usize,
    /// Distinct co-occurring pairs.
    pub pairs_observed: usize,
    /// Semantic edges with a classified (non-default) relationship.
    pub classified_edges: usize,
    /// Major nodes emitted.
    pub majors: usize,
    /// Detail nodes emitted.
    pub details: usize,
    /// Whether a scan cap was hit.
    pub truncated: bool,
}

/// Why a request could not produce a map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    /// Vocabulary size outside [2, 35].
    VocabularyOutOfRange,
    /// Fewer than two concepts occur in the scoped corpus.
    NotEnoughSignal,
    /// The designated node is not in the corpus.
    UnknownNode,
    /// A derived vocabulary was requested without a designated node.
    MissingRoot,
}

/// A non-fatal validation failure with diagnostic counts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rejection {
    /// Machine-readable reason.
    pub reason: RejectionReason,
    /// Human-readable explanation.
    pub message: String,
    /// Counts gathered before the build stopped.
    pub stats: BuildStats,
}

impl Rejection {
    fn new(reason: RejectionReason, message: impl Into<String>, stats: BuildStats) -> Self {
        Self {
            reason,
            message: message.into(),
            stats,
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Result of [`ConceptGraphBuilder::build`].
#[derive(Clone, Debug)]
pub enum BuildOutcome {
    /// A map was produced (possibly truncated).
    Built(ConceptMap),
    /// The request was rejected.
    Rejected(Rejection),
}

impl BuildOutcome {
    /// Whether a map was produced.
    pub fn is_built(&self) -> bool {
        matches!(self, Self::Built(_))
    }

    /// The map, if built.
    pub fn map(&self) -> Option<&ConceptMap> {
        match self {
            Self::Built(map) => Some(map),
            Self::Rejected(_) => None,
        }
    }

    /// Converts into a `Result`.
    pub fn into_result(self) -> Result<ConceptMap, Rejection> {
        match self {
            Self::Built(map) => Ok(map),
            Self::Rejected(rejection) => Err(rejection),
        }
    }
}

// ============================================================================
// Scan state
// ============================================================================

struct Concept {
    entry: VocabularyEntry,
    id: String,
    needle: String,
    occurrences: usize,
    depth_sum: usize,
}

impl Concept {
    fn mean_depth(&self) -> f32 {
        if self.occurrences == 0 {
            0.0
        } else {
            self.depth_sum as f32 / self.occurrences as f32
        }
    }
}

struct Vote {
    relationship: Relationship,
    from: usize,
    to: usize,
    tally: usize,
    evidence: Option<String>,
}

#[derive(Default)]
struct PairStats {
    count: usize,
    votes: Vec<Vote>,
}

impl PairStats {
    /// Records a classified observation. Symmetric relationships share one
    /// tally whatever the direction; the rest are tallied per direction.
    fn vote(&mut self, relationship: Relationship, from: usize, to: usize, evidence: Option<String>) {
        let (from, to) = if relationship.is_symmetric() {
            (from.min(to), from.max(to))
        } else {
            (from, to)
        };
        match self
            .votes
            .iter_mut()
            .find(|v| v.relationship == relationship && v.from == from && v.to == to)
        {
            Some(vote) => vote.tally += 1,
            None => self.votes.push(Vote {
                relationship,
                from,
                to,
                tally: 1,
                evidence,
            }),
        }
    }

    /// Most-voted observation; the earliest wins ties.
    fn winner(&self) -> Option<&Vote> {
        self.votes.iter().fold(None, |best: Option<&Vote>, v| match best {
            Some(b) if b.tally >= v.tally => Some(b),
            _ => Some(v),
        })
    }
}

// ============================================================================
// ConceptGraphBuilder
// ============================================================================

/// Builds concept maps from a corpus.
///
/// Generic over the relationship classifier; the default is the
/// [`PatternClassifier`].
#[derive(Clone, Debug)]
pub struct ConceptGraphBuilder<C: RelationClassifier = PatternClassifier> {
    classifier: C,
    config: BuilderConfig,
    extractor: KeywordExtractor,
}

impl ConceptGraphBuilder<PatternClassifier> {
    /// Creates a builder with the default classifier and caps.
    pub fn new() -> Self {
        Self {
            classifier: PatternClassifier::new(),
            config: BuilderConfig::default(),
            extractor: KeywordExtractor::new(),
        }
    }
}

impl Default for ConceptGraphBuilder<PatternClassifier> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: RelationClassifier> ConceptGraphBuilder<C> {
    /// Replaces the relationship classifier.
    pub fn with_classifier<D: RelationClassifier>(self, classifier: D) -> ConceptGraphBuilder<D> {
        ConceptGraphBuilder {
            classifier,
            config: self.config,
            extractor: self.extractor,
        }
    }

    /// Sets the scan limits.
    pub fn with_config(mut self, config: BuilderConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the keyword extractor used for derived vocabularies.
    pub fn with_extractor(mut self, extractor: KeywordExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Current scan limits.
    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Builds a concept map for `request` over `corpus`.
    pub fn build(&self, corpus: &Corpus, request: &MapRequest) -> BuildOutcome {
        let mut stats = BuildStats::default();

        // -- Phase 1: vocabulary and scope ----------------------------------
        let root = match request.root_id.as_deref() {
            Some(id) => match corpus.get(id) {
                Some(node) => Some(node),
                None => {
                    return BuildOutcome::Rejected(Rejection::new(
                        RejectionReason::UnknownNode,
                        format!("node not found: {id}"),
                        stats,
                    ));
                }
            },
            None => None,
        };

        let raw_entries = match &request.vocabulary {
            Vocabulary::Explicit(entries) => entries.clone(),
            Vocabulary::Derived => {
                let Some(root) = root else {
                    return BuildOutcome::Rejected(Rejection::new(
                        RejectionReason::MissingRoot,
                        "a derived vocabulary needs a designated node",
                        stats,
                    ));
                };
                self.extractor
                    .clone()
                    .with_limit(MAX_VOCABULARY)
                    .extract_from_node(root)
                    .into_iter()
                    .map(VocabularyEntry::new)
                    .collect()
            }
        };

        let (entries, duplicates) = normalize_vocabulary(raw_entries);
        stats.vocabulary_size = entries.len();
        stats.duplicate_labels = duplicates;

        if !(MIN_VOCABULARY..=MAX_VOCABULARY).contains(&entries.len()) {
            return BuildOutcome::Rejected(Rejection::new(
                RejectionReason::VocabularyOutOfRange,
                format!(
                    "vocabulary has {} concepts; between {MIN_VOCABULARY} and {MAX_VOCABULARY} are required",
                    entries.len()
                ),
                stats,
            ));
        }

        let root_id = root.map(|n| n.id.as_str());
        let scope = match root_id {
            Some(_) => request.scope,
            None => {
                if request.scope != Scope::All {
                    log::debug!("no designated node; widening scope `{}` to `all`", request.scope);
                }
                Scope::All
            }
        };
        let scoped = match corpus.scoped(root_id, scope) {
            Ok(nodes) => nodes,
            Err(e) => {
                return BuildOutcome::Rejected(Rejection::new(
                    RejectionReason::UnknownNode,
                    e.to_string(),
                    stats,
                ));
            }
        };
        stats.nodes_in_scope = scoped.len();

        // -- Phase 2: scan --------------------------------------------------
        let mut concepts: Vec<Concept> = entries
            .into_iter()
            .map(|entry| Concept {
                id: concept_id(&entry.label),
                needle: entry.label.to_lowercase(),
                entry,
                occurrences: 0,
                depth_sum: 0,
            })
            .collect();

        let mut pairs: HashMap<(usize, usize), PairStats> = HashMap::new();
        let mut pair_order: Vec<(usize, usize)> = Vec::new();
        let mut truncated = false;

        'scan: for node in &scoped {
            if stats.nodes_scanned >= self.config.max_scanned_nodes {
                truncated = true;
                break;
            }
            stats.nodes_scanned += 1;

            let text = node.text();
            let lower = text.to_lowercase();
            let present: Vec<usize> = concepts
                .iter()
                .enumerate()
                .filter(|(_, c)| lower.contains(&c.needle))
                .map(|(i, _)| i)
                .collect();
            if present.is_empty() {
                continue;
            }

            let depth = corpus.depth(&node.id, root_id);
            for &i in &present {
                concepts[i].occurrences += 1;
                concepts[i].depth_sum += depth;
            }

            for (n, &i) in present.iter().enumerate() {
                for &j in &present[n + 1..] {
                    let key = (i, j);
                    if !pairs.contains_key(&key) {
                        if pairs.len() >= self.config.max_pairs {
                            truncated = true;
                            break 'scan;
                        }
                        pair_order.push(key);
                    }
                    let pair = pairs.entry(key).or_default();
                    pair.count += 1;

                    let c = self
                        .classifier
                        .classify(&text, &concepts[i].entry.label, &concepts[j].entry.label);
                    if c.is_classified() {
                        let (from, to) = if c.reversed { (j, i) } else { (i, j) };
                        pair.vote(c.relationship, from, to, c.evidence);
                    }
                }
            }
        }

        if truncated {
            log::warn!(
                "scan truncated after {} nodes and {} pairs",
                stats.nodes_scanned,
                pairs.len()
            );
        }
        stats.truncated = truncated;
        stats.pairs_observed = pairs.len();

        // -- Phase 3: levels ------------------------------------------------
        let mut surviving: Vec<usize> = (0..concepts.len())
            .filter(|&i| concepts[i].occurrences > 0)
            .collect();
        stats.concepts_observed = surviving.len();
        stats.concepts_dropped = concepts.len() - surviving.len();

        if surviving.len() < MIN_VOCABULARY {
            return BuildOutcome::Rejected(Rejection::new(
                RejectionReason::NotEnoughSignal,
                format!(
                    "only {} of {} concepts occur in the {} nodes in scope",
                    stats.concepts_observed, stats.vocabulary_size, stats.nodes_in_scope
                ),
                stats,
            ));
        }

        // Stable sort keeps vocabulary order among equal depths.
        surviving.sort_by(|&a, &b| concepts[a].mean_depth().total_cmp(&concepts[b].mean_depth()));
        let split = concepts[surviving[(surviving.len() - 1) / 2]].mean_depth();

        let (majors, details): (Vec<usize>, Vec<usize>) = surviving
            .iter()
            .partition(|&&i| concepts[i].mean_depth() <= split);

        let parents: Vec<(usize, usize)> = details
            .iter()
            .map(|&d| (d, assign_major(d, &majors, &concepts, &pairs)))
            .collect();

        // -- Phase 4: emit --------------------------------------------------
        let title = request
            .title
            .clone()
            .or_else(|| root.map(|n| n.name.clone()))
            .unwrap_or_else(|| DEFAULT_TITLE.to_string());

        let mut map = ConceptMap::new(title.clone());
        map.add_node(ConceptNode::core(title, root_id.map(str::to_string)));

        for &i in &majors {
            map.add_node(concept_node(&concepts[i], Level::Major, None, &scoped));
        }
        for &(d, m) in &parents {
            let parent = Some(concepts[m].id.clone());
            map.add_node(concept_node(&concepts[d], Level::Detail, parent, &scoped));
        }

        for &i in &majors {
            push_edge(
                &mut map,
                ConceptEdge::hierarchy(CORE_ID, &concepts[i].id, Relationship::Contains),
            );
        }
        for &(d, m) in &parents {
            push_edge(
                &mut map,
                ConceptEdge::hierarchy(&concepts[m].id, &concepts[d].id, Relationship::Details),
            );
        }

        let max_count = pairs.values().map(|p| p.count).max().unwrap_or(0).max(1);
        for key in &pair_order {
            let Some(pair) = pairs.get(key) else {
                continue;
            };
            let weight = pair.count as f32 / max_count as f32;
            let edge = match pair.winner() {
                Some(vote) => {
                    stats.classified_edges += 1;
                    let edge = ConceptEdge::semantic(
                        &concepts[vote.from].id,
                        &concepts[vote.to].id,
                        vote.relationship.clone(),
                        pair.count,
                        weight,
                    );
                    match &vote.evidence {
                        Some(evidence) => edge.with_evidence(evidence.clone()),
                        None => edge,
                    }
                }
                None => ConceptEdge::semantic(
                    &concepts[key.0].id,
                    &concepts[key.1].id,
                    Relationship::RelatedTo,
                    pair.count,
                    weight,
                ),
            };
            push_edge(&mut map, edge);
        }

        stats.majors = majors.len();
        stats.details = details.len();
        log::debug!(
            "built concept map: {} majors, {} details, {} semantic edges",
            stats.majors,
            stats.details,
            stats.pairs_observed
        );

        map.truncated = truncated;
        map.stats = stats;
        BuildOutcome::Built(map)
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Trims labels and drops empties and duplicates (by case-insensitive label
/// or by derived id). Returns the kept entries and the number dropped.
fn normalize_vocabulary(entries: Vec<VocabularyEntry>) -> (Vec<VocabularyEntry>, usize) {
    let total = entries.len();
    let mut seen_labels = HashSet::new();
    let mut seen_ids = HashSet::new();

    let kept: Vec<VocabularyEntry> = entries
        .into_iter()
        .filter_map(|mut entry| {
            entry.label = entry.label.trim().to_string();
            if entry.label.is_empty() {
                return None;
            }
            let fresh_label = seen_labels.insert(entry.label.to_lowercase());
            let fresh_id = seen_ids.insert(concept_id(&entry.label));
            (fresh_label && fresh_id).then_some(entry)
        })
        .collect();

    let dropped = total - kept.len();
    (kept, dropped)
}

/// Explicit parent (if it names a major), else the most co-occurring major
/// (earliest wins ties), else the first major.
fn assign_major(
    detail: usize,
    majors: &[usize],
    concepts: &[Concept],
    pairs: &HashMap<(usize, usize), PairStats>,
) -> usize {
    if let Some(parent) = &concepts[detail].entry.parent {
        let wanted = concept_id(parent);
        if let Some(&m) = majors.iter().find(|&&m| concepts[m].id == wanted) {
            return m;
        }
        log::debug!(
            "parent `{parent}` of `{}` is not a major concept; auto-assigning",
            concepts[detail].entry.label
        );
    }

    let mut best: Option<(usize, usize)> = None;
    for &m in majors {
        let key = (detail.min(m), detail.max(m));
        let count = pairs.get(&key).map_or(0, |p| p.count);
        if count > 0 && best.is_none_or(|(_, c)| count > c) {
            best = Some((m, count));
        }
    }

    // `majors` is never empty: the lowest mean depth is always <= the split.
    best.map(|(m, _)| m).unwrap_or(majors[0])
}

fn concept_node(
    concept: &Concept,
    level: Level,
    parent_major_id: Option<String>,
    scoped: &[&ContentNode],
) -> ConceptNode {
    let source_id = scoped
        .iter()
        .find(|n| n.name.trim().to_lowercase() == concept.needle)
        .map(|n| n.id.clone());

    ConceptNode {
        id: concept.id.clone(),
        label: concept.entry.label.clone(),
        level,
        importance: concept
            .entry
            .importance
            .unwrap_or(concept.occurrences as f32),
        occurrences: concept.occurrences,
        parent_major_id,
        depth: concept.mean_depth(),
        source_id,
    }
}

fn push_edge(map: &mut ConceptMap, edge: ConceptEdge) {
    if let Err(e) = map.add_edge(edge) {
        log::warn!("dropping edge: {e}");
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::Classification;
    use crate::RelationFamily;
    use proptest::prelude::*;

    fn cats_corpus() -> Corpus {
        Corpus::new(vec![
            ContentNode::new("a", "Cats cause allergies"),
            ContentNode::new("b", "Allergies cause sneezing"),
        ])
    }

    /// Biology tree: four themes near the root, three organelles under
    /// "Cells".
    fn biology_corpus() -> Corpus {
        Corpus::new(vec![
            ContentNode::new("r", "Biology")
                .with_note("the study of cells, genetics, ecology and evolution"),
            ContentNode::new("c", "Cells").with_parent("r"),
            ContentNode::new("g", "Genetics").with_parent("r").with_note("inheritance of traits"),
            ContentNode::new("e", "Ecology").with_parent("r").with_note("organisms and habitats"),
            ContentNode::new("v", "Evolution").with_parent("r").with_note("natural selection"),
            ContentNode::new("m", "Mitochondria")
                .with_parent("c")
                .with_note("powerhouse inside cells"),
            ContentNode::new("rb", "Ribosomes")
                .with_parent("c")
                .with_note("protein factories inside cells"),
            ContentNode::new("n", "Nucleus")
                .with_parent("c")
                .with_note("stores dna for cells"),
        ])
    }

    fn biology_request() -> MapRequest {
        MapRequest::explicit([
            "cells",
            "genetics",
            "ecology",
            "evolution",
            "mitochondria",
            "ribosomes",
            "nucleus",
        ])
        .with_root("r")
        .with_scope(Scope::Children)
    }

    fn build(corpus: &Corpus, request: &MapRequest) -> ConceptMap {
        match ConceptGraphBuilder::new().build(corpus, request) {
            BuildOutcome::Built(map) => map,
            BuildOutcome::Rejected(r) => panic!("unexpected rejection: {r}"),
        }
    }

    fn rejection(corpus: &Corpus, request: &MapRequest) -> Rejection {
        match ConceptGraphBuilder::new().build(corpus, request) {
            BuildOutcome::Rejected(r) => r,
            BuildOutcome::Built(_) => panic!("expected a rejection"),
        }
    }

    // ------------------------------------------------------------------------
    // Relationship inference
    // ------------------------------------------------------------------------

    #[test]
    fn test_cats_allergies_sneezing() {
        let map = build(&cats_corpus(), &MapRequest::explicit(["cats", "allergies", "sneezing"]));

        let mut pairs: Vec<(String, String)> =
            map.semantic_edges().map(ConceptEdge::pair_key).collect();
        pairs.sort();
        assert_eq!(
            pairs,
            vec![
                ("allergies".to_string(), "cats".to_string()),
                ("allergies".to_string(), "sneezing".to_string()),
            ]
        );
        for edge in map.semantic_edges() {
            assert_eq!(edge.relationship.family(), RelationFamily::Causal);
        }
        let first = map.semantic_edges().next().unwrap();
        assert_eq!((first.from.as_str(), first.to.as_str()), ("cats", "allergies"));
        assert_eq!(first.evidence.as_deref(), Some("cause"));
    }

    #[test]
    fn test_flat_corpus_makes_everything_major() {
        let map = build(&cats_corpus(), &MapRequest::explicit(["cats", "allergies", "sneezing"]));
        assert_eq!(map.nodes_at(Level::Major).count(), 3);
        assert_eq!(map.nodes_at(Level::Detail).count(), 0);
        assert_eq!(map.core().unwrap().label, DEFAULT_TITLE);
    }

    #[test]
    fn test_one_edge_per_unordered_pair() {
        let corpus = Corpus::new(vec![
            ContentNode::new("1", "Rain causes floods"),
            ContentNode::new("2", "Floods are caused by rain"),
            ContentNode::new("3", "Rain and floods"),
        ]);
        let map = build(&corpus, &MapRequest::explicit(["rain", "floods"]));
        let edges: Vec<&ConceptEdge> = map.semantic_edges().collect();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].relationship, Relationship::Causes);
        assert_eq!((edges[0].from.as_str(), edges[0].to.as_str()), ("rain", "floods"));
        assert_eq!(edges[0].count, 3);
        assert_eq!(edges[0].weight, 1.0);
    }

    #[test]
    fn test_unclassified_pair_is_related_to() {
        let corpus = Corpus::new(vec![ContentNode::new("1", "Apples and oranges")]);
        let map = build(&corpus, &MapRequest::explicit(["apples", "oranges"]));
        let edge = map.semantic_edges().next().unwrap();
        assert_eq!(edge.relationship, Relationship::RelatedTo);
        assert!(edge.bidirectional);
        assert!(edge.evidence.is_none());
    }

    #[test]
    fn test_custom_classifier() {
        struct Always;
        impl RelationClassifier for Always {
            fn classify(&self, _: &str, _: &str, _: &str) -> Classification {
                Classification {
                    relationship: Relationship::Custom("mirrors".into()),
                    reversed: true,
                    evidence: None,
                }
            }
        }
        let builder = ConceptGraphBuilder::new().with_classifier(Always);
        let map = builder
            .build(&cats_corpus(), &MapRequest::explicit(["cats", "allergies"]))
            .into_result()
            .unwrap();
        let edge = map.semantic_edges().next().unwrap();
        assert_eq!(edge.relationship.name(), "mirrors");
        assert_eq!(edge.from, "allergies");
    }

    // ------------------------------------------------------------------------
    // Levels and hierarchy
    // ------------------------------------------------------------------------

    #[test]
    fn test_levels_split_at_median_depth() {
        let map = build(&biology_corpus(), &biology_request());

        let majors: Vec<&str> = map.nodes_at(Level::Major).map(|n| n.id.as_str()).collect();
        assert_eq!(majors, vec!["genetics", "ecology", "evolution", "cells"]);

        let details: Vec<&str> = map.nodes_at(Level::Detail).map(|n| n.id.as_str()).collect();
        assert_eq!(details, vec!["mitochondria", "ribosomes", "nucleus"]);
        for detail in map.nodes_at(Level::Detail) {
            assert_eq!(detail.parent_major_id.as_deref(), Some("cells"));
        }
    }

    #[test]
    fn test_every_detail_has_existing_major() {
        let map = build(&biology_corpus(), &biology_request());
        for detail in map.nodes_at(Level::Detail) {
            let parent = detail.parent_major_id.as_deref().unwrap();
            assert_eq!(map.get_node(parent).unwrap().level, Level::Major);
        }
        assert!(crate::validate_map(&map).is_empty());
    }

    #[test]
    fn test_explicit_parent_wins() {
        let request = MapRequest::explicit(vec![
            VocabularyEntry::new("cells"),
            VocabularyEntry::new("genetics"),
            VocabularyEntry::new("ecology"),
            VocabularyEntry::new("evolution"),
            VocabularyEntry::new("mitochondria").with_parent("Genetics"),
            VocabularyEntry::new("ribosomes").with_parent("not-a-major"),
            VocabularyEntry::new("nucleus"),
        ])
        .with_root("r")
        .with_scope(Scope::Children);
        let map = build(&biology_corpus(), &request);
        assert_eq!(
            map.get_node("mitochondria").unwrap().parent_major_id.as_deref(),
            Some("genetics")
        );
        assert_eq!(
            map.get_node("ribosomes").unwrap().parent_major_id.as_deref(),
            Some("cells")
        );
    }

    #[test]
    fn test_hierarchy_edges() {
        let map = build(&biology_corpus(), &biology_request());
        let hierarchy: Vec<&ConceptEdge> = map.edges().filter(|e| e.hierarchy).collect();
        assert_eq!(hierarchy.len(), 7);
        assert!(hierarchy
            .iter()
            .any(|e| e.from == CORE_ID && e.to == "cells" && e.relationship == Relationship::Contains));
        assert!(hierarchy
            .iter()
            .any(|e| e.from == "cells" && e.to == "nucleus" && e.relationship == Relationship::Details));
    }

    #[test]
    fn test_core_traces_to_root_and_concepts_to_titles() {
        let map = build(&biology_corpus(), &biology_request());
        let core = map.core().unwrap();
        assert_eq!(core.label, "Biology");
        assert_eq!(core.source_id.as_deref(), Some("r"));
        assert_eq!(map.get_node("nucleus").unwrap().source_id.as_deref(), Some("n"));
    }

    #[test]
    fn test_importance_defaults_to_occurrences() {
        let request = MapRequest::explicit(vec![
            VocabularyEntry::new("cats").with_importance(9.5),
            VocabularyEntry::new("allergies"),
        ]);
        let map = build(&cats_corpus(), &request);
        assert_eq!(map.get_node("cats").unwrap().importance, 9.5);
        assert_eq!(map.get_node("allergies").unwrap().importance, 2.0);
        assert_eq!(map.get_node("allergies").unwrap().occurrences, 2);
    }

    // ------------------------------------------------------------------------
    // Vocabulary and rejection
    // ------------------------------------------------------------------------

    #[test]
    fn test_vocabulary_too_small() {
        let r = rejection(&cats_corpus(), &MapRequest::explicit(["cats", " CATS ", ""]));
        assert_eq!(r.reason, RejectionReason::VocabularyOutOfRange);
        assert_eq!(r.stats.vocabulary_size, 1);
        assert_eq!(r.stats.duplicate_labels, 2);
    }

    #[test]
    fn test_vocabulary_too_large() {
        let labels: Vec<String> = (0..36).map(|i| format!("concept{i}")).collect();
        let r = rejection(&cats_corpus(), &MapRequest::explicit(labels));
        assert_eq!(r.reason, RejectionReason::VocabularyOutOfRange);
    }

    #[test]
    fn test_not_enough_signal() {
        let r = rejection(&cats_corpus(), &MapRequest::explicit(["cats", "dogs", "birds"]));
        assert_eq!(r.reason, RejectionReason::NotEnoughSignal);
        assert_eq!(r.stats.concepts_observed, 1);
        assert_eq!(r.stats.concepts_dropped, 2);
    }

    #[test]
    fn test_unknown_root() {
        let r = rejection(&cats_corpus(), &MapRequest::derived("nope"));
        assert_eq!(r.reason, RejectionReason::UnknownNode);
    }

    #[test]
    fn test_derived_vocabulary() {
        let corpus = Corpus::new(vec![
            ContentNode::new("root", "Weather").with_note("Rain causes floods"),
            ContentNode::new("k1", "Floods").with_parent("root").with_note("rain again"),
        ]);
        let map = build(&corpus, &MapRequest::derived("root"));
        assert!(map.get_node("rain").is_some());
        assert!(map.get_node("floods").is_some());
        assert_eq!(map.core().unwrap().label, "Weather");
    }

    #[test]
    fn test_derived_without_root_rejected() {
        let mut request = MapRequest::derived("x");
        request.root_id = None;
        let r = rejection(&cats_corpus(), &request);
        assert_eq!(r.reason, RejectionReason::MissingRoot);
    }

    // ------------------------------------------------------------------------
    // Caps
    // ------------------------------------------------------------------------

    #[test]
    fn test_node_cap_truncates() {
        let nodes: Vec<ContentNode> = (0..10)
            .map(|i| ContentNode::new(format!("n{i}"), "cats and allergies"))
            .collect();
        let builder = ConceptGraphBuilder::new().with_config(BuilderConfig {
            max_scanned_nodes: 4,
            ..Default::default()
        });
        let map = builder
            .build(&Corpus::new(nodes), &MapRequest::explicit(["cats", "allergies"]))
            .into_result()
            .unwrap();
        assert!(map.truncated);
        assert_eq!(map.stats.nodes_scanned, 4);
        assert_eq!(map.get_node("cats").unwrap().occurrences, 4);
    }

    #[test]
    fn test_pair_cap_truncates() {
        let corpus = Corpus::new(vec![
            ContentNode::new("1", "alpha beta"),
            ContentNode::new("2", "gamma delta"),
        ]);
        let builder = ConceptGraphBuilder::new().with_config(BuilderConfig {
            max_pairs: 1,
            ..Default::default()
        });
        let map = builder
            .build(&corpus, &MapRequest::explicit(["alpha", "beta", "gamma", "delta"]))
            .into_result()
            .unwrap();
        assert!(map.truncated);
        assert_eq!(map.semantic_edges().count(), 1);
    }

    // ------------------------------------------------------------------------
    // Properties
    // ------------------------------------------------------------------------

    const POOL: [&str; 12] = [
        "cells",
        "genetics",
        "ecology",
        "evolution",
        "mitochondria",
        "ribosomes",
        "nucleus",
        "dna",
        "selection",
        "protein",
        "habitats",
        "traits",
    ];

    proptest! {
        #[test]
        fn prop_built_maps_are_well_formed(mask in proptest::collection::vec(any::<bool>(), POOL.len())) {
            let labels: Vec<&str> = POOL
                .iter()
                .zip(&mask)
                .filter(|(_, keep)| **keep)
                .map(|(label, _)| *label)
                .collect();
            let request = MapRequest::explicit(labels)
                .with_root("r")
                .with_scope(Scope::Children);

            if let BuildOutcome::Built(map) = ConceptGraphBuilder::new().build(&biology_corpus(), &request) {
                prop_assert!(crate::validate_map(&map).is_empty());
                for detail in map.nodes_at(Level::Detail) {
                    let parent = detail.parent_major_id.as_deref().and_then(|p| map.get_node(p));
                    prop_assert_eq!(parent.map(|p| p.level), Some(Level::Major));
                }
            }
        }
    }
}
