//! Relationship classification.
//!
//! Inference is lexical: the text around two co-occurring concepts is
//! matched against an ordered table of phrase patterns. The builder only
//! sees the [`RelationClassifier`] trait, so a stronger classifier can be
//! dropped in without touching graph construction.

use regex::Regex;
use std::sync::LazyLock;

use crate::Relationship;

/// Characters added on each side of the between-window for the second pass.
pub const CONTEXT_CHARS: usize = 40;

/// Result of classifying one co-occurrence.
#[derive(Clone, Debug, PartialEq)]
pub struct Classification {
    /// Inferred relationship; `RelatedTo` when nothing matched.
    pub relationship: Relationship,
    /// True when the edge runs from `b` to `a` rather than `a` to `b`.
    pub reversed: bool,
    /// Window text that matched, if any.
    pub evidence: Option<String>,
}

impl Classification {
    /// The fallback "related, cause unknown" result.
    pub fn unknown() -> Self {
        Self {
            relationship: Relationship::RelatedTo,
            reversed: false,
            evidence: None,
        }
    }

    /// Whether a pattern matched.
    pub fn is_classified(&self) -> bool {
        self.relationship != Relationship::RelatedTo
    }
}

/// Classifies the relationship between two concepts in a piece of text.
pub trait RelationClassifier {
    /// Classifies `a` and `b` as they co-occur in `text`. Never fails; an
    /// unrecognized relationship is [`Classification::unknown`].
    fn classify(&self, text: &str, a: &str, b: &str) -> Classification;
}

impl<C: RelationClassifier + ?Sized> RelationClassifier for &C {
    fn classify(&self, text: &str, a: &str, b: &str) -> Classification {
        (**self).classify(text, a, b)
    }
}

impl<C: RelationClassifier + ?Sized> RelationClassifier for Box<C> {
    fn classify(&self, text: &str, a: &str, b: &str) -> Classification {
        (**self).classify(text, a, b)
    }
}

// ============================================================================
// Pattern table
// ============================================================================

struct Pattern {
    regex: Regex,
    relationship: Relationship,
    /// The phrase reads "later <- earlier" ("A is caused by B").
    backwards: bool,
}

fn pattern(re: &str, relationship: Relationship, backwards: bool) -> Pattern {
    Pattern {
        regex: Regex::new(re).expect("Invalid relationship pattern"),
        relationship,
        backwards,
    }
}

// Order matters: first match wins, so passive causal phrases come before
// the active ones they contain ("caused by" vs "caused").
static PATTERNS: LazyLock<Vec<Pattern>> = LazyLock::new(|| {
    use Relationship::*;
    vec![
        pattern(r"\b(caused by|results? from|resulting from|due to|because of|stems? from)\b", Causes, true),
        pattern(r"\b(leads? to|led to|causes?|caused|results? in|resulting in|triggers?|produces?)\b", Causes, false),
        pattern(r"\b(prevents?|inhibits?|blocks?|suppress(es)?|protects? against)\b", Prevents, false),
        pattern(r"\b(enables?|allows?|makes? possible|facilitates?)\b", Enables, false),
        pattern(r"\b(required by|needed by)\b", Requires, true),
        pattern(r"\b(requires?|depends? on|relies on|needs?)\b", Requires, false),
        pattern(r"\b(implies|implying|entails?|therefore)\b", Implies, false),
        pattern(r"\b(supports?|reinforces?|strengthens?|confirms?)\b", Supports, false),
        pattern(r"\b(contradicts?|conflicts? with|refutes?|is inconsistent with)\b", Contradicts, false),
        pattern(r"\b(differs? from|different from|versus|vs|unlike|in contrast to|as opposed to)\b", ContrastsWith, false),
        pattern(r"\b(similar to|resembles?|analogous to|akin to|comparable to)\b", SimilarTo, false),
        pattern(r"\b(part of|belongs? to|component of|member of)\b", PartOf, false),
        pattern(r"\b(is an? (kind|type|form|example) of|is an?)\b", IsA, false),
        pattern(r"\b(includes?|including|contains?|consists? of|comprises?|composed of)\b", Includes, false),
        pattern(r"\b(used by)\b", Uses, true),
        pattern(r"\b(uses?|using|utilizes?|employs?)\b", Uses, false),
        pattern(r"\b(followed by|precedes?|prior to|before)\b", Precedes, false),
        pattern(r"\b(preceded by)\b", Precedes, true),
        pattern(r"\b(follows?|after|subsequent to|succeeds?)\b", Follows, false),
    ]
});

// ============================================================================
// PatternClassifier
// ============================================================================

/// Default classifier backed by the ordered phrase table.
///
/// The text strictly between the first occurrences of the two concepts is
/// tried first, then the same span widened by [`CONTEXT_CHARS`] on each
/// side.
#[derive(Clone, Debug, Default)]
pub struct PatternClassifier;

impl PatternClassifier {
    /// Creates the classifier.
    pub fn new() -> Self {
        Self
    }

    /// Number of patterns in the table.
    pub fn pattern_count(&self) -> usize {
        PATTERNS.len()
    }
}

impl RelationClassifier for PatternClassifier {
    fn classify(&self, text: &str, a: &str, b: &str) -> Classification {
        let lower = text.to_lowercase();
        let (a, b) = (a.to_lowercase(), b.to_lowercase());
        let (Some(pos_a), Some(pos_b)) = (lower.find(&a), lower.find(&b)) else {
            return Classification::unknown();
        };

        let a_first = pos_a <= pos_b;
        let (first_start, first_len, second_start, second_len) = if a_first {
            (pos_a, a.len(), pos_b, b.len())
        } else {
            (pos_b, b.len(), pos_a, a.len())
        };

        let first_end = first_start + first_len;
        let second_end = second_start + second_len;

        let between = if first_end <= second_start {
            &lower[first_end..second_start]
        } else {
            ""
        };
        let wide_start = floor_boundary(&lower, first_start.saturating_sub(CONTEXT_CHARS));
        let wide_end = ceil_boundary(
            &lower,
            (second_end.max(first_end) + CONTEXT_CHARS).min(lower.len()),
        );
        let wide = &lower[wide_start..wide_end];

        for window in [between, wide] {
            if window.trim().is_empty() {
                continue;
            }
            if let Some(p) = PATTERNS.iter().find(|p| p.regex.is_match(window)) {
                // Direction relative to text order, then relative to (a, b).
                let earlier_to_later = !p.backwards;
                let a_to_b = earlier_to_later == a_first;
                return Classification {
                    relationship: p.relationship.clone(),
                    reversed: !a_to_b,
                    evidence: Some(window.trim().to_string()),
                };
            }
        }

        Classification::unknown()
    }
}

fn floor_boundary(s: &str, mut idx: usize) -> usize {
    while idx > 0 && !s.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

fn ceil_boundary(s: &str, mut idx: usize) -> usize {
    while idx < s.len() && !s.is_char_boundary(idx) {
        idx += 1;
    }
    idx
}
