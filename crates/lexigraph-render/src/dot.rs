//! Graphviz DOT serialization of a concept map.

use lexigraph_core::{Error, Result};
use lexigraph_graph::{ConceptEdge, ConceptNode, Level, MapExport, RelationFamily};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::{self, Write as _};
use std::str::FromStr;

/// Maximum length of an escaped label, ellipsis included.
pub const MAX_LABEL_LEN: usize = 40;

const ELLIPSIS: char = '…';

const CORE_FILL: &str = "#1d3557";

const MAJOR_PALETTE: [&str; 8] = [
    "#e63946", "#f4a261", "#2a9d8f", "#457b9d", "#8e44ad", "#e9c46a", "#43aa8b", "#f3722c",
];

const DETAIL_PALETTE: [&str; 8] = [
    "#f5b7bc", "#fad4b3", "#a8dcd5", "#b5cde0", "#d7b9e3", "#f5e4b5", "#b7e1d3", "#f9c3a5",
];

const HIERARCHY_COLOR: &str = "#d3d3d3";

/// Graphviz layout engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutEngine {
    /// Force-directed placement.
    #[default]
    Fdp,
    /// Spring model.
    Neato,
    /// Layered.
    Dot,
    /// Circular.
    Circo,
}

impl LayoutEngine {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Fdp => "fdp",
            Self::Neato => "neato",
            Self::Dot => "dot",
            Self::Circo => "circo",
        }
    }
}

impl fmt::Display for LayoutEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LayoutEngine {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "fdp" => Ok(Self::Fdp),
            "neato" => Ok(Self::Neato),
            "dot" => Ok(Self::Dot),
            "circo" => Ok(Self::Circo),
            other => Err(Error::parse(format!("unknown layout engine: {other}"))),
        }
    }
}

/// Global styling of the DOT document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DotOptions {
    #[serde(default)]
    pub layout: LayoutEngine,
    #[serde(default = "default_font")]
    pub font: String,
    #[serde(default = "default_background")]
    pub background: String,
    /// Label semantic edges with their relationship.
    #[serde(default = "default_edge_labels")]
    pub edge_labels: bool,
}

fn default_font() -> String {
    "Helvetica".to_string()
}

fn default_background() -> String {
    "#ffffff".to_string()
}

fn default_edge_labels() -> bool {
    true
}

impl Default for DotOptions {
    fn default() -> Self {
        Self {
            layout: LayoutEngine::default(),
            font: default_font(),
            background: default_background(),
            edge_labels: default_edge_labels(),
        }
    }
}

/// Escapes a label for a double-quoted DOT string.
///
/// Backslashes and quotes get a backslash, newlines become `\n`, carriage
/// returns are dropped. Results longer than [`MAX_LABEL_LEN`] characters are
/// cut at an escape boundary and end in an ellipsis.
///
/// ```
/// use lexigraph_render::escape_for_dot;
///
/// assert_eq!(escape_for_dot("say \"hi\"\n"), "say \\\"hi\\\"\\n");
/// ```
pub fn escape_for_dot(input: &str) -> String {
    let chars: Vec<char> = input.chars().filter(|&c| c != '\r').collect();
    let total: usize = chars.iter().map(|&c| escaped_len(c)).sum();
    let budget = if total <= MAX_LABEL_LEN {
        total
    } else {
        MAX_LABEL_LEN - 1
    };

    let mut out = String::with_capacity(budget + ELLIPSIS.len_utf8());
    let mut used = 0;
    for c in chars {
        let len = escaped_len(c);
        if used + len > budget {
            break;
        }
        match escape_char(c) {
            Some(escaped) => out.push_str(escaped),
            None => out.push(c),
        }
        used += len;
    }
    if total > MAX_LABEL_LEN {
        out.push(ELLIPSIS);
    }
    out
}

fn escape_char(c: char) -> Option<&'static str> {
    match c {
        '\\' => Some("\\\\"),
        '"' => Some("\\\""),
        '\n' => Some("\\n"),
        _ => None,
    }
}

fn escaped_len(c: char) -> usize {
    escape_char(c).map_or(1, str::len)
}

/// Quotes an identifier without truncation.
fn quote_id(id: &str) -> String {
    format!("\"{}\"", id.replace('\\', "\\\\").replace('"', "\\\""))
}

fn family_style(family: RelationFamily) -> (&'static str, Option<&'static str>) {
    match family {
        RelationFamily::Causal => ("#1f77b4", None),
        RelationFamily::Structural => ("#2ca02c", None),
        RelationFamily::Temporal => ("#ff7f0e", Some("dotted")),
        RelationFamily::Logical => ("#9467bd", None),
        RelationFamily::Contradictory => ("#d62728", Some("dashed")),
        RelationFamily::Comparative => ("#17becf", None),
        RelationFamily::Hierarchy => (HIERARCHY_COLOR, None),
        RelationFamily::Default => ("#7f7f7f", None),
    }
}

/// Serializes a map to a DOT document.
pub fn render_dot(map: &MapExport, options: &DotOptions) -> String {
    let font = escape_for_dot(&options.font);
    let mut out = String::new();
    out.push_str("digraph concept_map {\n");
    let _ = writeln!(out, "  layout={};", options.layout);
    let _ = writeln!(
        out,
        "  graph [label=\"{}\", labelloc=t, fontsize=20, fontname=\"{font}\", bgcolor=\"{}\", overlap=false, splines=true, outputorder=edgesfirst];",
        escape_for_dot(&map.title),
        escape_for_dot(&options.background),
    );
    let _ = writeln!(
        out,
        "  node [fontname=\"{font}\", style=filled, shape=ellipse, penwidth=0];"
    );
    let _ = writeln!(out, "  edge [fontname=\"{font}\", fontsize=9, arrowsize=0.7];");
    if map.truncated {
        out.push_str("  // truncated: scan caps reached, map reflects part of the corpus\n");
    }
    out.push('\n');

    let majors: Vec<&ConceptNode> = map.nodes.iter().filter(|n| n.level == Level::Major).collect();
    let palette_slot: HashMap<&str, usize> = majors
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id.as_str(), i % MAJOR_PALETTE.len()))
        .collect();
    let max_occurrences = majors.iter().map(|n| n.occurrences).max().unwrap_or(1).max(1);

    for node in &map.nodes {
        let label = escape_for_dot(&node.label);
        let attrs = match node.level {
            Level::Core => format!(
                "label=\"{label}\", shape=doublecircle, fillcolor=\"{CORE_FILL}\", fontcolor=\"#ffffff\", fontsize=18, width=1.6"
            ),
            Level::Major => {
                let slot = palette_slot.get(node.id.as_str()).copied().unwrap_or(0);
                let scale = node.occurrences as f32 / max_occurrences as f32;
                format!(
                    "label=\"{label}\", fillcolor=\"{}\", fontcolor=\"#ffffff\", fontsize=14, width={:.2}",
                    MAJOR_PALETTE[slot],
                    0.9 + 0.6 * scale,
                )
            }
            Level::Detail => {
                let slot = node
                    .parent_major_id
                    .as_deref()
                    .and_then(|p| palette_slot.get(p))
                    .copied()
                    .unwrap_or(0);
                format!(
                    "label=\"{label}\", fillcolor=\"{}\", fontcolor=\"#333333\", fontsize=10, width=0.6",
                    DETAIL_PALETTE[slot],
                )
            }
        };
        let _ = writeln!(out, "  {} [{attrs}];", quote_id(&node.id));
    }
    out.push('\n');

    for edge in &map.edges {
        let _ = writeln!(
            out,
            "  {} -> {} [{}];",
            quote_id(&edge.from),
            quote_id(&edge.to),
            edge_attrs(edge, options)
        );
    }

    out.push_str("}\n");
    out
}

fn edge_attrs(edge: &ConceptEdge, options: &DotOptions) -> String {
    let (color, style) = family_style(edge.relationship.family());
    let penwidth = if edge.hierarchy {
        1.0
    } else {
        1.0 + 3.0 * edge.weight.clamp(0.0, 1.0)
    };
    let mut attrs = vec![
        format!("color=\"{color}\""),
        format!("penwidth={penwidth:.2}"),
    ];
    if let Some(style) = style {
        attrs.push(format!("style={style}"));
    }
    if edge.bidirectional {
        attrs.push("dir=none".to_string());
    }
    if options.edge_labels && !edge.hierarchy {
        attrs.push(format!(
            "label=\"{}\", fontcolor=\"{color}\"",
            escape_for_dot(edge.relationship.name())
        ));
    }
    attrs.join(", ")
}
