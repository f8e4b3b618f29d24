//! Self-contained interactive HTML document.
//!
//! The page embeds the map as JSON together with the physics parameters and
//! their control ranges. Its inline script runs the same force model as
//! `lexigraph-layout` on `requestAnimationFrame`.

use lexigraph_core::{deep_link, Result};
use lexigraph_graph::{ConceptEdge, ConceptNode, Level, MapExport};
use lexigraph_layout::{Canvas, ParamKind, PhysicsParams, CORE_RADIUS, DETAIL_RADIUS, JITTER, MAJOR_RADIUS};
use serde::Serialize;

const TEMPLATE: &str = include_str!("../templates/concept_map.html");

/// Settings for the interactive document.
#[derive(Clone, Debug, Default)]
pub struct HtmlOptions {
    /// Host used for deep links; concepts link nowhere when absent.
    pub host: Option<String>,
    pub physics: PhysicsParams,
    pub canvas: Canvas,
}

#[derive(Serialize)]
struct Payload<'a> {
    title: &'a str,
    truncated: bool,
    nodes: Vec<NodePayload<'a>>,
    edges: Vec<EdgePayload<'a>>,
    physics: &'a PhysicsParams,
    controls: Vec<Control>,
    canvas: &'a Canvas,
    radii: Radii,
    jitter: f32,
}

#[derive(Serialize)]
struct NodePayload<'a> {
    id: &'a str,
    label: &'a str,
    level: Level,
    occurrences: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    parent: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    link: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    inferred: bool,
}

#[derive(Serialize)]
struct EdgePayload<'a> {
    from: &'a str,
    to: &'a str,
    relationship: &'a str,
    family: &'static str,
    weight: f32,
    bidirectional: bool,
    hierarchy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    evidence: Option<&'a str>,
}

#[derive(Serialize)]
struct Control {
    name: &'static str,
    label: &'static str,
    min: f32,
    max: f32,
    step: f32,
    value: f32,
}

#[derive(Serialize)]
struct Radii {
    core: f32,
    major: f32,
    detail: f32,
}

fn node_payload<'a>(node: &'a ConceptNode, host: Option<&str>) -> NodePayload<'a> {
    NodePayload {
        id: &node.id,
        label: &node.label,
        level: node.level,
        occurrences: node.occurrences,
        parent: node.parent_major_id.as_deref(),
        link: node.source_id.as_deref().and_then(|item| deep_link(host, item)),
        inferred: node.source_id.is_none(),
    }
}

fn edge_payload(edge: &ConceptEdge) -> EdgePayload<'_> {
    EdgePayload {
        from: &edge.from,
        to: &edge.to,
        relationship: edge.relationship.name(),
        family: edge.relationship.family().name(),
        weight: edge.weight,
        bidirectional: edge.bidirectional,
        hierarchy: edge.hierarchy,
        evidence: edge.evidence.as_deref(),
    }
}

/// Escapes serialized JSON for embedding in a `<script>` element.
///
/// Only characters that can end the script element or break a JavaScript
/// string literal are rewritten; the result is still valid JSON.
pub fn escape_json_for_script(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        match c {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            _ => out.push(c),
        }
    }
    out
}

/// Escapes text for HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Replaces `{{KEY}}` placeholders in one pass, so substituted text is
/// never scanned again. Unknown placeholders are left as they are.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        let key = &after[..end];
        match values.iter().find(|(k, _)| *k == key) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[start..start + end + 4]),
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    out
}

/// Renders the interactive document for a map.
pub fn render_html(map: &MapExport, options: &HtmlOptions) -> Result<String> {
    let physics = options.physics.sanitized();
    let controls = ParamKind::ALL
        .into_iter()
        .map(|kind| {
            let range = kind.range();
            Control {
                name: kind.name(),
                label: kind.label(),
                min: range.min,
                max: range.max,
                step: range.step,
                value: physics.get(kind),
            }
        })
        .collect();

    let payload = Payload {
        title: &map.title,
        truncated: map.truncated,
        nodes: map
            .nodes
            .iter()
            .map(|n| node_payload(n, options.host.as_deref()))
            .collect(),
        edges: map.edges.iter().map(edge_payload).collect(),
        physics: &physics,
        controls,
        canvas: &options.canvas,
        radii: Radii {
            core: CORE_RADIUS,
            major: MAJOR_RADIUS,
            detail: DETAIL_RADIUS,
        },
        jitter: JITTER,
    };
    let json = escape_json_for_script(&serde_json::to_string(&payload)?);

    let title = escape_html(&map.title);
    let nodes = map.nodes.len().to_string();
    let edges = map.edges.len().to_string();
    let truncated = map.truncated.to_string();
    Ok(fill_template(
        TEMPLATE,
        &[
            ("TITLE", &title),
            ("GRAPH_JSON", &json),
            ("NODES_COUNT", &nodes),
            ("EDGES_COUNT", &edges),
            ("TRUNCATED", &truncated),
        ],
    ))
}
