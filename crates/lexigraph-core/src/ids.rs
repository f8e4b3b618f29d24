//! Identifier helpers.
//!
//! Concept ids are derived from labels so that the same concept always gets
//! the same id within a map, whatever casing or spacing the vocabulary used.

/// Id reserved for the single core node of every concept map.
pub const CORE_ID: &str = "core";

/// Derives a stable kebab-case id from a concept label.
///
/// Characters other than letters, digits and hyphens become separators;
/// runs of separators collapse into a single hyphen. A label that would
/// collide with [`CORE_ID`] or that normalizes to nothing is prefixed with
/// `concept-`.
///
/// # Examples
///
/// ```
/// use lexigraph_core::ids::concept_id;
///
/// assert_eq!(concept_id("Voice Leading"), "voice-leading");
/// assert_eq!(concept_id("  cause_and  effect "), "cause-and-effect");
/// assert_eq!(concept_id("core"), "concept-core");
/// ```
pub fn concept_id(label: &str) -> String {
    let slug = label
        .to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '-'))
        .filter(|part| !part.is_empty())
        .collect::<Vec<&str>>()
        .join("-");

    if slug.is_empty() || slug == CORE_ID {
        format!("concept-{slug}").trim_end_matches('-').to_string()
    } else {
        slug
    }
}

/// Builds a deep link to a content item in the host application.
///
/// Returns `None` when no host is configured, since a bare `/#/<item>`
/// would resolve against wherever the page happens to be served from.
///
/// # Examples
///
/// ```
/// use lexigraph_core::ids::deep_link;
///
/// assert_eq!(
///     deep_link(Some("https://notes.example.com/"), "abc").as_deref(),
///     Some("https://notes.example.com/#/abc")
/// );
/// assert_eq!(deep_link(None, "abc"), None);
/// ```
pub fn deep_link(host: Option<&str>, item_id: &str) -> Option<String> {
    let host = host.map(str::trim).filter(|h| !h.is_empty())?;
    Some(format!("{}/#/{}", host.trim_end_matches('/'), item_id))
}
