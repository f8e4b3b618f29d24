//! Content corpus and scope selection.
//!
//! The corpus is the in-memory snapshot of notes handed to Lexigraph by the
//! host application. Each [`ContentNode`] may reference a parent, forming an
//! external hierarchy that can be malformed (dangling parents, cycles).
//! Every walk in this module tracks visited ids so cycles terminate.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

// ============================================================================
// ContentNode
// ============================================================================

/// A single note in the external hierarchy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentNode {
    /// Identifier assigned by the backing store.
    pub id: String,
    /// Title of the note.
    pub name: String,
    /// Optional body text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Parent note, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

impl ContentNode {
    /// Creates a root node with a title and no body.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            note: None,
            parent_id: None,
        }
    }

    /// Sets the body text.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Sets the parent id.
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// Title and body joined by a space.
    pub fn text(&self) -> String {
        match self.note.as_deref() {
            Some(note) if !note.is_empty() => format!("{} {}", self.name, note),
            _ => self.name.clone(),
        }
    }
}

// ============================================================================
// Scope
// ============================================================================

/// Which part of the corpus a request looks at, relative to a designated node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// Only the designated node.
    ThisNode,
    /// The designated node and all of its descendants.
    #[default]
    Children,
    /// The designated node and every node sharing its parent.
    Siblings,
    /// The designated node and its ancestor chain.
    Ancestors,
    /// The entire corpus.
    All,
}

impl Scope {
    /// Returns the scope name as used on the wire.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ThisNode => "this_node",
            Self::Children => "children",
            Self::Siblings => "siblings",
            Self::Ancestors => "ancestors",
            Self::All => "all",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scope {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "this_node" | "this" | "node" => Ok(Self::ThisNode),
            "children" | "descendants" => Ok(Self::Children),
            "siblings" => Ok(Self::Siblings),
            "ancestors" => Ok(Self::Ancestors),
            "all" => Ok(Self::All),
            other => Err(Error::parse(format!(
                "unknown scope `{other}` (expected this_node|children|siblings|ancestors|all)"
            ))),
        }
    }
}

// ============================================================================
// Corpus
// ============================================================================

/// An indexed, read-only collection of content nodes.
#[derive(Clone, Debug, Default)]
pub struct Corpus {
    nodes: Vec<ContentNode>,
    index: HashMap<String, usize>,
    children: HashMap<String, Vec<usize>>,
}

impl Corpus {
    /// Builds a corpus, keeping the first node for any duplicated id.
    pub fn new(nodes: Vec<ContentNode>) -> Self {
        let mut kept = Vec::with_capacity(nodes.len());
        let mut index = HashMap::with_capacity(nodes.len());

        for node in nodes {
            if index.contains_key(&node.id) {
                log::warn!("duplicate content node id `{}` ignored", node.id);
                continue;
            }
            index.insert(node.id.clone(), kept.len());
            kept.push(node);
        }

        let mut children: HashMap<String, Vec<usize>> = HashMap::new();
        for (pos, node) in kept.iter().enumerate() {
            if let Some(parent) = &node.parent_id {
                children.entry(parent.clone()).or_default().push(pos);
            }
        }

        Self {
            nodes: kept,
            index,
            children,
        }
    }

    /// Parses a JSON array of `{id, name, note?, parent_id?}` objects.
    pub fn from_json(json: &str) -> Result<Self> {
        let nodes: Vec<ContentNode> = serde_json::from_str(json)?;
        Ok(Self::new(nodes))
    }

    /// Reads a corpus from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
        Self::from_json(&json)
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the corpus has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Looks up a node by id.
    pub fn get(&self, id: &str) -> Option<&ContentNode> {
        self.index.get(id).map(|&pos| &self.nodes[pos])
    }

    /// Checks whether a node exists.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Iterates nodes in corpus order.
    pub fn iter(&self) -> impl Iterator<Item = &ContentNode> {
        self.nodes.iter()
    }

    /// Direct children of a node, in corpus order.
    pub fn children_of(&self, id: &str) -> Vec<&ContentNode> {
        self.children
            .get(id)
            .map(|positions| positions.iter().map(|&pos| &self.nodes[pos]).collect())
            .unwrap_or_default()
    }

    /// The parent of a node, if it is present in the corpus.
    pub fn parent_of(&self, id: &str) -> Option<&ContentNode> {
        self.get(id)?.parent_id.as_deref().and_then(|p| self.get(p))
    }

    /// Ancestor chain from the immediate parent upward.
    pub fn ancestors(&self, id: &str) -> Vec<&ContentNode> {
        let mut chain = Vec::new();
        let mut visited: HashSet<&str> = HashSet::new();
        let Some(start) = self.get(id) else {
            return chain;
        };
        visited.insert(start.id.as_str());

        let mut current = start;
        while let Some(parent) = current.parent_id.as_deref().and_then(|p| self.get(p)) {
            if !visited.insert(parent.id.as_str()) {
                log::debug!("parent cycle detected at `{}`", parent.id);
                break;
            }
            chain.push(parent);
            current = parent;
        }
        chain
    }

    /// All descendants of a node (breadth-first, excluding the node itself).
    pub fn descendants(&self, id: &str) -> Vec<&ContentNode> {
        let mut result = Vec::new();
        let mut visited: HashSet<&str> = HashSet::new();
        let mut queue: VecDeque<&str> = VecDeque::new();

        let Some(start) = self.get(id) else {
            return result;
        };
        visited.insert(start.id.as_str());
        queue.push_back(start.id.as_str());

        while let Some(current) = queue.pop_front() {
            for child in self.children_of(current) {
                if visited.insert(child.id.as_str()) {
                    result.push(child);
                    queue.push_back(child.id.as_str());
                }
            }
        }
        result
    }

    /// Nodes sharing the node's parent, excluding the node itself.
    ///
    /// Root-level nodes are siblings of every other root-level node.
    pub fn siblings(&self, id: &str) -> Vec<&ContentNode> {
        let Some(node) = self.get(id) else {
            return Vec::new();
        };
        let parent = node.parent_id.as_deref();
        self.nodes
            .iter()
            .filter(|n| n.id != node.id && n.parent_id.as_deref() == parent)
            .collect()
    }

    /// Selects the nodes covered by `scope`, in corpus order.
    ///
    /// Every scope except [`Scope::All`] requires a designated root that
    /// exists in the corpus.
    pub fn scoped(&self, root: Option<&str>, scope: Scope) -> Result<Vec<&ContentNode>> {
        if scope == Scope::All {
            return Ok(self.nodes.iter().collect());
        }

        let root_id = root.ok_or_else(|| {
            Error::config(format!("scope `{scope}` requires a designated node"))
        })?;
        let root_node = self
            .get(root_id)
            .ok_or_else(|| Error::not_found("node", root_id))?;

        let mut members: HashSet<&str> = HashSet::new();
        members.insert(root_node.id.as_str());
        let extra = match scope {
            Scope::ThisNode | Scope::All => Vec::new(),
            Scope::Children => self.descendants(root_id),
            Scope::Siblings => self.siblings(root_id),
            Scope::Ancestors => self.ancestors(root_id),
        };
        members.extend(extra.iter().map(|n| n.id.as_str()));

        Ok(self
            .nodes
            .iter()
            .filter(|n| members.contains(n.id.as_str()))
            .collect())
    }

    /// Structural depth of a node: hops walked upward until `root` is
    /// reached, or until the top of the node's tree when `root` is not one of
    /// its ancestors.
    pub fn depth(&self, id: &str, root: Option<&str>) -> usize {
        let Some(mut current) = self.get(id) else {
            return 0;
        };
        let mut visited: HashSet<&str> = HashSet::new();
        let mut hops = 0;

        loop {
            if root == Some(current.id.as_str()) || !visited.insert(current.id.as_str()) {
                return hops;
            }
            match current.parent_id.as_deref().and_then(|p| self.get(p)) {
                Some(parent) if !visited.contains(parent.id.as_str()) => {
                    hops += 1;
                    current = parent;
                }
                _ => return hops,
            }
        }
    }
}

impl FromIterator<ContentNode> for Corpus {
    fn from_iter<I: IntoIterator<Item = ContentNode>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

// ============================================================================
// Tests
// ============================================================================
