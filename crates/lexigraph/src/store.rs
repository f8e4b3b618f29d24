//! Request-scoped storage of generated maps.
//!
//! Each visualization session keeps its own map under a caller-chosen key,
//! so concurrent requests never overwrite each other's result. The store is
//! bounded; the oldest session is evicted first.

use lexigraph_graph::ConceptMap;
use std::collections::{HashMap, VecDeque};

/// Default number of sessions kept.
pub const DEFAULT_STORE_CAPACITY: usize = 32;

/// Maps generated per session, oldest evicted first.
#[derive(Debug)]
pub struct MapStore {
    maps: HashMap<String, ConceptMap>,
    order: VecDeque<String>,
    capacity: usize,
}

impl Default for MapStore {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_STORE_CAPACITY)
    }
}

impl MapStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding at most `capacity` sessions (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            maps: HashMap::new(),
            order: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Stores a session's map, replacing its previous one. Returns the
    /// session evicted to make room, if any.
    pub fn insert(&mut self, session: impl Into<String>, map: ConceptMap) -> Option<String> {
        let session = session.into();
        if self.maps.insert(session.clone(), map).is_some() {
            self.order.retain(|s| s != &session);
        }
        self.order.push_back(session);

        if self.order.len() > self.capacity {
            let evicted = self.order.pop_front()?;
            self.maps.remove(&evicted);
            log::debug!("evicted concept map for session {evicted}");
            return Some(evicted);
        }
        None
    }

    pub fn get(&self, session: &str) -> Option<&ConceptMap> {
        self.maps.get(session)
    }

    pub fn remove(&mut self, session: &str) -> Option<ConceptMap> {
        let map = self.maps.remove(session)?;
        self.order.retain(|s| s != session);
        Some(map)
    }

    pub fn contains(&self, session: &str) -> bool {
        self.maps.contains_key(session)
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Session keys, oldest first.
    pub fn sessions(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.maps.clear();
        self.order.clear();
    }
}
