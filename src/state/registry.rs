//! Deduplicated link registry
//!
//! Maps each canonical URL to its visitation state. All mutation goes
//! through this type's synchronized API; the backing map is never
//! exposed, so two workers can never both believe a URL is new, and a
//! concurrent discovery can never overwrite a Visited state back to
//! Unvisited.

use std::collections::HashMap;
use std::sync::Mutex;

/// Visitation state of a registered link
///
/// The only transition is Unvisited -> Visited, exactly once per URL,
/// never reversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LinkState {
    /// Link is known but has not been crawled yet
    Unvisited,

    /// Link has been fetched and processed
    Visited,
}

impl LinkState {
    /// Returns true once the link has been crawled
    pub fn is_visited(&self) -> bool {
        matches!(self, Self::Visited)
    }
}

/// The global deduplicated map from canonical URL to visitation state
#[derive(Debug, Default)]
pub struct LinkRegistry {
    links: Mutex<HashMap<String, LinkState>>,
}

impl LinkRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically inserts a URL as Unvisited if it is not yet known.
    ///
    /// Returns true iff the URL was newly inserted. Safe to call from
    /// many workers concurrently; exactly one caller wins for any
    /// given URL.
    pub fn try_register(&self, url: &str) -> bool {
        let mut links = self.links.lock().expect("registry lock poisoned");
        match links.entry(url.to_string()) {
            std::collections::hash_map::Entry::Vacant(entry) => {
                entry.insert(LinkState::Unvisited);
                true
            }
            std::collections::hash_map::Entry::Occupied(_) => false,
        }
    }

    /// Marks a known URL as Visited.
    ///
    /// Returns true iff the state actually transitioned. Unknown URLs
    /// and already-visited URLs are no-ops; the transition is
    /// monotonic and can never regress.
    pub fn mark_visited(&self, url: &str) -> bool {
        let mut links = self.links.lock().expect("registry lock poisoned");
        match links.get_mut(url) {
            Some(state @ LinkState::Unvisited) => {
                *state = LinkState::Visited;
                true
            }
            _ => false,
        }
    }

    /// Returns a consistent point-in-time view of all known links.
    ///
    /// Taken under a single lock acquisition, so a snapshot can never
    /// observe a half-applied round.
    pub fn snapshot(&self) -> Vec<(String, LinkState)> {
        let links = self.links.lock().expect("registry lock poisoned");
        links
            .iter()
            .map(|(url, state)| (url.clone(), *state))
            .collect()
    }

    /// Counts links that have not been visited yet
    pub fn count_unvisited(&self) -> usize {
        let links = self.links.lock().expect("registry lock poisoned");
        links
            .values()
            .filter(|state| !state.is_visited())
            .count()
    }

    /// Returns true if the URL is already known to the registry
    pub fn contains(&self, url: &str) -> bool {
        let links = self.links.lock().expect("registry lock poisoned");
        links.contains_key(url)
    }

    /// Returns true if the URL is known and already visited
    pub fn is_visited(&self, url: &str) -> bool {
        let links = self.links.lock().expect("registry lock poisoned");
        links.get(url).map(LinkState::is_visited).unwrap_or(false)
    }

    /// Total number of known links
    pub fn len(&self) -> usize {
        self.links.lock().expect("registry lock poisoned").len()
    }

    /// Returns true if no links are registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
