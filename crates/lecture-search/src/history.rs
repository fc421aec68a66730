//! Browser-history seam for the persisted query.

use crate::codec::PersistedQuery;

/// Where the committed query is written.
///
/// `push` adds a navigable entry (user-driven searches and page changes);
/// `replace` rewrites the current entry (canonicalising the URL at mount).
pub trait History {
    fn push(&mut self, query: &PersistedQuery);

    fn replace(&mut self, query: &PersistedQuery);
}

/// In-memory history stack.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    entries: Vec<PersistedQuery>,
    replacements: usize,
}

impl MemoryHistory {
    /// Start a history whose current entry is `initial`.
    pub fn new(initial: PersistedQuery) -> Self {
        Self {
            entries: vec![initial],
            replacements: 0,
        }
    }

    /// The current entry.
    pub fn current(&self) -> &PersistedQuery {
        // `entries` is never empty: it starts with one entry and only grows.
        &self.entries[self.entries.len() - 1]
    }

    pub fn entries(&self) -> &[PersistedQuery] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// How many times the current entry was rewritten in place.
    pub fn replacements(&self) -> usize {
        self.replacements
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new(PersistedQuery::new())
    }
}

impl History for MemoryHistory {
    fn push(&mut self, query: &PersistedQuery) {
        self.entries.push(query.clone());
    }

    fn replace(&mut self, query: &PersistedQuery) {
        if let Some(last) = self.entries.last_mut() {
            *last = query.clone();
        }
        self.replacements += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_replace() {
        let mut history = MemoryHistory::default();
        assert_eq!(history.len(), 1);

        history.push(&PersistedQuery::parse("search=a"));
        assert_eq!(history.len(), 2);
        assert_eq!(history.current().to_string(), "search=a");

        history.replace(&PersistedQuery::parse("search=b"));
        assert_eq!(history.len(), 2);
        assert_eq!(history.replacements(), 1);
        assert_eq!(history.current().to_string(), "search=b");
    }
}
