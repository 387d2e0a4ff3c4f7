//! Alias Table
//!
//! Store identifiers are long opaque tokens nobody wants to type. The
//! alias table maps small 1-based integers, assigned in listing order, to
//! those identifiers for the current session only. Deleting a fact shifts
//! downstream numbering, so the table is discarded wholesale after any
//! successful delete rather than renumbered in place; the next listing
//! rebuilds it.

use std::collections::HashMap;

use crate::memory::Fact;

/// Volatile alias → fact-id mapping, scoped to one session
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    entries: HashMap<u32, String>,
}

impl AliasTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the table with dense 1-based entries in `facts` order.
    ///
    /// After `rebuild(&[a, b, c])`, alias 1 resolves to `a.id`, alias 2
    /// to `b.id`, and alias 3 to `c.id`.
    pub fn rebuild(&mut self, facts: &[Fact]) {
        self.entries = facts
            .iter()
            .enumerate()
            .map(|(i, fact)| (i as u32 + 1, fact.id.clone()))
            .collect();
    }

    /// Resolve an alias to its fact id, if the alias is current
    pub fn resolve(&self, alias: u32) -> Option<&str> {
        self.entries.get(&alias).map(String::as_str)
    }

    /// Discard every alias.
    ///
    /// Called after any successful delete and after clear-all; stale
    /// aliases must not resolve to renumbered facts.
    pub fn invalidate(&mut self) {
        self.entries.clear();
    }

    /// True when no listing has populated the table since the last
    /// invalidation
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of aliases currently assigned
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facts(ids: &[&str]) -> Vec<Fact> {
        ids.iter()
            .map(|id| Fact {
                id: id.to_string(),
                text: format!("fact {id}"),
            })
            .collect()
    }

    #[test]
    fn test_new_table_is_empty() {
        let table = AliasTable::new();
        assert!(table.is_empty());
        assert_eq!(table.len(), 0);
        assert_eq!(table.resolve(1), None);
    }

    #[test]
    fn test_rebuild_assigns_dense_one_based_aliases() {
        let mut table = AliasTable::new();
        table.rebuild(&facts(&["a1", "b2", "c3"]));

        assert_eq!(table.len(), 3);
        assert_eq!(table.resolve(1), Some("a1"));
        assert_eq!(table.resolve(2), Some("b2"));
        assert_eq!(table.resolve(3), Some("c3"));
        assert_eq!(table.resolve(0), None);
        assert_eq!(table.resolve(4), None);
    }

    #[test]
    fn test_rebuild_replaces_previous_entries() {
        let mut table = AliasTable::new();
        table.rebuild(&facts(&["a1", "b2", "c3"]));
        table.rebuild(&facts(&["z9"]));

        assert_eq!(table.len(), 1);
        assert_eq!(table.resolve(1), Some("z9"));
        assert_eq!(table.resolve(2), None);
    }

    #[test]
    fn test_invalidate_clears_all_aliases() {
        let mut table = AliasTable::new();
        table.rebuild(&facts(&["a1", "b2"]));
        table.invalidate();

        assert!(table.is_empty());
        assert_eq!(table.resolve(1), None);
        assert_eq!(table.resolve(2), None);
    }

    #[test]
    fn test_rebuild_with_no_facts_leaves_table_empty() {
        let mut table = AliasTable::new();
        table.rebuild(&facts(&["a1"]));
        table.rebuild(&[]);

        assert!(table.is_empty());
    }
}
