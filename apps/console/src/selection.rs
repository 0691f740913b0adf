//! Selection Tracker — the set of user ids the operator has checked.
//!
//! The selection is scoped to the unfiltered universe of ids, not to the
//! currently displayed folder view: switching folders neither clears nor
//! extends it. The only implicit mutation is the purge after a roster
//! refresh, which drops ids the service no longer knows.

use std::collections::HashSet;

#[derive(Debug, Default, Clone)]
pub struct Selection {
    ids: HashSet<String>,
}

impl Selection {
    /// Flips membership of `id`. Toggling an id not present in the current
    /// roster is permitted; it simply has no visible effect until a folder
    /// filter exposes it (or the next refresh purges it).
    pub fn toggle(&mut self, id: &str) {
        if !self.ids.remove(id) {
            self.ids.insert(id.to_string());
        }
    }

    /// Replaces the selection with the given ids.
    pub fn select_all<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.ids = ids.into_iter().collect();
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Drops every selected id not present in `known`. Called after each
    /// roster refresh so the selection never dangles on deleted users.
    pub fn retain_known(&mut self, known: &HashSet<String>) {
        self.ids.retain(|id| known.contains(id));
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Selected ids in deterministic order, ready for a batch request.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.ids.iter().cloned().collect();
        ids.sort();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_keeps_ids_toggled_an_odd_number_of_times() {
        let mut selection = Selection::default();
        for id in ["a", "b", "a", "c", "b", "b"] {
            selection.toggle(id);
        }
        // a: 2x, b: 3x, c: 1x
        assert!(!selection.contains("a"));
        assert!(selection.contains("b"));
        assert!(selection.contains("c"));
        assert_eq!(selection.len(), 2);
    }

    #[test]
    fn select_all_replaces_previous_selection() {
        let mut selection = Selection::default();
        selection.toggle("a");
        selection.select_all(["b".to_string(), "c".to_string()]);
        assert!(!selection.contains("a"));
        assert_eq!(selection.ids(), vec!["b", "c"]);
    }

    #[test]
    fn clear_empties_the_selection() {
        let mut selection = Selection::default();
        selection.toggle("a");
        selection.clear();
        assert!(selection.is_empty());
    }

    #[test]
    fn retain_known_purges_dangling_ids() {
        let mut selection = Selection::default();
        selection.toggle("a");
        selection.toggle("gone");
        let known: HashSet<String> = ["a".to_string(), "b".to_string()].into();
        selection.retain_known(&known);
        assert_eq!(selection.ids(), vec!["a"]);
    }
}
