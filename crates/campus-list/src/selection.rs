//! Row selection for bulk actions.

use std::collections::BTreeSet;

use campus_model::ItemId;

/// Set of checked item ids.
///
/// Keyed by stable id, never by row index. Ids that drop off the visible
/// page are pruned lazily through [`SelectionTracker::retain_visible`] when
/// the list is next rendered. Only "select all on the current page" exists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionTracker {
    selected: BTreeSet<ItemId>,
}

impl SelectionTracker {
    /// Empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership of `id`. Returns whether it is now selected.
    pub fn toggle(&mut self, id: &ItemId) -> bool {
        if self.selected.remove(id) {
            false
        } else {
            self.selected.insert(id.clone());
            true
        }
    }

    /// Replace the selection with exactly `ids`. An empty input clears it.
    pub fn select_all_visible<'a>(&mut self, ids: impl IntoIterator<Item = &'a ItemId>) {
        self.selected = ids.into_iter().cloned().collect();
    }

    /// Whether every id in `ids` is selected.
    ///
    /// An empty visible set is never "all selected".
    pub fn is_all_visible_selected(&self, ids: &[ItemId]) -> bool {
        !ids.is_empty() && ids.iter().all(|id| self.selected.contains(id))
    }

    /// Header-checkbox behaviour: clear when everything visible is checked,
    /// otherwise select exactly the visible ids.
    pub fn toggle_all_visible(&mut self, ids: &[ItemId]) {
        if self.is_all_visible_selected(ids) {
            self.clear();
        } else {
            self.select_all_visible(ids);
        }
    }

    /// Whether `id` is selected.
    pub fn is_selected(&self, id: &ItemId) -> bool {
        self.selected.contains(id)
    }

    /// Deselect `id`. Returns whether it was selected.
    pub fn remove(&mut self, id: &ItemId) -> bool {
        self.selected.remove(id)
    }

    /// Drop ids that are not in `visible`. Returns how many were dropped.
    pub fn retain_visible(&mut self, visible: &[ItemId]) -> usize {
        let before = self.selected.len();
        self.selected.retain(|id| visible.contains(id));
        before - self.selected.len()
    }

    /// Deselect everything.
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Number of selected ids.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Selected ids in sorted order.
    pub fn ids(&self) -> impl Iterator<Item = &ItemId> {
        self.selected.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[&str]) -> Vec<ItemId> {
        raw.iter().map(|id| ItemId::new(*id)).collect()
    }

    #[test]
    fn test_toggle_twice_restores_membership() {
        let mut selection = SelectionTracker::new();
        let id = ItemId::new("a");
        assert!(selection.toggle(&id));
        assert!(selection.is_selected(&id));
        assert!(!selection.toggle(&id));
        assert!(!selection.is_selected(&id));
    }

    #[test]
    fn test_select_all_visible_replaces() {
        let mut selection = SelectionTracker::new();
        selection.toggle(&ItemId::new("old"));
        let visible = ids(&["a", "b"]);
        selection.select_all_visible(&visible);
        assert_eq!(selection.len(), 2);
        assert!(!selection.is_selected(&ItemId::new("old")));

        selection.select_all_visible(&Vec::<ItemId>::new());
        assert!(selection.is_empty());
    }

    #[test]
    fn test_empty_visible_set_is_never_all_selected() {
        let mut selection = SelectionTracker::new();
        assert!(!selection.is_all_visible_selected(&[]));
        selection.toggle(&ItemId::new("a"));
        assert!(!selection.is_all_visible_selected(&[]));
    }

    #[test]
    fn test_is_all_visible_selected() {
        let mut selection = SelectionTracker::new();
        let visible = ids(&["a", "b"]);
        selection.toggle(&visible[0]);
        assert!(!selection.is_all_visible_selected(&visible));
        selection.toggle(&visible[1]);
        assert!(selection.is_all_visible_selected(&visible));
    }

    #[test]
    fn test_toggle_all_visible() {
        let mut selection = SelectionTracker::new();
        let visible = ids(&["a", "b"]);
        selection.toggle_all_visible(&visible);
        assert_eq!(selection.len(), 2);
        selection.toggle_all_visible(&visible);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_retain_visible() {
        let mut selection = SelectionTracker::new();
        selection.select_all_visible(&ids(&["a", "b", "c"]));
        let dropped = selection.retain_visible(&ids(&["b", "z"]));
        assert_eq!(dropped, 2);
        assert_eq!(selection.ids().collect::<Vec<_>>(), vec![&ItemId::new("b")]);
    }
}
