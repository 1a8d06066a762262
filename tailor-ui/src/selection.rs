//! Row selection state.
//!
//! Selection is tracked by row key so it stays stable while rows are
//! filtered, sorted or paged. Bulk operations take the keys of the rows
//! currently visible; they never touch rows hidden by a filter.

use std::collections::HashSet;
use std::hash::Hash;

/// Selection mode for a table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SelectionMode {
    /// No selection allowed.
    #[default]
    None,
    /// At most one row selected (radio style).
    Single,
    /// Any number of rows selected (checkbox style).
    Multi,
}

/// Keys added and removed by a selection operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionChange<K> {
    pub added: Vec<K>,
    pub removed: Vec<K>,
}

impl<K> SelectionChange<K> {
    fn none() -> Self {
        Self {
            added: Vec::new(),
            removed: Vec::new(),
        }
    }

    /// Whether the operation changed anything.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Key-based selection set.
#[derive(Debug, Clone)]
pub struct Selection<K: Clone + Eq + Hash> {
    mode: SelectionMode,
    selected: HashSet<K>,
    /// Anchor for range selection.
    anchor: Option<K>,
}

impl<K: Clone + Eq + Hash> Default for Selection<K> {
    fn default() -> Self {
        Self::new(SelectionMode::None)
    }
}

impl<K: Clone + Eq + Hash> Selection<K> {
    /// Create an empty selection with the given mode.
    pub fn new(mode: SelectionMode) -> Self {
        Self {
            mode,
            selected: HashSet::new(),
            anchor: None,
        }
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Check if a key is selected.
    pub fn is_selected(&self, key: &K) -> bool {
        self.selected.contains(key)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Iterate over the selected keys (unordered).
    pub fn iter(&self) -> impl Iterator<Item = &K> {
        self.selected.iter()
    }

    /// Toggle one key.
    pub fn toggle(&mut self, key: &K) -> SelectionChange<K> {
        match self.mode {
            SelectionMode::None => SelectionChange::none(),
            SelectionMode::Single => {
                let mut change = SelectionChange::none();
                if self.selected.remove(key) {
                    change.removed.push(key.clone());
                } else {
                    change.removed = self.selected.drain().collect();
                    self.selected.insert(key.clone());
                    change.added.push(key.clone());
                }
                self.anchor = Some(key.clone());
                change
            }
            SelectionMode::Multi => {
                self.anchor = Some(key.clone());
                if self.selected.remove(key) {
                    SelectionChange {
                        added: Vec::new(),
                        removed: vec![key.clone()],
                    }
                } else {
                    self.selected.insert(key.clone());
                    SelectionChange {
                        added: vec![key.clone()],
                        removed: Vec::new(),
                    }
                }
            }
        }
    }

    /// Remove a key if selected.
    pub fn deselect(&mut self, key: &K) -> SelectionChange<K> {
        let mut change = SelectionChange::none();
        if self.selected.remove(key) {
            change.removed.push(key.clone());
        }
        change
    }

    /// Select every key in `visible` (multi mode only).
    pub fn select_all(&mut self, visible: &[K]) -> SelectionChange<K> {
        let mut change = SelectionChange::none();
        if self.mode != SelectionMode::Multi {
            return change;
        }
        for key in visible {
            if self.selected.insert(key.clone()) {
                change.added.push(key.clone());
            }
        }
        change
    }

    /// Deselect every key in `visible`, leaving other selected keys alone.
    pub fn deselect_all(&mut self, visible: &[K]) -> SelectionChange<K> {
        let mut change = SelectionChange::none();
        for key in visible {
            if self.selected.remove(key) {
                change.removed.push(key.clone());
            }
        }
        change
    }

    /// Whether every key in `visible` is selected. False for an empty slice.
    pub fn all_selected(&self, visible: &[K]) -> bool {
        !visible.is_empty() && visible.iter().all(|k| self.selected.contains(k))
    }

    /// Header checkbox behavior: select all visible keys, or deselect them
    /// if they are already all selected.
    pub fn toggle_all(&mut self, visible: &[K]) -> SelectionChange<K> {
        if self.all_selected(visible) {
            self.deselect_all(visible)
        } else {
            self.select_all(visible)
        }
    }

    /// Range select from the anchor to `target` within `ordered` keys
    /// (Shift+click). Falls back to toggling `target` when the anchor is not
    /// in `ordered`.
    pub fn range_select(&mut self, target: &K, ordered: &[K]) -> SelectionChange<K> {
        if self.mode != SelectionMode::Multi {
            return self.toggle(target);
        }
        let anchor_pos = self
            .anchor
            .as_ref()
            .and_then(|a| ordered.iter().position(|k| k == a));
        let target_pos = ordered.iter().position(|k| k == target);

        let (Some(a), Some(t)) = (anchor_pos, target_pos) else {
            return self.toggle(target);
        };
        let (start, end) = if a <= t { (a, t) } else { (t, a) };

        let mut change = SelectionChange::none();
        for key in &ordered[start..=end] {
            if self.selected.insert(key.clone()) {
                change.added.push(key.clone());
            }
        }
        change
    }

    /// Drop keys that are no longer present.
    pub fn retain(&mut self, present: &HashSet<K>) -> SelectionChange<K> {
        let removed: Vec<K> = self
            .selected
            .iter()
            .filter(|k| !present.contains(*k))
            .cloned()
            .collect();
        for key in &removed {
            self.selected.remove(key);
        }
        if self.anchor.as_ref().is_some_and(|a| !present.contains(a)) {
            self.anchor = None;
        }
        SelectionChange {
            added: Vec::new(),
            removed,
        }
    }

    /// Clear everything. Returns the keys that were deselected.
    pub fn clear(&mut self) -> SelectionChange<K> {
        self.anchor = None;
        SelectionChange {
            added: Vec::new(),
            removed: self.selected.drain().collect(),
        }
    }
}

impl<K: Clone + Eq + Hash + Ord> Selection<K> {
    /// Selected keys in sorted order.
    pub fn sorted(&self) -> Vec<K> {
        let mut keys: Vec<K> = self.selected.iter().cloned().collect();
        keys.sort();
        keys
    }
}
