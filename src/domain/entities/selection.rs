use std::collections::BTreeSet;

use crate::domain::entities::record::RowKey;

/// Rows picked for bulk actions. Membership does not depend on which page
/// is on screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    keys: BTreeSet<RowKey>,
}

impl SelectionSet {
    pub fn set(&mut self, key: RowKey, selected: bool) {
        if selected {
            self.keys.insert(key);
        } else {
            self.keys.remove(&key);
        }
    }

    pub fn toggle(&mut self, key: RowKey) {
        if !self.keys.remove(&key) {
            self.keys.insert(key);
        }
    }

    /// Header checkbox: applies to exactly the given (visible) keys.
    pub fn set_all<'a>(&mut self, keys: impl IntoIterator<Item = &'a RowKey>, selected: bool) {
        for key in keys {
            self.set(key.clone(), selected);
        }
    }

    pub fn contains(&self, key: &RowKey) -> bool {
        self.keys.contains(key)
    }

    /// True when `keys` is non-empty and every key is selected.
    pub fn contains_all<'a>(&self, keys: impl IntoIterator<Item = &'a RowKey>) -> bool {
        let mut any = false;
        for key in keys {
            if !self.keys.contains(key) {
                return false;
            }
            any = true;
        }
        any
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &RowKey> {
        self.keys.iter()
    }
}
