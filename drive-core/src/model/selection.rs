//! ``src/model/selection.rs``
//! Selected entry ids. Ids are weak references: nothing here checks them
//! against the catalog, and ids that no longer resolve are simply skipped
//! by [`SelectionTracker::visible_selection`].

use ahash::AHashSet;

use crate::model::entry::{Entry, EntryId};

#[derive(Debug, Clone, Default)]
pub struct SelectionTracker {
    selected: AHashSet<EntryId>,
}

impl SelectionTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership of `id`. Returns whether it is selected afterwards.
    pub fn toggle(&mut self, id: &EntryId) -> bool {
        if self.selected.remove(id) {
            false
        } else {
            self.selected.insert(id.clone());
            true
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    #[must_use]
    pub fn is_selected(&self, id: &EntryId) -> bool {
        self.selected.contains(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Unordered.
    pub fn iter(&self) -> impl Iterator<Item = &EntryId> {
        self.selected.iter()
    }

    /// Selected ids among `entries`, in the order the entries appear.
    pub fn visible_selection<'a, I>(&self, entries: I) -> Vec<&'a EntryId>
    where
        I: IntoIterator<Item = &'a Entry>,
    {
        entries
            .into_iter()
            .filter(|entry| self.selected.contains(&entry.id))
            .map(|entry| &entry.id)
            .collect()
    }
}
