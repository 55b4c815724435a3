//! ``src/model/catalog.rs``
//! ============================================================================
//! # Catalog: the authoritative, ordered entry store
//!
//! Entries are kept in insertion order with the newest batch first. The only
//! structural mutation is [`Catalog::prepend`]; nothing is ever removed.
//! An id index backs the uniqueness check so every writer goes through one
//! choke point.

use ahash::AHashSet;
use tracing::{error, trace};

use crate::error::AppError;
use crate::model::entry::{Entry, EntryId};

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<Entry>,
    ids: AHashSet<EntryId>,
}

impl Catalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from an initial listing, first element first.
    pub fn with_entries(entries: Vec<Entry>) -> Result<Self, AppError> {
        let mut catalog = Self::new();
        catalog.prepend(entries)?;
        Ok(catalog)
    }

    #[inline]
    #[must_use]
    pub fn list(&self) -> &[Entry] {
        &self.entries
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: &EntryId) -> bool {
        self.ids.contains(id)
    }

    #[must_use]
    pub fn get(&self, id: &EntryId) -> Option<&Entry> {
        if !self.ids.contains(id) {
            return None;
        }
        self.entries.iter().find(|entry| &entry.id == id)
    }

    /// Insert `batch` ahead of every existing entry, keeping the batch's own
    /// order. Returns the number of entries inserted.
    ///
    /// A batch whose ids collide with the catalog, or with each other, is
    /// rejected whole with [`AppError::DuplicateId`] and the catalog is left
    /// untouched. Callers mint fresh ids, so debug builds panic instead.
    pub fn prepend(&mut self, batch: Vec<Entry>) -> Result<usize, AppError> {
        if batch.is_empty() {
            return Ok(0);
        }

        if let Some(id) = self.first_collision(&batch) {
            error!(
                marker = "CATALOG",
                operation_type = "prepend_duplicate_id",
                id = %id,
                batch_len = batch.len(),
                "Rejected catalog batch with colliding id"
            );
            if cfg!(debug_assertions) {
                panic!("duplicate entry id {id} passed to Catalog::prepend");
            }
            return Err(AppError::DuplicateId(id.clone()));
        }

        let inserted = batch.len();
        self.ids.extend(batch.iter().map(|entry| entry.id.clone()));
        self.entries.splice(0..0, batch);

        trace!(
            marker = "CATALOG",
            operation_type = "prepend",
            inserted,
            total = self.entries.len(),
            "Prepended entries"
        );

        Ok(inserted)
    }

    fn first_collision<'a>(&self, batch: &'a [Entry]) -> Option<&'a EntryId> {
        let mut incoming: AHashSet<&EntryId> = AHashSet::with_capacity(batch.len());
        batch
            .iter()
            .map(|entry| &entry.id)
            .find(|&id| self.ids.contains(id) || !incoming.insert(id))
    }

    /// Set the starred flag. Returns `false` if the id is unknown.
    pub fn set_starred(&mut self, id: &EntryId, starred: bool) -> bool {
        self.entry_mut(id)
            .map(|entry| entry.starred = starred)
            .is_some()
    }

    /// Set the shared flag. Returns `false` if the id is unknown.
    pub fn set_shared(&mut self, id: &EntryId, shared: bool) -> bool {
        self.entry_mut(id).map(|entry| entry.shared = shared).is_some()
    }

    pub fn starred(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter().filter(|entry| entry.starred)
    }

    pub fn shared(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter().filter(|entry| entry.shared)
    }

    fn entry_mut(&mut self, id: &EntryId) -> Option<&mut Entry> {
        if !self.ids.contains(id) {
            return None;
        }
        self.entries.iter_mut().find(|entry| &entry.id == id)
    }
}
