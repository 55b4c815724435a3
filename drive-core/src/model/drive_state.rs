//! ``src/model/drive_state.rs``
//! ============================================================================
//! # `DriveState`: single owner of the browser's mutable state
//!
//! Catalog, selection, search text, view mode and the upload simulator live
//! here together with the id generator and clock they share. Folder creation
//! and upload commits both reach the catalog through this struct, so there
//! is exactly one writer path to it.

use compact_str::CompactString;
use tracing::{debug, instrument};

use crate::config::Config;
use crate::error::AppError;
use crate::model::catalog::Catalog;
use crate::model::entry::{Entry, EntryId};
use crate::model::folder;
use crate::model::query;
use crate::model::seed::sample_entries;
use crate::model::selection::SelectionTracker;
use crate::model::storage::StorageUsage;
use crate::model::view_mode::ViewMode;
use crate::upload::descriptor::FileDescriptor;
use crate::upload::simulator::{TickOutcome, UploadSimulator};
use crate::util::clock::{Clock, SystemClock};
use crate::util::id_gen::IdGenerator;
use crate::view::snapshots::DriveSnapshot;

#[derive(Debug)]
pub struct DriveState {
    catalog: Catalog,
    selection: SelectionTracker,
    query: CompactString,
    view_mode: ViewMode,
    upload: UploadSimulator,
    storage: StorageUsage,
    ids: IdGenerator,
    clock: Box<dyn Clock>,
}

impl DriveState {
    /// State for a fresh session, using the system clock.
    pub fn new(config: &Config) -> Result<Self, AppError> {
        Self::with_clock(config, Box::new(SystemClock))
    }

    /// Like [`DriveState::new`] with an explicit clock. Seeds the sample
    /// listing when the config asks for it.
    pub fn with_clock(config: &Config, clock: Box<dyn Clock>) -> Result<Self, AppError> {
        let catalog = if config.seed_sample_catalog {
            Catalog::with_entries(sample_entries(clock.now()))?
        } else {
            Catalog::new()
        };

        Ok(Self::with_catalog(catalog, config, clock))
    }

    #[must_use]
    pub fn with_catalog(catalog: Catalog, config: &Config, clock: Box<dyn Clock>) -> Self {
        Self {
            catalog,
            selection: SelectionTracker::new(),
            query: CompactString::default(),
            view_mode: config.view.default_mode,
            upload: UploadSimulator::new(config.upload.progress_step),
            storage: config.storage,
            ids: IdGenerator::new(),
            clock,
        }
    }

    // ------------------------------------------------------------
    // Read access
    // ------------------------------------------------------------

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub const fn selection(&self) -> &SelectionTracker {
        &self.selection
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[must_use]
    pub const fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    #[must_use]
    pub const fn upload(&self) -> &UploadSimulator {
        &self.upload
    }

    #[must_use]
    pub const fn storage(&self) -> StorageUsage {
        self.storage
    }

    /// Catalog entries matching the current search, in catalog order.
    #[must_use]
    pub fn visible_entries(&self) -> Vec<&Entry> {
        query::filter(self.catalog.list(), &self.query)
    }

    /// Owned copy of what a renderer needs right now.
    #[must_use]
    pub fn snapshot(&self) -> DriveSnapshot {
        DriveSnapshot::from(self)
    }

    // ------------------------------------------------------------
    // Intents
    // ------------------------------------------------------------

    pub fn search(&mut self, text: &str) {
        self.query = CompactString::new(text);
        debug!(
            marker = "DRIVE_STATE",
            operation_type = "search",
            query = %self.query,
            "Search query updated"
        );
    }

    /// Returns whether `id` is selected afterwards.
    pub fn toggle_selection(&mut self, id: &EntryId) -> bool {
        self.selection.toggle(id)
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub const fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
    }

    #[instrument(level = "debug", skip(self))]
    pub fn create_folder(&mut self, name: &str) -> Result<Entry, AppError> {
        folder::create(&mut self.catalog, &mut self.ids, self.clock.as_ref(), name)
    }

    #[instrument(level = "debug", skip(self, descriptors), fields(files = descriptors.len()))]
    pub fn start_upload(&mut self, descriptors: Vec<FileDescriptor>) -> Result<usize, AppError> {
        self.upload.start(descriptors, self.clock.now())
    }

    /// Feed one tick to the upload simulator.
    pub fn tick_upload(&mut self) -> Result<TickOutcome, AppError> {
        self.upload
            .tick(&mut self.catalog, &mut self.ids, self.clock.as_ref())
    }

    pub fn set_starred(&mut self, id: &EntryId, starred: bool) -> Result<(), AppError> {
        if self.catalog.set_starred(id, starred) {
            Ok(())
        } else {
            Err(AppError::UnknownEntry(id.clone()))
        }
    }

    pub fn set_shared(&mut self, id: &EntryId, shared: bool) -> Result<(), AppError> {
        if self.catalog.set_shared(id, shared) {
            Ok(())
        } else {
            Err(AppError::UnknownEntry(id.clone()))
        }
    }
}
