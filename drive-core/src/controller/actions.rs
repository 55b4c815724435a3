//! src/controller/actions.rs
//! ============================================================================
//! # Actions: user intents entering the drive engine
//!
//! The presentation layer never touches `DriveState` directly; it sends one
//! of these through the event loop's channel.

use compact_str::CompactString;

use crate::model::entry::EntryId;
use crate::model::view_mode::ViewMode;
use crate::upload::descriptor::FileDescriptor;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Replace the search text (empty shows everything).
    Search(CompactString),

    ToggleSelection(EntryId),

    ClearSelection,

    SetViewMode(ViewMode),

    /// Create a folder with the given name; blank names are rejected.
    CreateFolder(String),

    /// Begin a simulated upload of the given batch.
    StartUpload(Vec<FileDescriptor>),

    SetStarred {
        id: EntryId,
        starred: bool,
    },

    SetShared {
        id: EntryId,
        shared: bool,
    },

    /// Re-publish the current snapshot without changing anything.
    Refresh,

    Quit,
}

impl Action {
    /// Stable name used in logs and rejection reports.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Search(_) => "search",
            Self::ToggleSelection(_) => "toggle_selection",
            Self::ClearSelection => "clear_selection",
            Self::SetViewMode(_) => "set_view_mode",
            Self::CreateFolder(_) => "create_folder",
            Self::StartUpload(_) => "start_upload",
            Self::SetStarred { .. } => "set_starred",
            Self::SetShared { .. } => "set_shared",
            Self::Refresh => "refresh",
            Self::Quit => "quit",
        }
    }
}
