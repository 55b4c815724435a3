pub mod error;

pub mod config;

pub mod controller {
    pub mod actions;
    pub use actions::Action;

    pub mod action_dispatcher;

    pub mod command_parser;
    pub use command_parser::{ShellCommand, parse_command};

    pub mod event_loop;
    pub use event_loop::{DriveEvent, DriveHandle, EventLoop};
}

pub mod model {
    pub mod entry;
    pub use entry::{Entry, EntryId, EntryKind, FileSize, MediaKind};

    pub mod catalog;
    pub use catalog::Catalog;

    pub mod selection;
    pub use selection::SelectionTracker;

    pub mod query;

    pub mod folder;

    pub mod view_mode;
    pub use view_mode::ViewMode;

    pub mod storage;
    pub use storage::StorageUsage;

    pub mod seed;

    pub mod drive_state;
    pub use drive_state::DriveState;
}

pub mod upload {
    pub mod descriptor;
    pub use descriptor::FileDescriptor;

    pub mod simulator;
    pub use simulator::{TickOutcome, UploadSimulator};

    pub mod ticker;
    pub use ticker::{ImmediateTicker, IntervalTicker, TickSource};
}

pub mod view {
    pub mod snapshots;
    pub use snapshots::*;

    pub mod listing;
}

pub mod util {
    pub mod clock;

    pub mod humanize;

    pub mod id_gen;
}

pub mod logging;
pub use logging::Logger;

pub use error::AppError;

pub use model::drive_state::DriveState;
