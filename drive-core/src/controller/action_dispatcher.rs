//! src/controller/action_dispatcher.rs
//! Applies one `Action` to the `DriveState`. Synchronous; the event loop
//! decides what to publish from the returned `Dispatched`.

use tracing::trace;

use crate::controller::actions::Action;
use crate::error::AppError;
use crate::model::drive_state::DriveState;

/// What the event loop should do after a successful dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatched {
    /// State may have changed; publish a snapshot.
    Changed,

    /// An upload run began; arm the tick source, then publish.
    UploadStarted { files: usize },

    Quit,
}

pub fn dispatch(state: &mut DriveState, action: Action) -> Result<Dispatched, AppError> {
    trace!(
        marker = "DISPATCH",
        operation_type = action.name(),
        "Dispatching action"
    );

    match action {
        Action::Search(text) => state.search(&text),
        Action::ToggleSelection(id) => {
            state.toggle_selection(&id);
        }
        Action::ClearSelection => state.clear_selection(),
        Action::SetViewMode(mode) => state.set_view_mode(mode),
        Action::CreateFolder(name) => {
            state.create_folder(&name)?;
        }
        Action::StartUpload(descriptors) => {
            let files = state.start_upload(descriptors)?;
            return Ok(Dispatched::UploadStarted { files });
        }
        Action::SetStarred { id, starred } => state.set_starred(&id, starred)?,
        Action::SetShared { id, shared } => state.set_shared(&id, shared)?,
        Action::Refresh => {}
        Action::Quit => return Ok(Dispatched::Quit),
    }

    Ok(Dispatched::Changed)
}
