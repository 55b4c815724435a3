//! ``src/model/folder.rs``
//! Folder creation: validate the name, mint an id, prepend.

use tracing::{debug, info};

use crate::error::AppError;
use crate::model::catalog::Catalog;
use crate::model::entry::Entry;
use crate::util::clock::Clock;
use crate::util::id_gen::{FOLDER_PREFIX, IdGenerator};

/// Create a folder named `name` at the front of the catalog.
///
/// Names that are blank after trimming fail with [`AppError::EmptyName`]
/// before anything is touched. Accepted names are stored exactly as given
/// and are not required to be unique.
pub fn create(
    catalog: &mut Catalog,
    ids: &mut IdGenerator,
    clock: &dyn Clock,
    name: &str,
) -> Result<Entry, AppError> {
    if name.trim().is_empty() {
        debug!(
            marker = "FOLDER_CREATE",
            operation_type = "folder_create_rejected",
            "Ignoring folder creation with blank name"
        );
        return Err(AppError::EmptyName);
    }

    let now = clock.now();
    let folder = Entry::folder(ids.next_id(FOLDER_PREFIX, now), name, now);
    debug_assert!(
        !catalog.contains(&folder.id),
        "minted folder id {} already in catalog",
        folder.id
    );

    catalog.prepend(vec![folder.clone()])?;

    info!(
        marker = "FOLDER_CREATE",
        operation_type = "folder_create",
        id = %folder.id,
        name = %folder.name,
        "Folder created"
    );

    Ok(folder)
}
