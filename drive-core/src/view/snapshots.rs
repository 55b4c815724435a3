//! src/view/snapshots.rs
//! ============================================================
//! Immutable, serializable copies of the live `DriveState`,
//! taken by the event loop after each change and handed to
//! whatever renders the listing. A snapshot owns its data, so a
//! renderer never holds a borrow into the state.

use compact_str::CompactString;
use serde::Serialize;

use crate::model::drive_state::DriveState;
use crate::model::entry::{Entry, EntryId};
use crate::model::storage::StorageUsage;
use crate::model::view_mode::ViewMode;

/// Upload indicator state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UploadSnapshot {
    /// 0–100
    pub progress: u8,

    /// A run is in flight
    pub pending: bool,

    /// Files in the in-flight batch
    pub incoming: usize,
}

/// Everything a renderer needs for one frame of the browser.
#[derive(Debug, Clone, Serialize)]
pub struct DriveSnapshot {
    /// Search-filtered entries, catalog order
    pub entries: Vec<Entry>,

    /// Selected ids present in `entries`, listing order
    pub selected: Vec<EntryId>,

    /// Selected ids overall, including ones filtered out
    pub selected_total: usize,

    /// Catalog size before filtering
    pub catalog_len: usize,

    pub query: CompactString,

    pub view_mode: ViewMode,

    pub upload: UploadSnapshot,

    pub storage: StorageUsage,
}

impl From<&DriveState> for DriveSnapshot {
    fn from(src: &DriveState) -> Self {
        let visible = src.visible_entries();
        let selected = src
            .selection()
            .visible_selection(visible.iter().copied())
            .into_iter()
            .cloned()
            .collect();

        Self {
            entries: visible.into_iter().cloned().collect(),
            selected,
            selected_total: src.selection().len(),
            catalog_len: src.catalog().len(),
            query: CompactString::new(src.query()),
            view_mode: src.view_mode(),
            upload: UploadSnapshot {
                progress: src.upload().progress(),
                pending: src.upload().is_pending(),
                incoming: src.upload().incoming().len(),
            },
            storage: src.storage(),
        }
    }
}

impl DriveSnapshot {
    #[must_use]
    pub fn is_selected(&self, id: &EntryId) -> bool {
        self.selected.contains(id)
    }

    pub fn to_json(&self) -> Result<String, crate::error::AppError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::upload::descriptor::FileDescriptor;
    use crate::util::clock::FixedClock;
    use chrono::{Local, TimeZone};

    fn drive() -> DriveState {
        let clock = FixedClock(Local.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap());
        DriveState::with_clock(&Config::default(), Box::new(clock)).unwrap()
    }

    #[test]
    fn test_snapshot_reflects_filter_and_selection() {
        let mut drive = drive();
        drive.toggle_selection(&EntryId::from("1"));
        drive.toggle_selection(&EntryId::from("8"));
        drive.toggle_selection(&EntryId::from("stale"));
        drive.search("ción");

        let snap = DriveSnapshot::from(&drive);

        let names: Vec<&str> = snap.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["Presentación.pptx", "Canción.mp3"]);
        assert_eq!(snap.selected, [EntryId::from("8")]);
        assert_eq!(snap.selected_total, 3);
        assert_eq!(snap.catalog_len, 8);
        assert_eq!(snap.query, "ción");
        assert!(snap.is_selected(&EntryId::from("8")));
    }

    #[test]
    fn test_snapshot_upload_indicator() {
        let mut drive = drive();
        drive
            .start_upload(vec![FileDescriptor::new("a.txt", 1, Some("text/plain"))])
            .unwrap();
        drive.tick_upload().unwrap();

        let snap = DriveSnapshot::from(&drive);

        assert_eq!(
            snap.upload,
            UploadSnapshot {
                progress: 10,
                pending: true,
                incoming: 1
            }
        );
    }

    #[test]
    fn test_json_shape() {
        let snap = DriveSnapshot::from(&drive());

        let value: serde_json::Value = serde_json::from_str(&snap.to_json().unwrap()).unwrap();

        assert_eq!(value["view_mode"], "grid");
        assert_eq!(value["entries"][0]["kind"]["type"], "folder");
        assert_eq!(value["entries"][4]["kind"]["media_kind"], "document");
        assert_eq!(value["upload"]["pending"], false);
    }
}
