//! ``src/upload/descriptor.rs``
//! Raw description of a picked file, as handed over by the upload picker.

use chrono::{DateTime, Local};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use crate::model::entry::{Entry, EntryId, FileSize, MediaKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    pub filename: CompactString,
    pub byte_length: u64,
    /// Declared MIME type; absent or unrecognised types classify as `Other`.
    #[serde(default)]
    pub mime_type: Option<CompactString>,
}

impl FileDescriptor {
    #[must_use]
    pub fn new(filename: impl Into<CompactString>, byte_length: u64, mime_type: Option<&str>) -> Self {
        Self {
            filename: filename.into(),
            byte_length,
            mime_type: mime_type.map(CompactString::new),
        }
    }

    #[must_use]
    pub fn media_kind(&self) -> MediaKind {
        MediaKind::from_mime(self.mime_type.as_deref())
    }

    /// Turn the descriptor into a committed file entry.
    #[must_use]
    pub fn into_entry(self, id: EntryId, committed_at: DateTime<Local>) -> Entry {
        let media_kind = self.media_kind();
        Entry::file(
            id,
            self.filename,
            FileSize::from_bytes(self.byte_length),
            media_kind,
            committed_at,
        )
    }
}
