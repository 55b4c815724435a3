//! `src/model/entry.rs`
//! ============================================================
//! Catalog records for the drive browser.
//!
//! A folder and a file share id, name, timestamp and flags; only files
//! carry a size and a media kind, so those live inside `EntryKind::File`
//! and cannot be reached on a folder.

use std::fmt;

use chrono::{DateTime, Local};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use crate::util::humanize::megabytes_label;

// ------------------------------------------------------------
// EntryId — opaque, stable identifier.
// ------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(CompactString);

impl EntryId {
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for EntryId {
    fn from(value: &str) -> Self {
        Self(CompactString::new(value))
    }
}

impl From<String> for EntryId {
    fn from(value: String) -> Self {
        Self(CompactString::from(value))
    }
}

impl From<CompactString> for EntryId {
    fn from(value: CompactString) -> Self {
        Self(value)
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ------------------------------------------------------------
// MediaKind — coarse file classification.
// ------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    Audio,
    Document,
    Archive,
    Other,
}

impl MediaKind {
    /// Classify by MIME top-level type. Only `image/`, `video/` and
    /// `audio/` are recognised; anything else, including a missing type,
    /// is `Other`.
    #[must_use]
    pub fn from_mime(mime: Option<&str>) -> Self {
        let Some(mime) = mime else {
            return Self::Other;
        };

        let top_level = mime
            .split_once('/')
            .map_or("", |(top, _)| top)
            .trim()
            .to_ascii_lowercase();

        match top_level.as_str() {
            "image" => Self::Image,
            "video" => Self::Video,
            "audio" => Self::Audio,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &str = match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Document => "document",
            Self::Archive => "archive",
            Self::Other => "other",
        };

        write!(f, "{s}")
    }
}

// ------------------------------------------------------------
// FileSize — raw byte count, rendered as one-decimal megabytes.
// ------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileSize(u64);

impl FileSize {
    #[must_use]
    pub const fn from_bytes(bytes: u64) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn bytes(self) -> u64 {
        self.0
    }
}

impl fmt::Display for FileSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&megabytes_label(self.0))
    }
}

// ------------------------------------------------------------
// EntryKind — tagged folder/file variant.
// ------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EntryKind {
    Folder,
    File { size: FileSize, media_kind: MediaKind },
}

// ------------------------------------------------------------
// Entry — one catalog record.
// ------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    pub name: CompactString,
    pub kind: EntryKind,
    pub modified_at: DateTime<Local>,
    pub starred: bool,
    pub shared: bool,
}

impl Entry {
    #[must_use]
    pub fn folder(id: EntryId, name: impl Into<CompactString>, modified_at: DateTime<Local>) -> Self {
        Self {
            id,
            name: name.into(),
            kind: EntryKind::Folder,
            modified_at,
            starred: false,
            shared: false,
        }
    }

    #[must_use]
    pub fn file(
        id: EntryId,
        name: impl Into<CompactString>,
        size: FileSize,
        media_kind: MediaKind,
        modified_at: DateTime<Local>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            kind: EntryKind::File { size, media_kind },
            modified_at,
            starred: false,
            shared: false,
        }
    }

    #[must_use]
    pub const fn with_starred(mut self, starred: bool) -> Self {
        self.starred = starred;
        self
    }

    #[must_use]
    pub const fn with_shared(mut self, shared: bool) -> Self {
        self.shared = shared;
        self
    }

    #[inline]
    #[must_use]
    pub const fn is_folder(&self) -> bool {
        matches!(self.kind, EntryKind::Folder)
    }

    #[must_use]
    pub const fn size(&self) -> Option<FileSize> {
        match self.kind {
            EntryKind::File { size, .. } => Some(size),
            EntryKind::Folder => None,
        }
    }

    #[must_use]
    pub const fn media_kind(&self) -> Option<MediaKind> {
        match self.kind {
            EntryKind::File { media_kind, .. } => Some(media_kind),
            EntryKind::Folder => None,
        }
    }
}
