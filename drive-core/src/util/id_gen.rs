//! src/util/id_gen.rs
//! Time-based entry id minting: `<prefix>-<unix millis>-<sequence>`.
//!
//! The sequence is monotonic for the lifetime of the generator, so two ids
//! minted within the same millisecond (or with a frozen clock) still differ.

use chrono::{DateTime, Local};
use compact_str::format_compact;

use crate::model::entry::EntryId;

pub const FOLDER_PREFIX: &str = "folder";
pub const UPLOAD_PREFIX: &str = "upload";

#[derive(Debug, Default)]
pub struct IdGenerator {
    seq: u64,
}

impl IdGenerator {
    #[must_use]
    pub const fn new() -> Self {
        Self { seq: 0 }
    }

    pub fn next_id(&mut self, prefix: &str, at: DateTime<Local>) -> EntryId {
        let seq = self.seq;
        self.seq += 1;
        EntryId::from(format_compact!("{prefix}-{}-{seq}", at.timestamp_millis()))
    }

    /// Number of ids minted so far.
    #[must_use]
    pub const fn minted(&self) -> u64 {
        self.seq
    }
}
