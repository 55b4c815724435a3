//! ``src/model/storage.rs``
//! Account storage figures shown next to the listing. Display only; uploads
//! do not count against the quota.

use serde::{Deserialize, Serialize};

use crate::util::humanize::human_readable_size;

const GIB: u64 = 1024 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageUsage {
    pub used_bytes: u64,
    pub quota_bytes: u64,
}

impl Default for StorageUsage {
    fn default() -> Self {
        Self {
            used_bytes: 260 * GIB,
            quota_bytes: 400 * GIB,
        }
    }
}

impl StorageUsage {
    /// Used share of the quota in percent, capped at 100.
    #[must_use]
    pub fn percent_used(&self) -> u8 {
        if self.quota_bytes == 0 {
            return 100;
        }
        let pct = self.used_bytes.saturating_mul(100) / self.quota_bytes;
        u8::try_from(pct.min(100)).unwrap_or(100)
    }

    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} of {} used",
            human_readable_size(self.used_bytes),
            human_readable_size(self.quota_bytes)
        )
    }
}
