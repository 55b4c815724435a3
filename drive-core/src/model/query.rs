//! ``src/model/query.rs``
//! Free-text name filter for the listing.

use crate::model::entry::Entry;

/// Entries whose name contains `query`, ignoring case, in input order.
/// An empty query keeps every entry.
#[must_use]
pub fn filter<'a>(entries: &'a [Entry], query: &str) -> Vec<&'a Entry> {
    if query.is_empty() {
        return entries.iter().collect();
    }

    let needle = query.to_lowercase();
    entries
        .iter()
        .filter(|entry| entry.name.to_lowercase().contains(&needle))
        .collect()
}
