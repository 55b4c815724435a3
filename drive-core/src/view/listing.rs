//! src/view/listing.rs
//! ============================================================================
//! # Listing: plain-text rendering of a `DriveSnapshot`
//!
//! Grid mode packs entries into fixed-width cells; list mode prints a
//! Name / Size / Modified table. Both end with the upload indicator (while a
//! run is in flight) and a status line with selection and storage figures.

use std::fmt::Write;

use crate::model::entry::{Entry, EntryKind, MediaKind};
use crate::model::view_mode::ViewMode;
use crate::view::snapshots::{DriveSnapshot, UploadSnapshot};

pub const FOLDER_ICON: &str = "[D]";
pub const FILE_ICON: &str = "[F]";

const GRID_COLUMNS: usize = 3;
const GRID_CELL_WIDTH: usize = 30;
const PROGRESS_BAR_WIDTH: usize = 20;

#[must_use]
pub const fn media_label(kind: MediaKind) -> &'static str {
    match kind {
        MediaKind::Image => "image",
        MediaKind::Video => "video",
        MediaKind::Audio => "audio",
        MediaKind::Document => "document",
        MediaKind::Archive => "archive",
        MediaKind::Other => "file",
    }
}

fn flags(entry: &Entry) -> &'static str {
    match (entry.starred, entry.shared) {
        (true, true) => "*+",
        (true, false) => "* ",
        (false, true) => " +",
        (false, false) => "  ",
    }
}

fn marker(snapshot: &DriveSnapshot, entry: &Entry) -> char {
    if snapshot.is_selected(&entry.id) { 'x' } else { ' ' }
}

/// Render the whole listing for one snapshot.
#[must_use]
pub fn render(snapshot: &DriveSnapshot) -> String {
    let mut out = String::new();

    if !snapshot.query.is_empty() {
        let _ = writeln!(
            out,
            "search \"{}\": {} of {} entries",
            snapshot.query,
            snapshot.entries.len(),
            snapshot.catalog_len
        );
    }

    if snapshot.entries.is_empty() {
        out.push_str("(no entries)\n");
    } else {
        match snapshot.view_mode {
            ViewMode::Grid => render_grid(&mut out, snapshot),
            ViewMode::List => render_list(&mut out, snapshot),
        }
    }

    if snapshot.upload.pending {
        out.push_str(&progress_line(&snapshot.upload));
        out.push('\n');
    }

    let _ = writeln!(
        out,
        "{} selected ({} hidden) | {} ({}%)",
        snapshot.selected.len(),
        snapshot.selected_total.saturating_sub(snapshot.selected.len()),
        snapshot.storage.summary(),
        snapshot.storage.percent_used()
    );

    out
}

fn render_grid(out: &mut String, snapshot: &DriveSnapshot) {
    for row in snapshot.entries.chunks(GRID_COLUMNS) {
        let mut line = String::new();
        for entry in row {
            let icon = if entry.is_folder() { FOLDER_ICON } else { FILE_ICON };
            let cell = format!(
                "[{}] {} {}{} ({})",
                marker(snapshot, entry),
                icon,
                entry.name,
                flags(entry).trim_end(),
                entry.id
            );
            let _ = write!(line, "{cell:<width$}  ", width = GRID_CELL_WIDTH);
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
}

fn render_list(out: &mut String, snapshot: &DriveSnapshot) {
    let name_width = snapshot
        .entries
        .iter()
        .map(|entry| entry.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Name".len());

    let _ = writeln!(
        out,
        "    {:<name_width$}  {:>10}  {:<8}  {:<19}  {:<2}  Id",
        "Name", "Size", "Kind", "Modified", ""
    );

    for entry in &snapshot.entries {
        let (icon, size, kind) = match &entry.kind {
            EntryKind::Folder => (FOLDER_ICON, String::new(), "folder"),
            EntryKind::File { size, media_kind } => {
                (FILE_ICON, size.to_string(), media_label(*media_kind))
            }
        };

        let _ = writeln!(
            out,
            "[{}] {:<name_width$}  {:>10}  {:<8}  {:<19}  {}  {} {}",
            marker(snapshot, entry),
            entry.name.as_str(),
            size,
            kind,
            entry.modified_at.format("%d/%m/%Y %I:%M %p").to_string(),
            flags(entry),
            entry.id,
            icon
        );
    }
}

/// `uploading 2 file(s) [########------------]  40%`
#[must_use]
pub fn progress_line(upload: &UploadSnapshot) -> String {
    let filled = usize::from(upload.progress.min(100)) * PROGRESS_BAR_WIDTH / 100;
    format!(
        "uploading {} file(s) [{}{}] {:>3}%",
        upload.incoming,
        "#".repeat(filled),
        "-".repeat(PROGRESS_BAR_WIDTH - filled),
        upload.progress
    )
}
