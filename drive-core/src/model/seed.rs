//! ``src/model/seed.rs``
//! Sample listing shown on a fresh start when `seed_sample_catalog` is on.

use chrono::{DateTime, Local, NaiveDate};

use crate::model::entry::{Entry, EntryId, FileSize, MediaKind};

fn day(year: i32, month: u32, d: u32, fallback: DateTime<Local>) -> DateTime<Local> {
    NaiveDate::from_ymd_opt(year, month, d)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .and_then(|naive| naive.and_local_timezone(Local).single())
        .unwrap_or(fallback)
}

/// Eight entries, newest first. `fallback` is used only if a fixed date
/// cannot be represented in the local timezone.
#[must_use]
pub fn sample_entries(fallback: DateTime<Local>) -> Vec<Entry> {
    let at = |d: u32| day(2024, 1, d, fallback);

    vec![
        Entry::folder(EntryId::from("1"), "Documentos", at(15)).with_starred(true),
        Entry::folder(EntryId::from("2"), "Imágenes", at(14)).with_shared(true),
        Entry::folder(EntryId::from("3"), "Videos", at(13)),
        Entry::folder(EntryId::from("4"), "Música", at(12)),
        Entry::file(
            EntryId::from("5"),
            "Presentación.pptx",
            FileSize::from_bytes(15_938_355),
            MediaKind::Document,
            at(11),
        ),
        Entry::file(
            EntryId::from("6"),
            "Foto_vacaciones.jpg",
            FileSize::from_bytes(3_984_588),
            MediaKind::Image,
            at(10),
        )
        .with_starred(true),
        Entry::file(
            EntryId::from("7"),
            "Video_proyecto.mp4",
            FileSize::from_bytes(131_701_146),
            MediaKind::Video,
            at(9),
        ),
        Entry::file(
            EntryId::from("8"),
            "Canción.mp3",
            FileSize::from_bytes(4_404_019),
            MediaKind::Audio,
            at(8),
        ),
    ]
}
