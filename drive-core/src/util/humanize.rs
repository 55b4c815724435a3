//! src/util/humanize.rs

const MEBIBYTE: u128 = 1024 * 1024;

pub fn human_readable_size(size: u64) -> String {
    if size == 0 {
        return "0 B".to_string();
    }
    let units: [&'static str; 7] = ["B", "KB", "MB", "GB", "TB", "PB", "EB"];
    let mut size_f: f64 = size as f64;
    let mut unit_idx: usize = 0;

    while size_f >= 1024.0 && unit_idx < units.len() - 1 {
        size_f /= 1024.0;
        unit_idx += 1;
    }

    if unit_idx == 0 {
        format!("{} {}", size, units[unit_idx])
    } else {
        format!("{:.1} {}", size_f, units[unit_idx])
    }
}

/// Fixed-unit size label used for file entries: `bytes / 1024 / 1024`
/// with one decimal, regardless of magnitude. Ties round up.
pub fn megabytes_label(size: u64) -> String {
    let tenths = (u128::from(size) * 10 + MEBIBYTE / 2) / MEBIBYTE;
    format!("{}.{} MB", tenths / 10, tenths % 10)
}
