//! Clip path resolution.
//!
//! Clips live at `<assets>/audio/<language>/<HH>_<MM>.<ext>` where `HH` is
//! the zero-padded 12-hour hour (01–12) and `MM` the zero-padded minute.
//! `.ogg` is tried first, `.mp3` as fallback.

use std::path::{Path, PathBuf};

/// Preferred clip format.
pub const PRIMARY_EXT: &str = "ogg";
/// Fallback clip format.
pub const FALLBACK_EXT: &str = "mp3";

/// Convert a 24-hour hour to 12-hour form: 0 → 12, 13–23 → 1–11.
pub fn hour_12(hour_24: u8) -> u8 {
    match hour_24 % 12 {
        0 => 12,
        h => h,
    }
}

/// File stem for a given wall-clock time, e.g. 14:00 → `"02_00"`.
pub fn clip_name(hour_24: u8, minute: u8) -> String {
    format!("{:02}_{:02}", hour_12(hour_24), minute)
}

/// Find the clip for `(hour_24, minute)` in the given language, trying the
/// primary extension first. `None` if neither format exists on disk.
pub fn resolve_clip(assets_dir: &Path, language: &str, hour_24: u8, minute: u8) -> Option<PathBuf> {
    let base = assets_dir
        .join("audio")
        .join(language)
        .join(clip_name(hour_24, minute));

    let primary = base.with_extension(PRIMARY_EXT);
    if primary.exists() {
        return Some(primary);
    }

    let fallback = base.with_extension(FALLBACK_EXT);
    fallback.exists().then_some(fallback)
}
