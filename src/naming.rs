//! Centralized file naming for scans and the pages cut from them.
//!
//! Every page is written as `<stem>_<side>.jpg`, where the stem is the scan's
//! file name with only its last extension removed:
//! - `spread-012.tiff` → `spread-012_left.jpg`, `spread-012_right.jpg`
//! - `book.v2.png` → `book.v2_left.jpg`
//! - `.jpg` → `.jpg_left.jpg` (a dotfile has no extension to strip)
//!
//! Output is always JPEG, whatever the source format, so two scans that share
//! a stem (`p1.png` and `p1.jpg`) write to the same page names and the later
//! one in processing order wins.

use crate::imaging::PageSide;
use std::path::Path;

/// Extension of every page written.
pub const PAGE_EXTENSION: &str = "jpg";

/// Scan file name with its last extension stripped.
///
/// Returns `None` for paths without a file name (e.g. `..`).
pub fn scan_stem(path: &Path) -> Option<String> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
}

/// Output file name for one side of a scan: `<stem>_<side>.jpg`.
pub fn page_file_name(stem: &str, side: PageSide) -> String {
    format!("{stem}_{side}.{PAGE_EXTENSION}")
}
