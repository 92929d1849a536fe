//! Input folder enumeration.
//!
//! Lists the scans a run will process. Only the top level of the input folder
//! is read; subdirectories are ignored, not descended into.
//!
//! ## Accepted Files
//!
//! A file is a scan when its extension, compared case-insensitively, is one
//! of the formats in [`supported_input_extensions`]:
//!
//! ```text
//! scans/
//! ├── 001.jpg          ✓
//! ├── 002.JPEG         ✓
//! ├── 003.tiff         ✓
//! ├── 004.tif          ✗ (only .tiff)
//! ├── .jpg             ✓ (name ends in .jpg)
//! ├── notes.txt        ✗
//! └── rejects/         ✗ (directories are skipped)
//!     └── 005.jpg      ✗ (no recursion)
//! ```
//!
//! Matching is by name only. A file that matches but fails to decode is still
//! listed here; the failure is reported when that file is processed.
//!
//! ## Ordering
//!
//! Scans are returned sorted by path so a run is reproducible regardless of
//! the order the filesystem lists entries in.

use crate::imaging::supported_input_extensions;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Input folder not found: {0}")]
    NotFound(PathBuf),
    #[error("Input path is not a folder: {0}")]
    NotADirectory(PathBuf),
}

/// Whether `path`'s file name ends in `.<ext>` for a scan extension
/// (case-insensitive). A bare dotfile such as `.jpg` counts.
pub fn is_supported_scan(path: &Path) -> bool {
    let Some(name) = path.file_name() else {
        return false;
    };
    let name = name.to_string_lossy().to_ascii_lowercase();
    supported_input_extensions()
        .iter()
        .any(|ext| name.strip_suffix(ext).is_some_and(|rest| rest.ends_with('.')))
}

/// List scan files directly inside `input_dir`, sorted by path.
pub fn scan(input_dir: &Path) -> Result<Vec<PathBuf>, ScanError> {
    if !input_dir.exists() {
        return Err(ScanError::NotFound(input_dir.to_path_buf()));
    }
    if !input_dir.is_dir() {
        return Err(ScanError::NotADirectory(input_dir.to_path_buf()));
    }

    let mut scans = Vec::new();
    for entry in fs::read_dir(input_dir)? {
        let path = entry?.path();
        if path.is_file() && is_supported_scan(&path) {
            scans.push(path);
        }
    }
    scans.sort();
    Ok(scans)
}
