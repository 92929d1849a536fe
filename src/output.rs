//! CLI output formatting for split runs and dry runs.
//!
//! Every scan is shown as a header line (positional index + file name + its
//! loaded dimensions) followed by indented context lines: crop result, the
//! pages written, or the error that stopped it.
//!
//! # Output Format
//!
//! ## Split
//!
//! ```text
//! Scans
//! 001 spread-001.jpg (3000x2000)
//!     Crop: 2900x1900 at (50, 50)
//!     left → spread-001_left.jpg (1450x1900)
//!     right → spread-001_right.jpg (1450x1900)
//! 002 broken.png
//!     Error: Failed to load image: ...
//! 003 tiny.jpg (100x80)
//!     Warning: invalid crop values, crop skipped
//!     left → tiny_left.jpg (100x80)
//!
//! Processed 2 of 3 images → pages (1 failed, 1 crop warning)
//! ```
//!
//! ## Check
//!
//! ```text
//! Scans
//! 001 spread-001.jpg (3000x2000)
//!     left → spread-001_left.jpg (1450x2000)
//!     right → spread-001_right.jpg (1550x2000)
//!
//! 1 image would be split → pages
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O and no side effects.

use crate::imaging::{CropOutcome, PageSide};
use crate::process::{FileOutcome, FilePlan, RunResult};
use std::path::Path;

/// Shown when the input folder holds no supported scans.
pub const NOTHING_TO_DO: &str = "No valid images found in the input folder";

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Header line for a scan, with dimensions when known.
fn scan_header(index: usize, file_name: &str, dimensions: Option<(u32, u32)>) -> String {
    match dimensions {
        Some((w, h)) => format!("{} {} ({}x{})", format_index(index), file_name, w, h),
        None => format!("{} {}", format_index(index), file_name),
    }
}

/// Context line for the crop step. Disabled crops are not shown.
fn crop_line(crop: Option<CropOutcome>) -> Option<String> {
    match crop? {
        CropOutcome::Disabled => None,
        CropOutcome::Applied(rect) => Some(format!(
            "    Crop: {}x{} at ({}, {})",
            rect.width, rect.height, rect.x, rect.y
        )),
        CropOutcome::Skipped => Some("    Warning: invalid crop values, crop skipped".to_string()),
    }
}

fn page_line(side: PageSide, file_name: &str, width: u32, height: u32) -> String {
    format!("    {} \u{2192} {} ({}x{})", side, file_name, width, height)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

// ============================================================================
// split
// ============================================================================

/// Format the result of a split run.
pub fn format_split_output(result: &RunResult) -> Vec<String> {
    let summary = match result {
        RunResult::NothingToDo => return vec![NOTHING_TO_DO.to_string()],
        RunResult::Completed(summary) => summary,
    };

    let mut lines = vec!["Scans".to_string()];
    for (i, file) in summary.files.iter().enumerate() {
        lines.push(scan_header(i + 1, &file.file_name(), file.dimensions));
        lines.extend(crop_line(file.crop));
        match &file.outcome {
            FileOutcome::Split { pages } => {
                for page in pages {
                    let name = page
                        .path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    lines.push(page_line(page.side, &name, page.width, page.height));
                }
            }
            FileOutcome::Failed { error, .. } => {
                lines.push(format!("    Error: {}", error));
            }
        }
    }

    lines.push(String::new());
    let mut totals = format!(
        "Processed {} of {} \u{2192} {}",
        summary.succeeded(),
        plural(summary.attempted(), "image"),
        summary.output_dir.display()
    );
    let mut notes = Vec::new();
    if summary.failed() > 0 {
        notes.push(format!("{} failed", summary.failed()));
    }
    if summary.crop_warnings() > 0 {
        notes.push(plural(summary.crop_warnings(), "crop warning"));
    }
    if !notes.is_empty() {
        totals.push_str(&format!(" ({})", notes.join(", ")));
    }
    lines.push(totals);
    lines
}

pub fn print_split_output(result: &RunResult) {
    for line in format_split_output(result) {
        println!("{}", line);
    }
}

// ============================================================================
// check
// ============================================================================

/// Format a dry run: the pages each scan would produce.
pub fn format_check_output(plans: &[FilePlan], output_dir: &Path) -> Vec<String> {
    if plans.is_empty() {
        return vec![NOTHING_TO_DO.to_string()];
    }

    let mut lines = vec!["Scans".to_string()];
    for (i, plan) in plans.iter().enumerate() {
        lines.push(scan_header(i + 1, &plan.file_name(), plan.dimensions));
        lines.extend(crop_line(plan.crop));
        match &plan.pages {
            Ok(pages) => {
                for page in pages {
                    lines.push(page_line(page.side, &page.file_name, page.width, page.height));
                }
            }
            Err(error) => lines.push(format!("    Error: {}", error)),
        }
    }

    let ok = plans.iter().filter(|p| p.pages.is_ok()).count();
    lines.push(String::new());
    let mut totals = format!(
        "{} would be split \u{2192} {}",
        plural(ok, "image"),
        output_dir.display()
    );
    let failing = plans.len() - ok;
    if failing > 0 {
        totals.push_str(&format!(" ({} would fail)", failing));
    }
    lines.push(totals);
    lines
}

pub fn print_check_output(plans: &[FilePlan], output_dir: &Path) {
    for line in format_check_output(plans, output_dir) {
        println!("{}", line);
    }
}
