//! Batch crop-and-split of a folder of scans.
//!
//! This is the core of page-split: every scan found by [`scan`](crate::scan)
//! is loaded, optionally cropped, cut at a fixed column, and written out as
//! one or two JPEG pages.
//!
//! ## Per-Scan Pipeline
//!
//! ```text
//! load  →  crop (clamped margins)  →  split at split_x  →  write _left.jpg [+ _right.jpg]
//! ```
//!
//! ## Failure Containment
//!
//! A scan that cannot be loaded, cut or written is recorded as failed in its
//! [`FileReport`] and the batch moves on to the next scan. Margins that leave
//! no pixels are not a failure: the scan is split uncropped and the report
//! carries [`CropOutcome::Skipped`] so the warning can be shown. Only a
//! missing or unreadable input folder, or an output folder that cannot be
//! created, stops a run.
//!
//! ## Output Structure
//!
//! ```text
//! pages/
//! ├── spread-001_left.jpg
//! ├── spread-001_right.jpg
//! ├── spread-002_left.jpg
//! ├── spread-002_right.jpg
//! └── cover_left.jpg          # narrower than split_x → one page
//! ```
//!
//! Scans are processed one at a time in path order.

use crate::config::SplitConfig;
use crate::imaging::{
    BackendError, CropMargins, CropOutcome, Dimensions, PageBackend, PageSide, Quality,
    RustBackend, SplitPlan, WrittenPage, apply_crop, crop_outcome, plan_split, split,
    write_pages,
};
use crate::naming::{page_file_name, scan_stem};
use crate::scan::{self, ScanError};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Errors that stop a whole run.
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Scan(#[from] ScanError),
}

/// Errors confined to a single scan.
#[derive(Error, Debug)]
pub enum FileError {
    #[error("Failed to load image: {0}")]
    Load(#[source] BackendError),
    /// Only reachable through [`cut_and_write`] with a path that has no
    /// file name; scanned paths always have one.
    #[error("Cannot derive page names from {0}")]
    BadName(PathBuf),
    #[error("The {side} page would be empty (split_x = {split_x})")]
    EmptyPage { side: PageSide, split_x: u32 },
    #[error("Failed to write page: {0}")]
    Write(#[source] BackendError),
}

impl FileError {
    pub fn kind(&self) -> FailureKind {
        match self {
            FileError::Load(_) => FailureKind::Load,
            FileError::BadName(_) => FailureKind::BadName,
            FileError::EmptyPage { .. } => FailureKind::EmptyPage,
            FileError::Write(_) => FailureKind::Write,
        }
    }
}

/// Serializable category of a [`FileError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Load,
    BadName,
    EmptyPage,
    Write,
}

/// Validated settings for a run, minus the folders.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessConfig {
    pub split_x: u32,
    /// Margins to trim, or `None` when cropping is disabled.
    pub crop: Option<CropMargins>,
    pub quality: Quality,
}

impl ProcessConfig {
    /// Build a ProcessConfig from SplitConfig values.
    pub fn from_split_config(config: &SplitConfig) -> Self {
        Self {
            split_x: config.split_x,
            crop: config.crop.active_margins(),
            quality: config.quality(),
        }
    }
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self::from_split_config(&SplitConfig::default())
    }
}

/// How one scan ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    Split { pages: Vec<WrittenPage> },
    Failed { kind: FailureKind, error: String },
}

/// File name of `path`, or the whole path when it has none.
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Result for a single scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub source: PathBuf,
    /// Dimensions as loaded, before cropping. `None` if loading failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<(u32, u32)>,
    /// `None` if the scan never got as far as the crop step.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop: Option<CropOutcome>,
    pub outcome: FileOutcome,
}

impl FileReport {
    /// Source file name for display.
    pub fn file_name(&self) -> String {
        display_name(&self.source)
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, FileOutcome::Split { .. })
    }

    pub fn crop_skipped(&self) -> bool {
        self.crop == Some(CropOutcome::Skipped)
    }
}

/// Per-scan results of a completed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessingSummary {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub files: Vec<FileReport>,
}

impl ProcessingSummary {
    /// Number of scans attempted.
    pub fn attempted(&self) -> usize {
        self.files.len()
    }

    /// Number of scans whose pages were all written.
    pub fn succeeded(&self) -> usize {
        self.files.iter().filter(|f| f.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.attempted() - self.succeeded()
    }

    /// Number of scans split uncropped because their margins left no pixels.
    pub fn crop_warnings(&self) -> usize {
        self.files.iter().filter(|f| f.crop_skipped()).count()
    }

    pub fn pages_written(&self) -> usize {
        self.files
            .iter()
            .map(|f| match &f.outcome {
                FileOutcome::Split { pages } => pages.len(),
                FileOutcome::Failed { .. } => 0,
            })
            .sum()
    }
}

/// What a run did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum RunResult {
    /// The input folder held no supported scans; nothing was written.
    NothingToDo,
    Completed(ProcessingSummary),
}

pub fn process(
    input_dir: &Path,
    output_dir: &Path,
    config: &ProcessConfig,
) -> Result<RunResult, ProcessError> {
    let backend = RustBackend::new();
    process_with_backend(&backend, input_dir, output_dir, config)
}

/// Process scans using a specific backend (allows testing with mock).
pub fn process_with_backend(
    backend: &impl PageBackend,
    input_dir: &Path,
    output_dir: &Path,
    config: &ProcessConfig,
) -> Result<RunResult, ProcessError> {
    let scans = scan::scan(input_dir)?;

    fs::create_dir_all(output_dir)?;

    if scans.is_empty() {
        info!(input = %input_dir.display(), "no valid images found");
        return Ok(RunResult::NothingToDo);
    }

    info!(count = scans.len(), input = %input_dir.display(), "processing scans");

    let files = scans
        .iter()
        .map(|source| process_file(backend, source, output_dir, config))
        .collect();

    Ok(RunResult::Completed(ProcessingSummary {
        input_dir: input_dir.to_path_buf(),
        output_dir: output_dir.to_path_buf(),
        files,
    }))
}

/// Run the whole pipeline for one scan, capturing any failure in the report.
fn process_file(
    backend: &impl PageBackend,
    source: &Path,
    output_dir: &Path,
    config: &ProcessConfig,
) -> FileReport {
    let mut report = FileReport {
        source: source.to_path_buf(),
        dimensions: None,
        crop: None,
        outcome: FileOutcome::Split { pages: Vec::new() },
    };
    let name = report.file_name();

    let result = backend
        .load(source)
        .map_err(FileError::Load)
        .and_then(|img| {
            let dims = Dimensions::of(&img);
            report.dimensions = Some((dims.width, dims.height));
            debug!(file = %name, width = dims.width, height = dims.height, "loaded");

            let (img, crop) = apply_crop(img, config.crop.as_ref());
            report.crop = Some(crop);
            if crop == CropOutcome::Skipped {
                warn!(file = %name, "invalid crop values, skipping crop");
            }

            cut_and_write(backend, &img, source, output_dir, config)
        });

    report.outcome = match result {
        Ok(pages) => {
            info!(file = %name, pages = pages.len(), "split");
            FileOutcome::Split { pages }
        }
        Err(e) => {
            error!(file = %name, error = %e, "failed to process scan");
            FileOutcome::Failed {
                kind: e.kind(),
                error: e.to_string(),
            }
        }
    };
    report
}

/// Split an already-cropped scan and write its pages.
///
/// Nothing is written for a scan that would produce an empty page.
pub fn cut_and_write(
    backend: &impl PageBackend,
    img: &image::DynamicImage,
    source: &Path,
    output_dir: &Path,
    config: &ProcessConfig,
) -> Result<Vec<WrittenPage>, FileError> {
    let stem = scan_stem(source).ok_or_else(|| FileError::BadName(source.to_path_buf()))?;

    let pages = split(img, config.split_x);
    if let Some(side) = pages.empty_page() {
        return Err(FileError::EmptyPage {
            side,
            split_x: config.split_x,
        });
    }

    write_pages(backend, &pages, output_dir, &stem, config.quality).map_err(FileError::Write)
}

// ============================================================================
// Dry run
// ============================================================================

/// A page a run would write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedPage {
    pub side: PageSide,
    pub file_name: String,
    pub width: u32,
    pub height: u32,
}

/// What a run would do with one scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePlan {
    pub source: PathBuf,
    pub dimensions: Option<(u32, u32)>,
    pub crop: Option<CropOutcome>,
    /// Pages to write, or the reason the scan would fail.
    pub pages: Result<Vec<PlannedPage>, String>,
}

impl FilePlan {
    pub fn file_name(&self) -> String {
        display_name(&self.source)
    }
}

pub fn plan(input_dir: &Path, config: &ProcessConfig) -> Result<Vec<FilePlan>, ProcessError> {
    plan_with_backend(&RustBackend::new(), input_dir, config)
}

/// Work out every scan's pages from image headers alone. Nothing is decoded
/// or written, and the output folder is not created.
pub fn plan_with_backend(
    backend: &impl PageBackend,
    input_dir: &Path,
    config: &ProcessConfig,
) -> Result<Vec<FilePlan>, ProcessError> {
    let scans = scan::scan(input_dir)?;
    Ok(scans
        .into_iter()
        .map(|source| plan_file(backend, source, config))
        .collect())
}

fn plan_file(backend: &impl PageBackend, source: PathBuf, config: &ProcessConfig) -> FilePlan {
    let dims = match backend.identify(&source) {
        Ok(dims) => dims,
        Err(e) => {
            return FilePlan {
                source,
                dimensions: None,
                crop: None,
                pages: Err(FileError::Load(e).to_string()),
            };
        }
    };

    let crop = crop_outcome(dims, config.crop.as_ref());
    let pages = plan_pages(&source, crop.apply_to(dims), config).map_err(|e| e.to_string());
    FilePlan {
        dimensions: Some((dims.width, dims.height)),
        crop: Some(crop),
        pages,
        source,
    }
}

/// Pages for a (cropped) image of `dims`, mirroring [`cut_and_write`].
fn plan_pages(
    source: &Path,
    dims: Dimensions,
    config: &ProcessConfig,
) -> Result<Vec<PlannedPage>, FileError> {
    let stem = scan_stem(source).ok_or_else(|| FileError::BadName(source.to_path_buf()))?;
    let widths = match plan_split(dims.width, config.split_x) {
        SplitPlan::Pair {
            left_width,
            right_width,
        } => vec![(PageSide::Left, left_width), (PageSide::Right, right_width)],
        SplitPlan::Single => vec![(PageSide::Left, dims.width)],
    };

    widths
        .into_iter()
        .map(|(side, width)| {
            if width == 0 || dims.height == 0 {
                return Err(FileError::EmptyPage {
                    side,
                    split_x: config.split_x,
                });
            }
            Ok(PlannedPage {
                side,
                file_name: page_file_name(&stem, side),
                width,
                height: dims.height,
            })
        })
        .collect()
}
