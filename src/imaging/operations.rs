//! High-level image operations.
//!
//! These functions combine calculations with in-memory pixel work and, for
//! [`write_pages`], backend execution. Cropping and splitting never touch the
//! filesystem, which keeps them testable on synthetic images.

use super::backend::{BackendError, Dimensions, PageBackend};
use super::calculations::{SplitPlan, clamp_crop, plan_split};
use super::params::{CropMargins, CropRect, PageSide, Quality};
use crate::naming::page_file_name;
use image::DynamicImage;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// What happened to the crop step for one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CropOutcome {
    /// Cropping is turned off.
    Disabled,
    /// The image was cropped to this region.
    Applied(CropRect),
    /// The margins left no pixels; the image was kept uncropped.
    Skipped,
}

/// The one or two pages cut from a scan.
#[derive(Debug, Clone)]
pub struct Pages {
    pub left: DynamicImage,
    pub right: Option<DynamicImage>,
}

impl Pages {
    /// Pages in output order, tagged with their side.
    pub fn iter(&self) -> impl Iterator<Item = (PageSide, &DynamicImage)> {
        std::iter::once((PageSide::Left, &self.left))
            .chain(self.right.iter().map(|r| (PageSide::Right, r)))
    }

    /// First page with no pixels, if any.
    pub fn empty_page(&self) -> Option<PageSide> {
        self.iter()
            .find(|(_, img)| img.width() == 0 || img.height() == 0)
            .map(|(side, _)| side)
    }
}

/// A page that was encoded and written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrittenPage {
    pub side: PageSide,
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// Crop `img` to an absolute region.
pub fn crop(img: &DynamicImage, rect: CropRect) -> DynamicImage {
    img.crop_imm(rect.x, rect.y, rect.width, rect.height)
}

/// Decide the crop step for an image of `dims` without touching pixels.
pub fn crop_outcome(dims: Dimensions, margins: Option<&CropMargins>) -> CropOutcome {
    match margins {
        None => CropOutcome::Disabled,
        Some(margins) => clamp_crop(dims, margins)
            .map(CropOutcome::Applied)
            .unwrap_or(CropOutcome::Skipped),
    }
}

impl CropOutcome {
    /// Dimensions of an image of `dims` after this crop step.
    pub fn apply_to(self, dims: Dimensions) -> Dimensions {
        match self {
            CropOutcome::Applied(rect) => Dimensions {
                width: rect.width,
                height: rect.height,
            },
            CropOutcome::Disabled | CropOutcome::Skipped => dims,
        }
    }
}

/// Apply crop margins if given, falling back to the uncropped image when the
/// clamped region is empty.
pub fn apply_crop(img: DynamicImage, margins: Option<&CropMargins>) -> (DynamicImage, CropOutcome) {
    let outcome = crop_outcome(Dimensions::of(&img), margins);
    match outcome {
        CropOutcome::Applied(rect) => {
            debug!(?rect, "cropping");
            (crop(&img, rect), outcome)
        }
        CropOutcome::Disabled | CropOutcome::Skipped => (img, outcome),
    }
}

/// Split `img` at column `split_x`.
///
/// When `split_x` is inside the image the left page holds columns
/// `[0, split_x)` and the right page the rest. Otherwise the whole image is
/// returned as the left page and there is no right page.
pub fn split(img: &DynamicImage, split_x: u32) -> Pages {
    let (width, height) = (img.width(), img.height());
    match plan_split(width, split_x) {
        SplitPlan::Pair {
            left_width,
            right_width,
        } => Pages {
            left: img.crop_imm(0, 0, left_width, height),
            right: Some(img.crop_imm(left_width, 0, right_width, height)),
        },
        SplitPlan::Single => Pages {
            left: img.clone(),
            right: None,
        },
    }
}

/// Encode every page as JPEG into `output_dir` as `<stem>_<side>.jpg`.
///
/// Stops at the first failed write; pages written before the failure stay on disk.
pub fn write_pages(
    backend: &impl PageBackend,
    pages: &Pages,
    output_dir: &Path,
    stem: &str,
    quality: Quality,
) -> Result<Vec<WrittenPage>> {
    let mut written = Vec::new();
    for (side, img) in pages.iter() {
        let path = output_dir.join(page_file_name(stem, side));
        backend.save_jpeg(img, &path, quality)?;
        written.push(WrittenPage {
            side,
            path,
            width: img.width(),
            height: img.height(),
        });
    }
    Ok(written)
}
