//! Pure calculation functions for crop and split geometry.
//!
//! All functions here are pure and testable without any I/O or images.

use super::backend::Dimensions;
use super::params::{CropMargins, CropRect};

/// Resolve crop margins against concrete image dimensions.
///
/// Margins are clamped rather than rejected: the top/left edge never moves
/// past the last row/column, and the bottom/right edge never moves before
/// the first one. Returns `None` when the clamped region is empty, e.g.
/// when `top + bottom >= height`; callers then leave the image uncropped.
///
/// # Examples
/// ```
/// # use page_split::imaging::{CropMargins, CropRect, Dimensions, clamp_crop};
/// let dims = Dimensions { width: 100, height: 80 };
/// let margins = CropMargins { top: 10, bottom: 5, left: 20, right: 0 };
/// assert_eq!(
///     clamp_crop(dims, &margins),
///     Some(CropRect { x: 20, y: 10, width: 80, height: 65 })
/// );
///
/// // Margins larger than the image collapse the region
/// let oversized = CropMargins { top: 50, bottom: 50, left: 0, right: 0 };
/// assert_eq!(clamp_crop(dims, &oversized), None);
/// ```
pub fn clamp_crop(dims: Dimensions, margins: &CropMargins) -> Option<CropRect> {
    if dims.width == 0 || dims.height == 0 {
        return None;
    }

    let (top, bottom) = clamp_span(dims.height, margins.top, margins.bottom);
    let (left, right) = clamp_span(dims.width, margins.left, margins.right);

    if top < bottom && left < right {
        Some(CropRect {
            x: left,
            y: top,
            width: right - left,
            height: bottom - top,
        })
    } else {
        None
    }
}

/// Clamp a `[start, end)` span along one axis of length `len`.
///
/// `start = min(lead, len - 1)`, `end = max(1, len - trail)`.
fn clamp_span(len: u32, lead: u32, trail: u32) -> (u32, u32) {
    let start = lead.min(len.saturating_sub(1));
    let end = len.saturating_sub(trail).max(1);
    (start, end)
}

/// How a (possibly cropped) image is divided into pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitPlan {
    /// Columns `[0, left_width)` and `[left_width, left_width + right_width)`.
    Pair { left_width: u32, right_width: u32 },
    /// The split column is at or past the right edge; the whole image is one page.
    Single,
}

/// Decide where to cut an image of `width` columns at column `split_x`.
///
/// # Examples
/// ```
/// # use page_split::imaging::{SplitPlan, plan_split};
/// assert_eq!(plan_split(1000, 480), SplitPlan::Pair { left_width: 480, right_width: 520 });
/// assert_eq!(plan_split(1000, 1000), SplitPlan::Single);
/// ```
pub fn plan_split(width: u32, split_x: u32) -> SplitPlan {
    if split_x < width {
        SplitPlan::Pair {
            left_width: split_x,
            right_width: width - split_x,
        }
    } else {
        SplitPlan::Single
    }
}
