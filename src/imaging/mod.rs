//! Image processing: pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` (JPEG, PNG, BMP, TIFF) |
//! | **Crop** | clamped margins + `DynamicImage::crop_imm` |
//! | **Split** | two `crop_imm` views at the split column |
//! | **Encode** | `JpegEncoder` at the configured quality |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for crop/split geometry (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`PageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, PageBackend};
pub use calculations::{SplitPlan, clamp_crop, plan_split};
pub use operations::{
    CropOutcome, Pages, WrittenPage, apply_crop, crop_outcome, split, write_pages,
};
pub use params::{CropMargins, CropRect, PageSide, Quality};
pub use rust_backend::{RustBackend, supported_input_extensions};
