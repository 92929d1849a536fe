//! Image backend trait and shared types.
//!
//! The [`PageBackend`] trait defines the operations the splitter needs from an
//! image library: read a scan's dimensions, decode a scan from disk, and
//! encode a page as JPEG.
//! All pixel manipulation in between (crop, split) happens on in-memory
//! [`DynamicImage`]s in [`operations`](super::operations), so the backend is
//! the only place that touches image files.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), pure Rust and built on
//! the `image` crate.

use super::params::Quality;
use image::DynamicImage;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode {path}: {message}")]
    Decode { path: String, message: String },
    #[error("Failed to encode {path}: {message}")]
    Encode { path: String, message: String },
}

/// Pixel dimensions of a decoded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn of(img: &DynamicImage) -> Self {
        Self {
            width: img.width(),
            height: img.height(),
        }
    }
}

/// Trait for image backends.
///
/// File access is the only thing that differs between a real backend and a
/// test double, so that is all the trait covers.
pub trait PageBackend {
    /// Read image dimensions without decoding pixel data.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Decode an image file into memory.
    fn load(&self, path: &Path) -> Result<DynamicImage, BackendError>;

    /// Encode `img` as JPEG and write it to `path`, replacing any existing file.
    fn save_jpeg(&self, img: &DynamicImage, path: &Path, quality: Quality)
    -> Result<(), BackendError>;
}
