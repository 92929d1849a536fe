//! Pure Rust image backend built on the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify | `ImageDecoder::dimensions` + EXIF orientation (header only) |
//! | Decode (JPEG, PNG, BMP, TIFF) | `image::ImageReader` with format guessed from content |
//! | Orient | `DynamicImage::apply_orientation` from the EXIF tag |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder::new_with_quality` |
//!
//! JPEG has no alpha channel and the encoder rejects 16-bit samples, so every
//! page is flattened to 8-bit RGB before encoding.
//!
//! Scans are turned upright according to their EXIF orientation as they are
//! decoded, so crop margins and `split_x` always refer to the image as it is
//! displayed. The written pages carry no EXIF data.

use super::backend::{BackendError, Dimensions, PageBackend};
use super::params::Quality;
use image::codecs::jpeg::JpegEncoder;
use image::metadata::Orientation;
use image::{DynamicImage, ImageDecoder, ImageFormat, ImageReader};
use std::io::Write;
use std::path::Path;
use std::sync::LazyLock;

/// Extensions accepted as scan input, paired with the decoder they need.
const SCAN_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
    ("bmp", ImageFormat::Bmp),
    ("tiff", ImageFormat::Tiff),
];

static SUPPORTED_EXTENSIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    SCAN_CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

/// Returns the lowercase scan extensions that have working decoders compiled in.
pub fn supported_input_extensions() -> &'static [&'static str] {
    &SUPPORTED_EXTENSIONS
}

/// Pure Rust backend using the `image` crate.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn decode_error(path: &Path, err: impl std::fmt::Display) -> BackendError {
    BackendError::Decode {
        path: path.display().to_string(),
        message: err.to_string(),
    }
}

/// Whether `orientation` swaps width and height.
fn is_quarter_turn(orientation: Orientation) -> bool {
    matches!(
        orientation,
        Orientation::Rotate90
            | Orientation::Rotate270
            | Orientation::Rotate90FlipH
            | Orientation::Rotate270FlipH
    )
}

impl PageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let mut decoder = ImageReader::open(path)?
            .with_guessed_format()?
            .into_decoder()
            .map_err(|e| decode_error(path, e))?;
        let orientation = decoder
            .orientation()
            .map_err(|e| decode_error(path, e))?;
        let (width, height) = decoder.dimensions();
        Ok(if is_quarter_turn(orientation) {
            Dimensions {
                width: height,
                height: width,
            }
        } else {
            Dimensions { width, height }
        })
    }

    fn load(&self, path: &Path) -> Result<DynamicImage, BackendError> {
        // Sniff the format from content so a mislabelled extension still decodes.
        let mut decoder = ImageReader::open(path)?
            .with_guessed_format()?
            .into_decoder()
            .map_err(|e| decode_error(path, e))?;
        let orientation = decoder
            .orientation()
            .map_err(|e| decode_error(path, e))?;
        let mut img = DynamicImage::from_decoder(decoder).map_err(|e| decode_error(path, e))?;
        img.apply_orientation(orientation);
        Ok(img)
    }

    fn save_jpeg(
        &self,
        img: &DynamicImage,
        path: &Path,
        quality: Quality,
    ) -> Result<(), BackendError> {
        let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
        let file = std::fs::File::create(path)?;
        let mut writer = std::io::BufWriter::new(file);
        let encoder = JpegEncoder::new_with_quality(&mut writer, quality.value());
        rgb.write_with_encoder(encoder)
            .map_err(|e| BackendError::Encode {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        // Dropping a BufWriter discards flush errors.
        writer.flush()?;
        Ok(())
    }
}
