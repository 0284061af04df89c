//! Pure Rust image processing backend.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify | `image::ImageReader::into_dimensions` (header only) |
//! | Decode (JPEG, PNG, TIFF, WebP) | `image` crate (pure Rust decoders) |
//! | Resize | `image::DynamicImage::resize_exact` with `Lanczos3` filter |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` |
//! | EXIF tags | `kamadak-exif` via [`exif_reader`](super::exif_reader) |

use super::backend::{BackendError, Dimensions, ImageBackend, TagDecoder, Thumbnail};
use super::calculations::fit_within;
use super::params::ThumbnailParams;
use crate::exif::TagSet;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::io::Cursor;
use std::sync::LazyLock;

/// Extensions whose decoders are compiled in.
const PHOTO_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
    ("tif", ImageFormat::Tiff),
    ("tiff", ImageFormat::Tiff),
    ("webp", ImageFormat::WebP),
];

static SUPPORTED_EXTENSIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    PHOTO_CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

/// Returns the set of image file extensions that have working decoders compiled in.
pub fn supported_input_extensions() -> &'static [&'static str] {
    &SUPPORTED_EXTENSIONS
}

/// Pure Rust backend using the `image` crate ecosystem and `kamadak-exif`.
///
/// See the [module docs](self) for the crate-to-operation mapping.
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

fn reader(bytes: &[u8]) -> Result<ImageReader<Cursor<&[u8]>>, BackendError> {
    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(BackendError::Io)
}

/// Decode an in-memory image.
fn decode(bytes: &[u8]) -> Result<DynamicImage, BackendError> {
    reader(bytes)?
        .decode()
        .map_err(|e| BackendError::Decode(format!("Failed to decode image: {e}")))
}

/// Encode as baseline JPEG. Alpha is dropped since JPEG cannot carry it.
fn encode_jpeg(img: &DynamicImage, quality: u32) -> Result<Vec<u8>, BackendError> {
    let mut bytes = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut bytes, quality as u8);
    DynamicImage::ImageRgb8(img.to_rgb8())
        .write_with_encoder(encoder)
        .map_err(|e| BackendError::Encode(format!("JPEG encode failed: {e}")))?;
    Ok(bytes)
}

impl ImageBackend for RustBackend {
    fn identify(&self, bytes: &[u8]) -> Result<Dimensions, BackendError> {
        let (width, height) = reader(bytes)?
            .into_dimensions()
            .map_err(|e| BackendError::Decode(format!("Failed to read dimensions: {e}")))?;
        Ok(Dimensions { width, height })
    }

    fn thumbnail(
        &self,
        bytes: &[u8],
        params: &ThumbnailParams,
    ) -> Result<Thumbnail, BackendError> {
        let img = decode(bytes)?;
        let (width, height) = fit_within((img.width(), img.height()), params.max_edge);
        if width == 0 || height == 0 {
            return Err(BackendError::Decode("Image has no pixels".to_string()));
        }

        let resized = if (width, height) == (img.width(), img.height()) {
            img
        } else {
            img.resize_exact(width, height, FilterType::Lanczos3)
        };

        Ok(Thumbnail {
            bytes: encode_jpeg(&resized, params.quality.value())?,
            width,
            height,
        })
    }
}

impl TagDecoder for RustBackend {
    fn read_tags(&self, bytes: &[u8]) -> Result<TagSet, BackendError> {
        super::exif_reader::read_tags(bytes)
    }
}
