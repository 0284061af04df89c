//! High-level image operations.
//!
//! These functions combine calculations with backend execution.
//! They take configuration, compute parameters, and call the backend.

use super::backend::{BackendError, ImageBackend, Thumbnail};
use super::params::ThumbnailParams;
use std::path::{Path, PathBuf};

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Get image dimensions using the backend.
pub fn get_dimensions(backend: &dyn ImageBackend, bytes: &[u8]) -> Result<(u32, u32)> {
    let dims = backend.identify(bytes)?;
    Ok((dims.width, dims.height))
}

/// What a grid cell ends up displaying.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThumbnailOutcome {
    /// A downscaled raster was produced.
    Raster(Thumbnail),
    /// Thumbnail production failed; display the original source instead.
    Original,
}

/// Produce a thumbnail, degrading to the original on any decode/encode error.
///
/// Never fails: a broken image still has to settle its grid cell.
pub fn thumbnail_or_original(
    backend: &dyn ImageBackend,
    bytes: &[u8],
    params: &ThumbnailParams,
) -> ThumbnailOutcome {
    match backend.thumbnail(bytes, params) {
        Ok(thumb) => ThumbnailOutcome::Raster(thumb),
        Err(e) => {
            log::debug!("thumbnail failed, falling back to original: {e}");
            ThumbnailOutcome::Original
        }
    }
}

/// A thumbnail written to disk during a site build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedThumbnail {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    /// True dimensions of the source image.
    pub source_width: u32,
    pub source_height: u32,
}

/// Read `source`, write its thumbnail to `output`, and report both sizes.
pub fn create_thumbnail(
    backend: &dyn ImageBackend,
    source: &Path,
    output: &Path,
    params: &ThumbnailParams,
) -> Result<GeneratedThumbnail> {
    let bytes = std::fs::read(source)?;
    let (source_width, source_height) = get_dimensions(backend, &bytes)?;
    let thumb = backend.thumbnail(&bytes, params)?;

    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(output, &thumb.bytes)?;

    Ok(GeneratedThumbnail {
        path: output.to_path_buf(),
        width: thumb.width,
        height: thumb.height,
        source_width,
        source_height,
    })
}
