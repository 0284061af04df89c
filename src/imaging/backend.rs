//! Image processing backend traits and shared types.
//!
//! [`ImageBackend`] covers the two pixel operations the gallery needs:
//! identify (true dimensions) and thumbnail (bounded downscale). EXIF tag
//! extraction sits behind its own [`TagDecoder`] trait because the metadata
//! panel must keep working, reduced to dimensions only, when no tag decoder
//! is available.
//!
//! Both operate on in-memory bytes: the gallery always fetches first, then
//! decodes.
//!
//! The production implementation of both traits is
//! [`RustBackend`](super::rust_backend::RustBackend).

use super::params::ThumbnailParams;
use crate::exif::TagSet;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Encode failed: {0}")]
    Encode(String),
    #[error("EXIF read failed: {0}")]
    Exif(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// An encoded thumbnail raster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    /// JPEG bytes.
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Trait for image processing backends.
pub trait ImageBackend: Sync {
    /// Read the pixel dimensions of an encoded image.
    fn identify(&self, bytes: &[u8]) -> Result<Dimensions, BackendError>;

    /// Decode, downscale within the params' bound, and re-encode.
    fn thumbnail(&self, bytes: &[u8], params: &ThumbnailParams)
    -> Result<Thumbnail, BackendError>;
}

/// Extracts the EXIF tags shown in the metadata panel.
pub trait TagDecoder: Sync {
    /// An image without EXIF yields an empty set, not an error.
    fn read_tags(&self, bytes: &[u8]) -> Result<TagSet, BackendError>;
}
