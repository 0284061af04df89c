//! Image processing in pure Rust.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::ImageReader::into_dimensions` |
//! | **EXIF tags** | `kamadak-exif` (primary + Exif IFD) |
//! | **Thumbnail** | Lanczos3 downscale within a bounding box → JPEG |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] / [`TagDecoder`] traits + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub(crate) mod exif_reader;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend, TagDecoder, Thumbnail};
pub use calculations::fit_within;
pub use operations::{
    GeneratedThumbnail, ThumbnailOutcome, create_thumbnail, get_dimensions,
    thumbnail_or_original,
};
pub use params::{Quality, ThumbnailParams};
pub use rust_backend::RustBackend;
