//! Shared test utilities for the lightbox-gallery test suite.
//!
//! Provides synthetic image bytes (with and without EXIF), on-disk fixture
//! setup, and a scriptable [`FakeStage`] standing in for the lightbox layout.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let bytes = jpeg_with_exif(64, 48, vec![ascii_field(Tag::Model, "X100V")]);
//! let mut stage = FakeStage::showing(Rect::new(100.0, 50.0, 800.0, 600.0));
//! stage.move_to(Rect::new(100.0, 60.0, 800.0, 600.0));
//! ```

use crate::overlay::{Rect, Stage};
use exif::experimental::Writer;
use exif::{Field, In, Rational, Tag, Value};
use image::{ImageEncoder, RgbImage};
use std::io::Cursor;
use std::path::Path;
use tempfile::TempDir;

// =========================================================================
// Synthetic images
// =========================================================================

fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    })
}

/// A small valid JPEG with the given dimensions.
pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = gradient(width, height);
    let mut bytes = Vec::new();
    image::codecs::jpeg::JpegEncoder::new(&mut bytes)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
    bytes
}

/// A small valid PNG with the given dimensions.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = gradient(width, height);
    let mut bytes = Vec::new();
    image::codecs::png::PngEncoder::new(&mut bytes)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
    bytes
}

/// Write a synthetic JPEG to `path`, creating parent directories.
pub fn write_jpeg(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, jpeg_bytes(width, height)).unwrap();
}

// =========================================================================
// EXIF fixtures
// =========================================================================

pub fn ascii_field(tag: Tag, value: &str) -> Field {
    Field {
        tag,
        ifd_num: In::PRIMARY,
        value: Value::Ascii(vec![value.as_bytes().to_vec()]),
    }
}

pub fn rational_field(tag: Tag, num: u32, denom: u32) -> Field {
    Field {
        tag,
        ifd_num: In::PRIMARY,
        value: Value::Rational(vec![Rational { num, denom }]),
    }
}

pub fn short_field(tag: Tag, value: u16) -> Field {
    Field {
        tag,
        ifd_num: In::PRIMARY,
        value: Value::Short(vec![value]),
    }
}

/// A JPEG carrying an APP1 EXIF segment with the given fields.
///
/// The TIFF block is produced by kamadak-exif's writer and spliced in
/// directly after SOI.
pub fn jpeg_with_exif(width: u32, height: u32, fields: Vec<Field>) -> Vec<u8> {
    let mut tiff = Cursor::new(Vec::new());
    {
        let mut writer = Writer::new();
        for field in &fields {
            writer.push_field(field);
        }
        writer.write(&mut tiff, false).unwrap();
    }
    let tiff = tiff.into_inner();

    let jpeg = jpeg_bytes(width, height);
    assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);

    let segment_len = (2 + 6 + tiff.len()) as u16;
    let mut out = Vec::with_capacity(jpeg.len() + tiff.len() + 10);
    out.extend_from_slice(&[0xFF, 0xD8, 0xFF, 0xE1]);
    out.extend_from_slice(&segment_len.to_be_bytes());
    out.extend_from_slice(b"Exif\0\0");
    out.extend_from_slice(&tiff);
    out.extend_from_slice(&jpeg[2..]);
    out
}

// =========================================================================
// Fixture setup
// =========================================================================

/// A temp site root with `images/<name>` JPEGs of the given sizes.
pub fn setup_site(images: &[(&str, u32, u32)]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    for (name, w, h) in images {
        write_jpeg(&tmp.path().join("images").join(name), *w, *h);
    }
    tmp
}

// =========================================================================
// Fake stage
// =========================================================================

/// Scriptable stand-in for the lightbox's layout.
#[derive(Debug, Clone, Default)]
pub struct FakeStage {
    pub rect: Option<Rect>,
    pub has_slide: bool,
}

impl FakeStage {
    pub fn showing(rect: Rect) -> Self {
        Self {
            rect: Some(rect),
            has_slide: true,
        }
    }

    /// No slide and no image element.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn move_to(&mut self, rect: Rect) {
        self.rect = Some(rect);
    }
}

impl Stage for FakeStage {
    fn image_rect(&self) -> Option<Rect> {
        self.rect
    }

    fn has_slide(&self) -> bool {
        self.has_slide
    }
}
