//! EXIF record model and display formatting for the metadata panel.
//!
//! ## Data flow
//!
//! ```text
//! TagSource (decoder output) + natural dimensions
//!        │
//!        ▼
//!    ExifRecord ── display_items() ──▶ [ExifItem { label, value }, ...]
//! ```
//!
//! ## Absence
//!
//! A tag that is missing, zero, has a zero denominator, or is an empty
//! string is treated as absent. Absent fields never produce an item, so an
//! image without EXIF yields an empty list and the panel stays hidden.
//!
//! ## Display order
//!
//! Camera, Lens, Focal Length, Aperture, Shutter, ISO. `date_time` and the
//! dimensions are carried on the record but never displayed.

use serde::Serialize;
use std::collections::BTreeMap;

/// Tags the gallery reads from EXIF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ExifTag {
    Make,
    Model,
    LensModel,
    FocalLength,
    FNumber,
    ExposureTime,
    Iso,
    DateTime,
    PixelXDimension,
    PixelYDimension,
}

impl ExifTag {
    pub const ALL: [ExifTag; 10] = [
        ExifTag::Make,
        ExifTag::Model,
        ExifTag::LensModel,
        ExifTag::FocalLength,
        ExifTag::FNumber,
        ExifTag::ExposureTime,
        ExifTag::Iso,
        ExifTag::DateTime,
        ExifTag::PixelXDimension,
        ExifTag::PixelYDimension,
    ];

    /// Standard EXIF tag name.
    pub fn name(self) -> &'static str {
        match self {
            ExifTag::Make => "Make",
            ExifTag::Model => "Model",
            ExifTag::LensModel => "LensModel",
            ExifTag::FocalLength => "FocalLength",
            ExifTag::FNumber => "FNumber",
            ExifTag::ExposureTime => "ExposureTime",
            ExifTag::Iso => "ISOSpeedRatings",
            ExifTag::DateTime => "DateTime",
            ExifTag::PixelXDimension => "PixelXDimension",
            ExifTag::PixelYDimension => "PixelYDimension",
        }
    }
}

/// A raw tag value: numeric, rational, or text.
#[derive(Debug, Clone, PartialEq)]
pub enum TagValue {
    Number(f64),
    Rational { numerator: i64, denominator: i64 },
    Text(String),
}

impl TagValue {
    /// Numeric value. `None` for text, a zero denominator, or NaN.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            TagValue::Number(n) if n.is_finite() => Some(*n),
            TagValue::Rational {
                numerator,
                denominator,
            } if *denominator != 0 => Some(*numerator as f64 / *denominator as f64),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            TagValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Whether the value counts as present (non-zero, non-empty).
    pub fn is_present(&self) -> bool {
        match self {
            TagValue::Text(s) => !s.trim().is_empty(),
            other => other.as_f64().is_some_and(|n| n != 0.0),
        }
    }

    /// Plain rendering used for ISO.
    fn render(&self) -> String {
        match self {
            TagValue::Text(s) => s.trim().to_string(),
            other => other.as_f64().map(|n| n.to_string()).unwrap_or_default(),
        }
    }
}

/// Lookup of raw tag values.
pub trait TagSource {
    fn tag(&self, tag: ExifTag) -> Option<TagValue>;
}

/// A decoded set of tags.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagSet {
    values: BTreeMap<ExifTag, TagValue>,
}

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, tag: ExifTag, value: TagValue) {
        self.values.insert(tag, value);
    }

    pub fn with(mut self, tag: ExifTag, value: TagValue) -> Self {
        self.insert(tag, value);
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl TagSource for TagSet {
    fn tag(&self, tag: ExifTag) -> Option<TagValue> {
        self.values.get(&tag).cloned()
    }
}

/// Extracted metadata for one image.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExifRecord {
    /// Manufacturer (EXIF `Make`).
    pub camera: Option<String>,
    pub model: Option<String>,
    pub lens: Option<String>,
    pub focal_length: Option<TagValue>,
    pub aperture: Option<TagValue>,
    pub shutter_speed: Option<TagValue>,
    pub iso: Option<TagValue>,
    pub date_time: Option<String>,
    pub width: u32,
    pub height: u32,
}

impl ExifRecord {
    /// Build a record from a tag source.
    ///
    /// Dimensions prefer `PixelXDimension`/`PixelYDimension` and fall back to
    /// the decoded image's natural size.
    pub fn from_tags(source: &dyn TagSource, natural: (u32, u32)) -> Self {
        let present = |tag: ExifTag| source.tag(tag).filter(TagValue::is_present);
        let text = |tag: ExifTag| {
            present(tag).and_then(|v| v.as_text().map(|s| s.trim().to_string()))
        };
        let dimension = |tag: ExifTag, fallback: u32| {
            present(tag)
                .and_then(|v| v.as_f64())
                .filter(|n| *n > 0.0 && *n <= u32::MAX as f64)
                .map(|n| n as u32)
                .unwrap_or(fallback)
        };

        Self {
            camera: text(ExifTag::Make),
            model: text(ExifTag::Model),
            lens: text(ExifTag::LensModel),
            focal_length: present(ExifTag::FocalLength),
            aperture: present(ExifTag::FNumber),
            shutter_speed: present(ExifTag::ExposureTime),
            iso: present(ExifTag::Iso),
            date_time: text(ExifTag::DateTime),
            width: dimension(ExifTag::PixelXDimension, natural.0),
            height: dimension(ExifTag::PixelYDimension, natural.1),
        }
    }

    /// Record for an image decoded without any tag decoder.
    pub fn dimensions_only(natural: (u32, u32)) -> Self {
        Self {
            width: natural.0,
            height: natural.1,
            ..Self::default()
        }
    }
}

/// One label/value row in the metadata panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExifItem {
    pub label: &'static str,
    pub value: String,
}

impl ExifItem {
    fn new(label: &'static str, value: String) -> Self {
        Self { label, value }
    }
}

/// JS-style `Math.round`: halves round toward positive infinity.
pub(crate) fn round_half_up(n: f64) -> f64 {
    (n + 0.5).floor()
}

/// `"{make} {model}"`, or the model alone. A make without a model is dropped.
pub fn format_camera(make: Option<&str>, model: Option<&str>) -> Option<String> {
    match (make, model) {
        (Some(make), Some(model)) => Some(format!("{make} {model}")),
        (None, Some(model)) => Some(model.to_string()),
        _ => None,
    }
}

/// Rounded millimetres, e.g. `"35mm"`.
pub fn format_focal_length(value: &TagValue) -> Option<String> {
    value
        .as_f64()
        .map(|mm| format!("{}mm", round_half_up(mm)))
}

/// One decimal place, e.g. `"f/2.8"`. Ties round up.
pub fn format_aperture(value: &TagValue) -> Option<String> {
    value
        .as_f64()
        .map(|f| format!("f/{:.1}", round_half_up(f * 10.0) / 10.0))
}

/// `"{s}s"` for a second or longer, otherwise the rounded reciprocal
/// `"1/{n}s"`.
pub fn format_shutter(value: &TagValue) -> Option<String> {
    let seconds = value.as_f64().filter(|s| *s > 0.0)?;
    if seconds >= 1.0 {
        Some(format!("{seconds}s"))
    } else {
        Some(format!("1/{}s", round_half_up(1.0 / seconds)))
    }
}

/// Ordered display rows for a record. Absent fields are skipped.
pub fn display_items(record: &ExifRecord) -> Vec<ExifItem> {
    let mut items = Vec::new();

    if let Some(camera) = format_camera(record.camera.as_deref(), record.model.as_deref()) {
        items.push(ExifItem::new("Camera", camera));
    }
    if let Some(lens) = &record.lens {
        items.push(ExifItem::new("Lens", lens.clone()));
    }
    if let Some(v) = record.focal_length.as_ref().and_then(format_focal_length) {
        items.push(ExifItem::new("Focal Length", v));
    }
    if let Some(v) = record.aperture.as_ref().and_then(format_aperture) {
        items.push(ExifItem::new("Aperture", v));
    }
    if let Some(v) = record.shutter_speed.as_ref().and_then(format_shutter) {
        items.push(ExifItem::new("Shutter", v));
    }
    if let Some(iso) = record.iso.as_ref().filter(|v| v.is_present()) {
        items.push(ExifItem::new("ISO", iso.render()));
    }

    items
}
