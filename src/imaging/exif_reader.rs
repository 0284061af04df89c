//! EXIF tag extraction via `kamadak-exif`.
//!
//! Reads the primary IFD (and the Exif sub-IFD, which the reader folds into
//! it) from any container the crate recognises (JPEG APP1, TIFF, PNG eXIf,
//! WebP). Only the tags listed in [`ExifTag`] are kept.

use super::backend::BackendError;
use crate::exif::{ExifTag, TagSet, TagValue};
use exif::{In, Tag, Value};
use std::io::Cursor;

fn kamadak_tag(tag: ExifTag) -> Tag {
    match tag {
        ExifTag::Make => Tag::Make,
        ExifTag::Model => Tag::Model,
        ExifTag::LensModel => Tag::LensModel,
        ExifTag::FocalLength => Tag::FocalLength,
        ExifTag::FNumber => Tag::FNumber,
        ExifTag::ExposureTime => Tag::ExposureTime,
        ExifTag::Iso => Tag::PhotographicSensitivity,
        ExifTag::DateTime => Tag::DateTime,
        ExifTag::PixelXDimension => Tag::PixelXDimension,
        ExifTag::PixelYDimension => Tag::PixelYDimension,
    }
}

/// Read the gallery's tags from encoded image bytes.
///
/// Images without an EXIF block produce an empty [`TagSet`].
pub fn read_tags(bytes: &[u8]) -> Result<TagSet, BackendError> {
    let exif = match exif::Reader::new().read_from_container(&mut Cursor::new(bytes)) {
        Ok(exif) => exif,
        Err(exif::Error::NotFound(_)) => return Ok(TagSet::new()),
        Err(e) => return Err(BackendError::Exif(e.to_string())),
    };

    let mut tags = TagSet::new();
    for tag in ExifTag::ALL {
        if let Some(value) = exif
            .get_field(kamadak_tag(tag), In::PRIMARY)
            .and_then(|field| convert(&field.value))
        {
            tags.insert(tag, value);
        }
    }
    Ok(tags)
}

/// First component of a field as a [`TagValue`].
fn convert(value: &Value) -> Option<TagValue> {
    match value {
        Value::Ascii(parts) => parts
            .iter()
            .map(|p| String::from_utf8_lossy(p).trim_matches(['\0', ' ']).to_string())
            .find(|s| !s.is_empty())
            .map(TagValue::Text),
        Value::Rational(v) => v.first().map(|r| TagValue::Rational {
            numerator: r.num as i64,
            denominator: r.denom as i64,
        }),
        Value::SRational(v) => v.first().map(|r| TagValue::Rational {
            numerator: r.num as i64,
            denominator: r.denom as i64,
        }),
        Value::Float(v) => v.first().map(|f| TagValue::Number(*f as f64)),
        Value::Double(v) => v.first().map(|f| TagValue::Number(*f)),
        Value::Byte(_) | Value::Short(_) | Value::Long(_) => {
            value.get_uint(0).map(|n| TagValue::Number(n as f64))
        }
        Value::SShort(v) => v.first().map(|n| TagValue::Number(*n as f64)),
        Value::SLong(v) => v.first().map(|n| TagValue::Number(*n as f64)),
        _ => None,
    }
}
