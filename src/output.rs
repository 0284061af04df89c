//! CLI output formatting for every command.
//!
//! # Information-First Display
//!
//! Output leads with each image's catalog position and file name; paths and
//! sizes follow as indented context lines. The same image reads the same way
//! in `check`, `build` and `exif` output.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Catalog (3 images)
//! 001 photo-1.jpg
//!     Source: images/photo-1.jpg
//! 002 photo-2.jpg (missing)
//!     Source: images/photo-2.jpg
//! 003 scan.heic (no decoder)
//!     Source: images/scan.heic
//! ```
//!
//! ## Build
//!
//! ```text
//! 001 photo-1.jpg → thumbs/photo-1.jpg (400x267)
//!     Source: images/photo-1.jpg (6000x4000)
//! 002 photo-2.jpg → original
//!     Source: images/photo-2.jpg
//!
//! Built 2 images (1 thumbnail, 1 original) → dist
//! ```
//!
//! ## Exif
//!
//! ```text
//! shot.jpg (6000x4000)
//!     Camera: Canon EOS R5
//!     Aperture: f/1.8
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::catalog::Catalog;
use crate::exif::{ExifRecord, display_items};
use crate::site::BuildReport;
use std::path::{Path, PathBuf};

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

// ============================================================================
// check
// ============================================================================

/// Catalog listing with missing sources and undecodable formats flagged.
pub fn format_check_output(
    catalog: &Catalog,
    missing: &[PathBuf],
    unsupported: &[String],
) -> Vec<String> {
    let mut lines = vec![format!(
        "Catalog ({})",
        plural(catalog.len(), "image", "images")
    )];

    for (i, entry) in catalog.entries().iter().enumerate() {
        let is_missing = missing.iter().any(|m| m.ends_with(&entry.source_path));
        let suffix = if is_missing {
            " (missing)"
        } else if unsupported.contains(&entry.source_path) {
            " (no decoder)"
        } else {
            ""
        };
        lines.push(format!(
            "{} {}{}",
            format_index(i + 1),
            entry.file_name(),
            suffix
        ));
        lines.push(format!("{}Source: {}", indent(1), entry.source_path));
    }

    if !missing.is_empty() {
        lines.push(String::new());
        lines.push(format!(
            "{} missing",
            plural(missing.len(), "image", "images")
        ));
    }
    if !unsupported.is_empty() {
        lines.push(format!(
            "{} without a decoder (shown as originals)",
            plural(unsupported.len(), "image", "images")
        ));
    }
    lines
}

pub fn print_check_output(catalog: &Catalog, missing: &[PathBuf], unsupported: &[String]) {
    for line in format_check_output(catalog, missing, unsupported) {
        println!("{}", line);
    }
}

// ============================================================================
// build
// ============================================================================

/// Per-image thumbnail results followed by a summary line.
pub fn format_build_output(catalog: &Catalog, report: &BuildReport) -> Vec<String> {
    let mut lines = Vec::new();

    for (i, entry) in catalog.entries().iter().enumerate() {
        match report.thumbnails.get(&i) {
            Some(t) => {
                let rel = t
                    .path
                    .strip_prefix(&report.output)
                    .unwrap_or(&t.path)
                    .display()
                    .to_string();
                lines.push(format!(
                    "{} {} → {} ({}x{})",
                    format_index(i + 1),
                    entry.file_name(),
                    rel,
                    t.width,
                    t.height
                ));
                lines.push(format!(
                    "{}Source: {} ({}x{})",
                    indent(1),
                    entry.source_path,
                    t.source_width,
                    t.source_height
                ));
            }
            None => {
                lines.push(format!(
                    "{} {} → original",
                    format_index(i + 1),
                    entry.file_name()
                ));
                lines.push(format!("{}Source: {}", indent(1), entry.source_path));
            }
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Built {} ({}, {}) → {}",
        plural(report.images, "image", "images"),
        plural(report.thumbnails.len(), "thumbnail", "thumbnails"),
        plural(report.fallbacks.len(), "original", "originals"),
        report.output.display()
    ));
    lines
}

pub fn print_build_output(catalog: &Catalog, report: &BuildReport) {
    for line in format_build_output(catalog, report) {
        println!("{}", line);
    }
}

// ============================================================================
// exif
// ============================================================================

/// The panel rows an image would show, or why the panel stays hidden.
pub fn format_exif_output(path: &Path, record: &ExifRecord) -> Vec<String> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let mut lines = if record.width > 0 && record.height > 0 {
        vec![format!("{} ({}x{})", name, record.width, record.height)]
    } else {
        vec![name]
    };

    let items = display_items(record);
    if items.is_empty() {
        lines.push(format!("{}No EXIF data; the panel stays hidden", indent(1)));
    } else {
        for item in items {
            lines.push(format!("{}{}: {}", indent(1), item.label, item.value));
        }
    }
    lines
}

pub fn print_exif_output(path: &Path, record: &ExifRecord) {
    for line in format_exif_output(path, record) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CatalogConfig;
    use crate::exif::TagValue;
    use crate::imaging::GeneratedThumbnail;
    use std::collections::BTreeMap;

    fn catalog() -> Catalog {
        Catalog::from_config(&CatalogConfig {
            folder: "images".into(),
            images: vec!["a.jpg".into(), "b.jpg".into()],
            placeholder_width: 1920,
            placeholder_height: 1080,
        })
    }

    #[test]
    fn format_index_zero_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
    }

    #[test]
    fn check_lists_entries_and_flags_missing() {
        let lines = format_check_output(&catalog(), &[PathBuf::from("/site/images/b.jpg")], &[]);
        assert_eq!(lines[0], "Catalog (2 images)");
        assert_eq!(lines[1], "001 a.jpg");
        assert_eq!(lines[2], "    Source: images/a.jpg");
        assert_eq!(lines[3], "002 b.jpg (missing)");
        assert_eq!(lines.last().unwrap(), "1 image missing");
    }

    #[test]
    fn check_without_missing_has_no_summary() {
        let lines = format_check_output(&catalog(), &[], &[]);
        assert_eq!(lines.len(), 5);
        assert!(!lines.iter().any(|l| l.contains("missing")));
    }

    #[test]
    fn check_flags_formats_without_decoder() {
        let lines = format_check_output(&catalog(), &[], &["images/a.jpg".to_string()]);
        assert_eq!(lines[1], "001 a.jpg (no decoder)");
        assert_eq!(lines[3], "002 b.jpg");
        assert_eq!(
            lines.last().unwrap(),
            "1 image without a decoder (shown as originals)"
        );
    }

    #[test]
    fn build_shows_thumbnails_and_fallbacks() {
        let report = BuildReport {
            output: PathBuf::from("dist"),
            images: 2,
            thumbnails: BTreeMap::from([(
                0,
                GeneratedThumbnail {
                    path: PathBuf::from("dist/thumbs/a.jpg"),
                    width: 400,
                    height: 300,
                    source_width: 800,
                    source_height: 600,
                },
            )]),
            fallbacks: vec!["images/b.jpg".into()],
        };
        let lines = format_build_output(&catalog(), &report);
        assert_eq!(lines[0], "001 a.jpg → thumbs/a.jpg (400x300)");
        assert_eq!(lines[1], "    Source: images/a.jpg (800x600)");
        assert_eq!(lines[2], "002 b.jpg → original");
        assert_eq!(
            lines.last().unwrap(),
            "Built 2 images (1 thumbnail, 1 original) → dist"
        );
    }

    #[test]
    fn exif_lists_panel_rows() {
        let record = ExifRecord {
            camera: Some("Canon".into()),
            model: Some("EOS R5".into()),
            iso: Some(TagValue::Number(200.0)),
            width: 6000,
            height: 4000,
            ..ExifRecord::default()
        };
        let lines = format_exif_output(Path::new("/photos/shot.jpg"), &record);
        assert_eq!(
            lines,
            vec![
                "shot.jpg (6000x4000)".to_string(),
                "    Camera: Canon EOS R5".to_string(),
                "    ISO: 200".to_string(),
            ]
        );
    }

    #[test]
    fn exif_without_items_says_hidden() {
        let lines = format_exif_output(Path::new("plain.jpg"), &ExifRecord::default());
        assert_eq!(lines[0], "plain.jpg");
        assert!(lines[1].contains("panel stays hidden"));
    }
}
