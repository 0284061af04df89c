//! Metadata resolution for the overlay panel.
//!
//! Given a slide's full-resolution source, produce an [`ExifRecord`]. The
//! pipeline never fails outward; every failure degrades toward "no tags",
//! which hides the panel.
//!
//! ## Resolution order
//!
//! ```text
//! primary fetch ──▶ identify ──┐
//!      │ (fetch or decode fails)│
//!      ▼                        ├──▶ tag decoder ──▶ ExifRecord
//! fallback fetch ──▶ identify ──┘        │
//!      │ (both fail)                      └─ absent: dimensions only
//!      ▼
//!  empty record
//! ```
//!
//! Dimensions on the record resolve independently: the first usable of
//! `PixelXDimension`/`PixelYDimension` and the decoded natural size wins.

use crate::exif::ExifRecord;
use crate::fetch::{DirFetcher, ImageFetcher};
use crate::imaging::{ImageBackend, RustBackend, TagDecoder};
use std::path::Path;

/// Runs the fetch → decode → tags pipeline for one source.
pub struct MetadataResolver<'a> {
    primary: &'a dyn ImageFetcher,
    fallback: Option<&'a dyn ImageFetcher>,
    backend: &'a dyn ImageBackend,
    tags: Option<&'a dyn TagDecoder>,
}

impl<'a> MetadataResolver<'a> {
    pub fn new(primary: &'a dyn ImageFetcher, backend: &'a dyn ImageBackend) -> Self {
        Self {
            primary,
            fallback: None,
            backend,
            tags: None,
        }
    }

    /// Loader used when the primary fetch fails or yields undecodable bytes.
    pub fn with_fallback(mut self, fallback: &'a dyn ImageFetcher) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Tag decoder. Without one, records carry dimensions only.
    pub fn with_tag_decoder(mut self, tags: &'a dyn TagDecoder) -> Self {
        self.tags = Some(tags);
        self
    }

    /// Resolve the record for `source`. Never fails.
    pub fn resolve(&self, source: &str) -> ExifRecord {
        let Some((bytes, natural)) = self.load(source) else {
            log::warn!("no metadata for {source}: image could not be loaded");
            return ExifRecord::default();
        };

        let Some(decoder) = self.tags else {
            log::debug!("no tag decoder available, {source} resolves to dimensions only");
            return ExifRecord::dimensions_only(natural);
        };

        match decoder.read_tags(&bytes) {
            Ok(tags) => ExifRecord::from_tags(&tags, natural),
            Err(e) => {
                log::warn!("EXIF extraction failed for {source}: {e}");
                ExifRecord::dimensions_only(natural)
            }
        }
    }

    /// Fetch and identify, trying the fallback loader on any failure.
    fn load(&self, source: &str) -> Option<(Vec<u8>, (u32, u32))> {
        match self.fetch_and_identify(self.primary, source) {
            Ok(loaded) => return Some(loaded),
            Err(reason) => log::debug!("primary load of {source} failed: {reason}"),
        }

        let fallback = self.fallback?;
        match self.fetch_and_identify(fallback, source) {
            Ok(loaded) => Some(loaded),
            Err(reason) => {
                log::debug!("fallback load of {source} failed: {reason}");
                None
            }
        }
    }

    fn fetch_and_identify(
        &self,
        fetcher: &dyn ImageFetcher,
        source: &str,
    ) -> Result<(Vec<u8>, (u32, u32)), String> {
        let bytes = fetcher.fetch(source).map_err(|e| e.to_string())?;
        let dims = self.backend.identify(&bytes).map_err(|e| e.to_string())?;
        Ok((bytes, (dims.width, dims.height)))
    }
}

/// Resolve a single file on disk with the built-in decoder.
pub fn resolve_file(path: &Path) -> ExifRecord {
    let root = path.parent().unwrap_or_else(|| Path::new("."));
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        log::warn!("not a file path: {}", path.display());
        return ExifRecord::default();
    };
    let fetcher = DirFetcher::new(root);
    let backend = RustBackend::new();
    MetadataResolver::new(&fetcher, &backend)
        .with_tag_decoder(&backend)
        .resolve(name)
}
