//! The image catalog: a fixed, ordered list of image references.
//!
//! Entries are created from config with placeholder dimensions. Nothing is
//! read from disk here; the thumbnail loader corrects `width`/`height` and
//! flips `loaded` once the real image has been decoded.

use crate::config::CatalogConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One image in the gallery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageEntry {
    /// Path relative to the site root, e.g. `images/photo-3.jpg`.
    pub source_path: String,
    /// True once the thumbnail has been produced and displayed.
    pub loaded: bool,
    pub width: u32,
    pub height: u32,
}

impl ImageEntry {
    pub fn placeholder(source_path: String, width: u32, height: u32) -> Self {
        Self {
            source_path,
            loaded: false,
            width,
            height,
        }
    }

    /// File name component of the source path.
    pub fn file_name(&self) -> &str {
        self.source_path
            .rsplit('/')
            .next()
            .unwrap_or(&self.source_path)
    }
}

/// Ordered catalog owned by the gallery.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    entries: Vec<ImageEntry>,
}

impl Catalog {
    /// Build the catalog from config: `folder/name` for each listed image.
    pub fn from_config(config: &CatalogConfig) -> Self {
        let folder = config.folder.trim_end_matches('/');
        let entries = config
            .images
            .iter()
            .map(|name| {
                let source_path = if folder.is_empty() {
                    name.clone()
                } else {
                    format!("{folder}/{name}")
                };
                ImageEntry::placeholder(
                    source_path,
                    config.placeholder_width,
                    config.placeholder_height,
                )
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[ImageEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&ImageEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record that the thumbnail for `index` is on screen.
    pub fn mark_loaded(&mut self, index: usize) {
        if let Some(entry) = self.entries.get_mut(index) {
            entry.loaded = true;
        }
    }

    /// Replace placeholder dimensions with the decoded ones.
    pub fn set_dimensions(&mut self, index: usize, width: u32, height: u32) {
        if let Some(entry) = self.entries.get_mut(index) {
            entry.width = width;
            entry.height = height;
        }
    }

    /// Source paths whose extension has no decoder in `supported`.
    pub fn unsupported_formats(&self, supported: &[&str]) -> Vec<String> {
        self.entries
            .iter()
            .filter(|e| {
                let ext = Path::new(&e.source_path)
                    .extension()
                    .map(|x| x.to_string_lossy().to_lowercase());
                !ext.is_some_and(|ext| supported.contains(&ext.as_str()))
            })
            .map(|e| e.source_path.clone())
            .collect()
    }

    /// Entries whose source file is missing under `root`.
    pub fn missing_sources(&self, root: &Path) -> Vec<PathBuf> {
        self.entries
            .iter()
            .map(|e| root.join(&e.source_path))
            .filter(|p| !p.is_file())
            .collect()
    }
}
