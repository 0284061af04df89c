//! Static gallery build.
//!
//! Turns a source directory holding the catalog's images into a deployable
//! gallery:
//!
//! ```text
//! dist/
//! ├── index.html        # Grid, loading overlay, EXIF panel shell, scripts
//! ├── lightbox.json     # Lightbox options, padding profiles, image dimensions
//! ├── images/           # Originals (copied)
//! │   └── photo-1.jpg
//! └── thumbs/           # Pre-built JPEG thumbnails
//!     └── photo-1.jpg
//! ```
//!
//! Thumbnails are produced in parallel on the global rayon pool. An image
//! that cannot be thumbnailed keeps its original as the grid source, the
//! same fallback the page applies at runtime.

use crate::catalog::{Catalog, ImageEntry};
use crate::config::{ConfigError, GalleryConfig, ViewerConfig};
use crate::gallery::Gallery;
use crate::generate::render_index;
use crate::imaging::rust_backend::supported_input_extensions;
use crate::imaging::{
    BackendError, GeneratedThumbnail, ImageBackend, RustBackend, ThumbnailParams, create_thumbnail,
    get_dimensions,
};
use crate::viewer::{LightboxOptions, Padding, responsive_padding};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const THUMBS_DIR: &str = "thumbs";
pub const OPTIONS_FILE: &str = "lightbox.json";

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Source image not found: {0}")]
    SourceNotFound(PathBuf),
}

/// What a build produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub output: PathBuf,
    pub images: usize,
    /// Thumbnails by catalog index.
    pub thumbnails: BTreeMap<usize, GeneratedThumbnail>,
    /// Sources served as-is because thumbnailing failed.
    pub fallbacks: Vec<String>,
}

/// Padding per viewport class, panel reserve included.
#[derive(Debug, Serialize)]
pub struct ResolvedPadding {
    pub mobile: Padding,
    pub tablet: Padding,
    pub desktop: Padding,
}

impl ResolvedPadding {
    pub fn from_config(config: &ViewerConfig) -> Self {
        Self {
            mobile: responsive_padding(config.mobile_breakpoint, config),
            tablet: responsive_padding(config.tablet_breakpoint, config),
            desktop: responsive_padding(config.tablet_breakpoint + 1, config),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Breakpoints {
    pub mobile: u32,
    pub tablet: u32,
}

/// Contents of `lightbox.json`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionsDocument {
    /// Desktop options; hosts swap `padding` from `padding_profiles`.
    pub options: LightboxOptions,
    pub padding_profiles: ResolvedPadding,
    pub breakpoints: Breakpoints,
    pub arrow_hide_delay_ms: u64,
    pub images: Vec<ImageEntry>,
}

impl OptionsDocument {
    pub fn new(config: &GalleryConfig, catalog: &Catalog) -> Self {
        let viewer = &config.viewer;
        Self {
            options: LightboxOptions::new(viewer, viewer.tablet_breakpoint + 1),
            padding_profiles: ResolvedPadding::from_config(viewer),
            breakpoints: Breakpoints {
                mobile: viewer.mobile_breakpoint,
                tablet: viewer.tablet_breakpoint,
            },
            arrow_hide_delay_ms: viewer.arrow_hide_delay_ms,
            images: catalog.entries().to_vec(),
        }
    }
}

/// Build the gallery with the pure-Rust backend.
pub fn build(
    source: &Path,
    output: &Path,
    config: &GalleryConfig,
) -> Result<BuildReport, BuildError> {
    let catalog = Catalog::from_config(&config.catalog);
    for path in catalog.unsupported_formats(supported_input_extensions()) {
        log::warn!("no decoder for {path}, the grid will show the original");
    }
    let backend = RustBackend::new();
    build_with_backend(&backend, source, output, config)
}

/// Build using a specific backend (allows testing with mock).
pub fn build_with_backend(
    backend: &dyn ImageBackend,
    source: &Path,
    output: &Path,
    config: &GalleryConfig,
) -> Result<BuildReport, BuildError> {
    config.validate()?;
    let mut catalog = Catalog::from_config(&config.catalog);
    if let Some(missing) = catalog.missing_sources(source).into_iter().next() {
        return Err(BuildError::SourceNotFound(missing));
    }

    fs::create_dir_all(output)?;
    let params = ThumbnailParams::from_config(&config.thumbnails);

    // Thumbnails mirror the catalog names, so `a/x.jpg` and `b/x.jpg` stay apart.
    let results: Vec<(usize, String, Result<GeneratedThumbnail, BackendError>)> = config
        .catalog
        .images
        .par_iter()
        .zip(catalog.entries().par_iter())
        .enumerate()
        .map(|(index, (name, entry))| {
            let result = create_thumbnail(
                backend,
                &source.join(&entry.source_path),
                &output.join(THUMBS_DIR).join(name),
                &params,
            );
            (index, format!("{THUMBS_DIR}/{name}"), result)
        })
        .collect();

    let mut thumbnails = BTreeMap::new();
    let mut fallbacks = Vec::new();
    let mut thumb_sources = Vec::new();
    for (index, thumb_src, result) in results {
        let Some(entry) = catalog.get(index) else {
            continue;
        };
        let source_path = entry.source_path.clone();
        match result {
            Ok(generated) => {
                log::debug!(
                    "thumbnail {} ({}x{})",
                    generated.path.display(),
                    generated.width,
                    generated.height
                );
                catalog.set_dimensions(index, generated.source_width, generated.source_height);
                thumb_sources.push((index, thumb_src));
                thumbnails.insert(index, generated);
            }
            Err(e) => {
                log::warn!("could not thumbnail {source_path}, using the original: {e}");
                match fs::read(source.join(&source_path))
                    .map_err(BackendError::Io)
                    .and_then(|bytes| get_dimensions(backend, &bytes))
                {
                    Ok((width, height)) => catalog.set_dimensions(index, width, height),
                    Err(e) => log::debug!("keeping placeholder size for {source_path}: {e}"),
                }
                fallbacks.push(source_path);
            }
        }
    }

    for entry in catalog.entries() {
        let dest = output.join(&entry.source_path);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(source.join(&entry.source_path), &dest)?;
    }

    let mut gallery = Gallery::from_catalog(&catalog);
    for (index, src) in thumb_sources {
        gallery.set_data_src(index, src);
    }
    fs::write(
        output.join("index.html"),
        render_index(config, &gallery).into_string(),
    )?;

    let document = OptionsDocument::new(config, &catalog);
    fs::write(
        output.join(OPTIONS_FILE),
        serde_json::to_string_pretty(&document)?,
    )?;

    Ok(BuildReport {
        output: output.to_path_buf(),
        images: catalog.len(),
        thumbnails,
        fallbacks,
    })
}
