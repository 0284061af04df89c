//! Gallery configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. The file lives in
//! the source directory next to the image folder:
//!
//! ```text
//! site/
//! ├── config.toml          # Optional, overrides stock defaults
//! └── images/
//!     ├── photo-1.jpg
//!     └── ...
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [catalog]
//! folder = "images"
//! images = ["photo-1.jpg", "photo-2.jpg"]   # default: photo-1.jpg .. photo-29.jpg
//! placeholder_width = 1920
//! placeholder_height = 1080
//!
//! [thumbnails]
//! max_edge = 400            # Longer edge of generated thumbnails
//! quality = 80              # JPEG quality (1-100)
//!
//! [lazy_load]
//! root_margin = 50          # Lead margin (px) before a cell counts as visible
//!
//! [loading]
//! hide_delay_ms = 500       # Grid rendered → overlay fades
//! fade_ms = 500             # Fade → overlay removed
//!
//! [viewer]
//! panel_reserve = 80        # Extra bottom padding kept free for the EXIF panel
//! mobile_breakpoint = 768
//! tablet_breakpoint = 1024
//!
//! [overlay]
//! monitor_interval_ms = 200
//! monitor_window_ms = 3000
//! move_threshold_px = 0.5
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::fetch::is_contained;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Gallery configuration loaded from `config.toml`.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    /// Which images make up the gallery.
    pub catalog: CatalogConfig,
    /// Thumbnail raster settings.
    pub thumbnails: ThumbnailsConfig,
    /// Viewport-triggered loading.
    pub lazy_load: LazyLoadConfig,
    /// Page-level loading overlay timing.
    pub loading: LoadingConfig,
    /// Lightbox options and responsive padding.
    pub viewer: ViewerConfig,
    /// EXIF panel positioning and monitoring.
    pub overlay: OverlayConfig,
    /// Context-menu / shortcut deterrents.
    pub protection: ProtectionConfig,
    /// Parallel thumbnail generation during `build`.
    pub processing: ProcessingConfig,
}

impl GalleryConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.catalog.images.is_empty() {
            return Err(ConfigError::Validation(
                "catalog.images must not be empty".into(),
            ));
        }
        if !self.catalog.folder.is_empty() && !is_contained(&self.catalog.folder) {
            return Err(ConfigError::Validation(format!(
                "catalog.folder {:?} must be a relative path inside the source directory",
                self.catalog.folder
            )));
        }
        if let Some(name) = self.catalog.images.iter().find(|n| !is_contained(n)) {
            return Err(ConfigError::Validation(format!(
                "catalog.images entry {name:?} must be a relative path inside catalog.folder"
            )));
        }
        if self.catalog.placeholder_width == 0 || self.catalog.placeholder_height == 0 {
            return Err(ConfigError::Validation(
                "catalog placeholder dimensions must be non-zero".into(),
            ));
        }
        if self.thumbnails.max_edge == 0 {
            return Err(ConfigError::Validation(
                "thumbnails.max_edge must be non-zero".into(),
            ));
        }
        if !(1..=100).contains(&self.thumbnails.quality) {
            return Err(ConfigError::Validation(
                "thumbnails.quality must be 1-100".into(),
            ));
        }
        if self.viewer.mobile_breakpoint >= self.viewer.tablet_breakpoint {
            return Err(ConfigError::Validation(
                "viewer.mobile_breakpoint must be below viewer.tablet_breakpoint".into(),
            ));
        }
        if self.overlay.monitor_interval_ms == 0
            || self.overlay.monitor_interval_ms > self.overlay.monitor_window_ms
        {
            return Err(ConfigError::Validation(
                "overlay.monitor_interval_ms must be non-zero and within monitor_window_ms".into(),
            ));
        }
        let threshold = self.overlay.move_threshold_px;
        if threshold.is_nan() || threshold < 0.0 {
            return Err(ConfigError::Validation(
                "overlay.move_threshold_px must be non-negative".into(),
            ));
        }
        if self.overlay.reveal_stages_ms.is_empty() {
            return Err(ConfigError::Validation(
                "overlay.reveal_stages_ms must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// The fixed image list. No discovery: the gallery shows exactly these files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogConfig {
    /// Folder (relative to the source directory) holding the images.
    pub folder: String,
    /// File names inside `folder`, in display order.
    pub images: Vec<String>,
    /// Width assumed before the real image has been decoded.
    pub placeholder_width: u32,
    /// Height assumed before the real image has been decoded.
    pub placeholder_height: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            folder: "images".to_string(),
            images: (1..=29).map(|n| format!("photo-{n}.jpg")).collect(),
            placeholder_width: 1920,
            placeholder_height: 1080,
        }
    }
}

/// Thumbnail raster settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThumbnailsConfig {
    /// Longer edge bound, in pixels. Aspect ratio is always preserved.
    pub max_edge: u32,
    /// JPEG encoding quality (1 = worst, 100 = best).
    pub quality: u32,
}

impl Default for ThumbnailsConfig {
    fn default() -> Self {
        Self {
            max_edge: 400,
            quality: 80,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LazyLoadConfig {
    /// Cells within this many pixels of the viewport are treated as visible.
    pub root_margin: u32,
}

impl Default for LazyLoadConfig {
    fn default() -> Self {
        Self { root_margin: 50 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoadingConfig {
    /// Delay between the grid existing and the overlay starting to fade.
    pub hide_delay_ms: u64,
    /// Fade duration before the overlay is removed from layout.
    pub fade_ms: u64,
}

impl LoadingConfig {
    pub fn hide_delay(&self) -> Duration {
        Duration::from_millis(self.hide_delay_ms)
    }

    pub fn fade(&self) -> Duration {
        Duration::from_millis(self.fade_ms)
    }
}

impl Default for LoadingConfig {
    fn default() -> Self {
        Self {
            hide_delay_ms: 500,
            fade_ms: 500,
        }
    }
}

/// Padding around the lightbox image, before the panel reserve is added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PaddingConfig {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

/// One padding profile per viewport class.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PaddingProfiles {
    pub mobile: PaddingConfig,
    pub tablet: PaddingConfig,
    pub desktop: PaddingConfig,
}

impl Default for PaddingProfiles {
    fn default() -> Self {
        Self {
            mobile: PaddingConfig {
                top: 40,
                bottom: 15,
                left: 15,
                right: 15,
            },
            tablet: PaddingConfig {
                top: 60,
                bottom: 30,
                left: 40,
                right: 40,
            },
            desktop: PaddingConfig {
                top: 80,
                bottom: 40,
                left: 100,
                right: 100,
            },
        }
    }
}

/// Lightbox options and layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    /// Viewports at or below this width use the mobile profile.
    pub mobile_breakpoint: u32,
    /// Viewports at or below this width (and above mobile) use the tablet profile.
    pub tablet_breakpoint: u32,
    /// Extra bottom padding kept free for the EXIF panel.
    pub panel_reserve: u32,
    /// Zoom level reached by a click/tap on a fitted image.
    pub secondary_zoom_level: f64,
    pub max_zoom_level: f64,
    pub wheel_to_zoom: bool,
    pub keyboard: bool,
    /// Delay after open before arrow controls are hidden on mobile.
    pub arrow_hide_delay_ms: u64,
    pub padding: PaddingProfiles,
}

impl ViewerConfig {
    pub fn arrow_hide_delay(&self) -> Duration {
        Duration::from_millis(self.arrow_hide_delay_ms)
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            mobile_breakpoint: 768,
            tablet_breakpoint: 1024,
            panel_reserve: 80,
            secondary_zoom_level: 1.5,
            max_zoom_level: 3.0,
            wheel_to_zoom: true,
            keyboard: true,
            arrow_hide_delay_ms: 400,
            padding: PaddingProfiles::default(),
        }
    }
}

/// EXIF panel timing. All delays are relative to the triggering event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OverlayConfig {
    /// Second measurement after a slide change while the panel is visible.
    pub settle_ms: u64,
    /// Staged measurements before the first reveal.
    pub reveal_stages_ms: Vec<u64>,
    /// Gap between the last staged measurement and the fade-in.
    pub reveal_delay_ms: u64,
    /// Re-measurements after the lightbox reports `contentLoad`.
    pub content_load_ms: Vec<u64>,
    /// Re-measurements after the lightbox reports `imageLoadComplete`.
    pub image_load_ms: Vec<u64>,
    pub monitor_interval_ms: u64,
    /// Hard cap on the monitor's lifetime.
    pub monitor_window_ms: u64,
    /// Edge movement (px) that counts as a layout shift.
    pub move_threshold_px: f64,
}

impl OverlayConfig {
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn reveal_stages(&self) -> impl Iterator<Item = Duration> + '_ {
        self.reveal_stages_ms.iter().map(|ms| Duration::from_millis(*ms))
    }

    /// Offset of the fade-in from the slide change that caused it.
    pub fn reveal_at(&self) -> Duration {
        let last = self.reveal_stages_ms.iter().copied().max().unwrap_or(0);
        Duration::from_millis(last + self.reveal_delay_ms)
    }

    pub fn monitor_interval(&self) -> Duration {
        Duration::from_millis(self.monitor_interval_ms)
    }

    pub fn monitor_window(&self) -> Duration {
        Duration::from_millis(self.monitor_window_ms)
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            settle_ms: 50,
            reveal_stages_ms: vec![50, 150, 250],
            reveal_delay_ms: 100,
            content_load_ms: vec![100, 1500],
            image_load_ms: vec![100, 1200],
            monitor_interval_ms: 200,
            monitor_window_ms: 3000,
            move_threshold_px: 0.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProtectionConfig {
    /// Install the context-menu / drag / shortcut deterrents.
    pub enabled: bool,
}

impl Default for ProtectionConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel thumbnail workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// Base layer for merging user overrides on top.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(GalleryConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key-by-key; any other overlay value replaces the base value.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut table), toml::Value::Table(overrides)) => {
            for (key, value) in overrides {
                let merged = match table.remove(&key) {
                    Some(existing) => merge_toml(existing, value),
                    None => value,
                };
                table.insert(key, merged);
            }
            toml::Value::Table(table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// `Ok(None)` when the file does not exist; `Err` when it exists but is not
/// valid TOML.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<GalleryConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: GalleryConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
pub fn load_config(dir: &Path) -> Result<GalleryConfig, ConfigError> {
    let overlay = load_raw_config(dir)?;
    let config = resolve_config(overlay)?;
    log::debug!(
        "loaded config for {} ({} catalog entries)",
        dir.display(),
        config.catalog.images.len()
    );
    Ok(config)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Lightbox Gallery Configuration
# ==============================
# All settings are optional. Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Catalog: the fixed list of images shown in the grid
# ---------------------------------------------------------------------------
[catalog]
folder = "images"
# Display order. Defaults to photo-1.jpg .. photo-29.jpg.
# images = ["photo-1.jpg", "photo-2.jpg"]
# Dimensions assumed until the real image has been decoded.
placeholder_width = 1920
placeholder_height = 1080

# ---------------------------------------------------------------------------
# Thumbnails
# ---------------------------------------------------------------------------
[thumbnails]
# Longer edge in pixels; aspect ratio is preserved.
max_edge = 400
# JPEG quality (1-100).
quality = 80

# ---------------------------------------------------------------------------
# Lazy loading
# ---------------------------------------------------------------------------
[lazy_load]
# Cells this close (px) to the viewport start loading.
root_margin = 50

# ---------------------------------------------------------------------------
# Loading overlay
# ---------------------------------------------------------------------------
[loading]
hide_delay_ms = 500
fade_ms = 500

# ---------------------------------------------------------------------------
# Lightbox
# ---------------------------------------------------------------------------
[viewer]
mobile_breakpoint = 768
tablet_breakpoint = 1024
# Extra bottom padding reserved for the EXIF panel.
panel_reserve = 80
secondary_zoom_level = 1.5
max_zoom_level = 3.0
wheel_to_zoom = true
keyboard = true
# Arrow controls are hidden this long after opening on mobile.
arrow_hide_delay_ms = 400

# Padding before the panel reserve is added to `bottom`.
[viewer.padding.mobile]
top = 40
bottom = 15
left = 15
right = 15

[viewer.padding.tablet]
top = 60
bottom = 30
left = 40
right = 40

[viewer.padding.desktop]
top = 80
bottom = 40
left = 100
right = 100

# ---------------------------------------------------------------------------
# EXIF panel
# ---------------------------------------------------------------------------
[overlay]
# Second measurement after switching slides with the panel visible.
settle_ms = 50
# Measurements before the panel first fades in.
reveal_stages_ms = [50, 150, 250]
reveal_delay_ms = 100
content_load_ms = [100, 1500]
image_load_ms = [100, 1200]
monitor_interval_ms = 200
monitor_window_ms = 3000
move_threshold_px = 0.5

# ---------------------------------------------------------------------------
# Protection (best-effort deterrents, not access control)
# ---------------------------------------------------------------------------
[protection]
enabled = true

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel thumbnail workers. Omit to use all CPU cores.
# max_processes = 4
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_catalog_lists_twenty_nine_photos() {
        let config = GalleryConfig::default();
        assert_eq!(config.catalog.images.len(), 29);
        assert_eq!(config.catalog.images[0], "photo-1.jpg");
        assert_eq!(config.catalog.images[28], "photo-29.jpg");
        assert_eq!(config.catalog.folder, "images");
    }

    #[test]
    fn default_config_is_valid() {
        GalleryConfig::default().validate().unwrap();
    }

    #[test]
    fn default_overlay_timing() {
        let overlay = OverlayConfig::default();
        assert_eq!(overlay.reveal_at(), Duration::from_millis(350));
        assert_eq!(overlay.monitor_interval(), Duration::from_millis(200));
        assert_eq!(overlay.monitor_window(), Duration::from_secs(3));
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[thumbnails]
max_edge = 320
"#;
        let config: GalleryConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.thumbnails.max_edge, 320);
        // Defaults preserved
        assert_eq!(config.thumbnails.quality, 80);
        assert_eq!(config.viewer.panel_reserve, 80);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let toml = r#"
[thumbnails]
max_egde = 320
"#;
        let result: Result<GalleryConfig, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn merge_overrides_nested_keys_only() {
        let base = stock_defaults_value().unwrap();
        let overlay: toml::Value = toml::from_str(
            r#"
[viewer.padding.mobile]
top = 10
bottom = 5
left = 5
right = 5
"#,
        )
        .unwrap();
        let config: GalleryConfig = merge_toml(base, overlay).try_into().unwrap();
        assert_eq!(config.viewer.padding.mobile.top, 10);
        assert_eq!(config.viewer.padding.desktop.top, 80);
    }

    #[test]
    fn validate_rejects_inverted_breakpoints() {
        let mut config = GalleryConfig::default();
        config.viewer.mobile_breakpoint = 1200;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn validate_rejects_interval_longer_than_window() {
        let mut config = GalleryConfig::default();
        config.overlay.monitor_interval_ms = 5000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_catalog() {
        let mut config = GalleryConfig::default();
        config.catalog.images.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_escaping_catalog_paths() {
        for bad in ["../x.jpg", "/etc/x.jpg", "a/../../x.jpg", ""] {
            let mut config = GalleryConfig::default();
            config.catalog.images = vec![bad.to_string()];
            assert!(config.validate().is_err(), "{bad:?} should be rejected");
        }

        let mut config = GalleryConfig::default();
        config.catalog.folder = "../outside".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_accepts_nested_catalog_names() {
        let mut config = GalleryConfig::default();
        config.catalog.images = vec!["a/x.jpg".into(), "b/x.jpg".into()];
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_quality_out_of_range() {
        let mut config = GalleryConfig::default();
        config.thumbnails.quality = 0;
        assert!(config.validate().is_err());
        config.thumbnails.quality = 101;
        assert!(config.validate().is_err());
    }

    #[test]
    fn effective_threads_never_exceeds_cores() {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let config = ProcessingConfig {
            max_processes: Some(cores + 10),
        };
        assert_eq!(effective_threads(&config), cores);
        let config = ProcessingConfig {
            max_processes: Some(1),
        };
        assert_eq!(effective_threads(&config), 1);
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.thumbnails.max_edge, 400);
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r#"
[catalog]
folder = "photos"
images = ["a.jpg", "b.jpg"]
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.catalog.folder, "photos");
        assert_eq!(config.catalog.images, vec!["a.jpg", "b.jpg"]);
        assert_eq!(config.catalog.placeholder_width, 1920);
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "this is not valid toml [[[").unwrap();
        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_config_validation_error_surfaces() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            "[thumbnails]\nmax_edge = 0\n",
        )
        .unwrap();
        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn stock_config_parses_to_defaults() {
        let config: GalleryConfig = toml::from_str(stock_config_toml()).unwrap();
        let defaults = GalleryConfig::default();
        assert_eq!(config.thumbnails.max_edge, defaults.thumbnails.max_edge);
        assert_eq!(config.viewer.padding.tablet, defaults.viewer.padding.tablet);
        assert_eq!(config.overlay.reveal_stages_ms, defaults.overlay.reveal_stages_ms);
        assert_eq!(config.catalog.images.len(), 29);
    }
}
