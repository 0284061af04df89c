//! Grid rendering, lazy-load observation and the page loading overlay.
//!
//! One [`GridCell`] per catalog entry. Cells start without a display source;
//! the [`LazyObserver`] hands out each index exactly once when it first comes
//! into view, and the thumbnail loader settles it.
//!
//! ## Loading overlay
//!
//! ```text
//! grid rendered ──(hide_delay)──▶ Fading ──(fade)──▶ Hidden (display: none)
//! ```
//!
//! The delay is cosmetic. It does not wait for any image.

use crate::catalog::Catalog;
use crate::config::{LazyLoadConfig, LoadingConfig};
use crate::imaging::Thumbnail;
use crate::overlay::Rect;
use maud::{Markup, html};
use std::collections::BTreeSet;
use std::time::{Duration, Instant};

/// What a settled cell displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplaySource {
    /// Downscaled raster produced by the loader.
    Thumbnail(Thumbnail),
    /// The original file, used when downscaling failed.
    Original(String),
}

/// One anchor + placeholder image in the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridCell {
    pub index: usize,
    /// Full-size source the lightbox opens.
    pub href: String,
    /// What the lazy loader should fetch.
    pub data_src: String,
    pub pswp_width: u32,
    pub pswp_height: u32,
    pub display: Option<DisplaySource>,
    /// Loading finished, successfully or not. Removes the anchor's spinner.
    pub settled: bool,
}

impl GridCell {
    pub fn is_loaded(&self) -> bool {
        matches!(self.display, Some(DisplaySource::Thumbnail(_)))
    }

    fn render(&self) -> Markup {
        html! {
            a.gallery-item.loaded[self.settled] href=(self.href)
                data-pswp-width=(self.pswp_width)
                data-pswp-height=(self.pswp_height)
                data-index=(self.index) {
                img.loaded[self.display.is_some()] data-src=(self.data_src) alt=""
                    style="min-height: 200px";
            }
        }
    }
}

/// The rendered grid.
#[derive(Debug, Clone)]
pub struct Gallery {
    cells: Vec<GridCell>,
}

impl Gallery {
    /// Build one cell per catalog entry, using its placeholder dimensions.
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let cells = catalog
            .entries()
            .iter()
            .enumerate()
            .map(|(index, entry)| GridCell {
                index,
                href: entry.source_path.clone(),
                data_src: entry.source_path.clone(),
                pswp_width: entry.width,
                pswp_height: entry.height,
                display: None,
                settled: false,
            })
            .collect();
        Self { cells }
    }

    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    pub fn cell(&self, index: usize) -> Option<&GridCell> {
        self.cells.get(index)
    }

    pub fn cell_mut(&mut self, index: usize) -> Option<&mut GridCell> {
        self.cells.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Point a cell's lazy source somewhere else, e.g. a pre-built thumbnail.
    pub fn set_data_src(&mut self, index: usize, src: impl Into<String>) {
        if let Some(cell) = self.cells.get_mut(index) {
            cell.data_src = src.into();
        }
    }

    /// Register every cell with `observer`.
    pub fn observe_all(&self, observer: &mut LazyObserver) {
        for cell in &self.cells {
            observer.observe(cell.index);
        }
    }

    /// The `#gallery` grid markup. Images carry no `src` until loaded.
    pub fn render(&self) -> Markup {
        html! {
            div #gallery.gallery {
                @for cell in &self.cells {
                    (cell.render())
                }
            }
        }
    }
}

/// Visibility-triggered, observe-once loading.
#[derive(Debug, Clone)]
pub struct LazyObserver {
    root_margin: f64,
    observed: BTreeSet<usize>,
}

impl LazyObserver {
    pub fn new(config: &LazyLoadConfig) -> Self {
        Self {
            root_margin: f64::from(config.root_margin),
            observed: BTreeSet::new(),
        }
    }

    pub fn observe(&mut self, index: usize) {
        self.observed.insert(index);
    }

    pub fn is_observed(&self, index: usize) -> bool {
        self.observed.contains(&index)
    }

    pub fn pending(&self) -> usize {
        self.observed.len()
    }

    /// Feed raw intersection entries `(index, is_intersecting)`.
    ///
    /// Returns indices to load. Each is unobserved, so it is never returned
    /// again.
    pub fn intersect(&mut self, entries: &[(usize, bool)]) -> Vec<usize> {
        entries
            .iter()
            .filter(|(_, intersecting)| *intersecting)
            .filter_map(|(index, _)| self.observed.remove(index).then_some(*index))
            .collect()
    }

    /// Compute intersections against `viewport` grown by the root margin.
    pub fn scan(&mut self, viewport: &Rect, cells: &[(usize, Rect)]) -> Vec<usize> {
        let entries: Vec<(usize, bool)> = cells
            .iter()
            .map(|(index, rect)| {
                (
                    *index,
                    rect.intersects_with_margin(viewport, self.root_margin),
                )
            })
            .collect();
        self.intersect(&entries)
    }
}

/// Loading overlay phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayPhase {
    Visible,
    /// `hidden` class applied; CSS fades it out.
    Fading,
    /// `display: none`.
    Hidden,
}

/// The full-page spinner shown until the grid exists.
#[derive(Debug, Clone)]
pub struct LoadingOverlay {
    hide_delay: Duration,
    fade: Duration,
    rendered_at: Option<Instant>,
}

impl LoadingOverlay {
    pub fn new(config: &LoadingConfig) -> Self {
        Self {
            hide_delay: config.hide_delay(),
            fade: config.fade(),
            rendered_at: None,
        }
    }

    /// Record when the grid was rendered. Later calls are ignored.
    pub fn grid_rendered(&mut self, now: Instant) {
        self.rendered_at.get_or_insert(now);
    }

    pub fn phase(&self, now: Instant) -> OverlayPhase {
        let Some(start) = self.rendered_at else {
            return OverlayPhase::Visible;
        };
        let elapsed = now.saturating_duration_since(start);
        if elapsed < self.hide_delay {
            OverlayPhase::Visible
        } else if elapsed < self.hide_delay + self.fade {
            OverlayPhase::Fading
        } else {
            OverlayPhase::Hidden
        }
    }

    /// Next instant at which the phase changes.
    pub fn next_deadline(&self, now: Instant) -> Option<Instant> {
        let start = self.rendered_at?;
        [start + self.hide_delay, start + self.hide_delay + self.fade]
            .into_iter()
            .find(|at| *at > now)
    }

    pub fn render(&self, now: Instant) -> Markup {
        let phase = self.phase(now);
        html! {
            div #loading-overlay.loading-overlay.hidden[phase != OverlayPhase::Visible]
                style=[(phase == OverlayPhase::Hidden).then_some("display: none")] {
                div.spinner {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CatalogConfig;

    fn catalog(n: usize) -> Catalog {
        Catalog::from_config(&CatalogConfig {
            folder: "images".into(),
            images: (1..=n).map(|i| format!("photo-{i}.jpg")).collect(),
            placeholder_width: 1920,
            placeholder_height: 1080,
        })
    }

    // =========================================================================
    // Grid
    // =========================================================================

    #[test]
    fn one_cell_per_entry_with_placeholders() {
        let gallery = Gallery::from_catalog(&catalog(3));
        assert_eq!(gallery.len(), 3);
        let cell = gallery.cell(2).unwrap();
        assert_eq!(cell.index, 2);
        assert_eq!(cell.href, "images/photo-3.jpg");
        assert_eq!(cell.data_src, "images/photo-3.jpg");
        assert_eq!((cell.pswp_width, cell.pswp_height), (1920, 1080));
        assert!(cell.display.is_none());
        assert!(!cell.settled);
    }

    #[test]
    fn render_emits_anchor_attributes_without_src() {
        let html = Gallery::from_catalog(&catalog(2)).render().into_string();
        assert!(html.contains(r#"id="gallery""#));
        assert!(html.contains(r#"class="gallery-item""#));
        assert!(html.contains(r#"href="images/photo-1.jpg""#));
        assert!(html.contains(r#"data-pswp-width="1920""#));
        assert!(html.contains(r#"data-pswp-height="1080""#));
        assert!(html.contains(r#"data-index="1""#));
        assert!(html.contains(r#"data-src="images/photo-2.jpg""#));
        assert!(html.contains("min-height: 200px"));
        assert!(!html.contains(" src="));
    }

    #[test]
    fn settled_cells_render_loaded_class() {
        let mut gallery = Gallery::from_catalog(&catalog(2));
        gallery.cell_mut(0).unwrap().settled = true;
        gallery.cell_mut(0).unwrap().display = Some(DisplaySource::Original("x".into()));
        // Settled without anything to show: spinner off, image still hidden.
        gallery.cell_mut(1).unwrap().settled = true;
        let html = gallery.render().into_string();
        assert_eq!(html.matches(r#"class="gallery-item loaded""#).count(), 2);
        assert_eq!(html.matches(r#"class="loaded""#).count(), 1);
    }

    #[test]
    fn set_data_src_redirects_lazy_source_only() {
        let mut gallery = Gallery::from_catalog(&catalog(1));
        gallery.set_data_src(0, "thumbs/photo-1.jpg");
        let cell = gallery.cell(0).unwrap();
        assert_eq!(cell.data_src, "thumbs/photo-1.jpg");
        assert_eq!(cell.href, "images/photo-1.jpg");
    }

    // =========================================================================
    // Lazy observer
    // =========================================================================

    #[test]
    fn observe_all_registers_every_cell() {
        let gallery = Gallery::from_catalog(&catalog(4));
        let mut observer = LazyObserver::new(&LazyLoadConfig::default());
        gallery.observe_all(&mut observer);
        assert_eq!(observer.pending(), 4);
        assert!(observer.is_observed(3));
    }

    #[test]
    fn each_cell_is_handed_out_once() {
        let mut observer = LazyObserver::new(&LazyLoadConfig::default());
        observer.observe(0);
        observer.observe(1);

        assert_eq!(observer.intersect(&[(0, true), (1, false)]), vec![0]);
        assert_eq!(observer.intersect(&[(0, true), (0, true)]), Vec::<usize>::new());
        assert_eq!(observer.intersect(&[(1, true), (1, true)]), vec![1]);
        assert_eq!(observer.pending(), 0);
    }

    #[test]
    fn unobserved_indices_are_ignored() {
        let mut observer = LazyObserver::new(&LazyLoadConfig::default());
        assert!(observer.intersect(&[(7, true)]).is_empty());
    }

    #[test]
    fn scan_applies_root_margin() {
        let mut observer = LazyObserver::new(&LazyLoadConfig { root_margin: 50 });
        for i in 0..3 {
            observer.observe(i);
        }
        let viewport = Rect::new(0.0, 0.0, 1000.0, 800.0);
        let cells = [
            (0, Rect::new(0.0, 100.0, 300.0, 200.0)),
            // 30px below the fold, inside the 50px lead
            (1, Rect::new(0.0, 830.0, 300.0, 200.0)),
            (2, Rect::new(0.0, 900.0, 300.0, 200.0)),
        ];
        assert_eq!(observer.scan(&viewport, &cells), vec![0, 1]);

        let scrolled = Rect::new(0.0, 400.0, 1000.0, 800.0);
        assert_eq!(observer.scan(&scrolled, &cells), vec![2]);
        assert!(observer.scan(&scrolled, &cells).is_empty());
    }

    // =========================================================================
    // Loading overlay
    // =========================================================================

    #[test]
    fn overlay_visible_until_grid_rendered() {
        let overlay = LoadingOverlay::new(&LoadingConfig::default());
        let now = Instant::now();
        assert_eq!(overlay.phase(now + Duration::from_secs(60)), OverlayPhase::Visible);
        assert_eq!(overlay.next_deadline(now), None);
    }

    #[test]
    fn overlay_fades_then_hides() {
        let mut overlay = LoadingOverlay::new(&LoadingConfig::default());
        let t0 = Instant::now();
        overlay.grid_rendered(t0);

        assert_eq!(overlay.phase(t0 + Duration::from_millis(499)), OverlayPhase::Visible);
        assert_eq!(overlay.phase(t0 + Duration::from_millis(500)), OverlayPhase::Fading);
        assert_eq!(overlay.phase(t0 + Duration::from_millis(999)), OverlayPhase::Fading);
        assert_eq!(overlay.phase(t0 + Duration::from_millis(1000)), OverlayPhase::Hidden);

        assert_eq!(overlay.next_deadline(t0), Some(t0 + Duration::from_millis(500)));
        assert_eq!(
            overlay.next_deadline(t0 + Duration::from_millis(500)),
            Some(t0 + Duration::from_millis(1000))
        );
        assert_eq!(overlay.next_deadline(t0 + Duration::from_millis(1000)), None);
    }

    #[test]
    fn overlay_render_reflects_phase() {
        let mut overlay = LoadingOverlay::new(&LoadingConfig::default());
        let t0 = Instant::now();
        overlay.grid_rendered(t0);

        let visible = overlay.render(t0).into_string();
        assert!(visible.contains(r#"class="loading-overlay""#));

        let fading = overlay.render(t0 + Duration::from_millis(600)).into_string();
        assert!(fading.contains("loading-overlay hidden"));
        assert!(!fading.contains("display: none"));

        let gone = overlay.render(t0 + Duration::from_secs(2)).into_string();
        assert!(gone.contains("display: none"));
    }
}
