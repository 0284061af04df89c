//! The running gallery page.
//!
//! [`GalleryPage`] owns the catalog, the grid, the lazy observer, the loading
//! overlay and the viewer bridge, and borrows the I/O seams it needs:
//!
//! | Seam | Used for |
//! |------|----------|
//! | [`ImageBackend`] | thumbnails and pixel dimensions |
//! | [`ImageFetcher`] (primary) | grid loads and metadata fetches |
//! | [`ImageFetcher`] (fallback) | metadata fetches the primary could not serve |
//! | [`TagDecoder`] | EXIF tags; optional |
//!
//! Hosts feed it events and instants. Metadata is resolved inline, as soon as
//! a slide change asks for it.

use crate::catalog::Catalog;
use crate::config::GalleryConfig;
use crate::deterrents::{PageEvent, Verdict, classify};
use crate::fetch::ImageFetcher;
use crate::gallery::{Gallery, LazyObserver, LoadingOverlay, OverlayPhase};
use crate::imaging::{ImageBackend, TagDecoder, ThumbnailParams};
use crate::loader::{LoadOutcome, ThumbnailLoader};
use crate::metadata::MetadataResolver;
use crate::overlay::{MetadataRequest, Rect, Stage};
use crate::viewer::{Slide, ViewerBridge, ViewerEvent};
use std::time::Instant;

/// External collaborators of a page.
#[derive(Clone, Copy)]
pub struct Services<'a> {
    pub backend: &'a dyn ImageBackend,
    pub fetcher: &'a dyn ImageFetcher,
    pub fallback: Option<&'a dyn ImageFetcher>,
    pub tags: Option<&'a dyn TagDecoder>,
}

impl<'a> Services<'a> {
    pub fn new(backend: &'a dyn ImageBackend, fetcher: &'a dyn ImageFetcher) -> Self {
        Self {
            backend,
            fetcher,
            fallback: None,
            tags: None,
        }
    }

    pub fn with_fallback(mut self, fallback: &'a dyn ImageFetcher) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn with_tag_decoder(mut self, tags: &'a dyn TagDecoder) -> Self {
        self.tags = Some(tags);
        self
    }

    fn resolver(&self) -> MetadataResolver<'a> {
        let mut resolver = MetadataResolver::new(self.fetcher, self.backend);
        if let Some(fallback) = self.fallback {
            resolver = resolver.with_fallback(fallback);
        }
        if let Some(tags) = self.tags {
            resolver = resolver.with_tag_decoder(tags);
        }
        resolver
    }
}

pub struct GalleryPage<'a> {
    services: Services<'a>,
    catalog: Catalog,
    gallery: Gallery,
    observer: LazyObserver,
    loading: LoadingOverlay,
    loader: ThumbnailLoader<'a>,
    viewer: ViewerBridge,
    protection: bool,
}

impl<'a> GalleryPage<'a> {
    /// Build the catalog and grid, and register every cell for lazy loading.
    pub fn new(config: &GalleryConfig, services: Services<'a>) -> Self {
        let catalog = Catalog::from_config(&config.catalog);
        let gallery = Gallery::from_catalog(&catalog);
        let mut observer = LazyObserver::new(&config.lazy_load);
        gallery.observe_all(&mut observer);

        Self {
            services,
            catalog,
            gallery,
            observer,
            loading: LoadingOverlay::new(&config.loading),
            loader: ThumbnailLoader::new(
                services.backend,
                services.fetcher,
                ThumbnailParams::from_config(&config.thumbnails),
            ),
            viewer: ViewerBridge::new(config.viewer.clone(), config.overlay.clone()),
            protection: config.protection.enabled,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn gallery(&self) -> &Gallery {
        &self.gallery
    }

    pub fn viewer(&self) -> &ViewerBridge {
        &self.viewer
    }

    pub fn loaded_count(&self) -> usize {
        self.loader.loaded_count()
    }

    /// The grid is in the document; starts the loading overlay countdown.
    pub fn mount(&mut self, now: Instant) {
        self.loading.grid_rendered(now);
    }

    pub fn loading_phase(&self, now: Instant) -> OverlayPhase {
        self.loading.phase(now)
    }

    /// Raw intersection entries `(index, is_intersecting)`.
    pub fn on_intersections(&mut self, entries: &[(usize, bool)]) -> Vec<(usize, LoadOutcome)> {
        let due = self.observer.intersect(entries);
        self.loader.load_all(&due, &mut self.gallery, &mut self.catalog)
    }

    /// Scroll position changed: load cells now within the viewport's lead.
    pub fn on_scroll(
        &mut self,
        viewport: &Rect,
        cells: &[(usize, Rect)],
    ) -> Vec<(usize, LoadOutcome)> {
        let due = self.observer.scan(viewport, cells);
        self.loader.load_all(&due, &mut self.gallery, &mut self.catalog)
    }

    /// Slides for the lightbox, taken from the grid anchors.
    pub fn slides(&self) -> Vec<Slide> {
        self.gallery
            .cells()
            .iter()
            .map(|cell| Slide {
                src: cell.data_src.clone(),
                element_href: Some(cell.href.clone()),
                width: cell.pswp_width,
                height: cell.pswp_height,
            })
            .collect()
    }

    /// A grid anchor was clicked.
    pub fn open(&mut self, index: usize, viewport_width: u32, now: Instant, stage: &dyn Stage) {
        if index >= self.gallery.len() {
            log::warn!("no gallery item at index {index}");
            return;
        }
        let slides = self.slides();
        let request = self.viewer.open(slides, index, viewport_width, now, stage);
        self.fulfil(request, now, stage);
    }

    /// Forward a lightbox event.
    pub fn handle(&mut self, event: ViewerEvent, now: Instant, stage: &dyn Stage) {
        let request = self.viewer.handle(event, now, stage);
        self.fulfil(request, now, stage);
    }

    fn fulfil(&mut self, request: Option<MetadataRequest>, now: Instant, stage: &dyn Stage) {
        let Some(request) = request else {
            return;
        };
        let record = self.services.resolver().resolve(&request.source);
        self.viewer.apply_metadata(request.token, &record, now, stage);
    }

    /// Run every timer due at or before `now`.
    pub fn advance(&mut self, now: Instant, stage: &dyn Stage) {
        self.viewer.advance(now, stage);
    }

    /// Earliest instant at which [`advance`](Self::advance) has work.
    pub fn next_deadline(&self, now: Instant) -> Option<Instant> {
        match (self.loading.next_deadline(now), self.viewer.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Whether the page cancels `event`.
    pub fn on_page_event(&self, event: &PageEvent) -> Verdict {
        if self.protection {
            classify(event)
        } else {
            Verdict::Allow
        }
    }
}
