//! Thumbnail loading for grid cells entering the viewport.
//!
//! For each cell handed out by the lazy observer:
//!
//! 1. Fetch the bytes behind `data-src`.
//! 2. Downscale to a JPEG thumbnail; on failure display the original.
//! 3. Decode the original's true pixel size and write it back to both the
//!    catalog entry and the cell's lightbox dimensions.
//! 4. Settle the cell, whatever happened.

use crate::catalog::Catalog;
use crate::fetch::ImageFetcher;
use crate::gallery::{DisplaySource, Gallery, GridCell};
use crate::imaging::{
    ImageBackend, ThumbnailOutcome, ThumbnailParams, get_dimensions, thumbnail_or_original,
};

/// How a single cell load ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A thumbnail raster is displayed.
    Thumbnail,
    /// Downscaling failed; the original source is displayed.
    Original,
    /// Bytes could not be fetched. The original is still assigned.
    Failed,
}

pub struct ThumbnailLoader<'a> {
    backend: &'a dyn ImageBackend,
    fetcher: &'a dyn ImageFetcher,
    params: ThumbnailParams,
    loaded_count: usize,
}

impl<'a> ThumbnailLoader<'a> {
    pub fn new(
        backend: &'a dyn ImageBackend,
        fetcher: &'a dyn ImageFetcher,
        params: ThumbnailParams,
    ) -> Self {
        Self {
            backend,
            fetcher,
            params,
            loaded_count: 0,
        }
    }

    /// Cells that finished with a displayable image.
    pub fn loaded_count(&self) -> usize {
        self.loaded_count
    }

    /// Load one cell, updating its catalog entry.
    pub fn load(&mut self, cell: &mut GridCell, catalog: &mut Catalog) -> LoadOutcome {
        cell.settled = true;

        let bytes = match self.fetcher.fetch(&cell.data_src) {
            Ok(bytes) => bytes,
            Err(e) => {
                log::warn!("could not load {}: {e}", cell.data_src);
                cell.display = Some(DisplaySource::Original(cell.href.clone()));
                return LoadOutcome::Failed;
            }
        };

        let outcome = match thumbnail_or_original(self.backend, &bytes, &self.params) {
            ThumbnailOutcome::Raster(thumb) => {
                cell.display = Some(DisplaySource::Thumbnail(thumb));
                LoadOutcome::Thumbnail
            }
            ThumbnailOutcome::Original => {
                cell.display = Some(DisplaySource::Original(cell.href.clone()));
                LoadOutcome::Original
            }
        };

        let decoded = match get_dimensions(self.backend, &bytes) {
            Ok((width, height)) => {
                cell.pswp_width = width;
                cell.pswp_height = height;
                catalog.set_dimensions(cell.index, width, height);
                true
            }
            Err(e) => {
                log::debug!("could not read dimensions of {}: {e}", cell.href);
                false
            }
        };

        if outcome == LoadOutcome::Thumbnail || decoded {
            catalog.mark_loaded(cell.index);
            self.loaded_count += 1;
        }
        outcome
    }

    /// Load every listed cell of `gallery`. Unknown indices are skipped.
    pub fn load_all(
        &mut self,
        indices: &[usize],
        gallery: &mut Gallery,
        catalog: &mut Catalog,
    ) -> Vec<(usize, LoadOutcome)> {
        indices
            .iter()
            .filter_map(|&index| {
                let cell = gallery.cell_mut(index)?;
                Some((index, self.load(cell, catalog)))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CatalogConfig, LazyLoadConfig};
    use crate::fetch::MemoryFetcher;
    use crate::gallery::LazyObserver;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};
    use crate::imaging::{Dimensions, RustBackend};
    use crate::test_helpers::jpeg_bytes;

    fn catalog(names: &[&str]) -> Catalog {
        Catalog::from_config(&CatalogConfig {
            folder: "images".into(),
            images: names.iter().map(|n| n.to_string()).collect(),
            placeholder_width: 1920,
            placeholder_height: 1080,
        })
    }

    #[test]
    fn load_produces_bounded_thumbnail_and_true_dimensions() {
        let fetcher = MemoryFetcher::new().with("images/a.jpg", jpeg_bytes(800, 600));
        let backend = RustBackend::new();
        let mut catalog = catalog(&["a.jpg"]);
        let mut gallery = Gallery::from_catalog(&catalog);
        let mut loader = ThumbnailLoader::new(&backend, &fetcher, ThumbnailParams::default());

        let cell = gallery.cell_mut(0).unwrap();
        assert_eq!(loader.load(cell, &mut catalog), LoadOutcome::Thumbnail);

        let cell = gallery.cell(0).unwrap();
        assert!(cell.settled);
        assert!(cell.is_loaded());
        match &cell.display {
            Some(DisplaySource::Thumbnail(t)) => assert_eq!((t.width, t.height), (400, 300)),
            other => panic!("expected thumbnail, got {other:?}"),
        }
        assert_eq!((cell.pswp_width, cell.pswp_height), (800, 600));

        let entry = catalog.get(0).unwrap();
        assert!(entry.loaded);
        assert_eq!((entry.width, entry.height), (800, 600));
        assert_eq!(loader.loaded_count(), 1);
    }

    #[test]
    fn undecodable_bytes_fall_back_to_original() {
        let fetcher = MemoryFetcher::new().with("images/bad.jpg", b"not an image".to_vec());
        let backend = RustBackend::new();
        let mut catalog = catalog(&["bad.jpg"]);
        let mut gallery = Gallery::from_catalog(&catalog);
        let mut loader = ThumbnailLoader::new(&backend, &fetcher, ThumbnailParams::default());

        let outcome = loader.load(gallery.cell_mut(0).unwrap(), &mut catalog);
        assert_eq!(outcome, LoadOutcome::Original);

        let cell = gallery.cell(0).unwrap();
        assert!(cell.settled);
        assert_eq!(
            cell.display,
            Some(DisplaySource::Original("images/bad.jpg".into()))
        );
        // Placeholder dimensions survive.
        assert_eq!((cell.pswp_width, cell.pswp_height), (1920, 1080));
        assert!(!catalog.get(0).unwrap().loaded);
        assert_eq!(loader.loaded_count(), 0);
    }

    #[test]
    fn fetch_failure_still_settles_cell() {
        let fetcher = MemoryFetcher::new();
        let backend = RustBackend::new();
        let mut catalog = catalog(&["gone.jpg"]);
        let mut gallery = Gallery::from_catalog(&catalog);
        let mut loader = ThumbnailLoader::new(&backend, &fetcher, ThumbnailParams::default());

        let outcome = loader.load(gallery.cell_mut(0).unwrap(), &mut catalog);
        assert_eq!(outcome, LoadOutcome::Failed);
        assert!(gallery.cell(0).unwrap().settled);
        assert_eq!(loader.loaded_count(), 0);
    }

    #[test]
    fn thumbnail_failure_with_decodable_original_counts_as_loaded() {
        let fetcher = MemoryFetcher::new().with("images/a.jpg", vec![0u8; 16]);
        let backend = MockBackend::failing_thumbnails(vec![Dimensions {
            width: 3000,
            height: 2000,
        }]);
        let mut catalog = catalog(&["a.jpg"]);
        let mut gallery = Gallery::from_catalog(&catalog);
        let mut loader = ThumbnailLoader::new(&backend, &fetcher, ThumbnailParams::default());

        let outcome = loader.load(gallery.cell_mut(0).unwrap(), &mut catalog);
        assert_eq!(outcome, LoadOutcome::Original);
        assert_eq!(catalog.get(0).unwrap().width, 3000);
        assert!(catalog.get(0).unwrap().loaded);
        assert_eq!(loader.loaded_count(), 1);
    }

    #[test]
    fn repeated_intersections_load_each_cell_once() {
        let fetcher = MemoryFetcher::new()
            .with("images/a.jpg", vec![1u8; 8])
            .with("images/b.jpg", vec![2u8; 8]);
        let backend = MockBackend::with_dimensions(vec![
            Dimensions {
                width: 100,
                height: 100,
            },
            Dimensions {
                width: 200,
                height: 100,
            },
        ]);
        let mut catalog = catalog(&["a.jpg", "b.jpg"]);
        let mut gallery = Gallery::from_catalog(&catalog);
        let mut observer = LazyObserver::new(&LazyLoadConfig::default());
        gallery.observe_all(&mut observer);
        let mut loader = ThumbnailLoader::new(&backend, &fetcher, ThumbnailParams::default());

        for _ in 0..5 {
            let due = observer.intersect(&[(0, true), (1, true), (0, true)]);
            loader.load_all(&due, &mut gallery, &mut catalog);
        }

        let thumbnails = backend
            .get_operations()
            .iter()
            .filter(|op| matches!(op, RecordedOp::Thumbnail { .. }))
            .count();
        assert_eq!(thumbnails, 2);
        assert_eq!(loader.loaded_count(), 2);
    }

    #[test]
    fn load_all_skips_unknown_indices() {
        let fetcher = MemoryFetcher::new();
        let backend = RustBackend::new();
        let mut catalog = catalog(&["a.jpg"]);
        let mut gallery = Gallery::from_catalog(&catalog);
        let mut loader = ThumbnailLoader::new(&backend, &fetcher, ThumbnailParams::default());

        let results = loader.load_all(&[0, 9], &mut gallery, &mut catalog);
        assert_eq!(results, vec![(0, LoadOutcome::Failed)]);
    }
}
