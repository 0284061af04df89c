//! # Lightbox Gallery
//!
//! A single-page photo gallery: a grid of lazily loaded thumbnails, a bridge
//! to a third-party lightbox for full-size viewing, and an EXIF panel kept
//! flush beneath the displayed image.
//!
//! # Architecture: Host-Driven Engine
//!
//! The page is modelled as a single-threaded engine. A host (browser shell,
//! native viewer or test) feeds it events and clock instants; the engine
//! answers with state: thumbnails, cell dimensions, lightbox options, panel
//! placement and visibility.
//!
//! ```text
//! scroll / intersections ──▶ LazyObserver ──▶ ThumbnailLoader ──▶ Catalog + Gallery
//! lightbox events ─────────▶ ViewerBridge ──▶ MetadataResolver ──▶ OverlaySession
//! now: Instant ────────────▶ advance()    ──▶ staged reveal, monitor, arrow hiding
//! ```
//!
//! Nothing reads the wall clock. Timers are deadlines in a session-owned
//! [`overlay::Timeline`], which makes every timing rule testable with plain
//! `Instant` arithmetic.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`catalog`] | Fixed, ordered list of image references with placeholder dimensions |
//! | [`gallery`] | Grid cells and markup, lazy observer, page loading overlay |
//! | [`loader`] | Fetch + downscale for cells entering the viewport |
//! | [`viewer`] | Lightbox options, responsive padding, slide/lifecycle events |
//! | [`overlay`] | EXIF panel geometry, timeline and per-lightbox session |
//! | [`metadata`] | Fetch → decode → tags pipeline for the current slide |
//! | [`exif`] | Tag model and panel formatting (focal length, aperture, shutter) |
//! | [`fetch`] | Byte sources: directory, in-memory, primary/fallback pair |
//! | [`deterrents`] | Context-menu, drag, selection and shortcut cancellation |
//! | [`page`] | The running page: ties every piece above together |
//! | [`imaging`] | Pure-Rust decode, thumbnail and EXIF extraction backends |
//! | [`config`] | `config.toml` loading, merging and validation |
//! | [`generate`] | Static `index.html` rendering with Maud |
//! | [`site`] | `build` command: thumbnails, originals, page, options document |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Generation Tokens for Metadata
//!
//! Each slide change issues a [`overlay::RequestToken`]. A record resolved
//! for a slide the user has already left is discarded, and tokens from a
//! closed lightbox never apply to the next one.
//!
//! ## Seams Instead of Widgets
//!
//! The lightbox and the EXIF binary parser are external. The engine only sees
//! them through [`viewer::ViewerEvent`], [`overlay::Stage`] and
//! [`imaging::TagDecoder`], so hosts can swap either without touching panel
//! logic.
//!
//! ## Degrade, Never Fail
//!
//! Fetch, decode and tag failures never reach the user. A broken thumbnail
//! shows the original; a missing tag is omitted; no tags at all hides the
//! panel. Failures are logged through the `log` facade.

pub mod catalog;
pub mod config;
pub mod deterrents;
pub mod exif;
pub mod fetch;
pub mod gallery;
pub mod generate;
pub mod imaging;
pub mod loader;
pub mod metadata;
pub mod output;
pub mod overlay;
pub mod page;
pub mod site;
pub mod viewer;

#[cfg(test)]
pub(crate) mod test_helpers;
