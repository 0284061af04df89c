//! EXIF metadata overlay: a panel kept flush beneath the lightbox image.
//!
//! The lightbox is opaque; the overlay only sees it through [`Stage`], which
//! measures the displayed image and reports whether a slide exists. All
//! timing is host-driven (see [`OverlaySession::advance`]).
//!
//! - **Geometry**: [`Rect`], [`Placement`], movement threshold
//! - **Timeline**: deadline queue with host-supplied instants
//! - **Panel**: visibility, placement, rows and markup
//! - **Session**: per-lightbox state machine (staged reveal, monitor, events)

mod geometry;
mod panel;
mod session;
mod timeline;

pub use geometry::{PanelPosition, Placement, Rect};
pub use panel::Panel;
pub use session::{MetadataRequest, OverlaySession, RequestToken};
pub use timeline::Timeline;

/// The layout surface the panel is measured against.
pub trait Stage {
    /// On-screen rectangle of the current slide's image, if one is rendered.
    fn image_rect(&self) -> Option<Rect>;

    /// Whether the lightbox still has a current slide.
    fn has_slide(&self) -> bool;
}
