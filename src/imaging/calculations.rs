//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Fit `source` inside a `max_edge` × `max_edge` box, preserving aspect ratio.
///
/// The scale factor is `min(max_edge / w, max_edge / h)`, capped at 1 so small
/// images are never enlarged. Each output edge is at least 1 pixel.
///
/// # Examples
/// ```
/// # use lightbox_gallery::imaging::fit_within;
/// // 3:2 landscape → longer edge pinned to 400
/// assert_eq!(fit_within((6000, 4000), 400), (400, 267));
///
/// // Already small enough → unchanged
/// assert_eq!(fit_within((300, 200), 400), (300, 200));
/// ```
pub fn fit_within(source: (u32, u32), max_edge: u32) -> (u32, u32) {
    let (w, h) = source;
    if w == 0 || h == 0 {
        return (w, h);
    }

    let ratio = (max_edge as f64 / w as f64)
        .min(max_edge as f64 / h as f64)
        .min(1.0);

    let out_w = ((w as f64 * ratio).round() as u32).clamp(1, max_edge.max(1));
    let out_h = ((h as f64 * ratio).round() as u32).clamp(1, max_edge.max(1));
    (out_w, out_h)
}
