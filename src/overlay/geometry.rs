//! Rectangles and panel placement.

use crate::exif::round_half_up;
use serde::Serialize;

/// An on-screen rectangle in CSS pixels (viewport coordinates).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Whether any of top, bottom, left or width differs by more than `threshold`.
    pub fn moved_from(&self, previous: &Rect, threshold: f64) -> bool {
        (self.top - previous.top).abs() > threshold
            || (self.bottom() - previous.bottom()).abs() > threshold
            || (self.left - previous.left).abs() > threshold
            || (self.width - previous.width).abs() > threshold
    }

    /// Overlap with `other` once `other` is grown by `margin` above and below.
    pub fn intersects_with_margin(&self, other: &Rect, margin: f64) -> bool {
        let top = other.top - margin;
        let bottom = other.bottom() + margin;
        self.bottom() >= top
            && self.top <= bottom
            && self.right() >= other.left
            && self.left <= other.right()
    }
}

/// Whole-pixel panel placement flush beneath an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Placement {
    pub top: i64,
    pub left: i64,
    pub width: i64,
}

impl Placement {
    /// Place beneath `image`: top at its bottom edge, same left and width.
    pub fn beneath(image: &Rect) -> Self {
        Self {
            top: round_half_up(image.bottom()) as i64,
            left: round_half_up(image.left) as i64,
            width: round_half_up(image.width) as i64,
        }
    }
}

/// Where the panel currently sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelPosition {
    /// Parked off-screen until the first measurement.
    #[default]
    Offscreen,
    At(Placement),
}

impl PanelPosition {
    pub const OFFSCREEN_PX: i64 = -1000;

    pub fn placement(&self) -> Option<Placement> {
        match self {
            PanelPosition::Offscreen => None,
            PanelPosition::At(p) => Some(*p),
        }
    }

    /// Inline CSS for the panel element.
    pub fn style(&self) -> String {
        match self {
            PanelPosition::Offscreen => format!(
                "position: fixed; top: {0}px; left: {0}px;",
                Self::OFFSCREEN_PX
            ),
            PanelPosition::At(p) => format!(
                "position: fixed; left: {}px; width: {}px; top: {}px; max-width: none; transform: none;",
                p.left, p.width, p.top
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placement_rounds_to_whole_pixels() {
        let rect = Rect::new(100.4, 50.0, 799.5, 533.5);
        let placement = Placement::beneath(&rect);
        assert_eq!(placement.left, 100);
        assert_eq!(placement.width, 800);
        // 50 + 533.5 = 583.5 → 584
        assert_eq!(placement.top, 584);
    }

    #[test]
    fn placement_width_matches_rounded_image_width() {
        for width in [320.0, 320.49, 320.5, 1023.7] {
            let rect = Rect::new(0.0, 0.0, width, 100.0);
            assert_eq!(
                Placement::beneath(&rect).width,
                round_half_up(width) as i64
            );
        }
    }

    #[test]
    fn moved_from_uses_threshold() {
        let a = Rect::new(10.0, 10.0, 100.0, 100.0);
        assert!(!a.moved_from(&Rect::new(10.4, 10.0, 100.0, 100.0), 0.5));
        assert!(a.moved_from(&Rect::new(10.6, 10.0, 100.0, 100.0), 0.5));
        // Height change shows up as a bottom move.
        assert!(a.moved_from(&Rect::new(10.0, 10.0, 100.0, 101.0), 0.5));
        assert!(a.moved_from(&Rect::new(10.0, 10.0, 99.0, 100.0), 0.5));
    }

    #[test]
    fn intersects_with_lead_margin() {
        let viewport = Rect::new(0.0, 0.0, 1000.0, 800.0);
        let below = Rect::new(0.0, 830.0, 300.0, 200.0);
        assert!(!below.intersects_with_margin(&viewport, 0.0));
        assert!(below.intersects_with_margin(&viewport, 50.0));
        let far = Rect::new(0.0, 900.0, 300.0, 200.0);
        assert!(!far.intersects_with_margin(&viewport, 50.0));
    }

    #[test]
    fn offscreen_style() {
        assert_eq!(
            PanelPosition::Offscreen.style(),
            "position: fixed; top: -1000px; left: -1000px;"
        );
        let at = PanelPosition::At(Placement {
            top: 600,
            left: 100,
            width: 800,
        });
        assert!(at.style().contains("width: 800px"));
        assert!(at.style().contains("top: 600px"));
    }
}
