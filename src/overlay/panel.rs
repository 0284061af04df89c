//! The metadata panel: visibility, placement, and its rows.

use super::geometry::{PanelPosition, Placement, Rect};
use crate::exif::ExifItem;
use maud::{Markup, html};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Panel {
    visible: bool,
    position: PanelPosition,
    items: Vec<ExifItem>,
}

impl Panel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn position(&self) -> PanelPosition {
        self.position
    }

    pub fn placement(&self) -> Option<Placement> {
        self.position.placement()
    }

    pub fn items(&self) -> &[ExifItem] {
        &self.items
    }

    pub(crate) fn set_items(&mut self, items: Vec<ExifItem>) {
        self.items = items;
    }

    pub(crate) fn show(&mut self) {
        self.visible = true;
    }

    pub(crate) fn hide(&mut self) {
        self.visible = false;
    }

    /// Move flush beneath `image`, matching its width.
    pub(crate) fn place_beneath(&mut self, image: &Rect) -> Placement {
        let placement = Placement::beneath(image);
        self.position = PanelPosition::At(placement);
        placement
    }

    /// Panel element markup. The `visible` class drives the CSS fade.
    pub fn render(&self) -> Markup {
        html! {
            div.exif-panel.visible[self.visible] style=(self.position.style()) {
                div.exif-panel-grid {
                    @for item in &self.items {
                        div.exif-item {
                            span.exif-label { (item.label) ":" }
                            span.exif-value { (item.value) }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(label: &'static str, value: &str) -> ExifItem {
        ExifItem {
            label,
            value: value.to_string(),
        }
    }

    #[test]
    fn new_panel_is_hidden_and_offscreen() {
        let panel = Panel::new();
        assert!(!panel.is_visible());
        assert_eq!(panel.position(), PanelPosition::Offscreen);
        assert!(panel.render().into_string().contains("top: -1000px"));
    }

    #[test]
    fn place_beneath_matches_width() {
        let mut panel = Panel::new();
        let placement = panel.place_beneath(&Rect::new(120.0, 40.0, 640.0, 480.0));
        assert_eq!(
            placement,
            Placement {
                top: 520,
                left: 120,
                width: 640
            }
        );
        assert_eq!(panel.placement(), Some(placement));
    }

    #[test]
    fn render_lists_items_in_order() {
        let mut panel = Panel::new();
        panel.set_items(vec![item("Camera", "X100V"), item("ISO", "160")]);
        panel.show();

        let html = panel.render().into_string();
        assert!(html.contains(r#"class="exif-panel visible""#));
        let camera = html.find("Camera:").unwrap();
        let iso = html.find("ISO:").unwrap();
        assert!(camera < iso);
        assert!(html.contains(r#"<span class="exif-value">X100V</span>"#));
    }

    #[test]
    fn render_escapes_values() {
        let mut panel = Panel::new();
        panel.set_items(vec![item("Lens", "<script>")]);
        let html = panel.render().into_string();
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("visible"));
    }
}
