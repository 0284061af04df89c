//! Gallery page rendering.
//!
//! Produces the single `index.html` of a built gallery:
//!
//! - **Loading overlay**: full-page spinner, faded out by the page script
//! - **Grid** (`#gallery`): one anchor per catalog entry, lazily loaded
//! - **EXIF panel shell**: parked off-screen until the lightbox positions it
//! - **Scripts**: lazy loading, and the access deterrents when protection is on
//!
//! ## CSS and JavaScript
//!
//! Static assets are embedded at compile time:
//! - `static/style.css`: Grid, spinner and panel styles
//! - `static/gallery.js`: Viewport-triggered loading and overlay fade
//!
//! Page timing and the lazy-load margin reach the script through an inline
//! `window.GALLERY_CONFIG` object serialised from config.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Templates are type-safe Rust code with automatic XSS escaping.

use crate::config::GalleryConfig;
use crate::deterrents::deterrent_script;
use crate::gallery::Gallery;
use crate::overlay::Panel;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use serde::Serialize;

const CSS_STATIC: &str = include_str!("../static/style.css");
const JS: &str = include_str!("../static/gallery.js");

pub const PAGE_TITLE: &str = "Gallery";

/// Values the page script reads from `window.GALLERY_CONFIG`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PageScriptConfig {
    root_margin: u32,
    hide_delay_ms: u64,
    fade_ms: u64,
}

impl PageScriptConfig {
    fn from_config(config: &GalleryConfig) -> Self {
        Self {
            root_margin: config.lazy_load.root_margin,
            hide_delay_ms: config.loading.hide_delay_ms,
            fade_ms: config.loading.fade_ms,
        }
    }
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(title: &str, css: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(css)) }
            }
            body {
                (content)
            }
        }
    }
}

fn loading_overlay() -> Markup {
    html! {
        div #loading-overlay.loading-overlay {
            div.spinner {}
        }
    }
}

fn page_scripts(config: &GalleryConfig) -> Markup {
    let script_config = serde_json::to_string(&PageScriptConfig::from_config(config))
        .unwrap_or_else(|_| "{}".to_string());
    html! {
        script { (PreEscaped(format!("window.GALLERY_CONFIG = {script_config};"))) }
        script { (PreEscaped(JS)) }
        @if config.protection.enabled {
            script { (PreEscaped(deterrent_script())) }
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Renders the gallery page: overlay, grid, panel shell and scripts.
pub fn render_index(config: &GalleryConfig, gallery: &Gallery) -> Markup {
    let content = html! {
        (loading_overlay())
        main.gallery-page {
            (gallery.render())
        }
        (Panel::new().render())
        (page_scripts(config))
    };
    base_document(PAGE_TITLE, CSS_STATIC, content)
}
