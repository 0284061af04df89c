//! Viewer bridge: the glue between the gallery and the third-party lightbox.
//!
//! The lightbox itself (transitions, zoom, gestures) is not implemented
//! here. The bridge produces the options document it is configured with and
//! consumes its lifecycle events as [`ViewerEvent`]s. Each open instance
//! owns its own [`OverlaySession`]; closing the lightbox drops it.
//!
//! ## Responsive padding
//!
//! | Viewport width | Profile | Default padding (t / b / l / r) |
//! |---|---|---|
//! | `≤ 768` | mobile | 40 / 15 + 80 / 15 / 15 |
//! | `768 < w ≤ 1024` | tablet | 60 / 30 + 80 / 40 / 40 |
//! | `> 1024` | desktop | 80 / 40 + 80 / 100 / 100 |
//!
//! The `+ 80` is the panel reserve, kept free below the image for the EXIF
//! panel.

use crate::config::{OverlayConfig, PaddingConfig, ViewerConfig};
use crate::exif::ExifRecord;
use crate::overlay::{MetadataRequest, OverlaySession, RequestToken, Stage};
use serde::Serialize;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewportClass {
    Mobile,
    Tablet,
    Desktop,
}

impl ViewportClass {
    pub fn classify(viewport_width: u32, config: &ViewerConfig) -> Self {
        if viewport_width <= config.mobile_breakpoint {
            ViewportClass::Mobile
        } else if viewport_width <= config.tablet_breakpoint {
            ViewportClass::Tablet
        } else {
            ViewportClass::Desktop
        }
    }

    fn base_padding(self, config: &ViewerConfig) -> PaddingConfig {
        match self {
            ViewportClass::Mobile => config.padding.mobile,
            ViewportClass::Tablet => config.padding.tablet,
            ViewportClass::Desktop => config.padding.desktop,
        }
    }
}

/// Outer padding handed to the lightbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Padding {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

/// Padding for a viewport width, with the panel reserve added to the bottom.
pub fn responsive_padding(viewport_width: u32, config: &ViewerConfig) -> Padding {
    let base = ViewportClass::classify(viewport_width, config).base_padding(config);
    Padding {
        top: base.top,
        bottom: base.bottom + config.panel_reserve,
        left: base.left,
        right: base.right,
    }
}

/// Options document consumed by the lightbox.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LightboxOptions {
    pub gallery: String,
    pub children: String,
    pub show_hide_animation_type: String,
    pub padding: Padding,
    pub initial_zoom_level: String,
    pub secondary_zoom_level: f64,
    pub max_zoom_level: f64,
    pub wheel_to_zoom: bool,
    pub keyboard: bool,
    pub close_title: String,
    pub arrow_prev_title: String,
    pub arrow_next_title: String,
}

impl LightboxOptions {
    pub fn new(config: &ViewerConfig, viewport_width: u32) -> Self {
        Self {
            gallery: "#gallery".to_string(),
            children: "a".to_string(),
            show_hide_animation_type: "zoom".to_string(),
            padding: responsive_padding(viewport_width, config),
            initial_zoom_level: "fit".to_string(),
            secondary_zoom_level: config.secondary_zoom_level,
            max_zoom_level: config.max_zoom_level,
            wheel_to_zoom: config.wheel_to_zoom,
            keyboard: config.keyboard,
            close_title: "Close (Esc)".to_string(),
            arrow_prev_title: "Previous (arrow left)".to_string(),
            arrow_next_title: "Next (arrow right)".to_string(),
        }
    }
}

/// One lightbox slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    /// Source the lightbox will display.
    pub src: String,
    /// Full-resolution href of the grid anchor the slide came from.
    pub element_href: Option<String>,
    pub width: u32,
    pub height: u32,
}

impl Slide {
    /// Swap in the anchor's full-resolution source. Returns whether it changed.
    pub fn use_full_resolution(&mut self) -> bool {
        match &self.element_href {
            Some(href) if *href != self.src => {
                self.src = href.clone();
                true
            }
            _ => false,
        }
    }
}

/// Lightbox lifecycle and per-slide events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerEvent {
    AfterInit,
    Change { index: usize },
    ZoomPanUpdate,
    ContentLoad,
    ImageLoadComplete,
    /// Post-layout observation of the displayed image, where the host has it.
    LayoutChanged,
    Resize { viewport_width: u32 },
    BeforeClose,
    Close,
}

/// An open lightbox instance.
#[derive(Debug)]
pub struct Lightbox {
    options: LightboxOptions,
    slides: Vec<Slide>,
    current: Option<usize>,
    viewport_width: u32,
    arrows_hidden: bool,
    arrow_hide_at: Option<Instant>,
    overlay: OverlaySession,
}

impl Lightbox {
    pub fn options(&self) -> &LightboxOptions {
        &self.options
    }

    pub fn padding(&self) -> Padding {
        self.options.padding
    }

    pub fn viewport_width(&self) -> u32 {
        self.viewport_width
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_slide(&self) -> Option<&Slide> {
        self.current.and_then(|i| self.slides.get(i))
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn arrows_hidden(&self) -> bool {
        self.arrows_hidden
    }

    pub fn overlay(&self) -> &OverlaySession {
        &self.overlay
    }
}

/// Drives at most one open [`Lightbox`].
#[derive(Debug)]
pub struct ViewerBridge {
    viewer: ViewerConfig,
    overlay: OverlayConfig,
    open: Option<Lightbox>,
    instances: u64,
}

impl ViewerBridge {
    pub fn new(viewer: ViewerConfig, overlay: OverlayConfig) -> Self {
        Self {
            viewer,
            overlay,
            open: None,
            instances: 0,
        }
    }

    /// Options for a fresh instance at `viewport_width`.
    pub fn options(&self, viewport_width: u32) -> LightboxOptions {
        LightboxOptions::new(&self.viewer, viewport_width)
    }

    pub fn lightbox(&self) -> Option<&Lightbox> {
        self.open.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// Open over `slides` at `index`. Replaces any instance already open.
    ///
    /// Returns the metadata request for the initial slide.
    pub fn open(
        &mut self,
        slides: Vec<Slide>,
        index: usize,
        viewport_width: u32,
        now: Instant,
        stage: &dyn Stage,
    ) -> Option<MetadataRequest> {
        log::debug!("opening lightbox at slide {index} ({viewport_width}px viewport)");
        self.instances += 1;
        self.open = Some(Lightbox {
            options: LightboxOptions::new(&self.viewer, viewport_width),
            slides,
            current: None,
            viewport_width,
            arrows_hidden: false,
            arrow_hide_at: None,
            overlay: OverlaySession::new(self.overlay.clone()).for_instance(self.instances),
        });
        self.handle(ViewerEvent::AfterInit, now, stage);
        self.handle(ViewerEvent::Change { index }, now, stage)
    }

    /// Feed one lightbox event. A slide change yields a metadata request.
    pub fn handle(
        &mut self,
        event: ViewerEvent,
        now: Instant,
        stage: &dyn Stage,
    ) -> Option<MetadataRequest> {
        let Some(lightbox) = self.open.as_mut() else {
            log::debug!("ignoring {event:?}: no lightbox open");
            return None;
        };

        match event {
            ViewerEvent::AfterInit => {
                if ViewportClass::classify(lightbox.viewport_width, &self.viewer)
                    == ViewportClass::Mobile
                {
                    lightbox.arrow_hide_at = Some(now + self.viewer.arrow_hide_delay());
                }
            }
            ViewerEvent::Change { index } => {
                let Some(slide) = lightbox.slides.get_mut(index) else {
                    log::warn!("slide {index} does not exist");
                    return None;
                };
                if slide.use_full_resolution() {
                    log::debug!("slide {index} switched to {}", slide.src);
                }
                lightbox.current = Some(index);
                let source = slide.src.clone();
                return Some(lightbox.overlay.request_metadata(source));
            }
            ViewerEvent::ZoomPanUpdate => lightbox.overlay.on_zoom_pan_update(stage),
            ViewerEvent::ContentLoad => lightbox.overlay.on_content_load(now),
            ViewerEvent::ImageLoadComplete => lightbox.overlay.on_image_load_complete(now),
            ViewerEvent::LayoutChanged => lightbox.overlay.on_layout_changed(stage),
            ViewerEvent::Resize { viewport_width } => {
                lightbox.viewport_width = viewport_width;
                lightbox.options.padding = responsive_padding(viewport_width, &self.viewer);
                lightbox.overlay.on_resize(stage);
            }
            ViewerEvent::BeforeClose => lightbox.overlay.hide(),
            ViewerEvent::Close => {
                lightbox.overlay.hide();
                self.open = None;
            }
        }
        None
    }

    /// Hand a resolved record to the open instance's overlay.
    pub fn apply_metadata(
        &mut self,
        token: RequestToken,
        record: &ExifRecord,
        now: Instant,
        stage: &dyn Stage,
    ) -> bool {
        match self.open.as_mut() {
            Some(lightbox) => lightbox.overlay.apply_metadata(token, record, now, stage),
            None => {
                log::debug!("lightbox closed before metadata arrived");
                false
            }
        }
    }

    /// Run timers due at or before `now`.
    pub fn advance(&mut self, now: Instant, stage: &dyn Stage) {
        let Some(lightbox) = self.open.as_mut() else {
            return;
        };
        if lightbox.arrow_hide_at.is_some_and(|at| at <= now) {
            lightbox.arrow_hide_at = None;
            lightbox.arrows_hidden = true;
        }
        lightbox.overlay.advance(now, stage);
    }

    /// Earliest pending timer across the open instance.
    pub fn next_deadline(&self) -> Option<Instant> {
        let lightbox = self.open.as_ref()?;
        match (lightbox.arrow_hide_at, lightbox.overlay.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }
}
