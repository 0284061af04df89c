//! One lightbox instance's metadata overlay.
//!
//! An [`OverlaySession`] is created when the lightbox opens and dropped when
//! it closes. It owns the panel, the pending timers and the layout monitor.
//!
//! ## Slide change sequence
//!
//! ```text
//! request_metadata(src) ──▶ MetadataRequest { token, source }
//!                                     │ (host resolves the record)
//!                                     ▼
//! apply_metadata(token, record)
//!   stale token          → dropped
//!   no items             → hide
//!   panel visible        → place now, again at +settle, restart monitor
//!   panel hidden         → place at each reveal stage, fade in at reveal_at,
//!                          then start the monitor
//! ```
//!
//! Time only moves when the host calls [`OverlaySession::advance`].

use super::Stage;
use super::geometry::Rect;
use super::panel::Panel;
use super::timeline::Timeline;
use crate::config::OverlayConfig;
use crate::exif::{ExifRecord, display_items};
use std::time::{Duration, Instant};

/// Identifies one slide change within one lightbox instance. Only the
/// newest token's record is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestToken {
    instance: u64,
    seq: u64,
}

/// A pending metadata lookup for the current slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataRequest {
    pub token: RequestToken,
    pub source: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Task {
    Reposition,
    Reveal(RequestToken),
    MonitorTick,
    MonitorEnd,
}

impl Task {
    fn is_monitor(&self) -> bool {
        matches!(self, Task::MonitorTick | Task::MonitorEnd)
    }
}

#[derive(Debug, Default)]
struct Monitor {
    last: Option<Rect>,
}

#[derive(Debug)]
pub struct OverlaySession {
    config: OverlayConfig,
    panel: Panel,
    latest: RequestToken,
    timeline: Timeline<Task>,
    monitor: Option<Monitor>,
}

impl OverlaySession {
    pub fn new(config: OverlayConfig) -> Self {
        Self {
            config,
            panel: Panel::new(),
            latest: RequestToken {
                instance: 0,
                seq: 0,
            },
            timeline: Timeline::new(),
            monitor: None,
        }
    }

    /// Tag this session's tokens with `instance` so results addressed to
    /// an earlier lightbox instance never match.
    pub fn for_instance(mut self, instance: u64) -> Self {
        self.latest.instance = instance;
        self
    }

    pub fn panel(&self) -> &Panel {
        &self.panel
    }

    pub fn is_visible(&self) -> bool {
        self.panel.is_visible()
    }

    pub fn is_monitoring(&self) -> bool {
        self.monitor.is_some()
    }

    /// Earliest pending timer, for hosts that sleep between events.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timeline.next_deadline()
    }

    /// Start a lookup for the slide now showing `source`.
    ///
    /// Supersedes every earlier request.
    pub fn request_metadata(&mut self, source: impl Into<String>) -> MetadataRequest {
        self.latest.seq += 1;
        MetadataRequest {
            token: self.latest,
            source: source.into(),
        }
    }

    /// Apply a resolved record. Returns false when the token is stale.
    pub fn apply_metadata(
        &mut self,
        token: RequestToken,
        record: &ExifRecord,
        now: Instant,
        stage: &dyn Stage,
    ) -> bool {
        if token != self.latest {
            log::debug!("discarding stale metadata for request {:?}", token);
            return false;
        }

        let items = display_items(record);
        if items.is_empty() {
            log::debug!("no EXIF items to display, hiding panel");
            self.panel.set_items(items);
            self.hide();
            return true;
        }

        log::debug!("showing EXIF panel with {} items", items.len());
        self.panel.set_items(items);

        if self.panel.is_visible() {
            self.reposition(stage);
            self.timeline
                .schedule(now + self.config.settle(), Task::Reposition);
            self.start_monitor(now);
        } else {
            self.timeline.retain(|t| !matches!(t, Task::Reveal(_)));
            for offset in self.config.reveal_stages() {
                self.timeline.schedule(now + offset, Task::Reposition);
            }
            self.timeline
                .schedule(now + self.config.reveal_at(), Task::Reveal(token));
        }
        true
    }

    /// Run every timer due at or before `now`.
    pub fn advance(&mut self, now: Instant, stage: &dyn Stage) {
        while let Some((at, task)) = self.timeline.pop_due(now) {
            match task {
                Task::Reposition => self.reposition(stage),
                Task::Reveal(token) => self.reveal(token, at),
                Task::MonitorTick => self.monitor_tick(at, stage),
                Task::MonitorEnd => self.stop_monitor(),
            }
        }
    }

    /// The lightbox zoomed or panned the current slide.
    pub fn on_zoom_pan_update(&mut self, stage: &dyn Stage) {
        if self.panel.is_visible() {
            self.reposition(stage);
        }
    }

    /// The lightbox finished loading slide content.
    pub fn on_content_load(&mut self, now: Instant) {
        if self.panel.is_visible() {
            let offsets = self.config.content_load_ms.clone();
            self.schedule_repositions(now, &offsets);
        }
    }

    /// The full-resolution image finished loading.
    pub fn on_image_load_complete(&mut self, now: Instant) {
        if self.panel.is_visible() {
            let offsets = self.config.image_load_ms.clone();
            self.schedule_repositions(now, &offsets);
        }
    }

    /// The host observed a change in the displayed image's layout.
    pub fn on_layout_changed(&mut self, stage: &dyn Stage) {
        if self.panel.is_visible() {
            self.reposition(stage);
        }
    }

    /// The window was resized or rotated.
    pub fn on_resize(&mut self, stage: &dyn Stage) {
        if self.panel.is_visible() {
            self.reposition(stage);
        }
    }

    /// Hide immediately and cancel every pending timer.
    pub fn hide(&mut self) {
        self.panel.hide();
        self.monitor = None;
        self.timeline.clear();
    }

    fn schedule_repositions(&mut self, now: Instant, offsets_ms: &[u64]) {
        for ms in offsets_ms {
            self.timeline
                .schedule(now + Duration::from_millis(*ms), Task::Reposition);
        }
    }

    fn reposition(&mut self, stage: &dyn Stage) {
        match stage.image_rect() {
            Some(rect) => {
                self.panel.place_beneath(&rect);
            }
            None => log::debug!("no image on stage, panel not repositioned"),
        }
    }

    fn reveal(&mut self, token: RequestToken, at: Instant) {
        if token != self.latest || self.panel.items().is_empty() {
            return;
        }
        self.panel.show();
        self.start_monitor(at);
    }

    fn start_monitor(&mut self, at: Instant) {
        self.stop_monitor();
        self.monitor = Some(Monitor::default());
        self.timeline
            .schedule(at + self.config.monitor_window(), Task::MonitorEnd);
        self.timeline
            .schedule(at + self.config.monitor_interval(), Task::MonitorTick);
    }

    fn stop_monitor(&mut self) {
        self.monitor = None;
        self.timeline.retain(|t| !t.is_monitor());
    }

    fn monitor_tick(&mut self, at: Instant, stage: &dyn Stage) {
        if self.monitor.is_none() {
            return;
        }
        if !self.panel.is_visible() || !stage.has_slide() {
            self.stop_monitor();
            return;
        }

        self.timeline
            .schedule(at + self.config.monitor_interval(), Task::MonitorTick);

        let Some(rect) = stage.image_rect() else {
            return;
        };
        let threshold = self.config.move_threshold_px;
        if let Some(monitor) = self.monitor.as_mut() {
            if monitor
                .last
                .is_some_and(|last| rect.moved_from(&last, threshold))
            {
                log::debug!("image moved under the panel, repositioning");
                self.panel.place_beneath(&rect);
            }
            monitor.last = Some(rect);
        }
    }
}
