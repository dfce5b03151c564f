use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use web_time::Instant;

use super::Adaptor;
use crate::damper::Damper;
use crate::event::{Subject, Subscription};
use crate::input::InputEvent;

const PERCENT: &str = "scroll_percent";

/// Distance expressed in pixels or viewport-height units.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ScrollOffset {
    /// Absolute pixels.
    Px(f32),
    /// Percent of the viewport height (`50.0` = half a screen).
    Vh(f32),
}

impl ScrollOffset {
    /// Resolve to pixels for a viewport of `viewport_height`.
    #[must_use]
    pub fn to_px(self, viewport_height: f32) -> f32 {
        match self {
            Self::Px(px) => px,
            Self::Vh(vh) => vh / 100.0 * viewport_height,
        }
    }
}

impl Default for ScrollOffset {
    fn default() -> Self {
        Self::Px(0.0)
    }
}

/// Scroll adaptor configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(default)]
pub struct ScrollConfig {
    /// Damping factor in (0, 1].
    pub damping_factor: f32,
    /// Scroll distance past the element's top before progress starts.
    pub start_offset: ScrollOffset,
    /// Scroll distance before the element's bottom where progress ends.
    pub end_offset: ScrollOffset,
    /// Margin around the element, as a fraction of the viewport height,
    /// within which it still counts as in view.
    pub buffer: f32,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            damping_factor: 0.5,
            start_offset: ScrollOffset::default(),
            end_offset: ScrollOffset::default(),
            buffer: 0.1,
        }
    }
}

/// Document-relative placement of the scroll-tracked element.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default, JsonSchema)]
pub struct ElementBounds {
    /// Distance from the document top to the element top, in pixels.
    pub top: f32,
    /// Element height, in pixels.
    pub height: f32,
}

/// Events emitted by [`ScrollAdaptor`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollEvent {
    /// Damped scroll progress for this frame.
    Update {
        /// Progress through the element in [0, 1].
        scroll_percent: f32,
        /// Change applied this frame.
        delta: f32,
    },
}

/// Pixel range over which progress runs, cached until the next resize.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ScrollGeometry {
    start: f32,
    end: f32,
}

/// Reports how far an element has scrolled through the viewport.
///
/// Progress is 0 when the page has scrolled to the element's top (plus
/// `start_offset`) and 1 when the element's bottom (minus `end_offset`)
/// meets the viewport bottom. Progress is damped only while the element
/// is in view; off screen it settles in a single update.
#[derive(Debug)]
pub struct ScrollAdaptor {
    config: ScrollConfig,
    damper: Damper,
    element: ElementBounds,
    viewport_height: f32,
    scroll_y: f32,
    geometry: ScrollGeometry,
    in_view: bool,
    connected: bool,
    events: Subject<ScrollEvent>,
}

impl ScrollAdaptor {
    /// Create a disconnected adaptor tracking `element` in a viewport of
    /// `viewport_height` pixels.
    #[must_use]
    pub fn new(config: ScrollConfig, element: ElementBounds, viewport_height: f32) -> Self {
        let damper = Damper::new([(PERCENT, Some(0.0))], config.damping_factor);
        let mut adaptor = Self {
            config,
            damper,
            element,
            viewport_height,
            scroll_y: 0.0,
            geometry: ScrollGeometry { start: 0.0, end: 0.0 },
            in_view: false,
            connected: false,
            events: Subject::new(),
        };
        adaptor.recompute_geometry();
        adaptor
    }

    /// Listen for this adaptor's events.
    pub fn subscribe(&mut self) -> Subscription<ScrollEvent> {
        self.events.subscribe()
    }

    /// Replace the tracked element's bounds (after a layout change).
    pub fn set_element_bounds(&mut self, element: ElementBounds) {
        self.element = element;
        self.recompute_geometry();
    }

    /// Current damped progress.
    #[must_use]
    pub fn scroll_percent(&self) -> f32 {
        self.damper.current(PERCENT).unwrap_or(0.0)
    }

    /// Whether the element (widened by the buffer margin) intersects the
    /// viewport at the last seen scroll position.
    #[must_use]
    pub fn is_in_view(&self) -> bool {
        self.in_view
    }

    fn recompute_geometry(&mut self) {
        let start = self.element.top + self.config.start_offset.to_px(self.viewport_height);
        let end = self.element.top + self.element.height
            - self.viewport_height
            - self.config.end_offset.to_px(self.viewport_height);
        self.geometry = ScrollGeometry { start, end };
        log::trace!("scroll geometry {:?}", self.geometry);
        self.track(self.scroll_y);
    }

    /// Normalized progress for a page offset, clamped to [0, 1].
    fn progress_at(&self, scroll_y: f32) -> f32 {
        let ScrollGeometry { start, end } = self.geometry;
        if end <= start {
            return if scroll_y >= start { 1.0 } else { 0.0 };
        }
        ((scroll_y - start) / (end - start)).clamp(0.0, 1.0)
    }

    fn track(&mut self, scroll_y: f32) {
        self.scroll_y = scroll_y;
        let margin = self.config.buffer * self.viewport_height;
        let view_top = scroll_y - margin;
        let view_bottom = scroll_y + self.viewport_height + margin;
        let in_view = view_bottom > self.element.top
            && view_top < self.element.top + self.element.height;
        if in_view != self.in_view {
            log::debug!("scroll element in view: {in_view}");
            self.in_view = in_view;
        }
        let progress = self.progress_at(scroll_y);
        if self.damper.target(PERCENT) != Some(progress) {
            self.damper.set_target([(PERCENT, Some(progress))]);
        }
    }
}

impl Adaptor for ScrollAdaptor {
    fn connect(&mut self) {
        self.connected = true;
    }

    fn disconnect(&mut self) {
        self.connected = false;
    }

    fn handle_event(&mut self, event: &InputEvent, _now: Instant) -> bool {
        if !self.connected {
            return false;
        }
        match event {
            InputEvent::Scroll { scroll_y } => self.track(*scroll_y),
            InputEvent::Resize { height, .. } => {
                self.viewport_height = *height;
                self.recompute_geometry();
            }
            _ => {}
        }
        false
    }

    fn update(&mut self, _now: Instant) {
        if !self.connected || self.damper.reached_target() {
            return;
        }
        if !self.in_view {
            // Off screen: jump to the clamped progress in one event
            let before = self.scroll_percent();
            let target = self.damper.target(PERCENT).unwrap_or(before);
            self.damper.reset_data([(PERCENT, Some(target))]);
            self.events.emit(ScrollEvent::Update {
                scroll_percent: target,
                delta: target - before,
            });
            return;
        }
        self.damper.update();
        self.events.emit(ScrollEvent::Update {
            scroll_percent: self.scroll_percent(),
            delta: self.damper.delta(PERCENT).unwrap_or(0.0),
        });
    }

    fn is_enabled(&self) -> bool {
        self.connected
    }
}
