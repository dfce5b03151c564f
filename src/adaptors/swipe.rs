use glam::Vec2;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use web_time::Instant;

use super::{threshold_sign, Adaptor};
use crate::event::{Subject, Subscription};
use crate::input::{InputEvent, PointerInput, PointerKind};

/// Swipe adaptor configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(default)]
pub struct SwipeConfig {
    /// Minimum horizontal screen displacement, in pixels.
    pub threshold_x: f32,
    /// Minimum vertical screen displacement, in pixels.
    pub threshold_y: f32,
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self {
            threshold_x: 60.0,
            threshold_y: 60.0,
        }
    }
}

/// Events emitted by [`SwipeAdaptor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeEvent {
    /// A swipe crossed at least one axis threshold.
    Trigger {
        /// Horizontal direction in {-1, 0, 1}; zero below threshold.
        x: i8,
        /// Vertical direction in {-1, 0, 1}; zero below threshold.
        y: i8,
    },
}

/// Detects touch and pen swipes. Mouse pointers and secondary touches are
/// ignored; no state survives between gestures except the pending trigger.
#[derive(Debug)]
pub struct SwipeAdaptor {
    config: SwipeConfig,
    start: Option<Vec2>,
    pending: Option<SwipeEvent>,
    connected: bool,
    events: Subject<SwipeEvent>,
}

impl SwipeAdaptor {
    /// Create a disconnected adaptor.
    #[must_use]
    pub fn new(config: SwipeConfig) -> Self {
        Self {
            config,
            start: None,
            pending: None,
            connected: false,
            events: Subject::new(),
        }
    }

    /// Listen for this adaptor's events.
    pub fn subscribe(&mut self) -> Subscription<SwipeEvent> {
        self.events.subscribe()
    }

    fn tracks(pointer: &PointerInput) -> bool {
        pointer.kind != PointerKind::Mouse && pointer.is_primary
    }

    fn on_up(&mut self, pointer: &PointerInput) -> bool {
        let Some(start) = self.start.take() else {
            return false;
        };
        let travel = Vec2::new(pointer.screen_x, pointer.screen_y) - start;
        let x = threshold_sign(travel.x, self.config.threshold_x);
        let y = threshold_sign(travel.y, self.config.threshold_y);
        if x == 0 && y == 0 {
            return false;
        }
        self.pending = Some(SwipeEvent::Trigger { x, y });
        true
    }
}

impl Adaptor for SwipeAdaptor {
    fn connect(&mut self) {
        self.connected = true;
    }

    fn disconnect(&mut self) {
        self.connected = false;
        self.start = None;
    }

    fn handle_event(&mut self, event: &InputEvent, _now: Instant) -> bool {
        if !self.connected {
            return false;
        }
        match event {
            InputEvent::PointerDown(pointer) if Self::tracks(pointer) => {
                self.start = Some(Vec2::new(pointer.screen_x, pointer.screen_y));
                false
            }
            InputEvent::PointerUp(pointer) if Self::tracks(pointer) => self.on_up(pointer),
            InputEvent::PointerCancel(pointer) if Self::tracks(pointer) => {
                self.start = None;
                false
            }
            _ => false,
        }
    }

    fn update(&mut self, _now: Instant) {
        if let Some(event) = self.pending.take() {
            self.events.emit(event);
        }
    }

    fn is_enabled(&self) -> bool {
        self.connected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn swipe(adaptor: &mut SwipeAdaptor, kind: PointerKind, to: (f32, f32)) {
        let now = Instant::now();
        let down = PointerInput::at(kind, 7, 0.0, 0.0);
        let up = PointerInput::at(kind, 7, to.0, to.1);
        let _ = adaptor.handle_event(&InputEvent::PointerDown(down), now);
        let _ = adaptor.handle_event(&InputEvent::PointerUp(up), now);
        adaptor.update(now);
    }

    fn connected() -> (SwipeAdaptor, Subscription<SwipeEvent>) {
        let mut adaptor = SwipeAdaptor::new(SwipeConfig::default());
        let events = adaptor.subscribe();
        adaptor.connect();
        (adaptor, events)
    }

    #[test]
    fn swipe_past_threshold_triggers() {
        let (mut adaptor, events) = connected();
        swipe(&mut adaptor, PointerKind::Touch, (70.0, 0.0));
        assert_eq!(events.drain(), vec![SwipeEvent::Trigger { x: 1, y: 0 }]);
    }

    #[test]
    fn short_swipe_is_ignored() {
        let (mut adaptor, events) = connected();
        swipe(&mut adaptor, PointerKind::Touch, (10.0, 0.0));
        assert!(events.is_empty());
    }

    #[test]
    fn sub_threshold_axis_reads_zero() {
        let (mut adaptor, events) = connected();
        swipe(&mut adaptor, PointerKind::Pen, (-20.0, -90.0));
        assert_eq!(events.drain(), vec![SwipeEvent::Trigger { x: 0, y: -1 }]);
    }

    #[test]
    fn mouse_and_secondary_pointers_are_ignored() {
        let (mut adaptor, events) = connected();
        swipe(&mut adaptor, PointerKind::Mouse, (200.0, 0.0));
        assert!(events.is_empty());

        let now = Instant::now();
        let mut secondary = PointerInput::at(PointerKind::Touch, 2, 0.0, 0.0);
        secondary.is_primary = false;
        let _ = adaptor.handle_event(&InputEvent::PointerDown(secondary), now);
        secondary.screen_x = 300.0;
        let _ = adaptor.handle_event(&InputEvent::PointerUp(secondary), now);
        adaptor.update(now);
        assert!(events.is_empty());
    }
}
