use glam::Vec2;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use web_time::{Duration, Instant};

use super::Adaptor;
use crate::damper::Damper;
use crate::event::{Subject, Subscription};
use crate::input::{InputEvent, PointerInput};

/// Pointer adaptor configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(default)]
pub struct PointerConfig {
    /// Damping factor in (0, 1].
    pub damping_factor: f32,
    /// Divide positions by the element size.
    pub should_normalize: bool,
    /// Map normalized positions from [0, 1] to [-1, 1].
    pub normalize_about_zero: bool,
    /// Quiet period after the last down/up before a new pointer count is
    /// accepted, in milliseconds.
    pub multipointer_threshold_ms: u64,
}

impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            damping_factor: 0.5,
            should_normalize: true,
            normalize_about_zero: true,
            multipointer_threshold_ms: 100,
        }
    }
}

/// Events emitted by [`PointerAdaptor`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Damped pointer position for this frame.
    Update {
        /// Current position; `None` until a pointer has been seen since
        /// the last contact-count change.
        values: Option<Vec2>,
        /// Change applied this frame (zero while unbaselined).
        deltas: Vec2,
        /// Settled number of pointers in contact (0 = hovering mouse).
        pointer_count: usize,
    },
}

/// Tracks pointer position and contact count.
///
/// A change in the number of contacts only takes effect once
/// `multipointer_threshold_ms` has elapsed since the last down or up, so a
/// two-finger touch does not register as one finger then two. When the
/// count settles the damper is re-baselined at the new position without
/// animating, so switching from one to two fingers does not jump.
#[derive(Debug)]
pub struct PointerAdaptor {
    config: PointerConfig,
    damper: Damper,
    /// Pointers currently in contact, in arrival order.
    contacts: Vec<PointerInput>,
    pointer_count: usize,
    last_down: Option<Instant>,
    last_up: Option<Instant>,
    size: Vec2,
    connected: bool,
    events: Subject<PointerEvent>,
}

impl PointerAdaptor {
    /// Create a disconnected adaptor for an element of the given size.
    #[must_use]
    pub fn new(config: PointerConfig, width: f32, height: f32) -> Self {
        let damper = Damper::new([("x", None), ("y", None)], config.damping_factor);
        Self {
            config,
            damper,
            contacts: Vec::new(),
            pointer_count: 0,
            last_down: None,
            last_up: None,
            size: Vec2::new(width, height),
            connected: false,
            events: Subject::new(),
        }
    }

    /// Listen for this adaptor's events.
    pub fn subscribe(&mut self) -> Subscription<PointerEvent> {
        self.events.subscribe()
    }

    /// Settled number of pointers in contact.
    #[must_use]
    pub fn pointer_count(&self) -> usize {
        self.pointer_count
    }

    /// Update the element size used for normalization.
    pub fn set_size(&mut self, width: f32, height: f32) {
        self.size = Vec2::new(width, height);
    }

    /// Damped position, if baselined.
    #[must_use]
    pub fn position(&self) -> Option<Vec2> {
        Some(Vec2::new(self.damper.current("x")?, self.damper.current("y")?))
    }

    fn normalize(&self, raw: Vec2) -> Vec2 {
        if !self.config.should_normalize {
            return raw;
        }
        let unit = raw / self.size.max(Vec2::ONE);
        if self.config.normalize_about_zero {
            unit * 2.0 - Vec2::ONE
        } else {
            unit
        }
    }

    /// Normalized centroid of the pointers in contact.
    fn contact_position(&self) -> Option<Vec2> {
        if self.contacts.is_empty() {
            return None;
        }
        let sum: Vec2 = self.contacts.iter().map(|p| Vec2::new(p.x, p.y)).sum();
        Some(self.normalize(sum / self.contacts.len() as f32))
    }

    fn set_target(&mut self, position: Vec2) {
        self.damper
            .set_target([("x", Some(position.x)), ("y", Some(position.y))]);
    }

    fn on_down(&mut self, pointer: &PointerInput, now: Instant) {
        match self.contacts.iter_mut().find(|p| p.pointer_id == pointer.pointer_id) {
            Some(existing) => *existing = *pointer,
            None => self.contacts.push(*pointer),
        }
        self.last_down = Some(now);
    }

    fn on_move(&mut self, pointer: &PointerInput) {
        if let Some(existing) = self
            .contacts
            .iter_mut()
            .find(|p| p.pointer_id == pointer.pointer_id)
        {
            *existing = *pointer;
        }
        if let Some(position) = self.contact_position() {
            self.set_target(position);
        } else if self.pointer_count == 0 {
            // Hovering mouse
            let position = self.normalize(Vec2::new(pointer.x, pointer.y));
            self.set_target(position);
        }
    }

    fn on_up(&mut self, pointer: &PointerInput, now: Instant) {
        self.contacts.retain(|p| p.pointer_id != pointer.pointer_id);
        self.last_up = Some(now);
    }

    fn count_settled(&self, now: Instant) -> bool {
        let threshold = Duration::from_millis(self.config.multipointer_threshold_ms);
        [self.last_down, self.last_up]
            .into_iter()
            .flatten()
            .all(|t| now.saturating_duration_since(t) >= threshold)
    }
}

impl Adaptor for PointerAdaptor {
    fn connect(&mut self) {
        self.connected = true;
    }

    fn disconnect(&mut self) {
        self.connected = false;
        self.contacts.clear();
    }

    fn handle_event(&mut self, event: &InputEvent, now: Instant) -> bool {
        if !self.connected {
            return false;
        }
        match event {
            InputEvent::PointerDown(pointer) => self.on_down(pointer, now),
            InputEvent::PointerMove(pointer) => self.on_move(pointer),
            InputEvent::PointerUp(pointer) | InputEvent::PointerCancel(pointer) => {
                self.on_up(pointer, now);
            }
            InputEvent::Resize { width, height } => {
                self.set_size(*width, *height);
                return false;
            }
            _ => return false,
        }
        true
    }

    fn update(&mut self, now: Instant) {
        if self.contacts.len() != self.pointer_count {
            if self.count_settled(now) {
                log::debug!(
                    "pointer count {} -> {}",
                    self.pointer_count,
                    self.contacts.len()
                );
                self.pointer_count = self.contacts.len();
                match self.contact_position() {
                    Some(position) => self
                        .damper
                        .reset_data([("x", Some(position.x)), ("y", Some(position.y))]),
                    None => self.damper.reset_all(None),
                }
            }
            return;
        }

        if self.damper.reached_target() {
            return;
        }
        self.damper.update();
        let deltas = Vec2::new(
            self.damper.delta("x").unwrap_or(0.0),
            self.damper.delta("y").unwrap_or(0.0),
        );
        self.events.emit(PointerEvent::Update {
            values: self.position(),
            deltas,
            pointer_count: self.pointer_count,
        });
    }

    fn is_enabled(&self) -> bool {
        self.connected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::PointerKind;

    fn touch(id: u32, x: f32, y: f32) -> PointerInput {
        PointerInput::at(PointerKind::Touch, id, x, y)
    }

    fn adaptor() -> (PointerAdaptor, Subscription<PointerEvent>) {
        let mut pointer = PointerAdaptor::new(PointerConfig::default(), 200.0, 100.0);
        let events = pointer.subscribe();
        pointer.connect();
        (pointer, events)
    }

    #[test]
    fn hover_positions_are_normalized_about_zero() {
        let now = Instant::now();
        let (mut pointer, events) = adaptor();
        let mouse = PointerInput::at(PointerKind::Mouse, 1, 150.0, 25.0);
        let _ = pointer.handle_event(&InputEvent::PointerMove(mouse), now);
        pointer.update(now);
        match events.drain().as_slice() {
            [PointerEvent::Update {
                values: Some(values),
                deltas,
                pointer_count: 0,
            }] => {
                assert!((values.x - 0.5).abs() < 1e-6);
                assert!((values.y + 0.5).abs() < 1e-6);
                assert_eq!(*deltas, Vec2::ZERO);
            }
            other => panic!("unexpected events {other:?}"),
        }
    }

    #[test]
    fn count_change_waits_for_the_threshold() {
        let t0 = Instant::now();
        let (mut pointer, events) = adaptor();
        let _ = pointer.handle_event(&InputEvent::PointerDown(touch(1, 100.0, 50.0)), t0);
        let _ = pointer.handle_event(
            &InputEvent::PointerDown(touch(2, 120.0, 50.0)),
            t0 + Duration::from_millis(30),
        );

        pointer.update(t0 + Duration::from_millis(60));
        assert_eq!(pointer.pointer_count(), 0);

        pointer.update(t0 + Duration::from_millis(140));
        assert_eq!(pointer.pointer_count(), 2);
        // Rebaselined at the centroid without animating or emitting
        assert!(events.is_empty());
        let position = pointer.position().unwrap();
        assert!((position.x - 0.1).abs() < 1e-6);
        assert!(position.y.abs() < 1e-6);
    }

    #[test]
    fn drag_emits_damped_deltas() {
        let t0 = Instant::now();
        let (mut pointer, events) = adaptor();
        let _ = pointer.handle_event(&InputEvent::PointerDown(touch(1, 100.0, 50.0)), t0);
        let settled = t0 + Duration::from_millis(200);
        pointer.update(settled);
        assert_eq!(pointer.pointer_count(), 1);

        let _ = pointer.handle_event(&InputEvent::PointerMove(touch(1, 200.0, 50.0)), settled);
        pointer.update(settled);
        match events.drain().as_slice() {
            [PointerEvent::Update {
                values: Some(values),
                deltas,
                pointer_count: 1,
            }] => {
                // target x = 1.0 from 0.0, half the way per step
                assert!((values.x - 0.5).abs() < 1e-6);
                assert!((deltas.x - 0.5).abs() < 1e-6);
                assert_eq!(deltas.y, 0.0);
            }
            other => panic!("unexpected events {other:?}"),
        }
    }

    #[test]
    fn lifting_all_pointers_clears_the_baseline() {
        let t0 = Instant::now();
        let (mut pointer, _events) = adaptor();
        let touch1 = touch(1, 10.0, 10.0);
        let _ = pointer.handle_event(&InputEvent::PointerDown(touch1), t0);
        pointer.update(t0 + Duration::from_millis(150));
        let _ = pointer.handle_event(
            &InputEvent::PointerUp(touch1),
            t0 + Duration::from_millis(300),
        );
        pointer.update(t0 + Duration::from_millis(500));
        assert_eq!(pointer.pointer_count(), 0);
        assert_eq!(pointer.position(), None);
    }

    #[test]
    fn resize_changes_normalization() {
        let now = Instant::now();
        let (mut pointer, _events) = adaptor();
        assert!(!pointer.handle_event(
            &InputEvent::Resize {
                width: 400.0,
                height: 400.0
            },
            now
        ));
        let mouse = PointerInput::at(PointerKind::Mouse, 1, 400.0, 0.0);
        let _ = pointer.handle_event(&InputEvent::PointerMove(mouse), now);
        pointer.update(now);
        let position = pointer.position().unwrap();
        assert!((position.x - 1.0).abs() < 1e-6);
        assert!((position.y + 1.0).abs() < 1e-6);
    }
}
