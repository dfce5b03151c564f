use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use web_time::Instant;

use super::ControlScheme;
use crate::adaptors::{Adaptor, ElementBounds, ScrollAdaptor, ScrollConfig, ScrollEvent};
use crate::event::Subscription;
use crate::input::InputEvent;
use crate::rig::CameraRig;

/// ScrollControls configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(default)]
pub struct ScrollControlsOptions {
    /// Scroll adaptor settings.
    pub scroll: ScrollConfig,
    /// Margin, in scroll-percent units, added to both ends of every
    /// [`ScrollAction`] window.
    pub buffer: f32,
}

impl Default for ScrollControlsOptions {
    fn default() -> Self {
        Self {
            scroll: ScrollConfig {
                damping_factor: 0.3,
                ..ScrollConfig::default()
            },
            buffer: 0.1,
        }
    }
}

/// Callback invoked while scroll progress is inside `[start, end]`.
pub struct ScrollAction {
    /// Window start, in scroll percent.
    pub start: f32,
    /// Window end, in scroll percent.
    pub end: f32,
    /// Receives progress through the window, clamped to [0, 1].
    pub callback: Box<dyn FnMut(f32)>,
}

impl ScrollAction {
    /// Action over `[start, end]`.
    pub fn new(start: f32, end: f32, callback: impl FnMut(f32) + 'static) -> Self {
        Self {
            start,
            end,
            callback: Box::new(callback),
        }
    }

    fn local_progress(&self, progress: f32) -> f32 {
        let span = self.end - self.start;
        if span <= 0.0 {
            return if progress >= self.start { 1.0 } else { 0.0 };
        }
        ((progress - self.start) / span).clamp(0.0, 1.0)
    }
}

impl fmt::Debug for ScrollAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollAction")
            .field("start", &self.start)
            .field("end", &self.end)
            .finish_non_exhaustive()
    }
}

/// Scrubs the rig's animation clip with page scroll.
#[derive(Debug)]
pub struct ScrollControls {
    options: ScrollControlsOptions,
    scroll: ScrollAdaptor,
    scroll_events: Subscription<ScrollEvent>,
    actions: Vec<ScrollAction>,
    enabled: bool,
}

impl ScrollControls {
    /// Scheme tracking `element` in a viewport `viewport_height` pixels
    /// tall, disabled.
    #[must_use]
    pub fn new(
        options: ScrollControlsOptions,
        element: ElementBounds,
        viewport_height: f32,
    ) -> Self {
        let mut scroll = ScrollAdaptor::new(options.scroll.clone(), element, viewport_height);
        let scroll_events = scroll.subscribe();
        Self {
            options,
            scroll,
            scroll_events,
            actions: Vec::new(),
            enabled: false,
        }
    }

    /// Register a range-gated callback.
    pub fn add_scroll_action(&mut self, action: ScrollAction) {
        self.actions.push(action);
    }

    /// Replace the tracked element's bounds after a layout change.
    pub fn set_element_bounds(&mut self, element: ElementBounds) {
        self.scroll.set_element_bounds(element);
    }

    fn apply(&mut self, rig: &mut CameraRig, progress: f32) {
        let _ = rig.set_animation_percentage(progress);
        let buffer = self.options.buffer;
        for action in &mut self.actions {
            if progress >= action.start - buffer && progress <= action.end + buffer {
                let local = action.local_progress(progress);
                (action.callback)(local);
            }
        }
    }
}

impl ControlScheme for ScrollControls {
    fn enable(&mut self, rig: &mut CameraRig) {
        let _ = rig.pack_transform();
        self.scroll.connect();
        self.enabled = true;
    }

    fn disable(&mut self, rig: &mut CameraRig) {
        let _ = rig.unpack_transform();
        self.scroll.disconnect();
        self.enabled = false;
    }

    fn update(&mut self, rig: &mut CameraRig, now: Instant) {
        if !self.enabled {
            return;
        }
        self.scroll.update(now);
        for ScrollEvent::Update { scroll_percent, .. } in self.scroll_events.drain() {
            self.apply(rig, scroll_percent);
        }
    }

    fn handle_event(&mut self, event: &InputEvent, now: Instant) -> bool {
        self.scroll.handle_event(event, now)
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec3;

    use super::*;
    use crate::animation::{AnimationClip, KeyframeTrack};
    use crate::rig::{Camera, RigComponent, RigOptions};

    fn setup() -> (ScrollControls, CameraRig) {
        let mut rig = CameraRig::new(Camera::default(), RigOptions::default());
        let clip = AnimationClip::new(
            "dolly",
            vec![KeyframeTrack::vector(
                "Translation.position",
                vec![0.0, 4.0],
                &[Vec3::ZERO, Vec3::new(0.0, 0.0, -8.0)],
            )],
        );
        rig.set_animation_clip(clip, None, None).unwrap();
        let options = ScrollControlsOptions {
            scroll: ScrollConfig {
                damping_factor: 1.0,
                ..ScrollConfig::default()
            },
            ..ScrollControlsOptions::default()
        };
        // Progress runs over scroll offsets 0..1000
        let element = ElementBounds {
            top: 0.0,
            height: 2000.0,
        };
        let mut controls = ScrollControls::new(options, element, 1000.0);
        controls.enable(&mut rig);
        (controls, rig)
    }

    #[test]
    fn scroll_progress_scrubs_the_clip() {
        let now = Instant::now();
        let (mut controls, mut rig) = setup();
        let _ = controls.handle_event(&InputEvent::Scroll { scroll_y: 250.0 }, now);
        controls.update(&mut rig, now);
        assert_eq!(rig.animation_time(), Some(1.0));
        let body = rig.node(RigComponent::Body).translation;
        assert!(body.abs_diff_eq(Vec3::new(0.0, 0.0, -2.0), 1e-5));
    }

    #[test]
    fn actions_fire_inside_their_buffered_window() {
        let now = Instant::now();
        let (mut controls, mut rig) = setup();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        controls.add_scroll_action(ScrollAction::new(0.5, 0.7, move |p| {
            sink.borrow_mut().push(p);
        }));

        for scroll_y in [300.0, 450.0, 600.0, 750.0, 900.0] {
            let _ = controls.handle_event(&InputEvent::Scroll { scroll_y }, now);
            controls.update(&mut rig, now);
        }
        let seen = seen.borrow();
        // 0.3 and 0.9 fall outside [0.4, 0.8]
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[0], 0.0);
        assert!((seen[1] - 0.5).abs() < 1e-5);
        assert_eq!(seen[2], 1.0);
    }
}
