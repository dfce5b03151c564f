use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use web_time::Instant;

use super::{poi_keyboard, ControlScheme, PoiCursor, PoiEvent, PoiOutcome};
use crate::adaptors::{
    Adaptor, AdaptorMode, KeyboardAdaptor, KeyboardEvent, SwipeAdaptor, SwipeConfig, SwipeEvent,
    WheelAdaptor, WheelConfig, WheelEvent,
};
use crate::animation::Ease;
use crate::event::{Subject, Subscription};
use crate::input::InputEvent;
use crate::poi::PathPoint;
use crate::rig::CameraRig;

/// PathPoints configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(default)]
pub struct PathPointsOptions {
    /// Wrap around at either end instead of emitting `ExitPois`.
    pub cycle: bool,
    /// Navigate with the arrow keys.
    pub use_keyboard: bool,
    /// Minimum wheel delta that steps to the next point.
    pub wheel_threshold: f32,
    /// Minimum swipe distance, in pixels, that steps to the next point.
    pub swipe_threshold: f32,
    /// Seconds per step.
    pub duration: f32,
    /// Ease per step.
    pub ease: Ease,
}

impl Default for PathPointsOptions {
    fn default() -> Self {
        Self {
            cycle: false,
            use_keyboard: true,
            wheel_threshold: 15.0,
            swipe_threshold: 60.0,
            duration: 1.0,
            ease: Ease::DEFAULT,
        }
    }
}

/// Steps the rig's clip cursor between keyframes with
/// [`CameraRig::fly_to_keyframe`]. Wheel down, swipe up or left and the
/// down/right arrows go forward.
#[derive(Debug)]
pub struct PathPointsControls {
    options: PathPointsOptions,
    pois: Vec<PathPoint>,
    cursor: PoiCursor,
    wheel: WheelAdaptor,
    wheel_events: Subscription<WheelEvent>,
    swipe: SwipeAdaptor,
    swipe_events: Subscription<SwipeEvent>,
    keyboard: Option<(KeyboardAdaptor, Subscription<KeyboardEvent>)>,
    enabled: bool,
    events: Subject<PoiEvent>,
}

impl PathPointsControls {
    /// Scheme over `pois`, disabled. The rig needs a clip bound before
    /// navigation does anything.
    #[must_use]
    pub fn new(pois: Vec<PathPoint>, options: PathPointsOptions) -> Self {
        let mut wheel = WheelAdaptor::new(WheelConfig {
            mode: AdaptorMode::Discrete,
            threshold_x: options.wheel_threshold,
            threshold_y: options.wheel_threshold,
            ..WheelConfig::default()
        });
        let wheel_events = wheel.subscribe();
        let mut swipe = SwipeAdaptor::new(SwipeConfig {
            threshold_x: options.swipe_threshold,
            threshold_y: options.swipe_threshold,
        });
        let swipe_events = swipe.subscribe();
        let keyboard = options.use_keyboard.then(|| {
            let mut adaptor = KeyboardAdaptor::new(poi_keyboard());
            let events = adaptor.subscribe();
            (adaptor, events)
        });
        Self {
            options,
            pois,
            cursor: PoiCursor::default(),
            wheel,
            wheel_events,
            swipe,
            swipe_events,
            keyboard,
            enabled: false,
            events: Subject::new(),
        }
    }

    /// Listen for navigation events.
    pub fn subscribe(&mut self) -> Subscription<PoiEvent> {
        self.events.subscribe()
    }

    /// The path points, in navigation order.
    #[must_use]
    pub fn pois(&self) -> &[PathPoint] {
        &self.pois
    }

    /// Last point reached.
    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        self.cursor.current
    }

    /// Point being flown to.
    #[must_use]
    pub fn upcoming_index(&self) -> Option<usize> {
        self.cursor.upcoming
    }

    /// Tween the clip cursor to point `index`.
    pub fn go_to_poi(&mut self, rig: &mut CameraRig, index: usize) -> PoiOutcome {
        self.sync();
        let Some(poi) = self.pois.get(index) else {
            return PoiOutcome::Ignored;
        };
        if !rig
            .fly_to_keyframe(poi.frame, self.options.duration, self.options.ease)
            .is_accepted()
        {
            return PoiOutcome::Ignored;
        }
        self.cursor.upcoming = Some(index);
        PoiOutcome::Started(index)
    }

    /// Step forward, wrapping or exiting at the end.
    pub fn next_poi(&mut self, rig: &mut CameraRig) -> PoiOutcome {
        self.step(rig, true)
    }

    /// Step back, wrapping or exiting at the start.
    pub fn prev_poi(&mut self, rig: &mut CameraRig) -> PoiOutcome {
        self.step(rig, false)
    }

    /// Commit rig events that arrived since the last call.
    fn sync(&mut self) {
        for event in self.cursor.poll() {
            self.events.emit(event);
        }
    }

    fn step(&mut self, rig: &mut CameraRig, forward: bool) -> PoiOutcome {
        self.sync();
        if rig.is_moving() || !rig.has_animation_clip() {
            return PoiOutcome::Ignored;
        }
        match self.cursor.step(forward, self.pois.len(), self.options.cycle) {
            Ok(index) => self.go_to_poi(rig, index),
            Err(exit_from) => {
                log::debug!("exiting path points at {exit_from:?}");
                self.events.emit(PoiEvent::ExitPois { exit_from });
                PoiOutcome::Exited(exit_from)
            }
        }
    }

    /// Navigation directions requested by this frame's adaptor events.
    fn requested_steps(&self) -> Vec<bool> {
        let mut steps = Vec::new();
        for event in self.wheel_events.drain() {
            if let WheelEvent::Trigger { x, y } = event {
                let value = if y == 0 { x } else { y };
                if value != 0 {
                    steps.push(value > 0);
                }
            }
        }
        for SwipeEvent::Trigger { x, y } in self.swipe_events.drain() {
            let value = if y == 0 { x } else { y };
            if value != 0 {
                steps.push(value < 0);
            }
        }
        if let Some((_, key_events)) = &self.keyboard {
            for event in key_events.drain() {
                if let KeyboardEvent::Trigger { label } = event {
                    steps.push(label == "next");
                }
            }
        }
        steps
    }
}

impl ControlScheme for PathPointsControls {
    fn enable(&mut self, rig: &mut CameraRig) {
        self.cursor.attach(rig);
        // Clip-driven: keep the eyes free for look-around
        let _ = rig.pack_transform();
        self.wheel.connect();
        self.swipe.connect();
        if let Some((keyboard, _)) = &mut self.keyboard {
            keyboard.connect();
        }
        self.enabled = true;
    }

    fn disable(&mut self, rig: &mut CameraRig) {
        let _ = rig.unpack_transform();
        self.cursor.detach();
        self.wheel.disconnect();
        self.swipe.disconnect();
        if let Some((keyboard, _)) = &mut self.keyboard {
            keyboard.disconnect();
        }
        self.enabled = false;
    }

    fn update(&mut self, rig: &mut CameraRig, now: Instant) {
        if !self.enabled {
            return;
        }
        self.sync();
        self.wheel.update(now);
        self.swipe.update(now);
        if let Some((keyboard, _)) = &mut self.keyboard {
            keyboard.update(now);
        }
        for forward in self.requested_steps() {
            let _ = self.step(rig, forward);
        }
        self.sync();
    }

    fn handle_event(&mut self, event: &InputEvent, now: Instant) -> bool {
        if !self.enabled {
            return false;
        }
        let wheel = self.wheel.handle_event(event, now);
        let swipe = self.swipe.handle_event(event, now);
        let key = self
            .keyboard
            .as_mut()
            .is_some_and(|(keyboard, _)| keyboard.handle_event(event, now));
        wheel || swipe || key
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use glam::{Quat, Vec3};
    use web_time::Duration;

    use super::*;
    use crate::animation::{AnimationClip, KeyframeTrack};
    use crate::controls::PoiBoundary;
    use crate::input::{PointerInput, PointerKind};
    use crate::rig::{Camera, RigComponent, RigOptions, Transform};

    fn rig_with_clip() -> CameraRig {
        let mut rig = CameraRig::new(Camera::default(), RigOptions::default());
        let clip = AnimationClip::new(
            "path",
            vec![KeyframeTrack::vector(
                "Translation.position",
                vec![0.0, 1.0, 2.0, 3.0],
                &[
                    Vec3::ZERO,
                    Vec3::new(0.0, 0.0, -5.0),
                    Vec3::new(5.0, 0.0, -5.0),
                    Vec3::new(5.0, 0.0, 0.0),
                ],
            )],
        );
        rig.set_animation_clip(clip, None, None).unwrap();
        rig
    }

    fn setup() -> (PathPointsControls, CameraRig, Subscription<PoiEvent>) {
        let mut rig = rig_with_clip();
        let pois = (0..3).map(|frame| PathPoint { frame }).collect();
        let mut controls = PathPointsControls::new(pois, PathPointsOptions::default());
        let events = controls.subscribe();
        controls.enable(&mut rig);
        (controls, rig, events)
    }

    fn run(controls: &mut PathPointsControls, rig: &mut CameraRig, t0: Instant) {
        for ms in [0, 500, 1000] {
            let now = t0 + Duration::from_millis(ms);
            controls.update(rig, now);
            rig.update(now);
        }
        controls.update(rig, t0 + Duration::from_millis(1000));
    }

    #[test]
    fn wheel_down_steps_forward() {
        let t0 = Instant::now();
        let (mut controls, mut rig, _events) = setup();
        let wheel = InputEvent::Wheel {
            delta_x: 0.0,
            delta_y: 40.0,
        };
        assert!(controls.handle_event(&wheel, t0));
        run(&mut controls, &mut rig, t0);
        assert_eq!(controls.current_index(), Some(0));

        let t1 = t0 + Duration::from_secs(2);
        let _ = controls.handle_event(&wheel, t1);
        run(&mut controls, &mut rig, t1);
        assert_eq!(controls.current_index(), Some(1));
        let body = rig.node(RigComponent::Body).translation;
        assert!(body.abs_diff_eq(Vec3::new(0.0, 0.0, -5.0), 1e-4));
    }

    #[test]
    fn swipe_down_at_start_exits() {
        let t0 = Instant::now();
        let (mut controls, mut rig, events) = setup();
        let down = PointerInput::at(PointerKind::Touch, 1, 0.0, 0.0);
        let up = PointerInput::at(PointerKind::Touch, 1, 0.0, 120.0);
        let _ = controls.handle_event(&InputEvent::PointerDown(down), t0);
        let _ = controls.handle_event(&InputEvent::PointerUp(up), t0);
        controls.update(&mut rig, t0);
        assert_eq!(
            events.drain(),
            vec![PoiEvent::ExitPois {
                exit_from: PoiBoundary::Start
            }]
        );
        assert!(!rig.is_moving());
    }

    #[test]
    fn next_after_landing_steps_from_the_reached_poi() {
        let t0 = Instant::now();
        let (mut controls, mut rig, _events) = setup();
        assert_eq!(controls.next_poi(&mut rig), PoiOutcome::Started(0));
        for ms in [0, 500, 1000] {
            let now = t0 + Duration::from_millis(ms);
            controls.update(&mut rig, now);
            rig.update(now);
        }
        assert!(!rig.is_moving());
        assert_eq!(controls.next_poi(&mut rig), PoiOutcome::Started(1));
        assert_eq!(controls.current_index(), Some(0));
        assert_eq!(controls.upcoming_index(), Some(1));
    }

    #[test]
    fn disable_hands_the_pan_back_to_the_body() {
        let mut rig = CameraRig::new(Camera::default(), RigOptions::default());
        let turn = Quat::from_rotation_y(FRAC_PI_2);
        let clip = AnimationClip::new(
            "turn",
            vec![KeyframeTrack::quaternion(
                "Rotation.quaternion",
                vec![0.0, 2.0],
                &[Quat::IDENTITY, turn],
            )],
        );
        rig.set_animation_clip(clip, None, None).unwrap();
        let mut controls =
            PathPointsControls::new(vec![PathPoint { frame: 0 }], PathPointsOptions::default());
        controls.enable(&mut rig);
        assert!(rig.set_animation_time(1.0).is_accepted());
        let half = Quat::from_rotation_y(FRAC_PI_2 / 2.0);
        assert!(rig.node(RigComponent::Head).rotation.abs_diff_eq(half, 1e-4));

        controls.disable(&mut rig);
        assert!(!controls.is_enabled());
        assert!(rig.node(RigComponent::Body).rotation.abs_diff_eq(half, 1e-4));
        assert_eq!(*rig.node(RigComponent::Head), Transform::IDENTITY);
    }

    #[test]
    fn navigation_needs_a_clip() {
        let mut rig = CameraRig::new(Camera::default(), RigOptions::default());
        let mut controls =
            PathPointsControls::new(vec![PathPoint { frame: 0 }], PathPointsOptions::default());
        controls.enable(&mut rig);
        assert_eq!(controls.next_poi(&mut rig), PoiOutcome::Ignored);
    }
}
