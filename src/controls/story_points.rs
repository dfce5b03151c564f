use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use web_time::Instant;

use super::{poi_keyboard, ControlScheme, PoiBoundary, PoiCursor, PoiEvent, PoiOutcome};
use crate::adaptors::{Adaptor, KeyboardAdaptor, KeyboardEvent};
use crate::event::{Subject, Subscription};
use crate::input::InputEvent;
use crate::poi::StoryPoint;
use crate::rig::CameraRig;

/// StoryPoints configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(default)]
pub struct StoryPointsOptions {
    /// Wrap around at either end instead of emitting `ExitPois`.
    pub cycle: bool,
    /// Navigate with the arrow keys.
    pub use_keyboard: bool,
}

impl Default for StoryPointsOptions {
    fn default() -> Self {
        Self {
            cycle: false,
            use_keyboard: true,
        }
    }
}

/// Navigates between absolute camera poses with
/// [`CameraRig::fly_to`].
#[derive(Debug)]
pub struct StoryPointsControls {
    options: StoryPointsOptions,
    pois: Vec<StoryPoint>,
    cursor: PoiCursor,
    keyboard: Option<(KeyboardAdaptor, Subscription<KeyboardEvent>)>,
    /// Navigation requested by key presses, applied on the next update.
    pending: Vec<bool>,
    enabled: bool,
    events: Subject<PoiEvent>,
}

impl StoryPointsControls {
    /// Scheme over `pois`, disabled.
    #[must_use]
    pub fn new(pois: Vec<StoryPoint>, options: StoryPointsOptions) -> Self {
        let keyboard = options.use_keyboard.then(|| {
            let mut adaptor = KeyboardAdaptor::new(poi_keyboard());
            let events = adaptor.subscribe();
            (adaptor, events)
        });
        Self {
            options,
            pois,
            cursor: PoiCursor::default(),
            keyboard,
            pending: Vec::new(),
            enabled: false,
            events: Subject::new(),
        }
    }

    /// Listen for navigation events.
    pub fn subscribe(&mut self) -> Subscription<PoiEvent> {
        self.events.subscribe()
    }

    /// The POIs, in navigation order.
    #[must_use]
    pub fn pois(&self) -> &[StoryPoint] {
        &self.pois
    }

    /// Append a POI.
    pub fn add_poi(&mut self, poi: StoryPoint) {
        self.pois.push(poi);
    }

    /// Remove and return the POI at `index`.
    pub fn remove_poi(&mut self, index: usize) -> Option<StoryPoint> {
        (index < self.pois.len()).then(|| self.pois.remove(index))
    }

    /// Last POI reached.
    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        self.cursor.current
    }

    /// POI being flown to.
    #[must_use]
    pub fn upcoming_index(&self) -> Option<usize> {
        self.cursor.upcoming
    }

    /// Fly to POI `index`.
    pub fn go_to_poi(&mut self, rig: &mut CameraRig, index: usize) -> PoiOutcome {
        self.sync();
        let Some(poi) = self.pois.get(index) else {
            return PoiOutcome::Ignored;
        };
        let outcome = rig.fly_to(
            poi.position,
            poi.quaternion,
            poi.duration,
            poi.ease,
            poi.use_slerp,
        );
        if !outcome.is_accepted() {
            return PoiOutcome::Ignored;
        }
        self.cursor.upcoming = Some(index);
        PoiOutcome::Started(index)
    }

    /// Fly to the next POI, wrapping or exiting at the end.
    pub fn next_poi(&mut self, rig: &mut CameraRig) -> PoiOutcome {
        self.step(rig, true)
    }

    /// Fly to the previous POI, wrapping or exiting at the start.
    pub fn prev_poi(&mut self, rig: &mut CameraRig) -> PoiOutcome {
        self.step(rig, false)
    }

    /// Commit rig events that arrived since the last call, so navigation
    /// steps from the POI the rig actually reached.
    fn sync(&mut self) {
        for event in self.cursor.poll() {
            self.events.emit(event);
        }
    }

    fn step(&mut self, rig: &mut CameraRig, forward: bool) -> PoiOutcome {
        self.sync();
        if rig.is_moving() {
            return PoiOutcome::Ignored;
        }
        match self.cursor.step(forward, self.pois.len(), self.options.cycle) {
            Ok(index) => self.go_to_poi(rig, index),
            Err(boundary) => self.exit(boundary),
        }
    }

    fn exit(&mut self, exit_from: PoiBoundary) -> PoiOutcome {
        log::debug!("exiting story points at {exit_from:?}");
        self.events.emit(PoiEvent::ExitPois { exit_from });
        PoiOutcome::Exited(exit_from)
    }
}

impl ControlScheme for StoryPointsControls {
    fn enable(&mut self, rig: &mut CameraRig) {
        self.cursor.attach(rig);
        if let Some((keyboard, _)) = &mut self.keyboard {
            keyboard.connect();
        }
        self.enabled = true;
    }

    fn disable(&mut self, _rig: &mut CameraRig) {
        self.cursor.detach();
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
        if let Some((keyboard, key_events)) = &mut self.keyboard {
            keyboard.update(now);
            for event in key_events.drain() {
                if let KeyboardEvent::Trigger { label } = event {
                    self.pending.push(label == "next");
                }
            }
        }
        for forward in std::mem::take(&mut self.pending) {
            let _ = self.step(rig, forward);
        }
        self.sync();
    }

    fn handle_event(&mut self, event: &InputEvent, now: Instant) -> bool {
        match &mut self.keyboard {
            Some((keyboard, _)) if self.enabled => keyboard.handle_event(event, now),
            _ => false,
        }
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}
