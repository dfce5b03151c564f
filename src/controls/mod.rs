//! Control schemes: policies that turn adaptor events into rig calls.
//!
//! Schemes are independent of each other and may share one
//! [`CameraRig`]; they only use the rig's public action vocabulary.
//! Each frame the host forwards raw input to
//! [`ControlScheme::handle_event`], then calls [`ControlScheme::update`]
//! before [`CameraRig::update`].

/// Keyboard, pointer and wheel fly-through.
pub mod free_movement;
/// Clip scrubbing over wheel/swipe/keyboard navigated frames.
pub mod path_points;
/// Clip scrubbing by page scroll with range callbacks.
pub mod scroll;
/// Absolute-pose points of interest.
pub mod story_points;
/// Hover-driven look-around on the eyes node.
pub mod three_dof;

pub use free_movement::{FreeMovementControls, FreeMovementOptions};
pub use path_points::{PathPointsControls, PathPointsOptions};
pub use scroll::{ScrollAction, ScrollControls, ScrollControlsOptions};
pub use story_points::{StoryPointsControls, StoryPointsOptions};
pub use three_dof::{ThreeDofControls, ThreeDofOptions};

use std::collections::BTreeMap;

use web_time::Instant;

use crate::adaptors::{AdaptorMode, KeyboardConfig};
use crate::event::Subscription;
use crate::input::InputEvent;
use crate::rig::{CameraRig, RigEvent};

/// Common lifecycle of a control scheme.
pub trait ControlScheme {
    /// Connect adaptors and start listening to `rig`.
    fn enable(&mut self, rig: &mut CameraRig);
    /// Disconnect adaptors. Clip-driven schemes unpack `rig` so the eyes
    /// are free again for whatever scheme runs next.
    fn disable(&mut self, rig: &mut CameraRig);
    /// Step adaptors and apply their events to `rig`. Call once per frame.
    fn update(&mut self, rig: &mut CameraRig, now: Instant);
    /// Forward raw input. Returns whether any adaptor consumed it.
    fn handle_event(&mut self, event: &InputEvent, now: Instant) -> bool;
    /// Whether the scheme is enabled.
    fn is_enabled(&self) -> bool;
}

/// Which end of the POI list navigation fell off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoiBoundary {
    /// Before the first POI.
    Start,
    /// Past the last POI.
    End,
}

/// Events emitted by POI-based schemes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PoiEvent {
    /// Transition progress between POIs.
    Update {
        /// Last POI reached.
        current_index: Option<usize>,
        /// POI being flown to, while a transition is in flight.
        upcoming_index: Option<usize>,
        /// Transition progress in [0, 1].
        progress: f32,
    },
    /// Navigation went past the first or last POI without cycling.
    ExitPois {
        /// Boundary crossed.
        exit_from: PoiBoundary,
    },
}

/// Result of a POI navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoiOutcome {
    /// A transition to this index started.
    Started(usize),
    /// Navigation fell off the list; an `ExitPois` event was emitted.
    Exited(PoiBoundary),
    /// The request was dropped (transition in flight, no clip, empty list
    /// or index out of range).
    Ignored,
}

/// Current/upcoming index bookkeeping shared by the POI schemes.
#[derive(Debug, Default)]
pub(crate) struct PoiCursor {
    pub(crate) current: Option<usize>,
    pub(crate) upcoming: Option<usize>,
    rig_events: Option<Subscription<RigEvent>>,
}

impl PoiCursor {
    pub(crate) fn attach(&mut self, rig: &mut CameraRig) {
        self.rig_events = Some(rig.subscribe());
    }

    pub(crate) fn detach(&mut self) {
        self.rig_events = None;
    }

    /// Candidate index one step from the current POI, or the boundary
    /// crossed when cycling is off.
    pub(crate) fn step(&self, forward: bool, len: usize, cycle: bool) -> Result<usize, PoiBoundary> {
        let target = match (self.current, forward) {
            (None, true) => Some(0),
            (Some(i), true) => Some(i + 1),
            (None | Some(0), false) => None,
            (Some(i), false) => Some(i - 1),
        };
        match target {
            Some(index) if index < len => Ok(index),
            _ if cycle && len > 0 => Ok(if forward { 0 } else { len - 1 }),
            _ if forward => Err(PoiBoundary::End),
            _ => Err(PoiBoundary::Start),
        }
    }

    /// Translate the rig's transition events into POI updates. Events
    /// from transitions this scheme did not start are skipped.
    pub(crate) fn poll(&mut self) -> Vec<PoiEvent> {
        let Some(rig_events) = &self.rig_events else {
            return Vec::new();
        };
        let mut out = Vec::new();
        for event in rig_events.drain() {
            if self.upcoming.is_none() {
                continue;
            }
            let progress = match event {
                RigEvent::CameraMoveStart => 0.0,
                RigEvent::CameraMoveUpdate { progress } => progress,
                RigEvent::CameraMoveEnd => {
                    self.current = self.upcoming.take();
                    1.0
                }
            };
            out.push(PoiEvent::Update {
                current_index: self.current,
                upcoming_index: self.upcoming,
                progress,
            });
        }
        out
    }
}

/// Discrete keyboard bindings for POI navigation.
pub(crate) fn poi_keyboard() -> KeyboardConfig {
    let keys = |names: &[&str]| names.iter().map(|&k| k.to_owned()).collect::<Vec<_>>();
    KeyboardConfig {
        mode: AdaptorMode::Discrete,
        mapping: BTreeMap::from([
            ("next".to_owned(), keys(&["ArrowDown", "ArrowRight"])),
            ("prev".to_owned(), keys(&["ArrowUp", "ArrowLeft"])),
        ]),
        ..KeyboardConfig::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cursor(current: Option<usize>) -> PoiCursor {
        PoiCursor {
            current,
            ..PoiCursor::default()
        }
    }

    #[test]
    fn step_without_cycling_reports_boundaries() {
        assert_eq!(cursor(None).step(true, 3, false), Ok(0));
        assert_eq!(cursor(Some(1)).step(true, 3, false), Ok(2));
        assert_eq!(cursor(Some(2)).step(true, 3, false), Err(PoiBoundary::End));
        assert_eq!(cursor(Some(0)).step(false, 3, false), Err(PoiBoundary::Start));
        assert_eq!(cursor(None).step(false, 3, false), Err(PoiBoundary::Start));
    }

    #[test]
    fn step_with_cycling_wraps() {
        assert_eq!(cursor(Some(2)).step(true, 3, true), Ok(0));
        assert_eq!(cursor(Some(0)).step(false, 3, true), Ok(2));
        assert_eq!(cursor(None).step(true, 0, true), Err(PoiBoundary::End));
    }
}
