use std::f32::consts::PI;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use web_time::Instant;

use super::ControlScheme;
use crate::adaptors::{Adaptor, PointerAdaptor, PointerConfig, PointerEvent};
use crate::event::Subscription;
use crate::input::InputEvent;
use crate::rig::{CameraAction, CameraRig, RigComponent};

/// ThreeDOF configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(default)]
pub struct ThreeDofOptions {
    /// Pointer adaptor settings.
    pub pointer: PointerConfig,
    /// Radians of pan per unit of normalized horizontal travel.
    pub pan_factor: f32,
    /// Radians of tilt per unit of normalized vertical travel.
    pub tilt_factor: f32,
    /// World units of truck per unit of horizontal travel.
    pub truck_factor: f32,
    /// World units of pedestal per unit of vertical travel.
    pub pedestal_factor: f32,
}

impl Default for ThreeDofOptions {
    fn default() -> Self {
        Self {
            pointer: PointerConfig {
                damping_factor: 0.7,
                ..PointerConfig::default()
            },
            pan_factor: PI / 20.0,
            tilt_factor: PI / 20.0,
            truck_factor: 1.0,
            pedestal_factor: 1.0,
        }
    }
}

/// Subtle look-around following the hovering mouse.
///
/// Only writes the eyes node, so it can be layered over a POI scheme and
/// keeps working while the rig is in transit.
#[derive(Debug)]
pub struct ThreeDofControls {
    options: ThreeDofOptions,
    pointer: PointerAdaptor,
    pointer_events: Subscription<PointerEvent>,
    enabled: bool,
}

impl ThreeDofControls {
    /// Scheme for a viewport of `width` x `height` pixels, disabled.
    #[must_use]
    pub fn new(options: ThreeDofOptions, width: f32, height: f32) -> Self {
        let mut pointer = PointerAdaptor::new(options.pointer.clone(), width, height);
        let pointer_events = pointer.subscribe();
        Self {
            options,
            pointer,
            pointer_events,
            enabled: false,
        }
    }
}

impl ControlScheme for ThreeDofControls {
    fn enable(&mut self, _rig: &mut CameraRig) {
        self.pointer.connect();
        self.enabled = true;
    }

    fn disable(&mut self, _rig: &mut CameraRig) {
        self.pointer.disconnect();
        self.enabled = false;
    }

    fn update(&mut self, rig: &mut CameraRig, now: Instant) {
        if !self.enabled {
            return;
        }
        self.pointer.update(now);
        let eyes = Some(RigComponent::Eyes);
        for PointerEvent::Update {
            deltas,
            pointer_count,
            ..
        } in self.pointer_events.drain()
        {
            if pointer_count != 0 {
                continue;
            }
            let ThreeDofOptions {
                pan_factor,
                tilt_factor,
                truck_factor,
                pedestal_factor,
                ..
            } = self.options;
            let _ = rig.perform(CameraAction::Pan, -deltas.x * pan_factor, eyes);
            let _ = rig.perform(CameraAction::Tilt, -deltas.y * tilt_factor, eyes);
            let _ = rig.perform(CameraAction::Truck, -deltas.x * truck_factor, eyes);
            let _ = rig.perform(CameraAction::Pedestal, deltas.y * pedestal_factor, eyes);
        }
    }

    fn handle_event(&mut self, event: &InputEvent, now: Instant) -> bool {
        if !self.enabled {
            return false;
        }
        self.pointer.handle_event(event, now)
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}
