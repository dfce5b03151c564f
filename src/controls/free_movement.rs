use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use web_time::Instant;

use super::ControlScheme;
use crate::adaptors::keyboard::movement_mapping;
use crate::adaptors::{
    Adaptor, AdaptorMode, KeyboardAdaptor, KeyboardConfig, KeyboardEvent, LabelValues,
    PointerAdaptor, PointerConfig, PointerEvent, WheelAdaptor, WheelConfig, WheelEvent,
};
use crate::event::Subscription;
use crate::input::InputEvent;
use crate::rig::{CameraAction, CameraRig};

/// FreeMovement configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(default)]
pub struct FreeMovementOptions {
    /// Keyboard damping factor in (0, 1].
    pub keyboard_damping: f32,
    /// World units per unit of key input.
    pub keyboard_scale: f32,
    /// Pointer damping factor in (0, 1].
    pub pointer_damping: f32,
    /// Radians per unit of normalized pointer travel.
    pub pointer_scale: f32,
    /// Wheel damping factor in (0, 1].
    pub wheel_damping: f32,
    /// World units per pixel of wheel travel.
    pub wheel_scale: f32,
}

impl Default for FreeMovementOptions {
    fn default() -> Self {
        Self {
            keyboard_damping: 0.3,
            keyboard_scale: 0.5,
            pointer_damping: 0.3,
            pointer_scale: 4.0,
            wheel_damping: 0.25,
            wheel_scale: 0.01,
        }
    }
}

/// Fly-through: keys move, a single-pointer drag looks around, the wheel
/// dollies and trucks.
#[derive(Debug)]
pub struct FreeMovementControls {
    options: FreeMovementOptions,
    keyboard: KeyboardAdaptor,
    keyboard_events: Subscription<KeyboardEvent>,
    pointer: PointerAdaptor,
    pointer_events: Subscription<PointerEvent>,
    wheel: WheelAdaptor,
    wheel_events: Subscription<WheelEvent>,
    enabled: bool,
}

impl FreeMovementControls {
    /// Scheme for a viewport of `width` x `height` pixels, disabled.
    #[must_use]
    pub fn new(options: FreeMovementOptions, width: f32, height: f32) -> Self {
        let mut keyboard = KeyboardAdaptor::new(KeyboardConfig {
            mode: AdaptorMode::Continuous,
            mapping: movement_mapping(),
            damping_factor: options.keyboard_damping,
            ..KeyboardConfig::default()
        });
        let keyboard_events = keyboard.subscribe();
        let mut pointer = PointerAdaptor::new(
            PointerConfig {
                damping_factor: options.pointer_damping,
                ..PointerConfig::default()
            },
            width,
            height,
        );
        let pointer_events = pointer.subscribe();
        let mut wheel = WheelAdaptor::new(WheelConfig {
            mode: AdaptorMode::Continuous,
            damping_factor: options.wheel_damping,
            ..WheelConfig::default()
        });
        let wheel_events = wheel.subscribe();
        Self {
            options,
            keyboard,
            keyboard_events,
            pointer,
            pointer_events,
            wheel,
            wheel_events,
            enabled: false,
        }
    }

    fn apply_keys(&self, rig: &mut CameraRig, deltas: &LabelValues) {
        let key = |label: &str| deltas.get(label).copied().unwrap_or(0.0);
        let scale = self.options.keyboard_scale;
        let moves = [
            (CameraAction::Dolly, key("backward") - key("forward")),
            (CameraAction::Truck, key("right") - key("left")),
            (CameraAction::Pedestal, key("up") - key("down")),
        ];
        for (action, amount) in moves {
            if amount != 0.0 {
                let _ = rig.perform(action, amount * scale, None);
            }
        }
    }
}

impl ControlScheme for FreeMovementControls {
    fn enable(&mut self, _rig: &mut CameraRig) {
        self.keyboard.connect();
        self.pointer.connect();
        self.wheel.connect();
        self.enabled = true;
    }

    fn disable(&mut self, _rig: &mut CameraRig) {
        self.keyboard.disconnect();
        self.pointer.disconnect();
        self.wheel.disconnect();
        self.enabled = false;
    }

    fn update(&mut self, rig: &mut CameraRig, now: Instant) {
        if !self.enabled {
            return;
        }
        self.keyboard.update(now);
        self.pointer.update(now);
        self.wheel.update(now);

        for event in self.keyboard_events.drain() {
            if let KeyboardEvent::Update { deltas, .. } = event {
                self.apply_keys(rig, &deltas);
            }
        }
        for PointerEvent::Update {
            deltas,
            pointer_count,
            ..
        } in self.pointer_events.drain()
        {
            if pointer_count != 1 {
                continue;
            }
            let scale = self.options.pointer_scale;
            let _ = rig.perform(CameraAction::Pan, deltas.x * scale, None);
            let _ = rig.perform(CameraAction::Tilt, deltas.y * scale, None);
        }
        for event in self.wheel_events.drain() {
            if let WheelEvent::Update { deltas, .. } = event {
                let scale = self.options.wheel_scale;
                let _ = rig.perform(CameraAction::Dolly, deltas.y * scale, None);
                let _ = rig.perform(CameraAction::Truck, deltas.x * scale, None);
            }
        }
    }

    fn handle_event(&mut self, event: &InputEvent, now: Instant) -> bool {
        if !self.enabled {
            return false;
        }
        let key = self.keyboard.handle_event(event, now);
        let pointer = self.pointer.handle_event(event, now);
        let wheel = self.wheel.handle_event(event, now);
        key || pointer || wheel
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}
