use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use web_time::Instant;

use super::{label_values, Adaptor, AdaptorMode, LabelValues};
use crate::damper::Damper;
use crate::event::{Subject, Subscription};
use crate::input::InputEvent;

/// Keyboard adaptor configuration.
///
/// `mapping` binds a label to any number of logical key values. In
/// continuous mode each key-down adds `incrementor` to the label's damped
/// target; in discrete mode each key-up fires a trigger for the label.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(default)]
pub struct KeyboardConfig {
    /// Continuous (damped values) or discrete (triggers).
    pub mode: AdaptorMode,
    /// Label → keys, e.g. `forward = ["ArrowUp", "w", "W"]`.
    pub mapping: BTreeMap<String, Vec<String>>,
    /// Damping factor in (0, 1] for continuous mode.
    pub damping_factor: f32,
    /// Amount each key-down adds to its label's target.
    pub incrementor: f32,
    /// Report mapped keys as consumed so the host stops propagation.
    pub prevent_bubbling: bool,
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        Self {
            mode: AdaptorMode::Discrete,
            mapping: movement_mapping(),
            damping_factor: 0.5,
            incrementor: 1.0,
            prevent_bubbling: true,
        }
    }
}

/// Arrow keys plus WASD, with U/N for vertical movement.
#[must_use]
pub fn movement_mapping() -> BTreeMap<String, Vec<String>> {
    fn entry(label: &str, keys: &[&str]) -> (String, Vec<String>) {
        (label.to_owned(), keys.iter().map(|&k| k.to_owned()).collect())
    }
    BTreeMap::from([
        entry("forward", &["ArrowUp", "w", "W"]),
        entry("backward", &["ArrowDown", "s", "S"]),
        entry("left", &["ArrowLeft", "a", "A"]),
        entry("right", &["ArrowRight", "d", "D"]),
        entry("up", &["u", "U"]),
        entry("down", &["n", "N"]),
    ])
}

/// Events emitted by [`KeyboardAdaptor`].
#[derive(Debug, Clone, PartialEq)]
pub enum KeyboardEvent {
    /// Continuous mode: damped per-label values and this frame's deltas.
    Update {
        /// Current value per label.
        values: LabelValues,
        /// Change applied this frame per label.
        deltas: LabelValues,
    },
    /// Discrete mode: a mapped key was released.
    Trigger {
        /// Label the key is mapped to.
        label: String,
    },
    /// Continuous mode: values settled and were reset to zero.
    InertiaComplete,
}

/// Maps key presses to labelled values or triggers.
#[derive(Debug)]
pub struct KeyboardAdaptor {
    config: KeyboardConfig,
    /// Key → labels, rebuilt from `config.mapping` on construction.
    key_to_labels: FxHashMap<String, Vec<String>>,
    damper: Damper,
    pending_triggers: Vec<String>,
    connected: bool,
    events: Subject<KeyboardEvent>,
}

impl KeyboardAdaptor {
    /// Create a disconnected adaptor.
    #[must_use]
    pub fn new(config: KeyboardConfig) -> Self {
        let mut key_to_labels: FxHashMap<String, Vec<String>> = FxHashMap::default();
        for (label, keys) in &config.mapping {
            for key in keys {
                key_to_labels
                    .entry(key.clone())
                    .or_default()
                    .push(label.clone());
            }
        }
        let damper = Damper::new(
            config.mapping.keys().map(|label| (label.clone(), Some(0.0))),
            config.damping_factor,
        );
        Self {
            config,
            key_to_labels,
            damper,
            pending_triggers: Vec::new(),
            connected: false,
            events: Subject::new(),
        }
    }

    /// Listen for this adaptor's events.
    pub fn subscribe(&mut self) -> Subscription<KeyboardEvent> {
        self.events.subscribe()
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &KeyboardConfig {
        &self.config
    }

    /// Labels bound to `key`.
    #[must_use]
    pub fn labels_for(&self, key: &str) -> &[String] {
        self.key_to_labels.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    fn on_key_down(&mut self, key: &str) -> bool {
        let Some(labels) = self.key_to_labels.get(key) else {
            return false;
        };
        if self.config.mode == AdaptorMode::Continuous {
            for label in labels {
                let _ = self.damper.add_to_target(label, self.config.incrementor);
            }
        }
        self.config.prevent_bubbling
    }

    fn on_key_up(&mut self, key: &str) -> bool {
        let Some(labels) = self.key_to_labels.get(key) else {
            return false;
        };
        if self.config.mode == AdaptorMode::Discrete {
            self.pending_triggers.extend(labels.iter().cloned());
        }
        self.config.prevent_bubbling
    }
}

impl Adaptor for KeyboardAdaptor {
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
            InputEvent::KeyDown { key } => self.on_key_down(key),
            InputEvent::KeyUp { key } => self.on_key_up(key),
            _ => false,
        }
    }

    fn update(&mut self, _now: Instant) {
        for label in std::mem::take(&mut self.pending_triggers) {
            self.events.emit(KeyboardEvent::Trigger { label });
        }

        if self.config.mode != AdaptorMode::Continuous || self.damper.reached_target() {
            return;
        }
        self.damper.update();
        self.events.emit(KeyboardEvent::Update {
            values: label_values(&self.damper.current_values()),
            deltas: label_values(&self.damper.delta_values()),
        });
        if self.damper.reached_target() {
            self.damper.reset_all(Some(0.0));
            self.events.emit(KeyboardEvent::InertiaComplete);
        }
    }

    fn is_enabled(&self) -> bool {
        self.connected
    }
}
