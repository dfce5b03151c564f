//! Input adaptors: normalize raw input into damped signals or discrete
//! triggers.
//!
//! Every adaptor follows the same cadence. [`Adaptor::handle_event`] may be
//! called at any rate and only records state (damper targets, pending
//! triggers). [`Adaptor::update`] is called once per rendered frame; it
//! steps the damper and is the only place observable events are emitted.

/// Keyboard keys mapped to labels, continuous or discrete.
pub mod keyboard;
/// Pointer position tracking with debounced contact counting.
pub mod pointer;
/// Element scroll progress.
pub mod scroll;
/// Touch/pen swipe gestures.
pub mod swipe;
/// Mouse wheel and trackpad scroll, continuous or discrete.
pub mod wheel;

pub use keyboard::{KeyboardAdaptor, KeyboardConfig, KeyboardEvent};
pub use pointer::{PointerAdaptor, PointerConfig, PointerEvent};
pub use scroll::{ElementBounds, ScrollAdaptor, ScrollConfig, ScrollEvent, ScrollOffset};
pub use swipe::{SwipeAdaptor, SwipeConfig, SwipeEvent};
pub use wheel::{WheelAdaptor, WheelConfig, WheelEvent};

use rustc_hash::FxHashMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use web_time::Instant;

use crate::damper::DamperValues;
use crate::input::InputEvent;

/// Label → value map carried by continuous adaptor events.
pub type LabelValues = FxHashMap<String, f32>;

/// How an adaptor reports input.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum AdaptorMode {
    /// One-shot triggers when input crosses a threshold.
    Discrete,
    /// Damped values every frame until inertia settles.
    #[default]
    Continuous,
}

/// Capability set shared by all input adaptors.
pub trait Adaptor {
    /// Start accepting input. Callers must not connect twice.
    fn connect(&mut self);

    /// Stop accepting input. Pending state is kept.
    fn disconnect(&mut self);

    /// Record a raw input event. Returns `true` when the adaptor consumed
    /// it and the host should stop propagating it.
    fn handle_event(&mut self, event: &InputEvent, now: Instant) -> bool;

    /// Advance damping and emit pending events.
    fn update(&mut self, now: Instant);

    /// Whether the adaptor is connected.
    fn is_enabled(&self) -> bool;
}

/// Flatten damper values into plain floats; unbaselined keys read as zero.
pub(crate) fn label_values(values: &DamperValues) -> LabelValues {
    values
        .iter()
        .map(|(key, value)| (key.clone(), value.unwrap_or(0.0)))
        .collect()
}

/// Sign of `delta` when its magnitude reaches `threshold`, else zero.
pub(crate) fn threshold_sign(delta: f32, threshold: f32) -> i8 {
    if delta.abs() >= threshold && delta != 0.0 {
        if delta > 0.0 {
            1
        } else {
            -1
        }
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_sign_respects_magnitude() {
        assert_eq!(threshold_sign(70.0, 60.0), 1);
        assert_eq!(threshold_sign(-60.0, 60.0), -1);
        assert_eq!(threshold_sign(59.9, 60.0), 0);
        assert_eq!(threshold_sign(0.0, 0.0), 0);
    }

    #[test]
    fn label_values_zero_fill_nulls() {
        let mut values = DamperValues::default();
        let _ = values.insert("a".into(), Some(2.0));
        let _ = values.insert("b".into(), None);
        let flat = label_values(&values);
        assert_eq!(flat.get("a"), Some(&2.0));
        assert_eq!(flat.get("b"), Some(&0.0));
    }
}
