use glam::Vec2;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use web_time::{Duration, Instant};

use super::{threshold_sign, Adaptor, AdaptorMode};
use crate::damper::Damper;
use crate::event::{Subject, Subscription};
use crate::input::InputEvent;

/// Wheel adaptor configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(default)]
pub struct WheelConfig {
    /// Continuous (damped accumulation) or discrete (threshold triggers).
    pub mode: AdaptorMode,
    /// Damping factor in (0, 1] for continuous mode.
    pub damping_factor: f32,
    /// Minimum |delta_x| that fires a discrete trigger.
    pub threshold_x: f32,
    /// Minimum |delta_y| that fires a discrete trigger.
    pub threshold_y: f32,
    /// Quiet period after a trigger during which further triggers are
    /// suppressed, in milliseconds.
    pub debounce_ms: u64,
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            mode: AdaptorMode::Continuous,
            damping_factor: 0.5,
            threshold_x: 15.0,
            threshold_y: 15.0,
            debounce_ms: 700,
        }
    }
}

/// Events emitted by [`WheelAdaptor`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WheelEvent {
    /// Continuous mode: accumulated scroll, damped.
    Update {
        /// Current accumulated value per axis.
        values: Vec2,
        /// Change applied this frame per axis.
        deltas: Vec2,
    },
    /// Discrete mode: a wheel event crossed a threshold.
    Trigger {
        /// Horizontal direction in {-1, 0, 1}.
        x: i8,
        /// Vertical direction in {-1, 0, 1}.
        y: i8,
    },
    /// Continuous mode: values settled and were reset to zero.
    InertiaComplete,
}

/// Turns wheel input into damped scroll values or debounced triggers.
#[derive(Debug)]
pub struct WheelAdaptor {
    config: WheelConfig,
    damper: Damper,
    last_trigger: Option<Instant>,
    pending_trigger: Option<(i8, i8)>,
    connected: bool,
    events: Subject<WheelEvent>,
}

impl WheelAdaptor {
    /// Create a disconnected adaptor.
    #[must_use]
    pub fn new(config: WheelConfig) -> Self {
        let damper = Damper::new([("x", Some(0.0)), ("y", Some(0.0))], config.damping_factor);
        Self {
            config,
            damper,
            last_trigger: None,
            pending_trigger: None,
            connected: false,
            events: Subject::new(),
        }
    }

    /// Listen for this adaptor's events.
    pub fn subscribe(&mut self) -> Subscription<WheelEvent> {
        self.events.subscribe()
    }

    /// Whether the damped values have settled.
    #[must_use]
    pub fn reached_target(&self) -> bool {
        self.damper.reached_target()
    }

    fn values(&self) -> Vec2 {
        Vec2::new(
            self.damper.current("x").unwrap_or(0.0),
            self.damper.current("y").unwrap_or(0.0),
        )
    }

    fn on_wheel(&mut self, delta_x: f32, delta_y: f32, now: Instant) {
        match self.config.mode {
            AdaptorMode::Continuous => {
                let _ = self.damper.add_to_target("x", delta_x);
                let _ = self.damper.add_to_target("y", delta_y);
            }
            AdaptorMode::Discrete => {
                let debounce = Duration::from_millis(self.config.debounce_ms);
                if self
                    .last_trigger
                    .is_some_and(|t| now.saturating_duration_since(t) < debounce)
                {
                    return;
                }
                let x = threshold_sign(delta_x, self.config.threshold_x);
                let y = threshold_sign(delta_y, self.config.threshold_y);
                if x != 0 || y != 0 {
                    self.last_trigger = Some(now);
                    self.pending_trigger = Some((x, y));
                }
            }
        }
    }
}

impl Adaptor for WheelAdaptor {
    fn connect(&mut self) {
        self.connected = true;
    }

    fn disconnect(&mut self) {
        self.connected = false;
    }

    fn handle_event(&mut self, event: &InputEvent, now: Instant) -> bool {
        if !self.connected {
            return false;
        }
        match event {
            InputEvent::Wheel { delta_x, delta_y } => {
                self.on_wheel(*delta_x, *delta_y, now);
                true
            }
            _ => false,
        }
    }

    fn update(&mut self, _now: Instant) {
        if let Some((x, y)) = self.pending_trigger.take() {
            self.events.emit(WheelEvent::Trigger { x, y });
        }

        if self.config.mode != AdaptorMode::Continuous || self.damper.reached_target() {
            return;
        }
        self.damper.update();
        let deltas = Vec2::new(
            self.damper.delta("x").unwrap_or(0.0),
            self.damper.delta("y").unwrap_or(0.0),
        );
        self.events.emit(WheelEvent::Update {
            values: self.values(),
            deltas,
        });
        if self.damper.reached_target() {
            self.damper.reset_all(Some(0.0));
            self.events.emit(WheelEvent::InertiaComplete);
        }
    }

    fn is_enabled(&self) -> bool {
        self.connected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wheel(delta_x: f32, delta_y: f32) -> InputEvent {
        InputEvent::Wheel { delta_x, delta_y }
    }

    #[test]
    fn continuous_wheel_settles_on_accumulated_delta() {
        let now = Instant::now();
        let mut adaptor = WheelAdaptor::new(WheelConfig {
            damping_factor: 0.25,
            ..WheelConfig::default()
        });
        let events = adaptor.subscribe();
        adaptor.connect();
        assert!(adaptor.handle_event(&wheel(0.0, 100.0), now));

        let mut last_values = Vec2::ZERO;
        let mut ticks = 0;
        let mut completed = false;
        while !completed {
            adaptor.update(now);
            ticks += 1;
            assert!(ticks <= 60, "wheel inertia never settled");
            for event in events.drain() {
                match event {
                    WheelEvent::Update { values, deltas } => {
                        assert_eq!(values.x, 0.0);
                        assert_eq!(deltas.x, 0.0);
                        assert!(values.y >= last_values.y);
                        last_values = values;
                    }
                    WheelEvent::InertiaComplete => completed = true,
                    WheelEvent::Trigger { .. } => panic!("no triggers in continuous mode"),
                }
            }
        }
        // 100 * 0.75^(k-1) first drops below epsilon at k = 42
        assert_eq!(ticks, 42);
        assert_eq!(last_values.y, 100.0);
        // Reset to zero after inertia completes
        assert!(adaptor.reached_target());
        assert_eq!(adaptor.values(), Vec2::ZERO);
    }

    #[test]
    fn discrete_wheel_triggers_past_threshold_then_debounces() {
        let t0 = Instant::now();
        let mut adaptor = WheelAdaptor::new(WheelConfig {
            mode: AdaptorMode::Discrete,
            ..WheelConfig::default()
        });
        let events = adaptor.subscribe();
        adaptor.connect();

        let _ = adaptor.handle_event(&wheel(3.0, 10.0), t0);
        adaptor.update(t0);
        assert!(events.is_empty());

        let _ = adaptor.handle_event(&wheel(3.0, -40.0), t0);
        adaptor.update(t0);
        assert_eq!(events.drain(), vec![WheelEvent::Trigger { x: 0, y: -1 }]);

        let later = t0 + Duration::from_millis(300);
        let _ = adaptor.handle_event(&wheel(0.0, -80.0), later);
        adaptor.update(later);
        assert!(events.is_empty());

        let after_debounce = t0 + Duration::from_millis(800);
        let _ = adaptor.handle_event(&wheel(20.0, 0.0), after_debounce);
        adaptor.update(after_debounce);
        assert_eq!(events.drain(), vec![WheelEvent::Trigger { x: 1, y: 0 }]);
    }
}
