//! Named easing curves for camera transitions.
//!
//! Curves use GSAP-style names: `none`, `power1`..`power4`, `sine`, `expo`
//! and `circ`, with an optional direction suffix (`power2.in`,
//! `sine.inOut`). A bare curve name eases out.

use std::borrow::Cow;
use std::f32::consts::PI;
use std::fmt;
use std::str::FromStr;

use schemars::{JsonSchema, Schema, SchemaGenerator};
use serde::{Deserialize, Serialize};

use crate::error::RigError;

/// Shape of an easing curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EaseCurve {
    /// Linear interpolation (no easing).
    None,
    /// Quadratic.
    Power1,
    /// Cubic.
    Power2,
    /// Quartic.
    Power3,
    /// Quintic.
    Power4,
    /// Quarter sine wave.
    Sine,
    /// Base-2 exponential.
    Expo,
    /// Circular arc.
    Circ,
}

/// Which end of the transition the curve acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EaseDirection {
    /// Slow start, fast end.
    In,
    /// Fast start, slow end.
    #[default]
    Out,
    /// Slow at both ends.
    InOut,
}

/// An easing curve plus direction. Serializes as its name, e.g. `"power1"`
/// or `"sine.inOut"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ease {
    /// Curve shape.
    pub curve: EaseCurve,
    /// Curve direction.
    pub direction: EaseDirection,
}

impl Ease {
    /// Linear ease.
    pub const NONE: Ease = Ease::out(EaseCurve::None);
    /// Default camera transition ease (`power1.out`).
    pub const DEFAULT: Ease = Ease::out(EaseCurve::Power1);

    /// Ease-in variant of `curve`.
    #[must_use]
    pub const fn ease_in(curve: EaseCurve) -> Self {
        Self {
            curve,
            direction: EaseDirection::In,
        }
    }

    /// Ease-out variant of `curve`.
    #[must_use]
    pub const fn out(curve: EaseCurve) -> Self {
        Self {
            curve,
            direction: EaseDirection::Out,
        }
    }

    /// Ease-in-out variant of `curve`.
    #[must_use]
    pub const fn in_out(curve: EaseCurve) -> Self {
        Self {
            curve,
            direction: EaseDirection::InOut,
        }
    }

    /// Evaluate the curve at `t`.
    ///
    /// Input is clamped to [0.0, 1.0]; output is 0 at 0 and 1 at 1.
    #[inline]
    #[must_use]
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self.direction {
            EaseDirection::In => self.curve.ease_in(t),
            EaseDirection::Out => 1.0 - self.curve.ease_in(1.0 - t),
            EaseDirection::InOut => {
                if t < 0.5 {
                    self.curve.ease_in(2.0 * t) / 2.0
                } else {
                    1.0 - self.curve.ease_in(2.0 * (1.0 - t)) / 2.0
                }
            }
        }
    }
}

impl EaseCurve {
    /// The ease-in form of the curve; the other directions are derived
    /// from it by reflection.
    fn ease_in(self, t: f32) -> f32 {
        match self {
            Self::None => t,
            Self::Power1 => t.powi(2),
            Self::Power2 => t.powi(3),
            Self::Power3 => t.powi(4),
            Self::Power4 => t.powi(5),
            Self::Sine => 1.0 - (t * PI / 2.0).cos(),
            Self::Expo => {
                if t <= 0.0 {
                    0.0
                } else {
                    2.0_f32.powf(10.0 * (t - 1.0))
                }
            }
            Self::Circ => 1.0 - (1.0 - t * t).max(0.0).sqrt(),
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Power1 => "power1",
            Self::Power2 => "power2",
            Self::Power3 => "power3",
            Self::Power4 => "power4",
            Self::Sine => "sine",
            Self::Expo => "expo",
            Self::Circ => "circ",
        }
    }
}

impl Default for Ease {
    #[inline]
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl FromStr for Ease {
    type Err = RigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let (name, direction) = match lower.split_once('.') {
            Some((name, "in")) => (name, EaseDirection::In),
            Some((name, "out")) => (name, EaseDirection::Out),
            Some((name, "inout")) => (name, EaseDirection::InOut),
            Some(_) => return Err(RigError::UnknownEase(s.to_owned())),
            None => (lower.as_str(), EaseDirection::Out),
        };
        let curve = match name {
            "none" | "linear" | "power0" => EaseCurve::None,
            "power1" | "quad" => EaseCurve::Power1,
            "power2" | "cubic" => EaseCurve::Power2,
            "power3" | "quart" => EaseCurve::Power3,
            "power4" | "quint" | "strong" => EaseCurve::Power4,
            "sine" => EaseCurve::Sine,
            "expo" => EaseCurve::Expo,
            "circ" => EaseCurve::Circ,
            _ => return Err(RigError::UnknownEase(s.to_owned())),
        };
        Ok(Self { curve, direction })
    }
}

impl fmt::Display for Ease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.curve == EaseCurve::None {
            return f.write_str("none");
        }
        let suffix = match self.direction {
            EaseDirection::In => "in",
            EaseDirection::Out => "out",
            EaseDirection::InOut => "inOut",
        };
        write!(f, "{}.{suffix}", self.curve.name())
    }
}

impl JsonSchema for Ease {
    fn inline_schema() -> bool {
        true
    }

    fn schema_name() -> Cow<'static, str> {
        "Ease".into()
    }

    fn json_schema(generator: &mut SchemaGenerator) -> Schema {
        String::json_schema(generator)
    }
}

impl TryFrom<String> for Ease {
    type Error = RigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Ease> for String {
    fn from(ease: Ease) -> Self {
        ease.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [EaseCurve; 8] = [
        EaseCurve::None,
        EaseCurve::Power1,
        EaseCurve::Power2,
        EaseCurve::Power3,
        EaseCurve::Power4,
        EaseCurve::Sine,
        EaseCurve::Expo,
        EaseCurve::Circ,
    ];

    #[test]
    fn test_endpoints_for_every_curve_and_direction() {
        for curve in ALL {
            for ease in [Ease::ease_in(curve), Ease::out(curve), Ease::in_out(curve)] {
                assert!(ease.evaluate(0.0).abs() < 1e-3, "{ease} at 0");
                assert!((ease.evaluate(1.0) - 1.0).abs() < 1e-3, "{ease} at 1");
            }
        }
    }

    #[test]
    fn test_input_clamping() {
        assert_eq!(Ease::NONE.evaluate(-0.5), 0.0);
        assert_eq!(Ease::NONE.evaluate(1.5), 1.0);
        assert_eq!(Ease::DEFAULT.evaluate(2.0), 1.0);
    }

    #[test]
    fn test_power1_out_shape() {
        // 1 - (1 - t)^2
        assert!((Ease::DEFAULT.evaluate(0.5) - 0.75).abs() < 1e-6);
        assert!((Ease::ease_in(EaseCurve::Power1).evaluate(0.5) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_in_out_is_symmetric() {
        let ease = Ease::in_out(EaseCurve::Power2);
        assert!((ease.evaluate(0.5) - 0.5).abs() < 1e-6);
        let a = ease.evaluate(0.2);
        let b = ease.evaluate(0.8);
        assert!((a + b - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("power1".parse::<Ease>().ok(), Some(Ease::DEFAULT));
        assert_eq!(
            "sine.inOut".parse::<Ease>().ok(),
            Some(Ease::in_out(EaseCurve::Sine))
        );
        assert_eq!(
            "expo.in".parse::<Ease>().ok(),
            Some(Ease::ease_in(EaseCurve::Expo))
        );
        assert_eq!("none".parse::<Ease>().ok(), Some(Ease::NONE));
        assert!("bounce".parse::<Ease>().is_err());
        assert!("power1.sideways".parse::<Ease>().is_err());
    }

    #[test]
    fn test_display_parses_back() {
        for curve in ALL {
            let ease = Ease::in_out(curve);
            let parsed: Ease = ease.to_string().parse().unwrap();
            if curve == EaseCurve::None {
                assert_eq!(parsed, Ease::NONE);
            } else {
                assert_eq!(parsed, ease);
            }
        }
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&Ease::in_out(EaseCurve::Circ)).unwrap();
        assert_eq!(json, "\"circ.inOut\"");
        let ease: Ease = serde_json::from_str("\"power3\"").unwrap();
        assert_eq!(ease, Ease::out(EaseCurve::Power3));
    }
}
