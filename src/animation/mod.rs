//! Easing curves, tweens and keyframe clips used by rig transitions.
//!
//! The rig never blocks on an animation: a [`Tween`] is sampled once per
//! frame from [`CameraRig::update`](crate::rig::CameraRig::update), and an
//! [`AnimationClip`] is only ever read at an explicit cursor time.

/// Keyframe tracks and clips.
pub mod clip;
/// Named ease curves.
pub mod easing;
/// Time-based progress with an ease.
pub mod tween;

pub use clip::{AnimationClip, KeyframeTrack, TrackKind};
pub use easing::{Ease, EaseCurve, EaseDirection};
pub use tween::{Tween, TweenFrame};
