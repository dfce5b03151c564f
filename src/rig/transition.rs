use glam::{Quat, Vec3, Vec4};

use crate::animation::{Tween, TweenFrame};

/// The rig's single transition slot.
#[derive(Debug, Clone, Default)]
pub(crate) enum TransitionState {
    /// Nothing in flight.
    #[default]
    Idle,
    /// A transition is running; new requests are rejected until it ends.
    Transitioning(Transition),
}

/// An in-flight transition.
#[derive(Debug, Clone)]
pub(crate) struct Transition {
    pub(crate) tween: Tween,
    pub(crate) kind: TransitionKind,
}

/// What a transition interpolates.
#[derive(Debug, Clone)]
pub(crate) enum TransitionKind {
    /// World pose, written to body translation and head rotation.
    Pose(PoseTransition),
    /// Animation clip cursor time.
    Keyframe {
        from_time: f32,
        to_time: f32,
    },
}

#[derive(Debug, Clone)]
pub(crate) struct PoseTransition {
    pub(crate) from_position: Vec3,
    pub(crate) to_position: Vec3,
    pub(crate) from_rotation: Quat,
    pub(crate) to_rotation: Quat,
    pub(crate) use_slerp: bool,
}

impl PoseTransition {
    /// Interpolated pose at eased progress `t`.
    pub(crate) fn sample(&self, t: f32) -> (Vec3, Quat) {
        let position = self.from_position.lerp(self.to_position, t);
        let rotation = if self.use_slerp {
            self.from_rotation.slerp(self.to_rotation, t)
        } else {
            // Component-wise blend, no hemisphere correction
            Vec4::from(self.from_rotation)
                .lerp(Vec4::from(self.to_rotation), t)
                .try_normalize()
                .map_or(self.to_rotation, Quat::from_vec4)
        };
        (position, rotation)
    }
}

impl Transition {
    pub(crate) fn tick(&mut self, now: web_time::Instant) -> TweenFrame {
        self.tween.tick(now)
    }
}
