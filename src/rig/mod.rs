//! The camera rig: a body/head/eyes transform hierarchy driven by semantic
//! actions, tweened transitions and animation-clip scrubbing.
//!
//! Rig operations never fail. Requests that conflict with the rig's state
//! (a transition already in flight, a detached camera, no clip bound) are
//! dropped and reported through [`ActionOutcome`] or [`TransitionOutcome`].

/// Actions, axes and the up-axis table.
pub mod axis;
mod core;
/// Rig nodes and the camera.
pub mod node;
mod transition;

pub use axis::{ActionAxes, Axis, CameraAction, RigComponent, TranslateAlong};
pub use self::core::{CameraRig, RigEvent, RigOptions};
pub use node::{Camera, Projection, Transform};

/// Why the rig dropped a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// A transition is in flight.
    InTransit,
    /// The camera is detached from the rig.
    Disassembled,
    /// The request needs an animation clip and none is bound.
    NoAnimationClip,
    /// The keyframe index is past the end of the clip's first track.
    KeyframeOutOfRange,
    /// Zoom on an orthographic camera.
    Orthographic,
}

/// Result of a direct rig write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The write was applied.
    Applied,
    /// The write was dropped.
    Rejected(Rejection),
}

impl ActionOutcome {
    /// Whether the write was applied.
    #[must_use]
    pub fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Result of a transition request or clip cursor write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The request was accepted.
    Accepted,
    /// The request was dropped.
    Rejected(Rejection),
}

impl TransitionOutcome {
    /// Whether the request was accepted.
    #[must_use]
    pub fn is_accepted(self) -> bool {
        matches!(self, Self::Accepted)
    }
}
