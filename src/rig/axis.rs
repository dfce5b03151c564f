//! Semantic camera actions and their mapping onto X/Y/Z.

use glam::{EulerRot, Vec3};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A world or local coordinate axis.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// The X axis.
    X,
    /// The Y axis.
    #[default]
    Y,
    /// The Z axis.
    Z,
}

impl Axis {
    /// Unit vector along this axis.
    #[must_use]
    pub fn unit(self) -> Vec3 {
        match self {
            Self::X => Vec3::X,
            Self::Y => Vec3::Y,
            Self::Z => Vec3::Z,
        }
    }
}

/// Semantic camera verbs, independent of the literal axes they act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum CameraAction {
    /// Rotate around the up axis.
    Pan,
    /// Rotate around the horizontal (side) axis.
    Tilt,
    /// Rotate around the viewing axis.
    Roll,
    /// Translate sideways.
    Truck,
    /// Translate along the up axis.
    Pedestal,
    /// Translate along the viewing axis.
    Dolly,
    /// Change the perspective field of view.
    Zoom,
}

impl CameraAction {
    /// The rotational actions, in the order their angles compose.
    pub const ROTATIONS: [Self; 3] = [Self::Pan, Self::Tilt, Self::Roll];

    /// Whether this action rotates rather than translates.
    #[must_use]
    pub fn is_rotation(self) -> bool {
        matches!(self, Self::Pan | Self::Tilt | Self::Roll)
    }
}

/// One of the three rig nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum RigComponent {
    /// Outer node; carries translation.
    Body,
    /// Middle node; carries packed rotation.
    Head,
    /// Inner node; free look-around.
    Eyes,
}

/// Action → axis assignment for one choice of up axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionAxes {
    /// Rotation around up.
    pub pan: Axis,
    /// Rotation around side.
    pub tilt: Axis,
    /// Rotation around forward.
    pub roll: Axis,
    /// Sideways translation.
    pub truck: Axis,
    /// Vertical translation.
    pub pedestal: Axis,
    /// Forward translation.
    pub dolly: Axis,
    /// Euler order that composes pan, then tilt, then roll.
    pub rotation_order: EulerRot,
}

impl ActionAxes {
    /// Fixed table for each up axis.
    #[must_use]
    pub const fn for_up_axis(up: Axis) -> Self {
        match up {
            Axis::X => Self {
                pan: Axis::X,
                tilt: Axis::Z,
                roll: Axis::Y,
                truck: Axis::Z,
                pedestal: Axis::X,
                dolly: Axis::Y,
                rotation_order: EulerRot::XZY,
            },
            Axis::Y => Self {
                pan: Axis::Y,
                tilt: Axis::X,
                roll: Axis::Z,
                truck: Axis::X,
                pedestal: Axis::Y,
                dolly: Axis::Z,
                rotation_order: EulerRot::YXZ,
            },
            Axis::Z => Self {
                pan: Axis::Z,
                tilt: Axis::Y,
                roll: Axis::X,
                truck: Axis::Y,
                pedestal: Axis::Z,
                dolly: Axis::X,
                rotation_order: EulerRot::ZYX,
            },
        }
    }

    /// Axis for `action`; `None` for [`CameraAction::Zoom`].
    #[must_use]
    pub fn axis_for(&self, action: CameraAction) -> Option<Axis> {
        match action {
            CameraAction::Pan => Some(self.pan),
            CameraAction::Tilt => Some(self.tilt),
            CameraAction::Roll => Some(self.roll),
            CameraAction::Truck => Some(self.truck),
            CameraAction::Pedestal => Some(self.pedestal),
            CameraAction::Dolly => Some(self.dolly),
            CameraAction::Zoom => None,
        }
    }
}

/// Per-rotation flags routing rotations to the body node instead of the
/// eyes, so that body translations follow them.
///
/// `set_world_coordinates` reproduces a pose exactly when the flagged
/// actions form a prefix of pan, tilt, roll (the default flags only pan).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct TranslateAlong {
    /// Pan rotates the body.
    pub pan: bool,
    /// Tilt rotates the body.
    pub tilt: bool,
    /// Roll rotates the body.
    pub roll: bool,
}

impl TranslateAlong {
    /// Flag for a rotational action; `false` for anything else.
    #[must_use]
    pub fn get(&self, action: CameraAction) -> bool {
        match action {
            CameraAction::Pan => self.pan,
            CameraAction::Tilt => self.tilt,
            CameraAction::Roll => self.roll,
            _ => false,
        }
    }
}

impl Default for TranslateAlong {
    fn default() -> Self {
        Self {
            pan: true,
            tilt: false,
            roll: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    #[test]
    fn rotation_axes_span_xyz_for_every_up_axis() {
        for up in ALL {
            let axes = ActionAxes::for_up_axis(up);
            let mut rotations = [axes.pan, axes.tilt, axes.roll].map(|a| a as u8);
            rotations.sort_unstable();
            assert_eq!(rotations, [0, 1, 2], "up axis {up:?}");
            assert_eq!(axes.pan, up);
            assert_eq!(axes.pedestal, up);
        }
    }

    #[test]
    fn z_up_table() {
        let axes = ActionAxes::for_up_axis(Axis::Z);
        assert_eq!(axes.axis_for(CameraAction::Pan), Some(Axis::Z));
        assert_eq!(axes.axis_for(CameraAction::Tilt), Some(Axis::Y));
        assert_eq!(axes.axis_for(CameraAction::Roll), Some(Axis::X));
        assert_eq!(axes.axis_for(CameraAction::Zoom), None);
    }

    #[test]
    fn rotation_order_leads_with_pan() {
        for up in ALL {
            let axes = ActionAxes::for_up_axis(up);
            let q = glam::Quat::from_euler(axes.rotation_order, 0.3, 0.0, 0.0);
            let expected = glam::Quat::from_axis_angle(axes.pan.unit(), 0.3);
            assert!(q.abs_diff_eq(expected, 1e-6), "up axis {up:?}");
        }
    }
}
