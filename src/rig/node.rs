use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Rigid transform: rotation followed by translation. Rig nodes carry no
/// scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Position relative to the parent.
    pub translation: Vec3,
    /// Orientation relative to the parent.
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    /// No translation, no rotation.
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    /// Transform from a position and orientation.
    #[must_use]
    pub fn new(translation: Vec3, rotation: Quat) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    /// Pure translation.
    #[must_use]
    pub fn from_translation(translation: Vec3) -> Self {
        Self::new(translation, Quat::IDENTITY)
    }

    /// Pure rotation.
    #[must_use]
    pub fn from_rotation(rotation: Quat) -> Self {
        Self::new(Vec3::ZERO, rotation)
    }

    /// `self` applied as the parent of `child`.
    #[must_use]
    pub fn compose(&self, child: &Self) -> Self {
        Self {
            translation: self.translation + self.rotation * child.translation,
            rotation: (self.rotation * child.rotation).normalize(),
        }
    }

    /// Rotate by `angle` radians around `axis` expressed in this node's
    /// own frame.
    pub fn rotate_on_axis(&mut self, axis: Vec3, angle: f32) {
        self.rotation = (self.rotation * Quat::from_axis_angle(axis, angle)).normalize();
    }

    /// Move `distance` along `axis` expressed in this node's own frame.
    pub fn translate_on_axis(&mut self, axis: Vec3, distance: f32) {
        self.translation += self.rotation * axis * distance;
    }

    /// Equal within `max_abs_diff` on every translation and rotation
    /// component, treating `q` and `-q` as the same orientation.
    #[must_use]
    pub fn abs_diff_eq(&self, other: &Self, max_abs_diff: f32) -> bool {
        let same_rotation = self.rotation.abs_diff_eq(other.rotation, max_abs_diff)
            || self.rotation.abs_diff_eq(-other.rotation, max_abs_diff);
        same_rotation && self.translation.abs_diff_eq(other.translation, max_abs_diff)
    }
}

/// Camera projection, as far as the rig cares about it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Projection {
    /// Perspective projection with a vertical field of view.
    Perspective {
        /// Vertical field of view in degrees.
        fov: f32,
    },
    /// Orthographic projection; zoom actions do not apply.
    Orthographic,
}

/// The camera carried by the rig.
///
/// While the rig is assembled `transform` is held at identity (the rig
/// nodes carry the pose). While disassembled it is the camera's world
/// transform and belongs to the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Local transform (world transform while disassembled).
    pub transform: Transform,
    /// Projection parameters.
    pub projection: Projection,
}

impl Camera {
    /// Perspective camera at the origin.
    #[must_use]
    pub fn perspective(fov: f32) -> Self {
        Self {
            transform: Transform::IDENTITY,
            projection: Projection::Perspective { fov },
        }
    }

    /// Orthographic camera at the origin.
    #[must_use]
    pub fn orthographic() -> Self {
        Self {
            transform: Transform::IDENTITY,
            projection: Projection::Orthographic,
        }
    }

    /// Place the camera at a world pose.
    #[must_use]
    pub fn with_pose(mut self, position: Vec3, rotation: Quat) -> Self {
        self.transform = Transform::new(position, rotation);
        self
    }

    /// Perspective field of view, if any.
    #[must_use]
    pub fn fov(&self) -> Option<f32> {
        match self.projection {
            Projection::Perspective { fov } => Some(fov),
            Projection::Orthographic => None,
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::perspective(45.0)
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;

    #[test]
    fn compose_applies_parent_rotation_to_child_translation() {
        let parent = Transform::new(Vec3::new(1.0, 0.0, 0.0), Quat::from_rotation_y(FRAC_PI_2));
        let child = Transform::from_translation(Vec3::new(0.0, 0.0, -2.0));
        let world = parent.compose(&child);
        assert!(world.translation.abs_diff_eq(Vec3::new(-1.0, 0.0, 0.0), 1e-6));
        assert!(world.rotation.abs_diff_eq(parent.rotation, 1e-6));
    }

    #[test]
    fn local_translation_follows_node_rotation() {
        let mut node = Transform::from_rotation(Quat::from_rotation_y(FRAC_PI_2));
        node.translate_on_axis(Vec3::Z, 3.0);
        assert!(node.translation.abs_diff_eq(Vec3::new(3.0, 0.0, 0.0), 1e-6));
    }

    #[test]
    fn local_rotation_is_post_multiplied() {
        let mut node = Transform::from_rotation(Quat::from_rotation_y(FRAC_PI_2));
        node.rotate_on_axis(Vec3::X, FRAC_PI_2);
        let expected = Quat::from_rotation_y(FRAC_PI_2) * Quat::from_rotation_x(FRAC_PI_2);
        assert!(node.rotation.abs_diff_eq(expected, 1e-6));
    }
}
