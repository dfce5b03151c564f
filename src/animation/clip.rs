//! Keyframe animation clips the rig can scrub through.
//!
//! Tracks store their values flattened (three components per keyframe for
//! vectors, four for quaternions) so clips exported from a DCC tool or an
//! authoring page deserialize without conversion. A track is bound to a rig
//! node by name: `"<node>.position"` or `"<node>.quaternion"`.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::RigError;

/// Value type of a keyframe track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    /// Three floats per keyframe.
    Vector,
    /// Four floats (x, y, z, w) per keyframe.
    Quaternion,
}

impl TrackKind {
    /// Floats per keyframe.
    #[must_use]
    pub fn stride(self) -> usize {
        match self {
            Self::Vector => 3,
            Self::Quaternion => 4,
        }
    }
}

/// A named, time-ordered sequence of keyframes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyframeTrack {
    /// Binding name, e.g. `"Translation.position"`.
    pub name: String,
    /// Value type.
    #[serde(rename = "type")]
    pub kind: TrackKind,
    /// Keyframe times in seconds, ascending.
    pub times: Vec<f32>,
    /// Flattened keyframe values.
    pub values: Vec<f32>,
}

impl KeyframeTrack {
    /// Vector track from per-keyframe positions.
    pub fn vector(name: impl Into<String>, times: Vec<f32>, values: &[Vec3]) -> Self {
        Self {
            name: name.into(),
            kind: TrackKind::Vector,
            times,
            values: values.iter().flat_map(|v| v.to_array()).collect(),
        }
    }

    /// Quaternion track from per-keyframe orientations.
    pub fn quaternion(name: impl Into<String>, times: Vec<f32>, values: &[Quat]) -> Self {
        Self {
            name: name.into(),
            kind: TrackKind::Quaternion,
            times,
            values: values.iter().flat_map(|q| q.to_array()).collect(),
        }
    }

    /// Number of keyframes.
    #[must_use]
    pub fn keyframe_count(&self) -> usize {
        self.times.len()
    }

    /// Check value count against keyframe count and time ordering.
    pub fn validate(&self) -> Result<(), RigError> {
        let expected = self.times.len() * self.kind.stride();
        if self.values.len() != expected {
            return Err(RigError::InvalidClip(format!(
                "track '{}' has {} values, expected {expected}",
                self.name,
                self.values.len()
            )));
        }
        if self.times.windows(2).any(|w| w[1] < w[0]) {
            return Err(RigError::InvalidClip(format!(
                "track '{}' has out-of-order keyframe times",
                self.name
            )));
        }
        Ok(())
    }

    /// Bracketing keyframes and blend factor for time `t`.
    fn locate(&self, t: f32) -> Option<(usize, usize, f32)> {
        let last = self.times.len().checked_sub(1)?;
        if t <= self.times[0] {
            return Some((0, 0, 0.0));
        }
        if t >= self.times[last] {
            return Some((last, last, 0.0));
        }
        let upper = self.times.partition_point(|&time| time <= t);
        let lower = upper - 1;
        let span = self.times[upper] - self.times[lower];
        let alpha = if span > 0.0 {
            (t - self.times[lower]) / span
        } else {
            0.0
        };
        Some((lower, upper, alpha))
    }

    fn value(&self, index: usize) -> &[f32] {
        let stride = self.kind.stride();
        &self.values[index * stride..(index + 1) * stride]
    }

    /// Linearly interpolated position at `t`. `None` for quaternion or
    /// empty tracks.
    #[must_use]
    pub fn sample_vec3(&self, t: f32) -> Option<Vec3> {
        if self.kind != TrackKind::Vector {
            return None;
        }
        let (lower, upper, alpha) = self.locate(t)?;
        let a = Vec3::from_slice(self.value(lower));
        let b = Vec3::from_slice(self.value(upper));
        Some(a.lerp(b, alpha))
    }

    /// Spherically interpolated orientation at `t`. `None` for vector or
    /// empty tracks.
    #[must_use]
    pub fn sample_quat(&self, t: f32) -> Option<Quat> {
        if self.kind != TrackKind::Quaternion {
            return None;
        }
        let (lower, upper, alpha) = self.locate(t)?;
        let a = Quat::from_slice(self.value(lower)).normalize();
        let b = Quat::from_slice(self.value(upper)).normalize();
        Some(a.slerp(b, alpha))
    }
}

/// A set of keyframe tracks sharing one timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationClip {
    /// Clip name.
    #[serde(default)]
    pub name: String,
    /// Length of the timeline in seconds.
    pub duration: f32,
    /// Tracks in the clip.
    pub tracks: Vec<KeyframeTrack>,
}

impl AnimationClip {
    /// Clip whose duration is the latest keyframe time across `tracks`.
    pub fn new(name: impl Into<String>, tracks: Vec<KeyframeTrack>) -> Self {
        let duration = tracks
            .iter()
            .filter_map(|track| track.times.last().copied())
            .fold(0.0, f32::max);
        Self {
            name: name.into(),
            duration,
            tracks,
        }
    }

    /// Track with the given binding name.
    #[must_use]
    pub fn track(&self, name: &str) -> Option<&KeyframeTrack> {
        self.tracks.iter().find(|track| track.name == name)
    }

    /// Validate every track and the clip duration.
    pub fn validate(&self) -> Result<(), RigError> {
        if !self.duration.is_finite() || self.duration < 0.0 {
            return Err(RigError::InvalidClip(format!(
                "clip '{}' has invalid duration {}",
                self.name, self.duration
            )));
        }
        self.tracks.iter().try_for_each(KeyframeTrack::validate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path_clip() -> AnimationClip {
        AnimationClip::new(
            "path",
            vec![
                KeyframeTrack::vector(
                    "Translation.position",
                    vec![0.0, 1.0, 3.0],
                    &[Vec3::ZERO, Vec3::X, Vec3::new(1.0, 0.0, -4.0)],
                ),
                KeyframeTrack::quaternion(
                    "Rotation.quaternion",
                    vec![0.0, 3.0],
                    &[Quat::IDENTITY, Quat::from_rotation_y(std::f32::consts::FRAC_PI_2)],
                ),
            ],
        )
    }

    #[test]
    fn duration_is_latest_keyframe() {
        assert_eq!(path_clip().duration, 3.0);
    }

    #[test]
    fn vector_sampling_interpolates_and_clamps() {
        let clip = path_clip();
        let track = clip.track("Translation.position").unwrap();
        assert_eq!(track.sample_vec3(-1.0), Some(Vec3::ZERO));
        assert!((track.sample_vec3(0.5).unwrap() - Vec3::new(0.5, 0.0, 0.0)).length() < 1e-6);
        assert!((track.sample_vec3(2.0).unwrap() - Vec3::new(1.0, 0.0, -2.0)).length() < 1e-6);
        assert_eq!(track.sample_vec3(10.0), Some(Vec3::new(1.0, 0.0, -4.0)));
        assert_eq!(track.sample_quat(1.0), None);
    }

    #[test]
    fn quaternion_sampling_slerps() {
        let clip = path_clip();
        let track = clip.track("Rotation.quaternion").unwrap();
        let mid = track.sample_quat(1.5).unwrap();
        let expected = Quat::from_rotation_y(std::f32::consts::FRAC_PI_4);
        assert!(mid.angle_between(expected) < 1e-4);
    }

    #[test]
    fn validation_catches_bad_tracks() {
        let mut clip = path_clip();
        assert!(clip.validate().is_ok());
        let _ = clip.tracks[0].values.pop();
        assert!(matches!(clip.validate(), Err(RigError::InvalidClip(_))));

        let mut clip = path_clip();
        clip.tracks[0].times = vec![0.0, 2.0, 1.0];
        assert!(clip.validate().is_err());
    }

    #[test]
    fn json_uses_flat_values_and_type_tag() {
        let json = serde_json::to_value(path_clip()).unwrap();
        assert_eq!(json["tracks"][0]["type"], "vector");
        assert_eq!(json["tracks"][1]["values"].as_array().unwrap().len(), 8);
        let back: AnimationClip = serde_json::from_value(json).unwrap();
        assert_eq!(back, path_clip());
    }
}
