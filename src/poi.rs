//! Points of interest and the JSON document they are authored in.
//!
//! ```json
//! {
//!   "pois": [
//!     { "position": [0, 1, 5], "quaternion": [0, 0, 0, 1], "duration": 1, "ease": "power1" }
//!   ],
//!   "animationClip": { "name": "path", "duration": 2, "tracks": [] }
//! }
//! ```

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::animation::{AnimationClip, Ease};
use crate::error::RigError;

fn default_duration() -> f32 {
    1.0
}

fn default_true() -> bool {
    true
}

/// An absolute camera pose to fly to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryPoint {
    /// World position.
    pub position: Vec3,
    /// World orientation.
    pub quaternion: Quat,
    /// Flight duration in seconds.
    #[serde(default = "default_duration")]
    pub duration: f32,
    /// Flight ease.
    #[serde(default)]
    pub ease: Ease,
    /// Slerp the orientation (otherwise blend components).
    #[serde(default = "default_true")]
    pub use_slerp: bool,
}

impl StoryPoint {
    /// POI with a one second `power1.out` slerped flight.
    #[must_use]
    pub fn new(position: Vec3, quaternion: Quat) -> Self {
        Self {
            position,
            quaternion,
            duration: default_duration(),
            ease: Ease::DEFAULT,
            use_slerp: true,
        }
    }
}

/// A keyframe index into the rig's bound animation clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathPoint {
    /// Keyframe index on the clip's first track.
    pub frame: usize,
}

/// Exported set of story points, optionally with the clip they were
/// authored against.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoiDocument {
    /// Points of interest, in navigation order.
    pub pois: Vec<StoryPoint>,
    /// Clip for path-based schemes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation_clip: Option<AnimationClip>,
}

impl PoiDocument {
    /// Parse a document and validate its clip.
    ///
    /// # Errors
    ///
    /// [`RigError::PoiParse`] on malformed JSON, [`RigError::InvalidClip`]
    /// if the embedded clip is inconsistent.
    pub fn from_json(json: &str) -> Result<Self, RigError> {
        let document: Self = serde_json::from_str(json)?;
        if let Some(clip) = &document.animation_clip {
            clip.validate()?;
        }
        log::debug!("loaded {} POIs", document.pois.len());
        Ok(document)
    }

    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// [`RigError::PoiParse`] if serialization fails.
    pub fn to_json(&self) -> Result<String, RigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{EaseCurve, KeyframeTrack};

    #[test]
    fn parses_authored_document_with_defaults() {
        let json = r#"{
            "pois": [
                { "position": [0, 1, 5], "quaternion": [0, 0, 0, 1], "duration": 2, "ease": "sine.inOut" },
                { "position": [3, 1, 0], "quaternion": [0, 0.7071068, 0, 0.7071068], "useSlerp": false }
            ]
        }"#;
        let document = PoiDocument::from_json(json).unwrap();
        assert_eq!(document.pois.len(), 2);
        assert_eq!(document.pois[0].position, Vec3::new(0.0, 1.0, 5.0));
        assert_eq!(document.pois[0].ease, Ease::in_out(EaseCurve::Sine));
        assert_eq!(document.pois[1].duration, 1.0);
        assert_eq!(document.pois[1].ease, Ease::DEFAULT);
        assert!(!document.pois[1].use_slerp);
        assert!(document.animation_clip.is_none());
    }

    #[test]
    fn writes_camel_case_keys() {
        let document = PoiDocument {
            pois: vec![StoryPoint::new(Vec3::X, Quat::IDENTITY)],
            animation_clip: Some(AnimationClip::new(
                "path",
                vec![KeyframeTrack::vector("Translation.position", vec![0.0], &[Vec3::ZERO])],
            )),
        };
        let json = document.to_json().unwrap();
        assert!(json.contains("\"useSlerp\""));
        assert!(json.contains("\"animationClip\""));
        assert!(json.contains("\"power1.out\""));
        assert_eq!(PoiDocument::from_json(&json).unwrap(), document);
    }

    #[test]
    fn rejects_inconsistent_clip() {
        let json = r#"{
            "pois": [],
            "animationClip": {
                "duration": 1,
                "tracks": [{ "name": "Translation.position", "type": "vector", "times": [0, 1], "values": [0, 0, 0] }]
            }
        }"#;
        assert!(matches!(
            PoiDocument::from_json(json),
            Err(RigError::InvalidClip(_))
        ));
    }
}
