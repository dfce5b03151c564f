//! Camera-control options with TOML preset support.
//!
//! Rig and control-scheme settings are consolidated here. Options
//! serialize to/from TOML so hosts can ship presets (e.g. a "gentle"
//! story-mode feel next to a "snappy" free-fly one).

use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::controls::{
    FreeMovementOptions, PathPointsOptions, ScrollControlsOptions, StoryPointsOptions,
    ThreeDofOptions,
};
use crate::error::RigError;
use crate::rig::RigOptions;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[three_dof]`) work correctly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema)]
#[serde(default)]
pub struct Options {
    /// Up axis, rotation routing and clip track names.
    pub rig: RigOptions,
    /// Keyboard/pointer/wheel fly-through.
    pub free_movement: FreeMovementOptions,
    /// Hover look-around.
    pub three_dof: ThreeDofOptions,
    /// Absolute-pose POI navigation.
    pub story_points: StoryPointsOptions,
    /// Clip keyframe POI navigation.
    pub path_points: PathPointsOptions,
    /// Scroll-driven clip scrubbing.
    pub scroll_controls: ScrollControlsOptions,
}

impl Options {
    /// Generate JSON Schema describing every option.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// [`RigError::Io`] if the file cannot be read,
    /// [`RigError::OptionsParse`] if it is not valid options TOML.
    pub fn load(path: &Path) -> Result<Self, RigError> {
        let content = std::fs::read_to_string(path)?;
        let options = toml::from_str(&content)
            .map_err(|e| RigError::OptionsParse(e.to_string()))?;
        log::debug!("loaded options from {}", path.display());
        Ok(options)
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// [`RigError::OptionsParse`] if serialization fails, [`RigError::Io`]
    /// if the file or its parent directory cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), RigError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| RigError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adaptors::ScrollOffset;
    use crate::animation::{Ease, EaseCurve};
    use crate::rig::Axis;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r#"
[rig]
up_axis = "z"

[path_points]
cycle = true
ease = "expo.inOut"

[scroll_controls.scroll]
start_offset = { vh = 50.0 }
"#;
        let opts: Options = toml::from_str(toml_str).unwrap();
        assert_eq!(opts.rig.up_axis, Axis::Z);
        assert_eq!(opts.rig.translation_name, "Translation");
        assert!(opts.path_points.cycle);
        assert_eq!(opts.path_points.ease, Ease::in_out(EaseCurve::Expo));
        assert_eq!(opts.path_points.wheel_threshold, 15.0);
        assert_eq!(opts.scroll_controls.scroll.start_offset, ScrollOffset::Vh(50.0));
        // Everything else should be default
        assert_eq!(opts.scroll_controls.scroll.damping_factor, 0.3);
        assert_eq!(opts.three_dof, ThreeDofOptions::default());
    }

    #[test]
    fn save_load_and_list_presets() {
        let dir = std::env::temp_dir().join(format!("camera-controls-presets-{}", std::process::id()));
        let mut opts = Options::default();
        opts.story_points.cycle = true;
        opts.free_movement.keyboard_scale = 2.0;
        opts.save(&dir.join("snappy.toml")).unwrap();
        Options::default().save(&dir.join("gentle.toml")).unwrap();
        std::fs::write(dir.join("notes.txt"), "not a preset").unwrap();

        assert_eq!(Options::list_presets(&dir), vec!["gentle", "snappy"]);
        assert_eq!(Options::load(&dir.join("snappy.toml")).unwrap(), opts);
        assert!(matches!(
            Options::load(&dir.join("missing.toml")),
            Err(RigError::Io(_))
        ));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn malformed_toml_is_an_options_error() {
        let dir = std::env::temp_dir().join(format!("camera-controls-bad-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad.toml");
        std::fs::write(&path, "[rig]\nup_axis = 3\n").unwrap();
        assert!(matches!(Options::load(&path), Err(RigError::OptionsParse(_))));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value = serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();
        for section in [
            "rig",
            "free_movement",
            "three_dof",
            "story_points",
            "path_points",
            "scroll_controls",
        ] {
            assert!(props.contains_key(section), "missing {section}");
        }
    }
}
