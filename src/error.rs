//! Crate-level error types.
//!
//! Per-frame operations never fail; their policy decisions are returned as
//! outcome enums. Only the I/O boundaries (option presets, POI documents,
//! clip validation) produce a [`RigError`].

use std::fmt;

/// Errors produced by the camera-controls crate.
#[derive(Debug)]
pub enum RigError {
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// POI document JSON parsing/serialization failure.
    PoiParse(serde_json::Error),
    /// An animation clip failed validation.
    InvalidClip(String),
    /// The rig already has a clip bound; clear it first.
    ClipAlreadyBound,
    /// An ease name could not be parsed.
    UnknownEase(String),
}

impl fmt::Display for RigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::PoiParse(e) => write!(f, "POI document error: {e}"),
            Self::InvalidClip(msg) => {
                write!(f, "invalid animation clip: {msg}")
            }
            Self::ClipAlreadyBound => {
                write!(f, "an animation clip is already bound to the rig")
            }
            Self::UnknownEase(name) => write!(f, "unknown ease: {name}"),
        }
    }
}

impl std::error::Error for RigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::PoiParse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for RigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for RigError {
    fn from(e: serde_json::Error) -> Self {
        Self::PoiParse(e)
    }
}
