// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Camera controls for interactive 3D scenes: input smoothing, a layered
//! camera rig and swappable control schemes.
//!
//! The crate is organised in three layers:
//!
//! - [`adaptors`] turn raw [`input::InputEvent`]s into damped values or
//!   discrete triggers, stepped once per frame.
//! - [`rig::CameraRig`] wraps a camera in a body/head/eyes hierarchy and
//!   exposes semantic actions (pan, tilt, dolly, ...), tweened flights and
//!   animation-clip scrubbing.
//! - [`controls`] schemes translate adaptor events into rig calls.
//!
//! # Frame loop
//!
//! ```ignore
//! for event in host_events {
//!     let _ = scheme.handle_event(&event, now);
//! }
//! scheme.update(&mut rig, now);
//! rig.update(now);
//! let pose = rig.camera_world_transform();
//! ```
//!
//! Settings for every component live in [`options::Options`] and load from
//! TOML presets. Points of interest are authored as JSON, see [`poi`].

pub mod adaptors;
pub mod animation;
pub mod controls;
pub mod damper;
pub mod error;
pub mod event;
pub mod input;
pub mod options;
pub mod poi;
pub mod rig;

pub use controls::ControlScheme;
pub use damper::Damper;
pub use error::RigError;
pub use rig::{CameraRig, RigOptions};
