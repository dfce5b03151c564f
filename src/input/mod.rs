//! Input handling: platform-agnostic raw events the adaptors consume.

/// Platform-agnostic input events.
pub mod event;

pub use event::{InputEvent, PointerInput, PointerKind};
