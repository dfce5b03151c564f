/// Platform-agnostic input events.
///
/// The host translates its windowing or browser events into these and
/// feeds them to adaptors (directly or through a control scheme).
///
/// # Example
///
/// ```ignore
/// let consumed = scheme.handle_event(
///     &InputEvent::Wheel { delta_x: 0.0, delta_y: 120.0 },
///     Instant::now(),
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A pointer made contact (touch/pen) or a mouse button was pressed.
    PointerDown(PointerInput),
    /// A pointer moved, with or without contact.
    PointerMove(PointerInput),
    /// A pointer lifted or a mouse button was released.
    PointerUp(PointerInput),
    /// The platform cancelled a pointer (treated as a release).
    PointerCancel(PointerInput),
    /// Wheel or trackpad scroll, in pixels.
    Wheel {
        /// Horizontal scroll amount.
        delta_x: f32,
        /// Vertical scroll amount (positive = scroll down).
        delta_y: f32,
    },
    /// A key was pressed.
    KeyDown {
        /// Logical key value, e.g. `"w"` or `"ArrowUp"`.
        key: String,
    },
    /// A key was released.
    KeyUp {
        /// Logical key value, e.g. `"w"` or `"ArrowUp"`.
        key: String,
    },
    /// The page scrolled.
    Scroll {
        /// Vertical scroll offset of the page in pixels.
        scroll_y: f32,
    },
    /// The viewport (or tracked element) was resized.
    Resize {
        /// Width in pixels.
        width: f32,
        /// Height in pixels.
        height: f32,
    },
}

/// Device class that produced a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PointerKind {
    /// Mouse or trackpad cursor.
    #[default]
    Mouse,
    /// Finger on a touch surface.
    Touch,
    /// Stylus.
    Pen,
}

/// State of a single pointer at the time of an event.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerInput {
    /// Stable identifier for the pointer while it is in contact.
    pub pointer_id: u32,
    /// Device class.
    pub kind: PointerKind,
    /// Whether this is the primary pointer of its kind.
    pub is_primary: bool,
    /// Horizontal position relative to the tracked element, in pixels.
    pub x: f32,
    /// Vertical position relative to the tracked element, in pixels.
    pub y: f32,
    /// Horizontal position on screen, in pixels.
    pub screen_x: f32,
    /// Vertical position on screen, in pixels.
    pub screen_y: f32,
}

impl PointerInput {
    /// Primary pointer of `kind` at element position (`x`, `y`); screen
    /// coordinates mirror the element coordinates.
    #[must_use]
    pub fn at(kind: PointerKind, pointer_id: u32, x: f32, y: f32) -> Self {
        Self {
            pointer_id,
            kind,
            is_primary: true,
            x,
            y,
            screen_x: x,
            screen_y: y,
        }
    }
}
