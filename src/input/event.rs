/// Platform-agnostic input events.
///
/// These are fed into an [`InputProcessor`](super::InputProcessor) which
/// updates the [`InputState`](super::InputState) and converts discrete
/// gestures into [`ReliefCommand`](crate::engine::ReliefCommand) values.
///
/// # Example
///
/// ```ignore
/// let cmd = input_processor.handle_event(InputEvent::CursorMoved {
///     x: 100.0,
///     y: 200.0,
/// });
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Cursor moved to absolute screen position.
    CursorMoved {
        /// Horizontal position in physical pixels.
        x: f32,
        /// Vertical position in physical pixels.
        y: f32,
    },
    /// Mouse button pressed or released.
    MouseButton {
        /// Which button changed.
        button: MouseButton,
        /// `true` for press, `false` for release.
        pressed: bool,
    },
    /// Wheel movement in browser convention: positive scrolls down, which
    /// pulls the camera back.
    Scroll {
        /// Wheel delta in pixels.
        delta: f32,
    },
    /// Physical key pressed or released.
    Key {
        /// Key string in `winit::keyboard::KeyCode` debug format
        /// (`"KeyW"`, `"Space"`, ...).
        key: String,
        /// `true` for press, `false` for release.
        pressed: bool,
    },
    /// The pointer left the window. Edge-pan stops until it comes back.
    CursorLeft,
    /// The window lost keyboard/mouse focus; everything held is released.
    FocusLost,
}

/// Platform-agnostic mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary (left) mouse button.
    Left,
    /// Secondary (right) mouse button.
    Right,
    /// Middle mouse button (wheel click).
    Middle,
}

#[cfg(feature = "viewer")]
impl From<winit::event::MouseButton> for MouseButton {
    fn from(button: winit::event::MouseButton) -> Self {
        match button {
            winit::event::MouseButton::Left => Self::Left,
            winit::event::MouseButton::Right => Self::Right,
            // Side buttons never take part in a drag.
            _ => Self::Middle,
        }
    }
}
