use serde::{Deserialize, Serialize};

/// Actions that can be bound to keys.
///
/// Serde serializes as `snake_case` strings so TOML presets stay readable:
/// ```toml
/// [keybindings.bindings]
/// move_forward = "KeyW"
/// open_image = "KeyO"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyAction {
    /// Fly along the horizontal view direction.
    MoveForward,
    /// Fly against the horizontal view direction.
    MoveBack,
    /// Strafe to the left of the view direction.
    StrafeLeft,
    /// Strafe to the right of the view direction.
    StrafeRight,
    /// Rise along world up.
    MoveUp,
    /// Sink along world up.
    MoveDown,
    /// Pick a new source image.
    OpenImage,
    /// Switch between the relief view and the empty view.
    ToggleView,
    /// Return the camera to its start pose.
    ResetCamera,
    /// Increase the relief height scale.
    RaiseRelief,
    /// Decrease the relief height scale.
    LowerRelief,
}

impl KeyAction {
    /// Held-key movement actions, polled every frame.
    pub const MOVEMENT: [Self; 6] = [
        Self::MoveForward,
        Self::MoveBack,
        Self::StrafeLeft,
        Self::StrafeRight,
        Self::MoveUp,
        Self::MoveDown,
    ];

    /// Whether the action is continuous movement rather than a one-shot
    /// command.
    #[must_use]
    pub fn is_movement(self) -> bool {
        Self::MOVEMENT.contains(&self)
    }
}
