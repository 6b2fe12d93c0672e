use std::collections::HashSet;

use glam::Vec2;

use super::event::MouseButton;

/// Button that starts a drag-look on its own.
pub const LOOK_BUTTON: MouseButton = MouseButton::Left;
/// Button that, held together with [`LOOK_BUTTON`], locks the view.
pub const LOCK_COMPANION: MouseButton = MouseButton::Right;

/// Pointer gesture state.
///
/// `Dragging` and `Locked` are mutually exclusive: while locked, look
/// updates are suppressed even though the look button is down. Edge-pan is
/// only allowed while `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragMode {
    /// No gesture; edge-pan may run.
    #[default]
    Idle,
    /// Look button held: pointer motion turns the camera.
    Dragging,
    /// Look button and companion held together: the view is frozen until
    /// every button is released.
    Locked,
}

impl DragMode {
    /// Next state after the pressed button set changed to `buttons`.
    #[must_use]
    pub fn next(self, buttons: &HashSet<MouseButton>) -> Self {
        if buttons.is_empty() {
            return Self::Idle;
        }
        let look = buttons.contains(&LOOK_BUTTON);
        if look && buttons.contains(&LOCK_COMPANION) {
            return Self::Locked;
        }
        match self {
            Self::Locked => Self::Locked,
            _ if look => Self::Dragging,
            _ => Self::Idle,
        }
    }
}

/// Everything the controller reads once per frame: held keys, pointer and
/// buttons.
#[derive(Debug, Default)]
pub struct InputState {
    held_keys: HashSet<String>,
    buttons: HashSet<MouseButton>,
    drag: DragMode,
    pointer: Option<Vec2>,
}

impl InputState {
    /// Empty state: nothing held, pointer unknown.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press or release.
    pub fn set_key(&mut self, key: &str, pressed: bool) {
        if pressed {
            let _ = self.held_keys.insert(key.to_owned());
        } else {
            let _ = self.held_keys.remove(key);
        }
    }

    /// Whether `key` is currently held.
    #[must_use]
    pub fn is_held(&self, key: &str) -> bool {
        self.held_keys.contains(key)
    }

    /// Record a button change and advance the drag state machine.
    pub fn set_button(&mut self, button: MouseButton, pressed: bool) {
        if pressed {
            let _ = self.buttons.insert(button);
        } else {
            let _ = self.buttons.remove(&button);
        }
        self.drag = self.drag.next(&self.buttons);
    }

    /// Whether `button` is currently held.
    #[must_use]
    pub fn is_pressed(&self, button: MouseButton) -> bool {
        self.buttons.contains(&button)
    }

    /// Current gesture state.
    #[must_use]
    pub fn drag_mode(&self) -> DragMode {
        self.drag
    }

    /// Move the pointer, returning the delta from the previous position
    /// (zero for the first sample).
    pub fn move_pointer(&mut self, x: f32, y: f32) -> Vec2 {
        let current = Vec2::new(x, y);
        let delta = self.pointer.map_or(Vec2::ZERO, |last| current - last);
        self.pointer = Some(current);
        delta
    }

    /// Last known pointer position in physical pixels.
    #[must_use]
    pub fn pointer(&self) -> Option<Vec2> {
        self.pointer
    }

    /// Forget the pointer position; the next sample starts a fresh delta.
    pub fn clear_pointer(&mut self) {
        self.pointer = None;
    }

    /// Drop all held keys and buttons and the pointer (focus loss).
    pub fn release_all(&mut self) {
        self.held_keys.clear();
        self.buttons.clear();
        self.drag = DragMode::Idle;
        self.pointer = None;
    }
}
