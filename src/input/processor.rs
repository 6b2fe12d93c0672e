//! Converts raw platform events into engine commands.
//!
//! The `InputProcessor` owns all transient input state (held keys, pointer
//! tracking, the drag/lock state machine) and the key-binding map. It is the
//! only thing that sits between raw window events and the engine's
//! [`execute`](crate::engine::ReliefEngine::execute) method.

use super::event::InputEvent;
use super::keyboard::KeyAction;
use super::mouse::{DragMode, InputState};
use crate::engine::command::ReliefCommand;
use crate::options::KeybindingOptions;

/// Converts raw window events into [`ReliefCommand`]s.
///
/// Continuous input (held movement keys, pointer near an edge) is left in
/// the [`InputState`] and polled by the camera once per frame; only
/// discrete gestures become commands.
///
/// # Usage
///
/// ```ignore
/// if let Some(cmd) = input_processor.handle_event(event) {
///     engine.execute(cmd);
/// }
/// ```
#[derive(Debug, Default)]
pub struct InputProcessor {
    state: InputState,
    key_bindings: KeybindingOptions,
}

impl InputProcessor {
    /// Create a new processor with default key bindings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a processor with custom key bindings.
    #[must_use]
    pub fn with_key_bindings(key_bindings: KeybindingOptions) -> Self {
        Self {
            key_bindings,
            ..Self::new()
        }
    }

    /// Per-frame input state read by the camera.
    #[must_use]
    pub fn state(&self) -> &InputState {
        &self.state
    }

    /// Read-only access to the key bindings.
    #[must_use]
    pub fn key_bindings(&self) -> &KeybindingOptions {
        &self.key_bindings
    }

    /// Replace the key bindings.
    pub fn set_key_bindings(&mut self, key_bindings: KeybindingOptions) {
        self.key_bindings = key_bindings;
    }

    /// Process a raw input event and return zero or one commands.
    pub fn handle_event(&mut self, event: InputEvent) -> Option<ReliefCommand> {
        match event {
            InputEvent::CursorMoved { x, y } => {
                let delta = self.state.move_pointer(x, y);
                (self.state.drag_mode() == DragMode::Dragging
                    && delta.length_squared() > 0.0)
                    .then_some(ReliefCommand::Look { delta })
            }
            InputEvent::MouseButton { button, pressed } => {
                self.state.set_button(button, pressed);
                None
            }
            InputEvent::Scroll { delta } => Some(ReliefCommand::Zoom { delta }),
            InputEvent::Key { key, pressed } => {
                self.state.set_key(&key, pressed);
                if !pressed {
                    return None;
                }
                self.key_bindings
                    .lookup(&key)
                    .filter(|action| !action.is_movement())
                    .and_then(command_for)
            }
            InputEvent::CursorLeft => {
                self.state.clear_pointer();
                None
            }
            InputEvent::FocusLost => {
                self.state.release_all();
                None
            }
        }
    }
}

/// One-shot command for a discrete key action.
fn command_for(action: KeyAction) -> Option<ReliefCommand> {
    match action {
        KeyAction::OpenImage => Some(ReliefCommand::OpenImage),
        KeyAction::ToggleView => Some(ReliefCommand::ToggleView),
        KeyAction::ResetCamera => Some(ReliefCommand::ResetCamera),
        KeyAction::RaiseRelief => Some(ReliefCommand::AdjustHeight { steps: 1.0 }),
        KeyAction::LowerRelief => {
            Some(ReliefCommand::AdjustHeight { steps: -1.0 })
        }
        _ => None,
    }
}
