//! Input handling: event types, the per-frame input state with its
//! drag/lock state machine, and the processor that converts raw window
//! events into engine commands.

/// Platform-agnostic input events.
pub mod event;
/// Bindable key actions.
pub mod keyboard;
/// Held keys, pointer tracking and the drag/lock state machine.
pub mod mouse;
/// Converts raw events into engine commands.
pub mod processor;

pub use event::{InputEvent, MouseButton};
pub use keyboard::KeyAction;
pub use mouse::{DragMode, InputState};
pub use processor::InputProcessor;
