//! The engine's complete interactive vocabulary.
//!
//! Discrete user operations, whether triggered by a key press, a mouse
//! gesture, or a programmatic call, are represented as a `ReliefCommand`.
//! Consumers construct commands and pass them to
//! [`ReliefEngine::execute`](super::ReliefEngine::execute).
//!
//! Continuous input (held movement keys, a pointer resting near the window
//! edge) is not a command; the camera polls it once per frame.

use glam::Vec2;

/// A discrete operation the engine can perform.
#[derive(Debug, Clone, PartialEq)]
pub enum ReliefCommand {
    // ── Camera ──────────────────────────────────────────────────────
    /// Turn the camera by `delta` pixels of drag movement.
    Look {
        /// Horizontal and vertical drag delta.
        delta: Vec2,
    },

    /// Move the camera along its view direction.
    ///
    /// Positive deltas pull back, negative deltas push forward.
    Zoom {
        /// Scroll amount.
        delta: f32,
    },

    /// Return the camera to its starting pose.
    ResetCamera,

    // ── Relief ──────────────────────────────────────────────────────
    /// Ask the host to pick a new source image.
    OpenImage,

    /// Raise or lower the relief by whole height steps and rebuild the
    /// cloud from the retained image.
    AdjustHeight {
        /// Signed number of steps.
        steps: f32,
    },

    // ── View ────────────────────────────────────────────────────────
    /// Switch between the relief view and the empty view.
    ToggleView,
}
