//! GPU resource management utilities.
//!
//! Provides wgpu device/surface initialization and growable vertex buffers
//! for point uploads.

/// Growable GPU buffers with automatic reallocation.
pub mod dynamic_buffer;
/// wgpu device, surface, and queue initialization.
pub mod render_context;
