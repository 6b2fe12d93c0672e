//! Camera system for flying through the point cloud.
//!
//! Provides a yaw/pitch fly camera with smoothed movement, drag-look,
//! edge-pan and wheel zoom, plus the projection and GPU binding that turn
//! it into a view-projection uniform.

/// Uniform buffer and bind group for the camera.
pub mod binding;
/// Fly-camera controller: input to pose to view matrix.
pub mod controller;
/// Look-at construction, projection and GPU uniform types.
pub mod core;
/// Controller + projection pair advanced once per frame.
pub mod rig;
