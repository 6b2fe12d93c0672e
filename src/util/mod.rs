//! Shared utilities.

/// Frame pacing and smoothed FPS.
pub mod frame_timing;
