use std::f32::consts::{FRAC_PI_2, PI};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Camera", inline)]
#[serde(default)]
/// Camera projection and fly-control tuning.
pub struct CameraOptions {
    /// Vertical field of view in degrees.
    #[schemars(title = "Field of View", range(min = 20.0, max = 120.0), extend("step" = 1.0))]
    pub fovy: f32,
    /// Near clipping plane distance.
    #[schemars(skip)]
    pub znear: f32,
    /// Far clipping plane distance.
    #[schemars(skip)]
    pub zfar: f32,
    /// Eye position at startup and after a reset.
    #[schemars(skip)]
    pub start_position: [f32; 3],
    /// Yaw at startup, radians (pi faces the origin from +Z).
    #[schemars(skip)]
    pub start_yaw: f32,
    /// World units added to the position target per held key per frame.
    #[schemars(title = "Move Speed", range(min = 0.05, max = 5.0), extend("step" = 0.05))]
    pub move_speed: f32,
    /// Radians of look per dragged pixel.
    #[schemars(title = "Mouse Sensitivity", range(min = 0.0005, max = 0.01), extend("step" = 0.0005))]
    pub mouse_sensitivity: f32,
    /// Pitch clamp, radians; always kept below pi/2.
    #[schemars(skip)]
    pub pitch_limit: f32,
    /// World units per unit of wheel delta.
    #[schemars(title = "Zoom Factor", range(min = 0.01, max = 1.0), extend("step" = 0.01))]
    pub zoom_factor: f32,
    /// Fraction of the remaining distance covered per frame.
    #[schemars(title = "Smoothing", range(min = 0.01, max = 1.0), extend("step" = 0.01))]
    pub smoothing: f32,
    /// Width of the edge-pan band in pixels.
    #[schemars(title = "Edge Margin", range(min = 0.0, max = 400.0), extend("step" = 10.0))]
    pub edge_margin: f32,
    /// Radians per frame at full edge penetration.
    #[schemars(title = "Edge Pan Speed", range(min = 0.0, max = 0.1), extend("step" = 0.005))]
    pub edge_pan_speed: f32,
    /// Half-extent of the cube the camera target is confined to.
    #[schemars(skip)]
    pub bounds: f32,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            fovy: 60.0,
            znear: 0.1,
            zfar: 1000.0,
            start_position: [0.0, 0.0, 70.0],
            start_yaw: PI,
            move_speed: 0.5,
            mouse_sensitivity: 0.003,
            pitch_limit: FRAC_PI_2 - 0.1,
            zoom_factor: 0.1,
            smoothing: 0.1,
            edge_margin: 150.0,
            edge_pan_speed: 0.02,
            bounds: 200.0,
        }
    }
}
