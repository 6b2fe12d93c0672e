use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Point Cloud", inline)]
#[serde(default)]
/// How source images are turned into points and how points are drawn.
pub struct PointCloudOptions {
    /// Depth of a fully white pixel, in world units.
    #[schemars(title = "Height Scale", range(min = 0.0, max = 100.0), extend("step" = 0.5))]
    pub height_scale: f32,
    /// Distance between neighbouring points.
    #[schemars(skip)]
    pub voxel_spacing: f32,
    /// Normalized alpha below which pixels are dropped.
    #[schemars(skip)]
    pub alpha_threshold: f32,
    /// On-screen point diameter in pixels.
    #[schemars(title = "Point Size", range(min = 1.0, max = 16.0), extend("step" = 0.5))]
    pub point_size: f32,
    /// Height-scale change per raise/lower key press.
    #[schemars(skip)]
    pub height_step: f32,
}

impl Default for PointCloudOptions {
    fn default() -> Self {
        Self {
            height_scale: 10.0,
            voxel_spacing: 0.2,
            alpha_threshold: 0.1,
            point_size: 3.0,
            height_step: 1.0,
        }
    }
}
