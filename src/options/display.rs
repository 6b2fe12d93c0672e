use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Display", inline)]
#[serde(default)]
/// Scene dressing around the point cloud.
pub struct DisplayOptions {
    /// Clear color, linear RGB.
    #[schemars(skip)]
    pub background: [f32; 3],
    /// Draw the wireframe reference cube.
    #[schemars(title = "Show Frame Box")]
    pub show_frame_box: bool,
    /// Edge length of the reference cube.
    #[schemars(title = "Frame Box Size", range(min = 1.0, max = 200.0), extend("step" = 1.0))]
    pub frame_box_size: f32,
    /// Line color of the reference cube.
    #[schemars(skip)]
    pub frame_box_color: [f32; 3],
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            background: [0.0, 0.0, 0.0],
            show_frame_box: true,
            frame_box_size: 20.0,
            frame_box_color: [1.0, 1.0, 1.0],
        }
    }
}
