//! Image-to-point-cloud conversion.
//!
//! A decoded [`SourceImage`] is scanned pixel by pixel; every pixel that is
//! not (nearly) transparent becomes one colored point whose depth is its
//! brightness scaled by the relief height.

/// Pixel scan that produces the point cloud.
pub mod builder;
/// Decoded RGBA8 source images.
pub mod source;

pub use builder::{build, luminance, BuildParams, PointCloud};
pub use source::SourceImage;
