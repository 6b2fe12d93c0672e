use super::source::SourceImage;
use crate::options::PointCloudOptions;

/// Pixels whose normalized alpha is below this are skipped.
pub const TRANSPARENCY_THRESHOLD: f32 = 0.1;

/// ITU-R BT.601 luma of a normalized RGB triple.
#[inline]
#[must_use]
pub fn luminance(r: f32, g: f32, b: f32) -> f32 {
    0.299 * r + 0.587 * g + 0.114 * b
}

/// Parameters of one scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildParams {
    /// Depth multiplier applied to luminance.
    pub height_scale: f32,
    /// World distance between neighbouring points.
    pub voxel_spacing: f32,
    /// Normalized alpha cutoff; pixels below it produce no point.
    pub alpha_threshold: f32,
}

impl BuildParams {
    /// Params with the standard transparency cutoff.
    #[must_use]
    pub fn new(height_scale: f32, voxel_spacing: f32) -> Self {
        Self {
            height_scale,
            voxel_spacing,
            alpha_threshold: TRANSPARENCY_THRESHOLD,
        }
    }
}

impl From<&PointCloudOptions> for BuildParams {
    fn from(opts: &PointCloudOptions) -> Self {
        Self {
            height_scale: opts.height_scale,
            voxel_spacing: opts.voxel_spacing,
            alpha_threshold: opts.alpha_threshold,
        }
    }
}

/// Parallel position/color arrays, one entry per emitted point, in scan
/// order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointCloud {
    positions: Vec<[f32; 3]>,
    colors: Vec<[f32; 3]>,
}

impl PointCloud {
    /// Empty cloud with room for `capacity` points.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            positions: Vec::with_capacity(capacity),
            colors: Vec::with_capacity(capacity),
        }
    }

    /// Append one point.
    pub fn push(&mut self, position: [f32; 3], color: [f32; 3]) {
        self.positions.push(position);
        self.colors.push(color);
    }

    /// Point positions in world units.
    #[must_use]
    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    /// Point colors, linear RGB in [0, 1].
    #[must_use]
    pub fn colors(&self) -> &[[f32; 3]] {
        &self.colors
    }

    /// Positions flattened to `x, y, z, x, y, z, ...`.
    #[must_use]
    pub fn flat_positions(&self) -> &[f32] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Colors flattened to `r, g, b, r, g, b, ...`.
    #[must_use]
    pub fn flat_colors(&self) -> &[f32] {
        bytemuck::cast_slice(&self.colors)
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// `true` if no pixel produced a point.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Iterate `(position, color)` pairs in scan order.
    pub fn iter(&self) -> impl Iterator<Item = ([f32; 3], [f32; 3])> + '_ {
        self.positions.iter().copied().zip(self.colors.iter().copied())
    }
}

/// Non-finite numbers act as zero (flat relief / collapsed grid).
fn sanitize(value: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Convert `image` into a point cloud.
///
/// Pixels are visited row-major from the top-left corner. The grid is
/// centered on the origin in X/Y; Z is `luminance * height_scale`.
#[must_use]
pub fn build(image: &SourceImage, params: &BuildParams) -> PointCloud {
    if image.is_empty() {
        return PointCloud::default();
    }

    let width = image.width() as usize;
    let pixel_count = width * image.height() as usize;
    let spacing = sanitize(params.voxel_spacing);
    let height_scale = sanitize(params.height_scale);
    let start_x = -(image.width() as f32) * spacing / 2.0;
    let start_y = -(image.height() as f32) * spacing / 2.0;

    let mut cloud = PointCloud::with_capacity(pixel_count);
    for (i, px) in image.pixels().chunks_exact(4).take(pixel_count).enumerate()
    {
        let a = f32::from(px[3]) / 255.0;
        if a < params.alpha_threshold {
            continue;
        }
        let r = f32::from(px[0]) / 255.0;
        let g = f32::from(px[1]) / 255.0;
        let b = f32::from(px[2]) / 255.0;

        let x = (i % width) as f32;
        let y = (i / width) as f32;
        cloud.push(
            [
                start_x + x * spacing,
                start_y + y * spacing,
                luminance(r, g, b) * height_scale,
            ],
            [r, g, b],
        );
    }

    log::debug!(
        "built {} points from {}x{} image",
        cloud.len(),
        image.width(),
        image.height()
    );
    cloud
}
