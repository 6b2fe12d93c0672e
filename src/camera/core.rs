use glam::{Mat4, Vec3, Vec4};

use crate::options::CameraOptions;

/// Right-handed look-at view matrix.
///
/// Rotation rows are `side`, `true_up` and `-forward`; the translation is
/// the eye expressed in that basis. Zero-length directions normalize to
/// zero rather than NaN.
#[must_use]
pub fn look_at(eye: Vec3, center: Vec3, up: Vec3) -> Mat4 {
    let f = (center - eye).normalize_or_zero();
    let s = f.cross(up).normalize_or_zero();
    let u = s.cross(f);

    Mat4::from_cols(
        Vec4::new(s.x, u.x, -f.x, 0.0),
        Vec4::new(s.y, u.y, -f.y, 0.0),
        Vec4::new(s.z, u.z, -f.z, 0.0),
        Vec4::new(-s.dot(eye), -u.dot(eye), f.dot(eye), 1.0),
    )
}

/// Perspective projection parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Viewport aspect ratio (width / height).
    pub aspect: f32,
    /// Vertical field of view in degrees.
    pub fovy: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
}

impl Projection {
    /// Projection for a `width` x `height` viewport.
    #[must_use]
    pub fn new(width: u32, height: u32, opts: &CameraOptions) -> Self {
        let mut projection = Self {
            aspect: 1.0,
            fovy: opts.fovy,
            znear: opts.znear,
            zfar: opts.zfar,
        };
        projection.resize(width, height);
        projection
    }

    /// Track a new viewport size. Zero-sized dimensions are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Projection matrix with wgpu's [0, 1] depth range.
    #[must_use]
    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fovy.to_radians(),
            self.aspect,
            self.znear,
            self.zfar,
        )
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
/// GPU uniform shared by the point and frame-box pipelines.
pub struct CameraUniform {
    /// Combined view-projection matrix.
    pub view_proj: [[f32; 4]; 4],
    /// Viewport size in physical pixels.
    pub viewport: [f32; 2],
    /// On-screen point diameter in pixels.
    pub point_size: f32,
    /// Padding for GPU alignment.
    pub(crate) _pad: f32,
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraUniform {
    /// Identity view-projection, 1x1 viewport.
    #[must_use]
    pub fn new() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            viewport: [1.0, 1.0],
            point_size: 1.0,
            _pad: 0.0,
        }
    }

    /// Refresh from the current frame's matrices and viewport.
    pub fn update(
        &mut self,
        view_proj: Mat4,
        viewport: (u32, u32),
        point_size: f32,
    ) {
        self.view_proj = view_proj.to_cols_array_2d();
        self.viewport = [viewport.0.max(1) as f32, viewport.1.max(1) as f32];
        self.point_size = point_size.max(1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mat_close(a: Mat4, b: Mat4) -> bool {
        a.to_cols_array()
            .iter()
            .zip(b.to_cols_array().iter())
            .all(|(x, y)| (x - y).abs() < 1e-5)
    }

    #[test]
    fn look_at_from_origin_has_no_translation() {
        let m = look_at(Vec3::ZERO, Vec3::Z, Vec3::Y);
        assert_eq!(m.w_axis, Vec4::new(0.0, 0.0, 0.0, 1.0));

        // Rotation block is orthonormal and proper.
        let r = glam::Mat3::from_mat4(m);
        assert!(mat_close(
            Mat4::from_mat3(r * r.transpose()),
            Mat4::IDENTITY
        ));
        assert!((r.determinant() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn look_at_down_negative_z_is_identity() {
        let m = look_at(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y);
        assert!(mat_close(m, Mat4::IDENTITY));
    }

    #[test]
    fn look_at_agrees_with_glam() {
        let eye = Vec3::new(3.0, -2.0, 70.0);
        let center = eye + Vec3::new(0.3, 0.1, -1.0);
        assert!(mat_close(
            look_at(eye, center, Vec3::Y),
            Mat4::look_at_rh(eye, center, Vec3::Y)
        ));
    }

    #[test]
    fn look_at_degenerate_direction_stays_finite() {
        let m = look_at(Vec3::ONE, Vec3::ONE, Vec3::Y);
        assert!(m.to_cols_array().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn resize_tracks_aspect_and_ignores_zero() {
        let mut p = Projection::new(800, 600, &CameraOptions::default());
        assert!((p.aspect - 800.0 / 600.0).abs() < 1e-6);
        p.resize(1920, 1080);
        assert!((p.aspect - 1920.0 / 1080.0).abs() < 1e-6);
        p.resize(0, 1080);
        assert!((p.aspect - 1920.0 / 1080.0).abs() < 1e-6);
    }
}
