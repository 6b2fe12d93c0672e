use glam::{Mat4, Vec2};

use crate::camera::controller::CameraController;
use crate::camera::core::Projection;
use crate::input::InputState;
use crate::options::{CameraOptions, KeybindingOptions};

/// Owns the fly controller and the projection for one view.
///
/// Resizing touches only the projection; the camera pose is never changed
/// by viewport events.
#[derive(Debug, Clone)]
pub struct CameraRig {
    /// Pose and input handling.
    pub controller: CameraController,
    /// Perspective parameters.
    pub projection: Projection,
    viewport: (u32, u32),
    /// Physical pixels per logical pixel; edge-pan works in logical units.
    scale_factor: f32,
}

impl CameraRig {
    /// Rig for a `viewport`-sized surface.
    #[must_use]
    pub fn new(opts: &CameraOptions, viewport: (u32, u32)) -> Self {
        Self {
            controller: CameraController::new(opts),
            projection: Projection::new(viewport.0, viewport.1, opts),
            viewport,
            scale_factor: 1.0,
        }
    }

    /// Display scale factor. Non-positive or non-finite values are ignored.
    pub fn set_scale_factor(&mut self, scale_factor: f32) {
        if scale_factor.is_finite() && scale_factor > 0.0 {
            self.scale_factor = scale_factor;
        }
    }

    /// Physical pixels per logical pixel.
    #[must_use]
    pub fn scale_factor(&self) -> f32 {
        self.scale_factor
    }

    /// Apply new options; keeps the pose and the viewport.
    pub fn set_options(&mut self, opts: &CameraOptions) {
        self.controller.set_options(opts);
        self.projection.fovy = opts.fovy;
        self.projection.znear = opts.znear;
        self.projection.zfar = opts.zfar;
    }

    /// Viewport size in physical pixels.
    #[must_use]
    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    /// Track a new viewport size.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.viewport = (width, height);
            self.projection.resize(width, height);
        }
    }

    /// Run one frame: held keys, edge-pan, smoothing. Returns the combined
    /// view-projection matrix.
    pub fn tick(
        &mut self,
        input: &InputState,
        bindings: &KeybindingOptions,
    ) -> Mat4 {
        self.controller.apply_input(input, bindings);
        if let Some(pointer) = input.pointer() {
            let viewport =
                Vec2::new(self.viewport.0 as f32, self.viewport.1 as f32);
            let _ = self.controller.apply_edge_pan(
                input.drag_mode(),
                pointer / self.scale_factor,
                viewport / self.scale_factor,
            );
        }
        let view = self.controller.advance();
        self.projection.matrix() * view
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::input::MouseButton;

    #[test]
    fn resize_changes_aspect_but_not_pose() {
        let mut rig = CameraRig::new(&CameraOptions::default(), (800, 600));
        let _ = rig.controller.apply_drag(
            crate::input::DragMode::Dragging,
            Vec2::new(30.0, 12.0),
        );
        let (pos, yaw, pitch) = (
            rig.controller.position(),
            rig.controller.yaw(),
            rig.controller.pitch(),
        );

        rig.resize(1600, 900);
        assert!((rig.projection.aspect - 16.0 / 9.0).abs() < 1e-6);
        assert_eq!(rig.viewport(), (1600, 900));
        assert_eq!(rig.controller.position(), pos);
        assert_eq!(rig.controller.yaw(), yaw);
        assert_eq!(rig.controller.pitch(), pitch);
    }

    #[test]
    fn tick_skips_edge_pan_while_dragging() {
        let bindings = KeybindingOptions::default();
        let mut rig = CameraRig::new(&CameraOptions::default(), (800, 600));
        let mut input = InputState::new();
        let _ = input.move_pointer(2.0, 300.0);

        input.set_button(MouseButton::Left, true);
        let yaw = rig.controller.yaw();
        let _ = rig.tick(&input, &bindings);
        assert_eq!(rig.controller.yaw(), yaw);

        input.set_button(MouseButton::Left, false);
        let _ = rig.tick(&input, &bindings);
        assert!(rig.controller.yaw() > yaw);
    }

    #[test]
    fn edge_margin_is_measured_in_logical_pixels() {
        let bindings = KeybindingOptions::default();
        let mut input = InputState::new();
        // 200 physical pixels from the left: outside the 150 margin at 1x,
        // 100 logical pixels (inside it) at 2x.
        let _ = input.move_pointer(200.0, 600.0);

        let mut standard =
            CameraRig::new(&CameraOptions::default(), (1600, 1200));
        let yaw = standard.controller.yaw();
        let _ = standard.tick(&input, &bindings);
        assert_eq!(standard.controller.yaw(), yaw);

        let mut hidpi = CameraRig::new(&CameraOptions::default(), (1600, 1200));
        hidpi.set_scale_factor(2.0);
        let _ = hidpi.tick(&input, &bindings);
        assert!(hidpi.controller.yaw() > yaw);
        assert_eq!(hidpi.controller.pitch(), standard.controller.pitch());
    }

    #[test]
    fn invalid_scale_factor_is_ignored() {
        let mut rig = CameraRig::new(&CameraOptions::default(), (800, 600));
        rig.set_scale_factor(0.0);
        rig.set_scale_factor(f32::NAN);
        assert_eq!(rig.scale_factor(), 1.0);
    }

    #[test]
    fn tick_without_pointer_only_smooths() {
        let bindings = KeybindingOptions::default();
        let mut rig = CameraRig::new(&CameraOptions::default(), (800, 600));
        let vp = rig.tick(&InputState::new(), &bindings);
        // The origin is straight ahead of the start pose.
        let clip = vp * Vec3::ZERO.extend(1.0);
        assert!(clip.w > 0.0);
        assert!((clip.x / clip.w).abs() < 1e-4);
        assert!((clip.y / clip.w).abs() < 1e-4);
    }
}
