use std::f32::consts::FRAC_PI_2;

use glam::{Mat4, Vec2, Vec3};

use crate::camera::core::look_at;
use crate::input::{DragMode, InputState, KeyAction};
use crate::options::{CameraOptions, KeybindingOptions};

/// Largest pitch limit accepted, keeping the view clear of the poles.
const MAX_PITCH_LIMIT: f32 = FRAC_PI_2 - 1e-3;

/// Free-flying camera with smoothed translation and clamped yaw/pitch look.
///
/// Input moves a *target* position; [`advance`](Self::advance) eases the
/// real position toward it by a fixed fraction per call, so responsiveness
/// follows the frame rate.
#[derive(Debug, Clone)]
pub struct CameraController {
    position: Vec3,
    target_position: Vec3,
    yaw: f32,
    pitch: f32,

    home_position: Vec3,
    home_yaw: f32,

    move_speed: f32,
    sensitivity: f32,
    pitch_limit: f32,
    zoom_factor: f32,
    smoothing: f32,
    edge_margin: f32,
    edge_pan_speed: f32,
    bounds: f32,
}

impl CameraController {
    /// Controller at the configured start pose.
    #[must_use]
    pub fn new(opts: &CameraOptions) -> Self {
        let home_position = Vec3::from(opts.start_position);
        let mut controller = Self {
            position: home_position,
            target_position: home_position,
            yaw: opts.start_yaw,
            pitch: 0.0,
            home_position,
            home_yaw: opts.start_yaw,
            move_speed: 0.0,
            sensitivity: 0.0,
            pitch_limit: 0.0,
            zoom_factor: 0.0,
            smoothing: 0.0,
            edge_margin: 0.0,
            edge_pan_speed: 0.0,
            bounds: 0.0,
        };
        controller.set_options(opts);
        controller
    }

    /// Apply new tuning without moving the camera.
    pub fn set_options(&mut self, opts: &CameraOptions) {
        self.move_speed = opts.move_speed;
        self.sensitivity = opts.mouse_sensitivity;
        self.pitch_limit = if opts.pitch_limit.is_finite() {
            opts.pitch_limit.clamp(0.0, MAX_PITCH_LIMIT)
        } else {
            MAX_PITCH_LIMIT
        };
        self.zoom_factor = opts.zoom_factor;
        self.smoothing = if opts.smoothing.is_finite() {
            opts.smoothing.clamp(0.0, 1.0)
        } else {
            1.0
        };
        self.edge_margin = opts.edge_margin.max(0.0);
        self.edge_pan_speed = opts.edge_pan_speed;
        self.bounds = opts.bounds.abs();
        self.home_position = Vec3::from(opts.start_position);
        self.home_yaw = opts.start_yaw;
        self.pitch = self.clamped_pitch(self.pitch);
    }

    /// Smoothed eye position.
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Position the smoothing is heading for.
    #[must_use]
    pub fn target_position(&self) -> Vec3 {
        self.target_position
    }

    /// Horizontal look angle, radians.
    #[must_use]
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Vertical look angle, radians, within `[-pitch_limit, pitch_limit]`.
    #[must_use]
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Active pitch clamp.
    #[must_use]
    pub fn pitch_limit(&self) -> f32 {
        self.pitch_limit
    }

    /// Unit view direction from yaw and pitch.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        Vec3::new(cp * sy, sp, cp * cy)
    }

    /// View direction projected onto the ground plane; pitch does not
    /// affect walking.
    fn flat_forward(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        Vec3::new(sy, 0.0, cy)
    }

    fn clamped_pitch(&self, pitch: f32) -> f32 {
        pitch.clamp(-self.pitch_limit, self.pitch_limit)
    }

    fn clamp_target(&mut self) {
        let b = Vec3::splat(self.bounds);
        self.target_position = self.target_position.clamp(-b, b);
    }

    /// Nudge the target by one step for every held movement key.
    pub fn apply_input(
        &mut self,
        input: &InputState,
        bindings: &KeybindingOptions,
    ) {
        let forward = self.flat_forward();
        let right = forward.cross(Vec3::Y).normalize_or_zero();

        let mut step = Vec3::ZERO;
        for action in KeyAction::MOVEMENT {
            let held = bindings
                .key_for(action)
                .is_some_and(|key| input.is_held(key));
            if !held {
                continue;
            }
            step += match action {
                KeyAction::MoveForward => forward,
                KeyAction::MoveBack => -forward,
                KeyAction::StrafeLeft => -right,
                KeyAction::StrafeRight => right,
                KeyAction::MoveUp => Vec3::Y,
                KeyAction::MoveDown => Vec3::NEG_Y,
                _ => Vec3::ZERO,
            };
        }

        if step != Vec3::ZERO {
            self.target_position += step * self.move_speed;
            self.clamp_target();
        }
    }

    /// Turn by a pointer delta. Only applies while `mode` is
    /// [`DragMode::Dragging`]; returns whether the view changed.
    pub fn apply_drag(&mut self, mode: DragMode, delta: Vec2) -> bool {
        if mode != DragMode::Dragging {
            return false;
        }
        self.yaw -= delta.x * self.sensitivity;
        self.pitch = self.clamped_pitch(self.pitch - delta.y * self.sensitivity);
        true
    }

    /// Move the target along the view direction. Positive (scroll-down)
    /// deltas pull back.
    pub fn apply_zoom(&mut self, wheel_delta: f32) {
        if !wheel_delta.is_finite() {
            return;
        }
        self.target_position += self.forward() * (-wheel_delta * self.zoom_factor);
        self.clamp_target();
    }

    /// Turn toward a viewport edge the pointer is resting near.
    ///
    /// Runs only while `mode` is [`DragMode::Idle`]. The turn rate scales
    /// with how deep the pointer sits inside the margin. Returns whether the
    /// view changed.
    pub fn apply_edge_pan(
        &mut self,
        mode: DragMode,
        pointer: Vec2,
        viewport: Vec2,
    ) -> bool {
        if mode != DragMode::Idle
            || self.edge_margin <= 0.0
            || viewport.x <= 0.0
            || viewport.y <= 0.0
        {
            return false;
        }

        let m = self.edge_margin;
        let depth = |inside: f32| (inside / m).clamp(0.0, 1.0);
        let (yaw, pitch) = (self.yaw, self.pitch);

        if pointer.x < m {
            self.yaw += self.edge_pan_speed * depth(m - pointer.x);
        } else if pointer.x > viewport.x - m {
            self.yaw -= self.edge_pan_speed * depth(pointer.x - (viewport.x - m));
        }

        if pointer.y < m {
            self.pitch += self.edge_pan_speed * depth(m - pointer.y);
        } else if pointer.y > viewport.y - m {
            self.pitch -= self.edge_pan_speed * depth(pointer.y - (viewport.y - m));
        }
        self.pitch = self.clamped_pitch(self.pitch);

        yaw != self.yaw || pitch != self.pitch
    }

    /// Ease toward the target and return this frame's view matrix.
    pub fn advance(&mut self) -> Mat4 {
        self.position = self.position.lerp(self.target_position, self.smoothing);
        self.view_matrix()
    }

    /// View matrix at the current smoothed position, without advancing.
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        look_at(self.position, self.position + self.forward(), Vec3::Y)
    }

    /// Jump back to the start pose.
    pub fn reset(&mut self) {
        self.position = self.home_position;
        self.target_position = self.home_position;
        self.yaw = self.home_yaw;
        self.pitch = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> CameraController {
        let opts = CameraOptions {
            start_position: [0.0, 0.0, 0.0],
            start_yaw: 0.0,
            ..CameraOptions::default()
        };
        CameraController::new(&opts)
    }

    fn holding(keys: &[&str]) -> InputState {
        let mut input = InputState::new();
        for key in keys {
            input.set_key(key, true);
        }
        input
    }

    #[test]
    fn pitch_stays_clamped_under_drag() {
        let mut cam = controller();
        let limit = cam.pitch_limit();
        assert!(limit < FRAC_PI_2);

        for dy in [-5000.0, 300.0, 12_000.0, -1.0, f32::MAX / 2.0] {
            let _ = cam.apply_drag(DragMode::Dragging, Vec2::new(3.0, dy));
            assert!(cam.pitch() >= -limit && cam.pitch() <= limit);
        }
    }

    #[test]
    fn pitch_stays_clamped_under_edge_pan() {
        let mut cam = controller();
        let limit = cam.pitch_limit();
        let viewport = Vec2::new(800.0, 600.0);
        for _ in 0..1000 {
            let _ = cam.apply_edge_pan(DragMode::Idle, Vec2::ZERO, viewport);
        }
        assert!((cam.pitch() - limit).abs() < 1e-6);
        for _ in 0..2000 {
            let _ = cam.apply_edge_pan(DragMode::Idle, viewport, viewport);
        }
        assert!((cam.pitch() + limit).abs() < 1e-6);
    }

    #[test]
    fn drag_turns_against_pointer_motion() {
        let mut cam = controller();
        assert!(cam.apply_drag(DragMode::Dragging, Vec2::new(10.0, 10.0)));
        assert!((cam.yaw() + 0.03).abs() < 1e-6);
        assert!((cam.pitch() + 0.03).abs() < 1e-6);
    }

    #[test]
    fn drag_and_edge_pan_are_mutually_exclusive() {
        let viewport = Vec2::new(800.0, 600.0);
        let corner = Vec2::new(1.0, 1.0);

        for mode in [DragMode::Idle, DragMode::Dragging, DragMode::Locked] {
            let mut cam = controller();
            let dragged = cam.apply_drag(mode, Vec2::new(4.0, 4.0));
            let panned = cam.apply_edge_pan(mode, corner, viewport);
            assert!(!(dragged && panned), "{mode:?} applied both");
        }

        let mut cam = controller();
        assert!(!cam.apply_drag(DragMode::Locked, Vec2::new(50.0, 50.0)));
        assert!(!cam.apply_edge_pan(DragMode::Locked, corner, viewport));
        assert_eq!((cam.yaw(), cam.pitch()), (0.0, 0.0));
    }

    #[test]
    fn edge_pan_scales_with_penetration() {
        let viewport = Vec2::new(1000.0, 1000.0);
        let mut cam = controller();
        // Center: nothing happens.
        assert!(!cam.apply_edge_pan(DragMode::Idle, Vec2::splat(500.0), viewport));

        // Halfway into the left margin: half speed, yaw increases.
        assert!(cam.apply_edge_pan(DragMode::Idle, Vec2::new(75.0, 500.0), viewport));
        assert!((cam.yaw() - 0.01).abs() < 1e-6);

        // Flush against the right edge: full speed, yaw decreases.
        let mut cam = controller();
        let _ = cam.apply_edge_pan(DragMode::Idle, Vec2::new(1000.0, 500.0), viewport);
        assert!((cam.yaw() + 0.02).abs() < 1e-6);
    }

    #[test]
    fn edge_pan_ignores_degenerate_viewport() {
        let mut cam = controller();
        assert!(!cam.apply_edge_pan(DragMode::Idle, Vec2::ZERO, Vec2::ZERO));
    }

    #[test]
    fn forward_key_walks_along_yaw_ignoring_pitch() {
        let mut cam = controller();
        let _ = cam.apply_drag(DragMode::Dragging, Vec2::new(0.0, -300.0));
        assert!(cam.pitch() > 0.5);

        cam.apply_input(&holding(&["KeyW"]), &KeybindingOptions::default());
        let t = cam.target_position();
        assert!((t - Vec3::new(0.0, 0.0, 0.5)).length() < 1e-6);
    }

    #[test]
    fn strafe_and_vertical_keys() {
        let bindings = KeybindingOptions::default();
        let mut cam = controller();
        cam.apply_input(&holding(&["KeyD", "Space"]), &bindings);
        // Facing +Z, right-handed: screen right is -X.
        assert!((cam.target_position() - Vec3::new(-0.5, 0.5, 0.0)).length() < 1e-6);

        let mut cam = controller();
        cam.apply_input(&holding(&["KeyA", "ShiftLeft"]), &bindings);
        assert!((cam.target_position() - Vec3::new(0.5, -0.5, 0.0)).length() < 1e-6);

        // Opposing keys cancel out.
        let mut cam = controller();
        cam.apply_input(&holding(&["KeyW", "KeyS"]), &bindings);
        assert_eq!(cam.target_position(), Vec3::ZERO);
    }

    #[test]
    fn target_is_confined_to_bounds() {
        let opts = CameraOptions {
            start_position: [0.0, 0.0, 0.0],
            start_yaw: 0.0,
            bounds: 1.0,
            ..CameraOptions::default()
        };
        let mut cam = CameraController::new(&opts);
        let input = holding(&["KeyW", "Space"]);
        for _ in 0..100 {
            cam.apply_input(&input, &KeybindingOptions::default());
        }
        assert_eq!(cam.target_position(), Vec3::new(0.0, 1.0, 1.0));

        cam.apply_zoom(-1.0e6);
        assert!(cam.target_position().abs().max_element() <= 1.0);
    }

    #[test]
    fn zoom_moves_along_view_direction() {
        let mut cam = controller();
        cam.apply_zoom(-100.0);
        assert!((cam.target_position() - Vec3::new(0.0, 0.0, 10.0)).length() < 1e-5);
        cam.apply_zoom(50.0);
        assert!((cam.target_position() - Vec3::new(0.0, 0.0, 5.0)).length() < 1e-5);
    }

    #[test]
    fn advance_converges_to_target() {
        let mut cam = controller();
        cam.apply_zoom(-1000.0);
        let target = cam.target_position();

        let mut steps = 0;
        while (cam.position() - target).length() > 1e-3 {
            let _ = cam.advance();
            steps += 1;
            assert!(steps < 200, "did not converge");
        }

        // Once there, further ticks keep it there.
        let before = cam.position();
        let _ = cam.advance();
        assert!((cam.position() - before).length() < 1e-3);
    }

    #[test]
    fn advance_smooths_by_fixed_fraction() {
        let mut cam = controller();
        cam.apply_zoom(-100.0);
        let _ = cam.advance();
        assert!((cam.position().z - 1.0).abs() < 1e-5);
    }

    #[test]
    fn view_matrix_maps_eye_to_origin() {
        let mut cam = controller();
        cam.apply_zoom(-300.0);
        let _ = cam.apply_drag(DragMode::Dragging, Vec2::new(40.0, -20.0));
        for _ in 0..100 {
            let _ = cam.advance();
        }
        let view = cam.view_matrix();
        let eye = view.transform_point3(cam.position());
        assert!(eye.length() < 1e-3);
        let ahead = view.transform_point3(cam.position() + cam.forward());
        assert!((ahead - Vec3::NEG_Z).length() < 1e-3);
    }

    #[test]
    fn reset_restores_start_pose() {
        let mut cam = CameraController::new(&CameraOptions::default());
        cam.apply_zoom(-100.0);
        let _ = cam.apply_drag(DragMode::Dragging, Vec2::new(100.0, 100.0));
        let _ = cam.advance();
        cam.reset();
        assert_eq!(cam.position(), Vec3::new(0.0, 0.0, 70.0));
        assert_eq!(cam.target_position(), cam.position());
        assert_eq!(cam.pitch(), 0.0);
        // Default start faces the origin.
        assert!((cam.forward() - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn oversized_pitch_limit_is_pulled_below_vertical() {
        let opts = CameraOptions {
            pitch_limit: 10.0,
            ..CameraOptions::default()
        };
        let cam = CameraController::new(&opts);
        assert!(cam.pitch_limit() < FRAC_PI_2);
    }
}
