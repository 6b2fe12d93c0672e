//! GPU-free half of the engine.
//!
//! `Session` holds everything that decides *what* is drawn: the options,
//! the input processor, the retained source image, the current cloud and
//! the camera rig of the active view. [`ReliefEngine`](super::ReliefEngine)
//! mirrors its state onto the GPU after every command.

use glam::Mat4;

use super::command::ReliefCommand;
use crate::camera::rig::CameraRig;
use crate::input::{InputEvent, InputProcessor};
use crate::options::Options;
use crate::point_cloud::{build, BuildParams, PointCloud, SourceImage};

/// View-independent application state.
#[derive(Debug)]
pub struct Session {
    options: Options,
    input: InputProcessor,
    params: BuildParams,
    source: Option<SourceImage>,
    cloud: PointCloud,
    /// Camera of the relief view; `None` while the empty view is shown.
    rig: Option<CameraRig>,
    viewport: (u32, u32),
    scale_factor: f32,
    /// Largest cloud the renderer can hold.
    max_points: usize,
    cloud_dirty: bool,
    clear_requested: bool,
    open_requested: bool,
}

impl Session {
    /// Session with the relief view active and no image loaded.
    #[must_use]
    pub fn new(options: Options, viewport: (u32, u32)) -> Self {
        let input =
            InputProcessor::with_key_bindings(options.keybindings.clone());
        let params = BuildParams::from(&options.point_cloud);
        let rig = CameraRig::new(&options.camera, viewport);
        Self {
            options,
            input,
            params,
            source: None,
            cloud: PointCloud::default(),
            rig: Some(rig),
            viewport,
            scale_factor: 1.0,
            max_points: usize::MAX,
            cloud_dirty: false,
            clear_requested: false,
            open_requested: false,
        }
    }

    /// Cap the number of points a rebuild may produce. Larger clouds are
    /// rejected and the current one stays.
    pub fn set_point_limit(&mut self, max_points: usize) {
        self.max_points = max_points;
    }

    /// Largest accepted cloud.
    #[must_use]
    pub fn point_limit(&self) -> usize {
        self.max_points
    }

    /// Track the display scale factor; edge-pan margins are in logical
    /// pixels.
    pub fn set_scale_factor(&mut self, scale_factor: f32) {
        if scale_factor.is_finite() && scale_factor > 0.0 {
            self.scale_factor = scale_factor;
            if let Some(rig) = self.rig.as_mut() {
                rig.set_scale_factor(scale_factor);
            }
        }
    }

    /// Current options.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Replace the options. Camera tuning applies to the live rig without
    /// moving it; build parameters take effect on the next rebuild, which
    /// happens immediately if an image is loaded.
    pub fn set_options(&mut self, options: Options) {
        if let Some(rig) = self.rig.as_mut() {
            rig.set_options(&options.camera);
        }
        self.input.set_key_bindings(options.keybindings.clone());
        self.params = BuildParams::from(&options.point_cloud);
        self.options = options;
        self.rebuild();
    }

    /// Whether the relief view is shown.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.rig.is_some()
    }

    /// Camera rig of the active view.
    #[must_use]
    pub fn rig(&self) -> Option<&CameraRig> {
        self.rig.as_ref()
    }

    /// The input processor.
    #[must_use]
    pub fn input(&self) -> &InputProcessor {
        &self.input
    }

    /// Parameters used for the next rebuild.
    #[must_use]
    pub fn params(&self) -> &BuildParams {
        &self.params
    }

    /// The most recently built cloud.
    #[must_use]
    pub fn cloud(&self) -> &PointCloud {
        &self.cloud
    }

    /// The retained source image, if one was loaded.
    #[must_use]
    pub fn source(&self) -> Option<&SourceImage> {
        self.source.as_ref()
    }

    /// Feed a raw event through the input processor.
    pub fn handle_event(&mut self, event: InputEvent) -> Option<ReliefCommand> {
        self.input.handle_event(event)
    }

    /// Apply a command. Commands that need the active view are ignored
    /// while the empty view is shown.
    pub fn execute(&mut self, cmd: ReliefCommand) {
        match cmd {
            ReliefCommand::ToggleView => self.toggle_view(),
            ReliefCommand::OpenImage => self.open_requested = self.is_active(),
            ReliefCommand::AdjustHeight { steps } => self.adjust_height(steps),
            ReliefCommand::Look { delta } => {
                let mode = self.input.state().drag_mode();
                if let Some(rig) = self.rig.as_mut() {
                    let _ = rig.controller.apply_drag(mode, delta);
                }
            }
            ReliefCommand::Zoom { delta } => {
                if let Some(rig) = self.rig.as_mut() {
                    rig.controller.apply_zoom(delta);
                }
            }
            ReliefCommand::ResetCamera => {
                if let Some(rig) = self.rig.as_mut() {
                    rig.controller.reset();
                }
            }
        }
    }

    /// Take a pending request to pick a new image.
    pub fn take_open_request(&mut self) -> bool {
        std::mem::take(&mut self.open_requested)
    }

    /// Take the flag set whenever the cloud changed since the last call.
    pub fn take_cloud_dirty(&mut self) -> bool {
        std::mem::take(&mut self.cloud_dirty)
    }

    /// Whether a clear request is waiting.
    #[must_use]
    pub fn clear_pending(&self) -> bool {
        self.clear_requested
    }

    /// Take the flag set when the surface must be cleared once: the view
    /// was switched off or resized while empty.
    pub fn take_clear_request(&mut self) -> bool {
        std::mem::take(&mut self.clear_requested)
    }

    /// Install a new source image and rebuild the cloud from it. The
    /// previous cloud is replaced in one assignment.
    ///
    /// An image whose cloud exceeds the point limit is dropped with a
    /// warning; the previous source and cloud stay.
    pub fn set_source(&mut self, image: SourceImage) {
        if !self.is_active() {
            self.source = Some(image);
            return;
        }
        if let Some(cloud) = self.checked_build(&image) {
            self.source = Some(image);
            self.cloud = cloud;
            self.cloud_dirty = true;
        }
    }

    /// Shift the height scale by `steps` whole steps (never below zero)
    /// and rebuild.
    pub fn adjust_height(&mut self, steps: f32) {
        if !self.is_active() || !steps.is_finite() {
            return;
        }
        let step = self.options.point_cloud.height_step;
        self.params.height_scale =
            (self.params.height_scale + steps * step).max(0.0);
        log::info!("height scale: {:.2}", self.params.height_scale);
        self.rebuild();
    }

    /// Track a new viewport size. Only the projection changes.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.viewport = (width, height);
            match self.rig.as_mut() {
                Some(rig) => rig.resize(width, height),
                None => self.clear_requested = true,
            }
        }
    }

    /// Advance the active camera one frame; `None` in the empty view.
    pub fn tick(&mut self) -> Option<Mat4> {
        let rig = self.rig.as_mut()?;
        Some(rig.tick(self.input.state(), self.input.key_bindings()))
    }

    fn toggle_view(&mut self) {
        if self.rig.take().is_some() {
            self.cloud = PointCloud::default();
            self.clear_requested = true;
            log::info!("relief view deactivated");
        } else {
            let mut rig = CameraRig::new(&self.options.camera, self.viewport);
            rig.set_scale_factor(self.scale_factor);
            self.rig = Some(rig);
            self.clear_requested = false;
            log::info!("relief view activated");
            self.rebuild();
        }
        self.cloud_dirty = true;
    }

    fn rebuild(&mut self) {
        if !self.is_active() {
            return;
        }
        let Some(source) = self.source.as_ref() else {
            return;
        };
        if let Some(cloud) = self.checked_build(source) {
            self.cloud = cloud;
            self.cloud_dirty = true;
        }
    }

    /// Build from `image`, or `None` if the result is over the point limit.
    fn checked_build(&self, image: &SourceImage) -> Option<PointCloud> {
        let cloud = build(image, &self.params);
        if cloud.len() > self.max_points {
            log::warn!(
                "{}x{} image gives {} points, over the limit of {}; keeping the current cloud",
                image.width(),
                image.height(),
                cloud.len(),
                self.max_points
            );
            return None;
        }
        Some(cloud)
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::input::MouseButton;

    fn session() -> Session {
        Session::new(Options::default(), (800, 600))
    }

    fn white(w: u32, h: u32) -> SourceImage {
        SourceImage::filled(w, h, [255, 255, 255, 255])
    }

    #[test]
    fn set_source_builds_and_marks_dirty() {
        let mut s = session();
        assert!(!s.take_cloud_dirty());
        s.set_source(white(3, 2));
        assert_eq!(s.cloud().len(), 6);
        assert!(s.take_cloud_dirty());
        assert!(!s.take_cloud_dirty());
    }

    #[test]
    fn new_image_replaces_previous_cloud() {
        let mut s = session();
        s.set_source(white(4, 4));
        s.set_source(white(1, 1));
        assert_eq!(s.cloud().len(), 1);
    }

    #[test]
    fn height_adjust_rebuilds_from_retained_image() {
        let mut s = session();
        s.set_source(white(1, 1));
        let z0 = s.cloud().positions()[0][2];
        let _ = s.take_cloud_dirty();

        s.execute(ReliefCommand::AdjustHeight { steps: 2.0 });
        let z1 = s.cloud().positions()[0][2];
        assert!((z1 - z0 - 2.0).abs() < 1e-5);
        assert!(s.take_cloud_dirty());
    }

    #[test]
    fn height_scale_never_goes_negative() {
        let mut s = session();
        s.execute(ReliefCommand::AdjustHeight { steps: -1000.0 });
        assert_eq!(s.params().height_scale, 0.0);
    }

    #[test]
    fn toggle_view_drops_and_restores_cloud() {
        let mut s = session();
        s.set_source(white(2, 2));
        let _ = s.take_cloud_dirty();

        s.execute(ReliefCommand::ToggleView);
        assert!(!s.is_active());
        assert!(s.cloud().is_empty());
        assert!(s.tick().is_none());
        assert!(s.take_cloud_dirty());

        s.execute(ReliefCommand::ToggleView);
        assert!(s.is_active());
        assert_eq!(s.cloud().len(), 4);
        assert!(s.tick().is_some());
    }

    #[test]
    fn empty_view_ignores_camera_and_open_commands() {
        let mut s = session();
        s.execute(ReliefCommand::ToggleView);
        s.execute(ReliefCommand::Zoom { delta: -100.0 });
        s.execute(ReliefCommand::OpenImage);
        assert!(!s.take_open_request());
        s.set_source(white(1, 1));
        assert!(s.cloud().is_empty());
        assert!(s.source().is_some());
    }

    #[test]
    fn open_request_is_taken_once() {
        let mut s = session();
        s.execute(ReliefCommand::OpenImage);
        assert!(s.take_open_request());
        assert!(!s.take_open_request());
    }

    #[test]
    fn look_follows_drag_mode() {
        let mut s = session();
        let yaw0 = s.rig().map(|r| r.controller.yaw()).unwrap_or_default();

        s.execute(ReliefCommand::Look {
            delta: Vec2::new(10.0, 0.0),
        });
        let idle_yaw = s.rig().map(|r| r.controller.yaw()).unwrap_or_default();
        assert_eq!(idle_yaw, yaw0);

        let _ = s.handle_event(InputEvent::MouseButton {
            button: MouseButton::Left,
            pressed: true,
        });
        s.execute(ReliefCommand::Look {
            delta: Vec2::new(10.0, 0.0),
        });
        let dragged = s.rig().map(|r| r.controller.yaw()).unwrap_or_default();
        assert!(dragged < yaw0);
    }

    #[test]
    fn resize_keeps_pose() {
        let mut s = session();
        let before = s.rig().map(|r| r.controller.position());
        s.resize(1920, 1080);
        let rig = s.rig().cloned();
        assert_eq!(rig.as_ref().map(|r| r.viewport()), Some((1920, 1080)));
        assert_eq!(rig.map(|r| r.controller.position()), before);
    }

    #[test]
    fn oversized_image_keeps_previous_cloud() {
        let mut s = session();
        s.set_point_limit(16);
        s.set_source(white(4, 4));
        let _ = s.take_cloud_dirty();

        s.set_source(white(5, 4));
        assert_eq!(s.cloud().len(), 16);
        assert_eq!(s.source().map(SourceImage::width), Some(4));
        assert!(!s.take_cloud_dirty());
    }

    #[test]
    fn switching_off_or_resizing_empty_view_requests_one_clear() {
        let mut s = session();
        s.resize(1024, 768);
        assert!(!s.take_clear_request());

        s.execute(ReliefCommand::ToggleView);
        assert!(s.clear_pending());
        assert!(s.take_clear_request());
        assert!(!s.take_clear_request());
        assert!(!s.clear_pending());

        s.resize(640, 480);
        assert!(s.take_clear_request());

        s.resize(640, 480);
        s.execute(ReliefCommand::ToggleView);
        assert!(!s.take_clear_request());
    }

    #[test]
    fn reactivated_view_keeps_scale_factor() {
        let mut s = session();
        s.set_scale_factor(2.0);
        assert_eq!(s.rig().map(CameraRig::scale_factor), Some(2.0));

        s.execute(ReliefCommand::ToggleView);
        s.set_scale_factor(1.5);
        s.execute(ReliefCommand::ToggleView);
        assert_eq!(s.rig().map(CameraRig::scale_factor), Some(1.5));
    }

    #[test]
    fn set_options_rebuilds_with_new_params() {
        let mut s = session();
        s.set_source(white(1, 1));
        let mut opts = Options::default();
        opts.point_cloud.height_scale = 3.0;
        s.set_options(opts);
        assert!((s.cloud().positions()[0][2] - 3.0).abs() < 1e-5);
    }
}
