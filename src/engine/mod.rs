//! The relief engine: one active view over a wgpu context.
//!
//! [`Session`] holds the GPU-free state (options, input, source image,
//! cloud, camera rig). [`ReliefEngine`] mirrors it onto the GPU after every
//! command and presents frames.

/// Discrete operations understood by the engine.
pub mod command;
mod session;

use std::path::Path;

pub use self::command::ReliefCommand;
pub use self::session::Session;
use crate::camera::binding::CameraBinding;
use crate::error::ReliefError;
use crate::gpu::render_context::RenderContext;
use crate::input::InputEvent;
use crate::options::Options;
use crate::point_cloud::SourceImage;
use crate::renderer::frame_box::FrameBoxRenderer;
use crate::renderer::point_cloud::{point_limit, PointCloudRenderer};
use crate::util::frame_timing::FrameTiming;

/// Target FPS limit
const TARGET_FPS: u32 = 300;

/// GPU resources that exist only while the relief view is active.
struct ViewRenderers {
    points: PointCloudRenderer,
    frame_box: FrameBoxRenderer,
}

impl ViewRenderers {
    fn new(
        context: &RenderContext,
        camera: &CameraBinding,
        options: &Options,
    ) -> Self {
        Self {
            points: PointCloudRenderer::new(context, &camera.layout),
            frame_box: FrameBoxRenderer::new(
                context,
                &camera.layout,
                &options.display,
            ),
        }
    }

    fn release(&mut self) {
        self.points.release();
        self.frame_box.release();
    }
}

/// The relief rendering engine.
///
/// Owns the wgpu context, the camera uniform and the renderers of the
/// active view, and keeps them in step with a [`Session`].
///
/// # Frame loop
///
/// Each frame, call [`render`](Self::render) to draw and present. Call
/// [`resize`](Self::resize) when the window size changes. Raw input goes
/// through [`handle_input`](Self::handle_input); discrete operations can
/// also be issued directly with [`execute`](Self::execute).
///
/// While [`needs_frame`](Self::needs_frame) is false the host should stop
/// requesting redraws; `render` is then a no-op. Switching the view off
/// (or resizing the empty view) asks for one background-only frame.
pub struct ReliefEngine {
    context: RenderContext,
    camera: CameraBinding,
    renderers: Option<ViewRenderers>,
    session: Session,
    frame_timing: FrameTiming,
}

impl ReliefEngine {
    /// Build the engine on an initialized context with the relief view
    /// active.
    pub fn new(context: RenderContext, options: Options) -> Self {
        let camera = CameraBinding::new(&context.device);
        let renderers = ViewRenderers::new(&context, &camera, &options);
        let mut session = Session::new(options, context.size());
        session.set_point_limit(point_limit(context.device.limits().max_buffer_size));
        Self {
            context,
            camera,
            renderers: Some(renderers),
            session,
            frame_timing: FrameTiming::new(TARGET_FPS),
        }
    }

    /// The GPU-free state.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Current options.
    pub fn options(&self) -> &Options {
        self.session.options()
    }

    /// Apply new options and push the display part to the GPU.
    pub fn set_options(&mut self, options: Options) {
        if let Some(r) = self.renderers.as_mut() {
            r.frame_box.set_options(&self.context.queue, &options.display);
        }
        self.session.set_options(options);
        self.sync();
    }

    /// Whether the relief view is shown and needs a frame loop.
    pub fn is_active(&self) -> bool {
        self.session.is_active()
    }

    /// Whether [`render`](Self::render) has anything to present: the view
    /// is active or the empty view still needs clearing.
    pub fn needs_frame(&self) -> bool {
        self.session.is_active() || self.session.clear_pending()
    }

    /// Track the window's scale factor so edge-pan margins stay in logical
    /// pixels.
    #[allow(clippy::cast_possible_truncation)]
    pub fn set_scale_factor(&mut self, scale_factor: f64) {
        self.session.set_scale_factor(scale_factor as f32);
    }

    /// Feed a platform event through input processing and execute the
    /// resulting command, if any.
    pub fn handle_input(&mut self, event: InputEvent) {
        if let Some(cmd) = self.session.handle_event(event) {
            self.execute(cmd);
        }
    }

    /// Execute a command.
    pub fn execute(&mut self, cmd: ReliefCommand) {
        log::trace!("execute {cmd:?}");
        self.session.execute(cmd);
        self.sync();
    }

    /// Take a pending request for an image picker.
    pub fn take_open_request(&mut self) -> bool {
        self.session.take_open_request()
    }

    /// Decode the image at `path` and make it the relief source.
    ///
    /// # Errors
    ///
    /// Returns [`ReliefError`] if the file cannot be read or decoded; the
    /// current cloud stays in place.
    pub fn load_image(&mut self, path: &Path) -> Result<(), ReliefError> {
        let image = SourceImage::open(path)?;
        self.set_source(image);
        Ok(())
    }

    /// Make `image` the relief source and upload the rebuilt cloud.
    pub fn set_source(&mut self, image: SourceImage) {
        self.session.set_source(image);
        self.sync();
    }

    /// Resize the surface, depth target and projection. The camera pose is
    /// left alone.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.context.resize(width, height);
            self.session.resize(width, height);
        }
    }

    /// Advance the camera and draw one frame. In the empty view, present
    /// a cleared frame once per clear request.
    ///
    /// # Errors
    ///
    /// Returns [`wgpu::SurfaceError`] if the swapchain frame cannot be
    /// acquired.
    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        if self.session.take_clear_request() {
            return self.present_clear();
        }
        if !self.frame_timing.should_render() {
            return Ok(());
        }
        let Some(view_proj) = self.session.tick() else {
            return Ok(());
        };
        let Some(renderers) = self.renderers.as_ref() else {
            return Ok(());
        };

        let mut uniform = self.camera.uniform;
        uniform.update(
            view_proj,
            self.context.size(),
            self.session.options().point_cloud.point_size,
        );
        self.camera.update(&self.context.queue, uniform);

        let frame = self.context.get_next_frame()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let background = clear_color(self.session.options().display.background);

        let mut encoder = self.context.create_encoder();
        {
            let mut pass =
                encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Relief Pass"),
                    color_attachments: &[Some(
                        wgpu::RenderPassColorAttachment {
                            view: &view,
                            depth_slice: None,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(background),
                                store: wgpu::StoreOp::Store,
                            },
                        },
                    )],
                    depth_stencil_attachment: Some(
                        wgpu::RenderPassDepthStencilAttachment {
                            view: self.context.depth_view(),
                            depth_ops: Some(wgpu::Operations {
                                load: wgpu::LoadOp::Clear(1.0),
                                store: wgpu::StoreOp::Store,
                            }),
                            stencil_ops: None,
                        },
                    ),
                    timestamp_writes: None,
                    occlusion_query_set: None,
                });
            renderers.frame_box.draw(&mut pass, &self.camera.bind_group);
            renderers.points.draw(&mut pass, &self.camera.bind_group);
        }
        self.context.submit(encoder);
        frame.present();

        self.frame_timing.end_frame();
        Ok(())
    }

    /// Present a frame holding only the background color.
    fn present_clear(&mut self) -> Result<(), wgpu::SurfaceError> {
        let frame = self.context.get_next_frame()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let background = clear_color(self.session.options().display.background);

        let mut encoder = self.context.create_encoder();
        {
            let _pass =
                encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Empty View Pass"),
                    color_attachments: &[Some(
                        wgpu::RenderPassColorAttachment {
                            view: &view,
                            depth_slice: None,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(background),
                                store: wgpu::StoreOp::Store,
                            },
                        },
                    )],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                });
        }
        self.context.submit(encoder);
        frame.present();
        log::debug!("presented empty view");
        Ok(())
    }

    /// Mirror session changes onto the GPU: create or release the view's
    /// renderers and re-upload the cloud when it changed.
    fn sync(&mut self) {
        match (self.session.is_active(), self.renderers.is_some()) {
            (false, true) => {
                if let Some(mut r) = self.renderers.take() {
                    r.release();
                }
            }
            (true, false) => {
                self.renderers = Some(ViewRenderers::new(
                    &self.context,
                    &self.camera,
                    self.session.options(),
                ));
                self.frame_timing.reset();
            }
            _ => {}
        }

        if self.session.take_cloud_dirty() {
            if let Some(r) = self.renderers.as_mut() {
                r.points.upload(
                    &self.context.device,
                    &self.context.queue,
                    self.session.cloud(),
                );
                log::info!("{} points", r.points.point_count());
            }
        }
    }
}

/// Opaque clear color for an RGB background.
fn clear_color([r, g, b]: [f32; 3]) -> wgpu::Color {
    wgpu::Color {
        r: f64::from(r),
        g: f64::from(g),
        b: f64::from(b),
        a: 1.0,
    }
}
