//! Standalone relief window backed by winit.
//!
//! With the `gui` feature enabled, the open-image key shows a native file
//! picker.
//!
//! ```no_run
//! # use relief::Viewer;
//! Viewer::builder()
//!     .with_image("photo.png")
//!     .build()
//!     .run()
//!     .unwrap();
//! ```

use std::{path::PathBuf, sync::Arc};

use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::{Window, WindowId},
};

use crate::{
    error::ReliefError, gpu::render_context::RenderContext, options::Options,
    InputEvent, MouseButton, ReliefEngine,
};

/// Pixels scrolled per wheel notch for line-based scroll devices.
const LINE_SCROLL_PIXELS: f32 = 100.0;

/// Extensions offered by the file picker.
#[cfg(feature = "gui")]
const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "bmp", "gif", "webp"];

// ── Builder ──────────────────────────────────────────────────────────────

/// Fluent builder for [`Viewer`].
pub struct ViewerBuilder {
    image: Option<PathBuf>,
    options: Option<Options>,
    title: String,
}

impl ViewerBuilder {
    fn new() -> Self {
        Self {
            image: None,
            options: None,
            title: "Relief".into(),
        }
    }

    /// Image to show on startup.
    #[must_use]
    pub fn with_image(mut self, path: impl Into<PathBuf>) -> Self {
        self.image = Some(path.into());
        self
    }

    /// Override the default options.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = Some(options);
        self
    }

    /// Set the window title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Consume the builder and produce a [`Viewer`].
    #[must_use]
    pub fn build(self) -> Viewer {
        Viewer {
            image: self.image,
            options: self.options,
            title: self.title,
        }
    }
}

// ── Viewer ───────────────────────────────────────────────────────────────

/// A standalone window that displays an image as a point relief.
///
/// Construct via [`Viewer::builder`], then call [`run`](Self::run) to
/// enter the event loop.
pub struct Viewer {
    image: Option<PathBuf>,
    options: Option<Options>,
    title: String,
}

impl Viewer {
    /// Start a new builder.
    #[must_use]
    pub fn builder() -> ViewerBuilder {
        ViewerBuilder::new()
    }

    /// Open the window and run the event loop. Blocks until the window is
    /// closed.
    ///
    /// # Errors
    ///
    /// Returns [`ReliefError::Gpu`] if no usable rendering backend exists,
    /// or [`ReliefError::Viewer`] if the window system fails.
    pub fn run(self) -> Result<(), ReliefError> {
        let event_loop =
            EventLoop::new().map_err(|e| ReliefError::Viewer(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Wait);

        let mut app = ViewerApp {
            window: None,
            engine: None,
            image: self.image,
            options: self.options,
            title: self.title,
            fatal: None,
        };

        event_loop
            .run_app(&mut app)
            .map_err(|e| ReliefError::Viewer(e.to_string()))?;

        app.fatal.map_or(Ok(()), Err)
    }
}

// ── Winit app ────────────────────────────────────────────────────────────

struct ViewerApp {
    window: Option<Arc<Window>>,
    engine: Option<ReliefEngine>,
    image: Option<PathBuf>,
    options: Option<Options>,
    title: String,
    /// Startup failure returned from [`Viewer::run`].
    fatal: Option<ReliefError>,
}

fn viewport_size(inner: winit::dpi::PhysicalSize<u32>) -> (u32, u32) {
    (inner.width.max(1), inner.height.max(1))
}

/// Browser-style wheel delta: positive when scrolling down.
#[allow(clippy::cast_possible_truncation)]
fn scroll_delta(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => -y * LINE_SCROLL_PIXELS,
        MouseScrollDelta::PixelDelta(pos) => -pos.y as f32,
    }
}

/// Ask the user for an image and load it. Failures keep the current cloud.
fn open_image(engine: &mut ReliefEngine) {
    #[cfg(feature = "gui")]
    {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", &IMAGE_EXTENSIONS)
            .pick_file()
        else {
            log::warn!("no image selected");
            return;
        };
        if let Err(e) = engine.load_image(&path) {
            log::warn!("could not load {}: {e}", path.display());
        }
    }
    #[cfg(not(feature = "gui"))]
    {
        let _ = engine;
        log::warn!("file picker unavailable: built without the gui feature");
    }
}

impl ViewerApp {
    fn request_redraw(&self) {
        let active = self.engine.as_ref().is_some_and(ReliefEngine::needs_frame);
        if let (true, Some(w)) = (active, &self.window) {
            w.request_redraw();
        }
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let monitor = event_loop
            .primary_monitor()
            .or_else(|| event_loop.available_monitors().next());
        let attrs = if let Some(mon) = &monitor {
            let mon_size = mon.size();
            let scale = mon.scale_factor();
            #[allow(clippy::cast_possible_truncation)]
            let logical_w = (f64::from(mon_size.width) / scale * 0.75) as u32;
            #[allow(clippy::cast_possible_truncation)]
            let logical_h = (f64::from(mon_size.height) / scale * 0.75) as u32;
            Window::default_attributes()
                .with_title(&self.title)
                .with_inner_size(winit::dpi::LogicalSize::new(
                    logical_w, logical_h,
                ))
        } else {
            Window::default_attributes().with_title(&self.title)
        };

        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                self.fatal = Some(ReliefError::Viewer(e.to_string()));
                event_loop.exit();
                return;
            }
        };

        let viewport = viewport_size(window.inner_size());
        let context = match pollster::block_on(RenderContext::new(
            window.clone(),
            viewport,
        )) {
            Ok(c) => c,
            Err(e) => {
                self.fatal = Some(ReliefError::Gpu(e));
                event_loop.exit();
                return;
            }
        };

        let mut engine =
            ReliefEngine::new(context, self.options.take().unwrap_or_default());
        engine.set_scale_factor(window.scale_factor());
        if let Some(path) = self.image.take() {
            if let Err(e) = engine.load_image(&path) {
                log::warn!("could not load {}: {e}", path.display());
            }
        }

        window.request_redraw();
        self.window = Some(window);
        self.engine = Some(engine);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _id: WindowId,
        event: WindowEvent,
    ) {
        if matches!(event, WindowEvent::CloseRequested) {
            event_loop.exit();
            return;
        }

        let (Some(window), Some(engine)) = (&self.window, &mut self.engine)
        else {
            return;
        };

        let input = match event {
            WindowEvent::Resized(size) => {
                let (w, h) = viewport_size(size);
                engine.resize(w, h);
                None
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                engine.set_scale_factor(scale_factor);
                let (w, h) = viewport_size(window.inner_size());
                engine.resize(w, h);
                None
            }
            WindowEvent::RedrawRequested => {
                match engine.render() {
                    Ok(()) => {}
                    Err(
                        wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost,
                    ) => {
                        let (w, h) = viewport_size(window.inner_size());
                        engine.resize(w, h);
                    }
                    Err(e) => log::error!("render error: {e:?}"),
                }
                None
            }
            WindowEvent::Focused(false) => Some(InputEvent::FocusLost),
            WindowEvent::CursorLeft { .. } => Some(InputEvent::CursorLeft),
            WindowEvent::MouseInput { button, state, .. } => {
                Some(InputEvent::MouseButton {
                    button: MouseButton::from(button),
                    pressed: state == ElementState::Pressed,
                })
            }
            #[allow(clippy::cast_possible_truncation)]
            WindowEvent::CursorMoved { position, .. } => {
                Some(InputEvent::CursorMoved {
                    x: position.x as f32,
                    y: position.y as f32,
                })
            }
            WindowEvent::MouseWheel { delta, .. } => Some(InputEvent::Scroll {
                delta: scroll_delta(delta),
            }),
            WindowEvent::KeyboardInput { event, .. } if !event.repeat => {
                match event.physical_key {
                    PhysicalKey::Code(code) => Some(InputEvent::Key {
                        key: format!("{code:?}"),
                        pressed: event.state == ElementState::Pressed,
                    }),
                    PhysicalKey::Unidentified(_) => None,
                }
            }
            _ => None,
        };

        if let Some(input) = input {
            engine.handle_input(input);
            if engine.take_open_request() {
                open_image(engine);
            }
        }
        self.request_redraw();
    }
}

#[cfg(test)]
mod tests {
    use winit::dpi::PhysicalPosition;

    use super::*;

    #[test]
    fn scrolling_down_is_positive() {
        assert_eq!(scroll_delta(MouseScrollDelta::LineDelta(0.0, -1.0)), 100.0);
        assert_eq!(
            scroll_delta(MouseScrollDelta::PixelDelta(PhysicalPosition::new(
                0.0, 42.0
            ))),
            -42.0
        );
    }

    #[test]
    fn viewport_never_zero() {
        assert_eq!(
            viewport_size(winit::dpi::PhysicalSize::new(0, 0)),
            (1, 1)
        );
    }
}
