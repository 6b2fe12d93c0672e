// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Image-to-relief point cloud viewer built on wgpu.
//!
//! Relief turns a 2D image into a 3D point cloud, one colored point per
//! visible pixel pushed out in depth by its brightness, and lets you fly
//! around it with a mouse-and-keyboard camera.
//!
//! # Key entry points
//!
//! - [`point_cloud::build`] - the image-to-cloud conversion
//! - [`camera::controller::CameraController`] - fly camera with drag-look,
//!   edge-pan, zoom and smoothing
//! - [`engine::ReliefEngine`] - GPU engine owning the active view
//! - [`options::Options`] - runtime configuration (camera, point cloud,
//!   display, key bindings)
//!
//! # Architecture
//!
//! Raw window events become [`InputEvent`]s. The
//! [`InputProcessor`] keeps held keys, pointer and the drag/lock state and
//! turns discrete gestures into [`engine::command::ReliefCommand`]s. Once
//! per redraw the camera polls the input state, advances its smoothed pose
//! and hands a view-projection matrix to the point and frame-box passes.
//!
//! The GPU-free [`engine::Session`] owns everything that decides what is
//! drawn, so the camera, input and rebuild logic are testable without a
//! device.

pub mod camera;
pub mod engine;
pub mod error;
pub mod gpu;
pub mod input;
pub mod options;
pub mod point_cloud;
pub mod renderer;
pub mod util;
#[cfg(feature = "viewer")]
pub mod viewer;

pub use engine::ReliefEngine;
pub use error::ReliefError;
pub use input::{InputEvent, InputProcessor, KeyAction, MouseButton};
pub use options::Options;
pub use point_cloud::{PointCloud, SourceImage};
#[cfg(feature = "viewer")]
pub use viewer::Viewer;
