//! Rendering passes for the relief view.
//!
//! Both passes share the camera bind group at group 0 and write a single
//! color target plus the depth buffer owned by the
//! [`RenderContext`](crate::gpu::render_context::RenderContext).

pub mod frame_box;
pub(crate) mod pipeline_util;
pub mod point_cloud;
