//! Point cloud pass.
//!
//! Positions and colors live in two per-instance vertex buffers; every
//! instance draws six vertices that the shader expands into a disc sprite.

use crate::gpu::dynamic_buffer::TypedBuffer;
use crate::gpu::render_context::RenderContext;
use crate::point_cloud::PointCloud;
use crate::renderer::pipeline_util;

const VERTICES_PER_POINT: u32 = 6;

/// Most points a device with `max_buffer_size` can hold in one vertex
/// buffer.
#[must_use]
pub fn point_limit(max_buffer_size: u64) -> usize {
    let per_point = size_of::<[f32; 3]>() as u64;
    usize::try_from(max_buffer_size / per_point).unwrap_or(usize::MAX)
}

const POSITION_ATTRIBUTES: [wgpu::VertexAttribute; 1] =
    wgpu::vertex_attr_array![0 => Float32x3];
const COLOR_ATTRIBUTES: [wgpu::VertexAttribute; 1] =
    wgpu::vertex_attr_array![1 => Float32x3];

/// Draws a [`PointCloud`] as screen-space discs.
pub struct PointCloudRenderer {
    pipeline: wgpu::RenderPipeline,
    positions: TypedBuffer<[f32; 3]>,
    colors: TypedBuffer<[f32; 3]>,
    point_count: u32,
}

impl PointCloudRenderer {
    /// Build the pipeline against the shared camera layout.
    pub fn new(
        context: &RenderContext,
        camera_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let device = &context.device;
        let shader = device.create_shader_module(wgpu::include_wgsl!(
            "../../assets/shaders/point_cloud.wgsl"
        ));

        let pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Point Cloud Pipeline Layout"),
                bind_group_layouts: &[camera_layout],
                push_constant_ranges: &[],
            });

        let pipeline =
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Point Cloud Pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[
                        pipeline_util::vec3_layout(
                            wgpu::VertexStepMode::Instance,
                            &POSITION_ATTRIBUTES,
                        ),
                        pipeline_util::vec3_layout(
                            wgpu::VertexStepMode::Instance,
                            &COLOR_ATTRIBUTES,
                        ),
                    ],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    targets: &pipeline_util::color_targets(context.format()),
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState::default(),
                depth_stencil: Some(pipeline_util::depth_stencil_state()),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            });

        let usage = wgpu::BufferUsages::VERTEX;
        Self {
            pipeline,
            positions: TypedBuffer::with_capacity(
                device,
                "Point Positions",
                0,
                usage,
            ),
            colors: TypedBuffer::with_capacity(device, "Point Colors", 0, usage),
            point_count: 0,
        }
    }

    /// Replace the uploaded points with `cloud`.
    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        cloud: &PointCloud,
    ) {
        if !self.positions.fits(cloud.len()) || !self.colors.fits(cloud.len()) {
            log::warn!(
                "{} points do not fit in a vertex buffer; keeping {}",
                cloud.len(),
                self.point_count
            );
            return;
        }
        let _ = self.positions.write(device, queue, cloud.positions());
        let _ = self.colors.write(device, queue, cloud.colors());
        self.point_count = u32::try_from(cloud.len()).unwrap_or(u32::MAX);
        log::debug!(
            "uploaded {} points ({} capacity)",
            self.point_count,
            self.positions.capacity()
        );
    }

    /// Number of points drawn per frame.
    pub fn point_count(&self) -> u32 {
        self.point_count
    }

    /// Free both vertex buffers. Nothing is drawn until the next upload.
    pub fn release(&mut self) {
        self.positions.destroy();
        self.colors.destroy();
        self.point_count = 0;
    }

    /// Record the draw into `render_pass`.
    pub fn draw<'a>(
        &'a self,
        render_pass: &mut wgpu::RenderPass<'a>,
        camera_bind_group: &'a wgpu::BindGroup,
    ) {
        if self.point_count == 0 {
            return;
        }
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, camera_bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.positions.slice());
        render_pass.set_vertex_buffer(1, self.colors.slice());
        render_pass.draw(0..VERTICES_PER_POINT, 0..self.point_count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_limit_follows_buffer_size() {
        assert_eq!(point_limit(268_435_456), 22_369_621);
        assert_eq!(point_limit(11), 0);
    }
}
