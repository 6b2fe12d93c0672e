//! Wireframe cube centered on the origin, used as a spatial reference
//! around the relief.

use wgpu::util::DeviceExt;

use crate::gpu::render_context::RenderContext;
use crate::options::DisplayOptions;
use crate::renderer::pipeline_util;

const POSITION_ATTRIBUTES: [wgpu::VertexAttribute; 1] =
    wgpu::vertex_attr_array![0 => Float32x3];

/// Pairs of corner indices forming the twelve cube edges.
const EDGES: [(usize, usize); 12] = [
    (0, 1),
    (1, 3),
    (3, 2),
    (2, 0),
    (4, 5),
    (5, 7),
    (7, 6),
    (6, 4),
    (0, 4),
    (1, 5),
    (2, 6),
    (3, 7),
];

/// Line-list vertices for an axis-aligned cube of edge length `size`.
#[must_use]
pub fn cube_edges(size: f32) -> Vec<[f32; 3]> {
    let h = size * 0.5;
    let corner = |i: usize| {
        [
            if i & 1 == 0 { -h } else { h },
            if i & 2 == 0 { -h } else { h },
            if i & 4 == 0 { -h } else { h },
        ]
    };
    EDGES
        .iter()
        .flat_map(|&(a, b)| [corner(a), corner(b)])
        .collect()
}

/// Draws the reference cube.
pub struct FrameBoxRenderer {
    pipeline: wgpu::RenderPipeline,
    vertices: wgpu::Buffer,
    vertex_count: u32,
    color_buffer: wgpu::Buffer,
    color_bind_group: wgpu::BindGroup,
    visible: bool,
}

impl FrameBoxRenderer {
    /// Build the pipeline and geometry from the display options.
    pub fn new(
        context: &RenderContext,
        camera_layout: &wgpu::BindGroupLayout,
        opts: &DisplayOptions,
    ) -> Self {
        let device = &context.device;
        let shader = device.create_shader_module(wgpu::include_wgsl!(
            "../../assets/shaders/frame_box.wgsl"
        ));

        let color_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Frame Box Color"),
                contents: bytemuck::cast_slice(&[rgba(opts.frame_box_color)]),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            });
        let color_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Frame Box Color Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });
        let color_bind_group =
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                layout: &color_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: color_buffer.as_entire_binding(),
                }],
                label: Some("Frame Box Color Bind Group"),
            });

        let pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Frame Box Pipeline Layout"),
                bind_group_layouts: &[camera_layout, &color_layout],
                push_constant_ranges: &[],
            });

        let pipeline =
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Frame Box Pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[pipeline_util::vec3_layout(
                        wgpu::VertexStepMode::Vertex,
                        &POSITION_ATTRIBUTES,
                    )],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    targets: &pipeline_util::color_targets(context.format()),
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::LineList,
                    ..Default::default()
                },
                depth_stencil: Some(pipeline_util::depth_stencil_state()),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            });

        let edges = cube_edges(opts.frame_box_size);
        let vertices =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Frame Box Vertices"),
                contents: bytemuck::cast_slice(&edges),
                usage: wgpu::BufferUsages::VERTEX,
            });

        Self {
            pipeline,
            vertices,
            vertex_count: edges.len() as u32,
            color_buffer,
            color_bind_group,
            visible: opts.show_frame_box,
        }
    }

    /// Apply color and visibility changes. The cube size is fixed at
    /// construction.
    pub fn set_options(&mut self, queue: &wgpu::Queue, opts: &DisplayOptions) {
        self.visible = opts.show_frame_box;
        queue.write_buffer(
            &self.color_buffer,
            0,
            bytemuck::cast_slice(&[rgba(opts.frame_box_color)]),
        );
    }

    /// Record the draw into `render_pass`.
    pub fn draw<'a>(
        &'a self,
        render_pass: &mut wgpu::RenderPass<'a>,
        camera_bind_group: &'a wgpu::BindGroup,
    ) {
        if !self.visible {
            return;
        }
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, camera_bind_group, &[]);
        render_pass.set_bind_group(1, &self.color_bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertices.slice(..));
        render_pass.draw(0..self.vertex_count, 0..1);
    }

    /// Free the GPU buffers.
    pub fn release(&mut self) {
        self.vertices.destroy();
        self.color_buffer.destroy();
        self.visible = false;
    }
}

fn rgba(rgb: [f32; 3]) -> [f32; 4] {
    [rgb[0], rgb[1], rgb[2], 1.0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_has_twelve_edges_on_its_faces() {
        let lines = cube_edges(20.0);
        assert_eq!(lines.len(), 24);
        for v in &lines {
            assert!(v.iter().all(|c| c.abs() == 10.0));
        }
    }

    #[test]
    fn every_edge_is_axis_aligned_and_full_length() {
        let lines = cube_edges(4.0);
        for pair in lines.chunks_exact(2) {
            let differing: Vec<f32> = (0..3)
                .map(|i| (pair[0][i] - pair[1][i]).abs())
                .filter(|d| *d > 0.0)
                .collect();
            assert_eq!(differing, vec![4.0]);
        }
    }
}
