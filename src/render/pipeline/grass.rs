//! Instanced grass blade pipeline.

use bytemuck::{Pod, Zeroable};

use crate::render::mesh::GrassInstance;
use crate::render::target::DEPTH_FORMAT;

/// Blade-local vertex; y runs 0 at the root to 1 at the tip.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct BladeVertex {
    pub position: [f32; 3],
}

impl BladeVertex {
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<BladeVertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &wgpu::vertex_attr_array![0 => Float32x3],
    };
}

/// Unit blade: a tapered triangle strip of 3 quads expressed as triangles.
pub fn blade_vertices() -> (Vec<BladeVertex>, Vec<u32>) {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();
    let segments = 3u32;
    for seg in 0..=segments {
        let y = seg as f32 / segments as f32;
        let half_width = 0.5 * (1.0 - y * 0.85);
        vertices.push(BladeVertex { position: [-half_width, y, 0.0] });
        vertices.push(BladeVertex { position: [half_width, y, 0.0] });
    }
    for seg in 0..segments {
        let base = seg * 2;
        indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 1, base + 3]);
    }
    (vertices, indices)
}

pub struct GrassPipeline {
    pipeline: wgpu::RenderPipeline,
}

impl GrassPipeline {
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        camera_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("grass_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../../../shaders/grass.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("grass_pipeline_layout"),
            bind_group_layouts: &[camera_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("grass_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[BladeVertex::LAYOUT, GrassInstance::LAYOUT],
                compilation_options: Default::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None, // Blades are visible from both sides
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            multiview_mask: None,
            cache: None,
        });

        Self { pipeline }
    }

    pub fn pipeline(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blade_geometry_shape() {
        let (vertices, indices) = blade_vertices();
        assert_eq!(vertices.len(), 8);
        assert_eq!(indices.len(), 18);
        // Roots sit at y = 0, tips at y = 1, and the blade tapers upward.
        assert_eq!(vertices[0].position[1], 0.0);
        assert_eq!(vertices[7].position[1], 1.0);
        assert!(vertices[7].position[0].abs() < vertices[1].position[0].abs());
    }
}
