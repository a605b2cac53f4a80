//! Flat-color pipeline: positions in NDC, per-vertex color, no textures.
//!
//! The smallest useful pipeline for the immediate context; preview tooling
//! and smoke tests draw with it.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::math::{LinearColor, Vec3};

/// Vertex consumed by the flat pipeline.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct ColorVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl ColorVertex {
    pub fn new(position: Vec3, color: LinearColor) -> Self {
        Self {
            position: [position.x, position.y, position.z],
            color: [color.r, color.g, color.b, color.a],
        }
    }

    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3, // position (NDC)
        1 => Float32x4  // color (linear)
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ColorVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Builds the flat pipeline for the given target format.
pub fn create_flat_pipeline(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let shader_src = include_str!("shaders/flat.wgsl");
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("kiln flat shader"),
        source: wgpu::ShaderSource::Wgsl(shader_src.into()),
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("kiln flat pipeline layout"),
        bind_group_layouts: &[],
        // Newer wgpu uses immediate constants; keep disabled for now.
        immediate_size: 0,
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("kiln flat pipeline"),
        layout: Some(&pipeline_layout),

        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[ColorVertex::layout()],
        },

        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),

        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },

        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),

        multiview_mask: None,
        cache: None,
    })
}

/// Uploads a vertex slice into a GPU buffer usable at slot 0.
pub fn create_vertex_buffer(device: &wgpu::Device, vertices: &[ColorVertex]) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("kiln flat vbo"),
        contents: bytemuck::cast_slice(vertices),
        usage: wgpu::BufferUsages::VERTEX,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_packs_components_in_order() {
        let v = ColorVertex::new(Vec3::new(1.0, 2.0, 3.0), LinearColor::new(0.1, 0.2, 0.3, 0.4));
        assert_eq!(v.position, [1.0, 2.0, 3.0]);
        assert_eq!(v.color, [0.1, 0.2, 0.3, 0.4]);
    }

    #[test]
    fn vertex_stride_matches_attribute_layout() {
        // 3 floats position + 4 floats color, tightly packed.
        assert_eq!(std::mem::size_of::<ColorVertex>(), 28);
        assert_eq!(ColorVertex::layout().array_stride, 28);
    }
}
