use std::ops::Range;

use crate::math::LinearColor;

use super::ClearOptions;

/// Immediate-mode render context for one frame.
///
/// Commands execute (are recorded) in call order; there is no deferred
/// command list to replay. The context borrows the frame's encoder and
/// color view, so it cannot outlive the frame it records into.
///
/// The windowed frame target is color-only; depth/stencil clear values take
/// effect once a pass carries a depth attachment.
pub struct RenderContext<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
    encoder: &'a mut wgpu::CommandEncoder,
    color_view: &'a wgpu::TextureView,
}

impl<'a> RenderContext<'a> {
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        encoder: &'a mut wgpu::CommandEncoder,
        color_view: &'a wgpu::TextureView,
    ) -> Self {
        Self { device, queue, surface_format, encoder, color_view }
    }

    /// Whether commands execute as they are issued. Always true for this
    /// context; a deferred variant would record for later replay.
    #[inline]
    pub const fn is_immediate(&self) -> bool {
        true
    }

    /// Clears all planes of the bound target to the specified color.
    pub fn clear(&mut self, color: LinearColor) {
        self.clear_with(ClearOptions::all(), color, 1.0, 0);
    }

    /// Clears the selected planes of the bound target.
    pub fn clear_with(
        &mut self,
        options: ClearOptions,
        color: LinearColor,
        _depth: f32,
        _stencil: u32,
    ) {
        if !options.contains(ClearOptions::COLOR) {
            return;
        }

        // An empty pass whose load op clears is the immediate clear.
        self.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("kiln clear pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: self.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(color_to_wgpu(color)),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });
    }

    /// Draws non-indexed, non-instanced geometry with the given pipeline
    /// and vertex buffer (slot 0).
    pub fn draw(
        &mut self,
        pipeline: &wgpu::RenderPipeline,
        vertex_buffer: &wgpu::Buffer,
        vertices: Range<u32>,
    ) {
        let mut rpass = self.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("kiln draw pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: self.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);
        rpass.set_vertex_buffer(0, vertex_buffer.slice(..));
        rpass.draw(vertices, 0..1);
    }
}

fn color_to_wgpu(c: LinearColor) -> wgpu::Color {
    wgpu::Color {
        r: c.r as f64,
        g: c.g as f64,
        b: c.b as f64,
        a: c.a as f64,
    }
}
