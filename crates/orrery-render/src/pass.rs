//! Render pass abstraction for reducing wgpu boilerplate.
//!
//! Provides [`RenderPassBuilder`] for declarative render pass configuration
//! and [`FrameEncoder`] for managing per-frame command encoding lifecycle.
//! Light contribution passes load the existing color and depth instead of
//! clearing, so their output accumulates over the ambient base.

use std::sync::Arc;

/// Black clear color; the scene floats in empty space.
pub const CLEAR_BLACK: wgpu::Color = wgpu::Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 1.0,
};

/// Standard-Z depth clear value: 1.0 is the far plane.
pub const DEPTH_CLEAR_VALUE: f32 = 1.0;

/// Configuration for the depth stencil attachment.
#[derive(Debug)]
pub struct DepthAttachmentConfig {
    pub view: wgpu::TextureView,
    pub load: wgpu::LoadOp<f32>,
}

/// Builder for configuring render pass descriptors with a fluent API.
#[derive(Debug)]
pub struct RenderPassBuilder {
    color_load: wgpu::LoadOp<wgpu::Color>,
    depth_attachment: Option<DepthAttachmentConfig>,
    label: Option<&'static str>,
}

impl Default for RenderPassBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderPassBuilder {
    /// Create a new render pass builder that clears to black.
    pub fn new() -> Self {
        Self {
            color_load: wgpu::LoadOp::Clear(CLEAR_BLACK),
            depth_attachment: None,
            label: None,
        }
    }

    /// Clear the color attachment to the given color.
    pub fn clear_color(mut self, color: wgpu::Color) -> Self {
        self.color_load = wgpu::LoadOp::Clear(color);
        self
    }

    /// Keep the existing color contents; used by accumulating passes.
    pub fn load_color(mut self) -> Self {
        self.color_load = wgpu::LoadOp::Load;
        self
    }

    /// Attach a depth buffer cleared to the far plane.
    pub fn depth_clear(mut self, view: wgpu::TextureView) -> Self {
        self.depth_attachment = Some(DepthAttachmentConfig {
            view,
            load: wgpu::LoadOp::Clear(DEPTH_CLEAR_VALUE),
        });
        self
    }

    /// Attach a depth buffer keeping its existing contents.
    pub fn depth_load(mut self, view: wgpu::TextureView) -> Self {
        self.depth_attachment = Some(DepthAttachmentConfig {
            view,
            load: wgpu::LoadOp::Load,
        });
        self
    }

    /// Set debug label for the render pass.
    pub fn label(mut self, label: &'static str) -> Self {
        self.label = Some(label);
        self
    }

    /// Internal helper to create the render pass with the given color view.
    fn create_render_pass<'encoder>(
        &self,
        encoder: &'encoder mut wgpu::CommandEncoder,
        color_view: &'encoder wgpu::TextureView,
    ) -> wgpu::RenderPass<'encoder> {
        let color_attachment = wgpu::RenderPassColorAttachment {
            view: color_view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: self.color_load,
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        };

        let depth_stencil_attachment =
            self.depth_attachment
                .as_ref()
                .map(|depth| wgpu::RenderPassDepthStencilAttachment {
                    view: &depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: depth.load,
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                });

        let descriptor = wgpu::RenderPassDescriptor {
            label: self.label,
            color_attachments: &[Some(color_attachment)],
            depth_stencil_attachment,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        };

        encoder.begin_render_pass(&descriptor)
    }
}

/// Manages per-frame command encoding lifecycle with automatic submission.
pub struct FrameEncoder {
    encoder: Option<wgpu::CommandEncoder>,
    queue: Arc<wgpu::Queue>,
    surface_texture: Option<wgpu::SurfaceTexture>,
    surface_view: Option<wgpu::TextureView>,
    submitted: bool,
}

impl FrameEncoder {
    /// Create a new frame encoder for the given device, queue, and surface texture.
    pub fn new(
        device: &wgpu::Device,
        queue: Arc<wgpu::Queue>,
        surface_texture: wgpu::SurfaceTexture,
    ) -> Self {
        let encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("frame-encoder"),
        });

        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            encoder: Some(encoder),
            queue,
            surface_texture: Some(surface_texture),
            surface_view: Some(surface_view),
            submitted: false,
        }
    }

    /// Begin a render pass targeting the surface, using the builder configuration.
    pub fn begin_render_pass<'a>(
        &'a mut self,
        builder: &'a RenderPassBuilder,
    ) -> wgpu::RenderPass<'a> {
        let view = self
            .surface_view
            .as_ref()
            .expect("FrameEncoder already submitted");

        builder.create_render_pass(
            self.encoder
                .as_mut()
                .expect("FrameEncoder already submitted"),
            view,
        )
    }

    /// Begin a depth-only pass targeting an off-screen depth view (shadow maps).
    pub fn begin_depth_pass<'a>(
        &'a mut self,
        label: &'static str,
        depth_view: &'a wgpu::TextureView,
        clear: bool,
    ) -> wgpu::RenderPass<'a> {
        let load = if clear {
            wgpu::LoadOp::Clear(DEPTH_CLEAR_VALUE)
        } else {
            wgpu::LoadOp::Load
        };

        let descriptor = wgpu::RenderPassDescriptor {
            label: Some(label),
            color_attachments: &[],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth_view,
                depth_ops: Some(wgpu::Operations {
                    load,
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        };

        self.encoder
            .as_mut()
            .expect("FrameEncoder already submitted")
            .begin_render_pass(&descriptor)
    }

    /// Submit the command buffer to the queue and present the surface texture.
    /// Consumes self to prevent double-submission.
    pub fn submit(mut self) {
        if self.submitted {
            return;
        }

        if let (Some(encoder), Some(surface_texture)) =
            (self.encoder.take(), self.surface_texture.take())
        {
            let command_buffer = encoder.finish();
            self.queue.submit([command_buffer]);
            surface_texture.present();
            self.submitted = true;
        }
    }
}

impl Drop for FrameEncoder {
    fn drop(&mut self) {
        if !self.submitted
            && let (Some(encoder), Some(surface_texture)) =
                (self.encoder.take(), self.surface_texture.take())
        {
            log::warn!("FrameEncoder dropped without explicit submit() - auto-submitting");
            let command_buffer = encoder.finish();
            self.queue.submit([command_buffer]);
            surface_texture.present();
            self.submitted = true;
        }
    }
}
