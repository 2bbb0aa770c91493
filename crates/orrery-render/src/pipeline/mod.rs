//! Render pipelines with embedded WGSL.
//!
//! All scene pipelines share the same bind group plan: frame globals at
//! group 0, the per-actor model slab (dynamic offset) at group 1, and the
//! lit pipelines add per-light data plus the shadow map at group 2.

mod base;
mod lit;
mod shadowmap;

pub use base::{
    AMBIENT_SHADER_SOURCE, BLOOM_SHADER_SOURCE, BasePipeline, PERLIN_SHADER_SOURCE, draw_base,
};
pub use lit::{
    LIT_SHADER_SOURCE, LitPipeline, PERLIN_LIT_SHADER_SOURCE, ShadingStyle, draw_contribution,
};
pub use shadowmap::{SHADOWMAP_SHADER_SOURCE, ShadowMapPipeline, draw_shadow_caster};

use std::num::NonZeroU64;

/// Bind group layout for the frame globals uniform (group 0).
pub(crate) fn frame_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("frame-bgl"),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: NonZeroU64::new(160), // FrameUniform
            },
            count: None,
        }],
    })
}

/// Bind group layout for the dynamic-offset model slab (group 1).
pub(crate) fn model_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("model-bgl"),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: true,
                min_binding_size: NonZeroU64::new(192), // ModelUniform
            },
            count: None,
        }],
    })
}

#[cfg(test)]
mod tests {
    use crate::uniforms::MODEL_SLOT_STRIDE;

    #[test]
    fn test_model_uniform_fits_slot_stride() {
        assert!(192 <= MODEL_SLOT_STRIDE);
    }
}
