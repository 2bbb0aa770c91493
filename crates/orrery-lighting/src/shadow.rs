//! Per-light shadow map resources and the light-space matrix.
//!
//! Every active light owns exactly one depth target; the target is never
//! shared or pooled. The map must be re-rendered each frame before the
//! light's contribution pass samples it.

use glam::{Mat4, Vec3};

/// Default shadow map edge length in texels.
pub const SHADOW_MAP_RESOLUTION: u32 = 1024;

/// Field of view of the shadow frustum; wide so a light sitting close to the
/// planet surface still covers the whole visible scene.
const SHADOW_FOV_Y: f32 = std::f32::consts::FRAC_PI_2;

const SHADOW_NEAR: f32 = 0.5;
const SHADOW_FAR: f32 = 100.0;

/// Light-space view-projection matrix for a point light.
///
/// The frustum looks from the light toward the scene origin. The up vector
/// switches axes when the view direction is nearly parallel to world z.
pub fn light_view_projection(light_position: Vec3) -> Mat4 {
    let to_origin = (-light_position).normalize_or_zero();
    let up = if to_origin.z.abs() > 0.99 {
        Vec3::Y
    } else {
        Vec3::Z
    };
    let view = Mat4::look_at_rh(light_position, Vec3::ZERO, up);
    let proj = Mat4::perspective_rh(SHADOW_FOV_Y, 1.0, SHADOW_NEAR, SHADOW_FAR);
    proj * view
}

/// GPU resources for one light's shadow map.
pub struct ShadowMapTarget {
    /// Depth texture the shadow pass renders into.
    pub texture: wgpu::Texture,
    /// View used both as render attachment and sampled binding.
    pub view: wgpu::TextureView,
    /// Comparison sampler for hardware PCF.
    pub sampler: wgpu::Sampler,
    /// Uniform buffer holding the light-space matrix for the depth pass.
    pub matrix_buffer: wgpu::Buffer,
}

impl ShadowMapTarget {
    /// Allocate the depth target and its matrix buffer.
    pub fn new(device: &wgpu::Device, label: &str, resolution: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: resolution,
                height: resolution,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("shadow-comparison-sampler"),
            compare: Some(wgpu::CompareFunction::LessEqual),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            ..Default::default()
        });

        let matrix_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("shadow-light-matrix"),
            size: 64, // mat4x4<f32>
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            texture,
            view,
            sampler,
            matrix_buffer,
        }
    }

    /// Upload the light-space matrix for this frame.
    pub fn write_matrix(&self, queue: &wgpu::Queue, light_view_proj: Mat4) {
        queue.write_buffer(
            &self.matrix_buffer,
            0,
            bytemuck::cast_slice(&light_view_proj.to_cols_array()),
        );
    }
}
