//! Depth-only shadow map generation.
//!
//! Renders a shadow caster group into a light's depth target. The light-space
//! matrix lives in the light's own uniform buffer at group 0; the per-actor
//! model matrix comes from the shared model slab at group 1.

use std::num::NonZeroU64;

use crate::buffer::{MeshBuffer, VertexPositionNormalColor};
use crate::pipeline::model_bind_group_layout;
use crate::uniforms::ModelSlab;

/// Shadow map pipeline: light matrix at group 0, model slab at group 1.
pub struct ShadowMapPipeline {
    /// The underlying wgpu render pipeline.
    pub pipeline: wgpu::RenderPipeline,
    /// Light matrix bind group layout (group 0).
    pub light_matrix_bind_group_layout: wgpu::BindGroupLayout,
    /// Model slab bind group layout (group 1).
    pub model_bind_group_layout: wgpu::BindGroupLayout,
}

impl ShadowMapPipeline {
    /// Create the depth-only shadow pipeline.
    pub fn new(device: &wgpu::Device) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("shadowmap-shader"),
            source: wgpu::ShaderSource::Wgsl(SHADOWMAP_SHADER_SOURCE.into()),
        });

        let light_matrix_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("shadowmap-light-bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: NonZeroU64::new(64), // mat4x4<f32>
                    },
                    count: None,
                }],
            });

        let model_bind_group_layout = model_bind_group_layout(device);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("shadowmap-pipeline-layout"),
            bind_group_layouts: &[&light_matrix_bind_group_layout, &model_bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("shadowmap-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[VertexPositionNormalColor::layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // Front-face culling reduces acne on closed meshes.
                cull_mode: Some(wgpu::Face::Front),
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState {
                    constant: 2,
                    slope_scale: 2.0,
                    clamp: 0.0,
                },
            }),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            fragment: None,
            multiview_mask: None,
            cache: None,
        });

        Self {
            pipeline,
            light_matrix_bind_group_layout,
            model_bind_group_layout,
        }
    }
}

/// Record one actor's mesh into a shadow map pass.
pub fn draw_shadow_caster<'a>(
    render_pass: &mut wgpu::RenderPass<'a>,
    pipeline: &ShadowMapPipeline,
    light_matrix_bind_group: &'a wgpu::BindGroup,
    model_bind_group: &'a wgpu::BindGroup,
    model_slot: u32,
    mesh: &'a MeshBuffer,
) {
    render_pass.set_pipeline(&pipeline.pipeline);
    render_pass.set_bind_group(0, light_matrix_bind_group, &[]);
    render_pass.set_bind_group(1, model_bind_group, &[ModelSlab::offset(model_slot)]);
    mesh.bind(render_pass);
    mesh.draw(render_pass);
}

/// Depth-only WGSL: transform into light space, no fragment stage.
pub const SHADOWMAP_SHADER_SOURCE: &str = r#"
struct ModelUniform {
    model: mat4x4<f32>,
    mvp: mat4x4<f32>,
    normal: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> light_view_proj: mat4x4<f32>;

@group(1) @binding(0)
var<uniform> actor: ModelUniform;

@vertex
fn vs_main(@location(0) position: vec3<f32>) -> @builtin(position) vec4<f32> {
    return light_view_proj * actor.model * vec4<f32>(position, 1.0);
}
"#;
