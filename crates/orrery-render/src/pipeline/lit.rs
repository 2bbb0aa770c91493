//! Per-light contribution pipelines.
//!
//! Each lit pass adds one light's diffuse and specular terms on top of the
//! base image with additive blending. Depth writes are off; fragments are
//! re-tested against the depth the base passes laid down. Every shader
//! module carries two fragment entry points: smooth phong and banded cell
//! shading, selected per frame.

use std::num::NonZeroU64;

use crate::buffer::{MeshBuffer, VertexPositionNormalColor};
use crate::depth::DepthBuffer;
use crate::pipeline::{frame_bind_group_layout, model_bind_group_layout};
use crate::uniforms::ModelSlab;

/// Which fragment entry point a lit pass uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadingStyle {
    /// Smooth phong diffuse and specular.
    Smooth,
    /// Banded cell shading.
    Cell,
}

/// Additive light contribution pipeline pair (phong and cell variants).
///
/// Frame globals at group 0, model slab at group 1, light data plus shadow
/// map at group 2.
pub struct LitPipeline {
    /// Smooth phong variant.
    pub phong: wgpu::RenderPipeline,
    /// Banded cell variant, same layout and shader module.
    pub cell: wgpu::RenderPipeline,
    /// Frame globals bind group layout (group 0).
    pub frame_bind_group_layout: wgpu::BindGroupLayout,
    /// Model slab bind group layout (group 1).
    pub model_bind_group_layout: wgpu::BindGroupLayout,
    /// Light uniform + shadow map bind group layout (group 2).
    pub light_bind_group_layout: wgpu::BindGroupLayout,
}

impl LitPipeline {
    /// Create the pipeline pair from a lit shader source.
    pub fn new(
        device: &wgpu::Device,
        label: &str,
        shader_source: &str,
        surface_format: wgpu::TextureFormat,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Wgsl(shader_source.into()),
        });

        let frame_bind_group_layout = frame_bind_group_layout(device);
        let model_bind_group_layout = model_bind_group_layout(device);

        let light_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("lit-light-bgl"),
                entries: &[
                    // binding 0: per-light uniform
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: NonZeroU64::new(96), // LightUniform
                        },
                        count: None,
                    },
                    // binding 1: shadow depth texture
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Depth,
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    // binding 2: comparison sampler
                    wgpu::BindGroupLayoutEntry {
                        binding: 2,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Comparison),
                        count: None,
                    },
                ],
            });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(label),
            bind_group_layouts: &[
                &frame_bind_group_layout,
                &model_bind_group_layout,
                &light_bind_group_layout,
            ],
            immediate_size: 0,
        });

        let make_variant = |entry_point: &str, variant_label: &str| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(variant_label),
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
                    cull_mode: Some(wgpu::Face::Back),
                    unclipped_depth: false,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    conservative: false,
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DepthBuffer::FORMAT,
                    // Contribution passes re-test but never write depth.
                    depth_write_enabled: false,
                    depth_compare: DepthBuffer::COMPARE_FUNCTION,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState {
                    count: 1,
                    mask: !0,
                    alpha_to_coverage_enabled: false,
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some(entry_point),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: surface_format,
                        // Additive: each light adds its contribution.
                        blend: Some(wgpu::BlendState {
                            color: wgpu::BlendComponent {
                                src_factor: wgpu::BlendFactor::One,
                                dst_factor: wgpu::BlendFactor::One,
                                operation: wgpu::BlendOperation::Add,
                            },
                            alpha: wgpu::BlendComponent::OVER,
                        }),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                multiview_mask: None,
                cache: None,
            })
        };

        let phong = make_variant("fs_phong", "lit-phong");
        let cell = make_variant("fs_cell", "lit-cell");

        Self {
            phong,
            cell,
            frame_bind_group_layout,
            model_bind_group_layout,
            light_bind_group_layout,
        }
    }

    /// The pipeline variant for a shading style.
    pub fn variant(&self, style: ShadingStyle) -> &wgpu::RenderPipeline {
        match style {
            ShadingStyle::Smooth => &self.phong,
            ShadingStyle::Cell => &self.cell,
        }
    }
}

/// Draw one actor's mesh through a lit contribution pipeline.
pub fn draw_contribution<'a>(
    render_pass: &mut wgpu::RenderPass<'a>,
    pipeline: &LitPipeline,
    style: ShadingStyle,
    frame_bind_group: &'a wgpu::BindGroup,
    model_bind_group: &'a wgpu::BindGroup,
    light_bind_group: &'a wgpu::BindGroup,
    model_slot: u32,
    mesh: &'a MeshBuffer,
) {
    render_pass.set_pipeline(pipeline.variant(style));
    render_pass.set_bind_group(0, frame_bind_group, &[]);
    render_pass.set_bind_group(1, model_bind_group, &[ModelSlab::offset(model_slot)]);
    render_pass.set_bind_group(2, light_bind_group, &[]);
    mesh.bind(render_pass);
    mesh.draw(render_pass);
}

/// Shared WGSL prelude for the lit shaders: uniforms, vertex stage, shadow
/// lookup, and the blinn-phong terms.
macro_rules! lit_shader {
    ($albedo:expr) => {
        concat!(
            r#"
struct FrameUniform {
    view: mat4x4<f32>,
    projection: mat4x4<f32>,
    camera_position: vec4<f32>,
    ambient_sim: vec4<f32>,
};

struct ModelUniform {
    model: mat4x4<f32>,
    mvp: mat4x4<f32>,
    normal: mat4x4<f32>,
};

struct LightUniform {
    light_view_proj: mat4x4<f32>,
    position: vec4<f32>,
    color_intensity: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> frame: FrameUniform;

@group(1) @binding(0)
var<uniform> actor: ModelUniform;

@group(2) @binding(0)
var<uniform> light: LightUniform;

@group(2) @binding(1)
var shadow_map: texture_depth_2d;

@group(2) @binding(2)
var shadow_sampler: sampler_comparison;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) color: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
    @location(1) world_position: vec3<f32>,
    @location(2) world_normal: vec3<f32>,
    @location(3) object_position: vec3<f32>,
};

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    let world = actor.model * vec4<f32>(in.position, 1.0);
    out.clip_position = actor.mvp * vec4<f32>(in.position, 1.0);
    out.color = in.color;
    out.world_position = world.xyz;
    out.world_normal = (actor.normal * vec4<f32>(in.normal, 0.0)).xyz;
    out.object_position = in.position;
    return out;
}

fn shadow_factor(world_position: vec3<f32>) -> f32 {
    let light_clip = light.light_view_proj * vec4<f32>(world_position, 1.0);
    let ndc = light_clip.xyz / light_clip.w;
    let uv = vec2<f32>(ndc.x * 0.5 + 0.5, -ndc.y * 0.5 + 0.5);
    if uv.x < 0.0 || uv.x > 1.0 || uv.y < 0.0 || uv.y > 1.0 || ndc.z > 1.0 {
        return 1.0;
    }
    return textureSampleCompareLevel(shadow_map, shadow_sampler, uv, ndc.z);
}

fn hash3(p: vec3<f32>) -> f32 {
    let h = dot(p, vec3<f32>(127.1, 311.7, 74.7));
    return fract(sin(h) * 43758.5453123);
}

fn value_noise(p: vec3<f32>) -> f32 {
    let i = floor(p);
    let f = fract(p);
    let u = f * f * (3.0 - 2.0 * f);

    let n000 = hash3(i);
    let n100 = hash3(i + vec3<f32>(1.0, 0.0, 0.0));
    let n010 = hash3(i + vec3<f32>(0.0, 1.0, 0.0));
    let n110 = hash3(i + vec3<f32>(1.0, 1.0, 0.0));
    let n001 = hash3(i + vec3<f32>(0.0, 0.0, 1.0));
    let n101 = hash3(i + vec3<f32>(1.0, 0.0, 1.0));
    let n011 = hash3(i + vec3<f32>(0.0, 1.0, 1.0));
    let n111 = hash3(i + vec3<f32>(1.0, 1.0, 1.0));

    let nx00 = mix(n000, n100, u.x);
    let nx10 = mix(n010, n110, u.x);
    let nx01 = mix(n001, n101, u.x);
    let nx11 = mix(n011, n111, u.x);
    let nxy0 = mix(nx00, nx10, u.y);
    let nxy1 = mix(nx01, nx11, u.y);
    return mix(nxy0, nxy1, u.z);
}

fn fbm(p: vec3<f32>) -> f32 {
    var value = 0.0;
    var amplitude = 0.5;
    var q = p;
    for (var i = 0; i < 4; i++) {
        value += amplitude * value_noise(q);
        q = q * 2.0;
        amplitude *= 0.5;
    }
    return value;
}

fn surface_albedo(base: vec3<f32>, object_position: vec3<f32>) -> vec3<f32> {
"#,
            $albedo,
            r#"
}

const SHININESS: f32 = 64.0;

@fragment
fn fs_phong(in: VertexOutput) -> @location(0) vec4<f32> {
    let n = normalize(in.world_normal);
    let to_light = light.position.xyz - in.world_position;
    let dist = length(to_light);
    let l = to_light / dist;
    let v = normalize(frame.camera_position.xyz - in.world_position);
    let h = normalize(l + v);

    let diffuse = max(dot(n, l), 0.0);
    var specular = 0.0;
    if diffuse > 0.0 {
        specular = pow(max(dot(n, h), 0.0), SHININESS);
    }

    let attenuation = light.color_intensity.w / (dist * dist);
    let shadow = shadow_factor(in.world_position);
    let albedo = surface_albedo(in.color.rgb, in.object_position);

    let color = (albedo * diffuse + vec3<f32>(specular))
              * light.color_intensity.xyz * attenuation * shadow;
    return vec4<f32>(color, 0.0);
}

@fragment
fn fs_cell(in: VertexOutput) -> @location(0) vec4<f32> {
    let n = normalize(in.world_normal);
    let to_light = light.position.xyz - in.world_position;
    let dist = length(to_light);
    let l = to_light / dist;
    let v = normalize(frame.camera_position.xyz - in.world_position);
    let h = normalize(l + v);

    // Band the diffuse term into three flat steps.
    let diffuse = floor(max(dot(n, l), 0.0) * 3.0) / 3.0;
    var specular = 0.0;
    if diffuse > 0.0 && pow(max(dot(n, h), 0.0), SHININESS) > 0.5 {
        specular = 1.0;
    }

    let attenuation = light.color_intensity.w / (dist * dist);
    let shadow = shadow_factor(in.world_position);
    let albedo = surface_albedo(in.color.rgb, in.object_position);

    let color = (albedo * diffuse + vec3<f32>(specular))
              * light.color_intensity.xyz * attenuation * shadow;
    return vec4<f32>(color, 0.0);
}
"#
        )
    };
}

/// Lit shader for plain-colored actors: the albedo is the vertex color.
pub const LIT_SHADER_SOURCE: &str = lit_shader!("    return base;");

/// Lit shader for procedural actors: the albedo is noise-modulated like the
/// procedural base pass, so the lit contribution matches the base texture.
pub const PERLIN_LIT_SHADER_SOURCE: &str = lit_shader!(
    "    let n = fbm(object_position * 2.0);\n    return mix(base * 0.35, base, n);"
);
