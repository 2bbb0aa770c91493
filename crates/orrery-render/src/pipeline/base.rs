//! Base passes: ambient, procedural (noise-textured) ambient, and bloom.
//!
//! These passes lay down the scene's base color and the depth buffer the
//! light contribution passes re-test against. They never blend; the frame
//! starts from their output.

use crate::buffer::{MeshBuffer, VertexPositionNormalColor};
use crate::depth::DepthBuffer;
use crate::pipeline::{frame_bind_group_layout, model_bind_group_layout};
use crate::uniforms::ModelSlab;

/// Base pipeline: frame globals at group 0, model slab at group 1.
pub struct BasePipeline {
    /// The underlying wgpu render pipeline.
    pub pipeline: wgpu::RenderPipeline,
    /// Frame globals bind group layout (group 0).
    pub frame_bind_group_layout: wgpu::BindGroupLayout,
    /// Model slab bind group layout (group 1).
    pub model_bind_group_layout: wgpu::BindGroupLayout,
}

impl BasePipeline {
    /// Create a base pipeline from one of the base shader sources.
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

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(label),
            bind_group_layouts: &[&frame_bind_group_layout, &model_bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
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
                depth_write_enabled: true,
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
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview_mask: None,
            cache: None,
        });

        Self {
            pipeline,
            frame_bind_group_layout,
            model_bind_group_layout,
        }
    }
}

/// Draw one actor's mesh through a base pipeline.
pub fn draw_base<'a>(
    render_pass: &mut wgpu::RenderPass<'a>,
    pipeline: &BasePipeline,
    frame_bind_group: &'a wgpu::BindGroup,
    model_bind_group: &'a wgpu::BindGroup,
    model_slot: u32,
    mesh: &'a MeshBuffer,
) {
    render_pass.set_pipeline(&pipeline.pipeline);
    render_pass.set_bind_group(0, frame_bind_group, &[]);
    render_pass.set_bind_group(1, model_bind_group, &[ModelSlab::offset(model_slot)]);
    mesh.bind(render_pass);
    mesh.draw(render_pass);
}

/// WGSL for the plain ambient pass: vertex color times the frame's ambient
/// light color.
pub const AMBIENT_SHADER_SOURCE: &str = r#"
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

@group(0) @binding(0)
var<uniform> frame: FrameUniform;

@group(1) @binding(0)
var<uniform> actor: ModelUniform;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) color: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = actor.mvp * vec4<f32>(in.position, 1.0);
    out.color = in.color;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return vec4<f32>(in.color.rgb * frame.ambient_sim.xyz, in.color.a);
}
"#;

/// WGSL for the procedural ambient pass: base color modulated by 3D value
/// noise in object space, then scaled by the ambient light color.
pub const PERLIN_SHADER_SOURCE: &str = r#"
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

@group(0) @binding(0)
var<uniform> frame: FrameUniform;

@group(1) @binding(0)
var<uniform> actor: ModelUniform;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) color: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
    @location(1) object_position: vec3<f32>,
};

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

fn procedural_color(base: vec3<f32>, object_position: vec3<f32>) -> vec3<f32> {
    let n = fbm(object_position * 2.0);
    let dark = base * 0.35;
    return mix(dark, base, n);
}

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = actor.mvp * vec4<f32>(in.position, 1.0);
    out.color = in.color;
    out.object_position = in.position;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let albedo = procedural_color(in.color.rgb, in.object_position);
    return vec4<f32>(albedo * frame.ambient_sim.xyz, in.color.a);
}
"#;

/// WGSL for the bloom pass: a self-lit body with a fresnel rim glow, used
/// for the sun when bloom is enabled.
pub const BLOOM_SHADER_SOURCE: &str = r#"
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

@group(0) @binding(0)
var<uniform> frame: FrameUniform;

@group(1) @binding(0)
var<uniform> actor: ModelUniform;

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
};

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    let world = actor.model * vec4<f32>(in.position, 1.0);
    out.clip_position = actor.mvp * vec4<f32>(in.position, 1.0);
    out.color = in.color;
    out.world_position = world.xyz;
    out.world_normal = (actor.normal * vec4<f32>(in.normal, 0.0)).xyz;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let n = normalize(in.world_normal);
    let v = normalize(frame.camera_position.xyz - in.world_position);
    // Rim term: edges facing away from the viewer glow brighter.
    let rim = pow(1.0 - max(dot(n, v), 0.0), 2.0);
    let glow = in.color.rgb * (1.2 + 1.5 * rim);
    return vec4<f32>(glow, in.color.a);
}
"#;
