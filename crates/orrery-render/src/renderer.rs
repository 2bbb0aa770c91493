//! The wgpu implementation of [`ScenePasses`].
//!
//! Owns the GPU context, the depth buffer, every pipeline, the per-light
//! shadow resources, and the uploaded mesh buffers. One frame is: acquire
//! the surface, let the [`FrameSequencer`] drive the passes, submit.

use std::collections::{HashMap, HashSet};

use orrery_assets::MeshData;
use orrery_lighting::{Light, LightRig, LightRole, ShadowMapTarget, light_view_projection};
use orrery_scene::{Actor, ActorRegistry, FrameContext, FrameToggles, MeshHandle};

use crate::buffer::{BufferAllocator, MeshBuffer};
use crate::depth::DepthBuffer;
use crate::gpu::{RenderContext, SurfaceError};
use crate::pass::{FrameEncoder, RenderPassBuilder};
use crate::pipeline::{
    AMBIENT_SHADER_SOURCE, BLOOM_SHADER_SOURCE, BasePipeline, LIT_SHADER_SOURCE, LitPipeline,
    PERLIN_LIT_SHADER_SOURCE, PERLIN_SHADER_SOURCE, ShadingStyle, ShadowMapPipeline, draw_base,
    draw_contribution, draw_shadow_caster,
};
use crate::passes::ScenePasses;
use crate::sequencer::FrameSequencer;
use crate::uniforms::{FrameUniform, ModelSlab, ModelUniform};

/// Slots in the model slab; bounds the number of draws per frame.
const MODEL_SLAB_CAPACITY: u32 = 512;

/// Which base pipeline a pass draws with.
#[derive(Debug, Clone, Copy)]
enum BasePassKind {
    Ambient,
    Perlin,
    Bloom,
}

/// Per-light GPU resources kept across frames.
struct LightResources {
    target: ShadowMapTarget,
    light_buffer: wgpu::Buffer,
    /// Group 0 of the shadow pipeline: the light-space matrix.
    matrix_bind_group: wgpu::BindGroup,
    /// Group 2 of the lit pipelines: light uniform, shadow map, sampler.
    lit_bind_group: wgpu::BindGroup,
}

/// wgpu renderer for the orrery scene.
pub struct Renderer {
    context: RenderContext,
    depth: DepthBuffer,

    ambient: BasePipeline,
    perlin: BasePipeline,
    bloom: BasePipeline,
    shadowmap: ShadowMapPipeline,
    lit: LitPipeline,
    perlin_lit: LitPipeline,

    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    model_slab: ModelSlab,
    model_bind_group: wgpu::BindGroup,

    meshes: Vec<MeshBuffer>,
    lights: HashMap<LightRole, LightResources>,
    shadow_map_resolution: u32,

    // Per-frame state.
    encoder: Option<FrameEncoder>,
    next_slot: u32,
    cleared_shadow_roles: HashSet<LightRole>,
}

impl Renderer {
    /// Build every pipeline and shared buffer on top of an initialized GPU
    /// context.
    pub fn new(context: RenderContext, shadow_map_resolution: u32) -> Self {
        let device = &context.device;
        let format = context.surface_format;

        let ambient = BasePipeline::new(device, "ambient-pipeline", AMBIENT_SHADER_SOURCE, format);
        let perlin = BasePipeline::new(device, "perlin-pipeline", PERLIN_SHADER_SOURCE, format);
        let bloom = BasePipeline::new(device, "bloom-pipeline", BLOOM_SHADER_SOURCE, format);
        let shadowmap = ShadowMapPipeline::new(device);
        let lit = LitPipeline::new(device, "lit-pipeline", LIT_SHADER_SOURCE, format);
        let perlin_lit = LitPipeline::new(
            device,
            "perlin-lit-pipeline",
            PERLIN_LIT_SHADER_SOURCE,
            format,
        );

        let frame_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("frame-uniform"),
            size: std::mem::size_of::<FrameUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frame-bg"),
            layout: &ambient.frame_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        let model_slab = ModelSlab::new(device, MODEL_SLAB_CAPACITY);
        let model_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("model-bg"),
            layout: &ambient.model_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: model_slab.buffer(),
                    offset: 0,
                    size: std::num::NonZeroU64::new(
                        std::mem::size_of::<ModelUniform>() as u64
                    ),
                }),
            }],
        });

        let depth = DepthBuffer::new(
            device,
            context.surface_config.width,
            context.surface_config.height,
        );

        Self {
            context,
            depth,
            ambient,
            perlin,
            bloom,
            shadowmap,
            lit,
            perlin_lit,
            frame_buffer,
            frame_bind_group,
            model_slab,
            model_bind_group,
            meshes: Vec::new(),
            lights: HashMap::new(),
            shadow_map_resolution,
            encoder: None,
            next_slot: 0,
            cleared_shadow_roles: HashSet::new(),
        }
    }

    /// Upload parsed OBJ geometry; the returned handle is what actors carry.
    pub fn upload_mesh(&mut self, label: &str, data: &MeshData) -> MeshHandle {
        let allocator = BufferAllocator::new(&self.context.device);
        let mesh = allocator.upload_mesh_data(label, data);
        self.meshes.push(mesh);
        MeshHandle(self.meshes.len() - 1)
    }

    /// Reconfigure the surface and depth buffer after a window resize.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.context.resize(width, height);
        self.depth.resize(
            &self.context.device,
            self.context.surface_config.width,
            self.context.surface_config.height,
        );
    }

    /// Current surface aspect dimensions (width, height).
    pub fn surface_size(&self) -> (u32, u32) {
        (
            self.context.surface_config.width,
            self.context.surface_config.height,
        )
    }

    /// Render one frame through the fixed pass sequence.
    ///
    /// Recoverable surface errors (timeout) skip the frame.
    pub fn render(
        &mut self,
        ctx: &FrameContext,
        toggles: FrameToggles,
        registry: &ActorRegistry,
        rig: &LightRig,
    ) -> Result<(), SurfaceError> {
        let surface_texture = match self.context.get_current_texture() {
            Ok(texture) => texture,
            Err(SurfaceError::Timeout) => {
                log::debug!("surface timeout, skipping frame");
                return Ok(());
            }
            Err(err) => return Err(err),
        };

        self.encoder = Some(FrameEncoder::new(
            &self.context.device,
            self.context.queue.clone(),
            surface_texture,
        ));

        FrameSequencer::new().render_frame(self, ctx, toggles, registry, rig);

        if let Some(encoder) = self.encoder.take() {
            encoder.submit();
        }
        Ok(())
    }

    /// Lazily create the per-light shadow resources for a role.
    fn ensure_light_resources(&mut self, role: LightRole) {
        if self.lights.contains_key(&role) {
            return;
        }
        let device = &self.context.device;
        let target = ShadowMapTarget::new(
            device,
            &format!("shadow-map-{role:?}"),
            self.shadow_map_resolution,
        );

        let light_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("light-uniform"),
            size: 96, // LightUniform
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let matrix_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("shadow-matrix-bg"),
            layout: &self.shadowmap.light_matrix_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: target.matrix_buffer.as_entire_binding(),
            }],
        });

        let lit_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("lit-light-bg"),
            layout: &self.lit.light_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: light_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&target.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&target.sampler),
                },
            ],
        });

        self.lights.insert(
            role,
            LightResources {
                target,
                light_buffer,
                matrix_bind_group,
                lit_bind_group,
            },
        );
    }

    /// Upload this frame's light uniform and shadow matrix for a role.
    fn upload_light_state(&self, role: LightRole, light: &Light) {
        let resources = &self.lights[&role];
        let matrix = light_view_projection(light.position);
        resources
            .target
            .write_matrix(&self.context.queue, matrix);
        self.context.queue.write_buffer(
            &resources.light_buffer,
            0,
            bytemuck::bytes_of(&light.to_uniform(matrix)),
        );
    }

    /// Write one slot per actor and return the first slot index.
    ///
    /// Slots carry the camera MVP for color passes; shadow passes reuse
    /// the same slots and read only the model matrix.
    fn allocate_slots(&mut self, ctx: &FrameContext, actors: &[Actor]) -> u32 {
        let base = self.next_slot;
        for (i, actor) in actors.iter().enumerate() {
            let uniform = ModelUniform::new(actor.transform, ctx.view, ctx.projection);
            self.model_slab
                .write(&self.context.queue, base + i as u32, &uniform);
        }
        self.next_slot = base + actors.len() as u32;
        base
    }

    /// Draw a group through one of the base pipelines.
    fn base_pass(
        &mut self,
        label: &'static str,
        kind: BasePassKind,
        ctx: &FrameContext,
        actors: &[Actor],
    ) {
        if actors.is_empty() {
            return;
        }
        let base_slot = self.allocate_slots(ctx, actors);

        let pipeline = match kind {
            BasePassKind::Ambient => &self.ambient,
            BasePassKind::Perlin => &self.perlin,
            BasePassKind::Bloom => &self.bloom,
        };
        let builder = RenderPassBuilder::new()
            .label(label)
            .load_color()
            .depth_load(self.depth.view.clone());
        let encoder = self.encoder.as_mut().expect("no active frame");
        let mut pass = encoder.begin_render_pass(&builder);

        for (i, actor) in actors.iter().enumerate() {
            let Some(mesh) = self.meshes.get(actor.mesh.0) else {
                continue;
            };
            draw_base(
                &mut pass,
                pipeline,
                &self.frame_bind_group,
                &self.model_bind_group,
                base_slot + i as u32,
                mesh,
            );
        }
    }

    /// Draw a group through one of the lit contribution pipelines.
    fn contribution_pass(
        &mut self,
        label: &'static str,
        procedural: bool,
        role: LightRole,
        ctx: &FrameContext,
        actors: &[Actor],
    ) {
        if actors.is_empty() {
            return;
        }
        let base_slot = self.allocate_slots(ctx, actors);
        let style = if ctx.flat_shading {
            ShadingStyle::Cell
        } else {
            ShadingStyle::Smooth
        };

        let pipeline = if procedural {
            &self.perlin_lit
        } else {
            &self.lit
        };
        let light_bind_group = &self.lights[&role].lit_bind_group;
        let builder = RenderPassBuilder::new()
            .label(label)
            .load_color()
            .depth_load(self.depth.view.clone());
        let encoder = self.encoder.as_mut().expect("no active frame");
        let mut pass = encoder.begin_render_pass(&builder);
        for (i, actor) in actors.iter().enumerate() {
            let Some(mesh) = self.meshes.get(actor.mesh.0) else {
                continue;
            };
            draw_contribution(
                &mut pass,
                pipeline,
                style,
                &self.frame_bind_group,
                &self.model_bind_group,
                light_bind_group,
                base_slot + i as u32,
                mesh,
            );
        }
    }
}

impl ScenePasses for Renderer {
    fn clear(&mut self, ctx: &FrameContext) {
        self.next_slot = 0;
        self.cleared_shadow_roles.clear();

        self.context.queue.write_buffer(
            &self.frame_buffer,
            0,
            bytemuck::bytes_of(&FrameUniform::from_context(ctx)),
        );

        let encoder = self.encoder.as_mut().expect("no active frame");
        let builder = RenderPassBuilder::new()
            .label("clear")
            .depth_clear(self.depth.view.clone());
        // Empty pass: just the clears.
        drop(encoder.begin_render_pass(&builder));
    }

    fn render_ambient(&mut self, ctx: &FrameContext, actors: &[Actor]) {
        self.base_pass("ambient", BasePassKind::Ambient, ctx, actors);
    }

    fn render_perlin(&mut self, ctx: &FrameContext, actors: &[Actor]) {
        self.base_pass("perlin", BasePassKind::Perlin, ctx, actors);
    }

    fn render_bloom(&mut self, ctx: &FrameContext, actors: &[Actor]) {
        self.base_pass("bloom", BasePassKind::Bloom, ctx, actors);
    }

    fn render_shadowmap(
        &mut self,
        role: LightRole,
        light: &Light,
        ctx: &FrameContext,
        actors: &[Actor],
    ) {
        self.ensure_light_resources(role);

        // First caster group this frame clears the map and uploads the
        // light's current state; later groups accumulate.
        let first_for_role = self.cleared_shadow_roles.insert(role);
        if first_for_role {
            self.upload_light_state(role, light);
        }
        if actors.is_empty() {
            return;
        }

        let base_slot = self.allocate_slots(ctx, actors);

        let encoder = self.encoder.as_mut().expect("no active frame");
        let resources = &self.lights[&role];
        let mut pass =
            encoder.begin_depth_pass("shadowmap", &resources.target.view, first_for_role);

        for (i, actor) in actors.iter().enumerate() {
            let Some(mesh) = self.meshes.get(actor.mesh.0) else {
                continue;
            };
            draw_shadow_caster(
                &mut pass,
                &self.shadowmap,
                &resources.matrix_bind_group,
                &self.model_bind_group,
                base_slot + i as u32,
                mesh,
            );
        }
    }

    fn draw_phong_contribution(
        &mut self,
        role: LightRole,
        _light: &Light,
        ctx: &FrameContext,
        actors: &[Actor],
    ) {
        self.contribution_pass("phong-contribution", false, role, ctx, actors);
    }

    fn draw_perlin_phong_contribution(
        &mut self,
        role: LightRole,
        _light: &Light,
        ctx: &FrameContext,
        actors: &[Actor],
    ) {
        self.contribution_pass("perlin-phong-contribution", true, role, ctx, actors);
    }
}
