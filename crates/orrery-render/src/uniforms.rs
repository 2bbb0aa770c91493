//! Per-frame and per-actor uniform data.
//!
//! Frame globals live in one small uniform buffer. Per-actor matrices share a
//! single dynamic-offset buffer sliced into 256-byte slots, one slot per
//! actor per frame, so a pass binds the slab once and rebinds only offsets.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use orrery_scene::FrameContext;

/// Byte stride of one model slot; matches wgpu's default
/// `min_uniform_buffer_offset_alignment`.
pub const MODEL_SLOT_STRIDE: u64 = 256;

/// Frame-global GPU data, 160 bytes.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct FrameUniform {
    /// World-to-camera matrix.
    pub view: [[f32; 4]; 4],
    /// Camera-to-clip matrix.
    pub projection: [[f32; 4]; 4],
    /// xyz = camera world position, w = 1.
    pub camera_position: [f32; 4],
    /// xyz = ambient light color, w = simulation time in seconds.
    pub ambient_sim: [f32; 4],
}

impl FrameUniform {
    /// Build the frame globals from the per-frame context.
    pub fn from_context(ctx: &FrameContext) -> Self {
        let camera = ctx.view.inverse().col(3);
        Self {
            view: ctx.view.to_cols_array_2d(),
            projection: ctx.projection.to_cols_array_2d(),
            camera_position: [camera.x, camera.y, camera.z, 1.0],
            ambient_sim: [
                ctx.ambient_light_color.x,
                ctx.ambient_light_color.y,
                ctx.ambient_light_color.z,
                ctx.sim_time,
            ],
        }
    }
}

/// Per-actor GPU matrices, 192 bytes used of a 256-byte slot.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct ModelUniform {
    /// Model-to-world matrix.
    pub model: [[f32; 4]; 4],
    /// Model-to-clip matrix for this frame's camera.
    pub mvp: [[f32; 4]; 4],
    /// Inverse-transpose of the model matrix, for world-space normals.
    pub normal: [[f32; 4]; 4],
}

impl ModelUniform {
    /// Compose the per-actor matrices for the given camera.
    pub fn new(model: Mat4, view: Mat4, projection: Mat4) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            mvp: (projection * view * model).to_cols_array_2d(),
            normal: model.inverse().transpose().to_cols_array_2d(),
        }
    }
}

/// Dynamic-offset uniform buffer holding one [`ModelUniform`] per slot.
pub struct ModelSlab {
    buffer: wgpu::Buffer,
    capacity: u32,
}

impl ModelSlab {
    /// Allocate a slab with the given number of slots.
    pub fn new(device: &wgpu::Device, capacity: u32) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("model-slab"),
            size: MODEL_SLOT_STRIDE * u64::from(capacity),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self { buffer, capacity }
    }

    /// The underlying buffer, for bind group creation.
    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    /// Number of slots.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Dynamic offset of a slot.
    pub fn offset(slot: u32) -> u32 {
        slot * MODEL_SLOT_STRIDE as u32
    }

    /// Upload one actor's matrices into a slot.
    ///
    /// # Panics
    /// Panics if `slot` is out of range; the slab is sized for the scene at
    /// startup.
    pub fn write(&self, queue: &wgpu::Queue, slot: u32, uniform: &ModelUniform) {
        assert!(slot < self.capacity, "model slab slot {slot} out of range");
        queue.write_buffer(
            &self.buffer,
            MODEL_SLOT_STRIDE * u64::from(slot),
            bytemuck::bytes_of(uniform),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    fn ctx() -> FrameContext {
        FrameContext {
            sim_time: 2.5,
            view: Mat4::from_translation(Vec3::new(0.0, 0.0, -15.0)),
            scene_view: Mat4::IDENTITY,
            projection: Mat4::perspective_rh(1.0, 1.0, 0.01, 100.0),
            ambient_light_color: Vec3::new(0.4, 0.4, 0.4),
            flat_shading: false,
            car_speed: 0.4,
            vehicle_heading: 0.0,
        }
    }

    #[test]
    fn test_frame_uniform_size() {
        assert_eq!(std::mem::size_of::<FrameUniform>(), 160);
    }

    #[test]
    fn test_model_uniform_fits_one_slot() {
        assert!(std::mem::size_of::<ModelUniform>() as u64 <= MODEL_SLOT_STRIDE);
    }

    #[test]
    fn test_frame_uniform_packs_ambient_and_time() {
        let u = FrameUniform::from_context(&ctx());
        assert_eq!(u.ambient_sim, [0.4, 0.4, 0.4, 2.5]);
    }

    #[test]
    fn test_frame_uniform_camera_position_inverts_view() {
        let u = FrameUniform::from_context(&ctx());
        // view translates by -15 z, so the camera sits at +15 z.
        assert!((u.camera_position[2] - 15.0).abs() < 1e-4);
    }

    #[test]
    fn test_model_uniform_mvp_composition() {
        let model = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let c = ctx();
        let u = ModelUniform::new(model, c.view, c.projection);
        let expected = c.projection * c.view * model;
        let got = Mat4::from_cols_array_2d(&u.mvp);
        assert!((got * Vec4::W - expected * Vec4::W).length() < 1e-4);
    }

    #[test]
    fn test_slot_offsets_are_aligned() {
        assert_eq!(ModelSlab::offset(0), 0);
        assert_eq!(ModelSlab::offset(3), 768);
        assert_eq!(ModelSlab::offset(3) % 256, 0);
    }
}
