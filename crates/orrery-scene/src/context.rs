//! Per-frame context handed to every actor update, light update, and draw pass.

use glam::{Mat4, Vec3};

/// Snapshot of everything a pass or update needs for one frame.
///
/// Built fresh each frame by the frame loop and never persisted. Every
/// consumer within a frame observes the same instant in time.
///
/// `view` is the matrix draw calls consume; `scene_view` is the one
/// light-relative calculations use. They are identical in the default build
/// but may legitimately differ when the debug camera is detached.
#[derive(Debug, Clone, Copy)]
pub struct FrameContext {
    /// Simulation time in seconds.
    pub sim_time: f32,
    /// Active world-to-camera matrix for draw calls.
    pub view: Mat4,
    /// World-to-camera matrix of the scene camera.
    pub scene_view: Mat4,
    /// Active projection matrix.
    pub projection: Mat4,
    /// Base ambient light color applied by the ambient passes.
    pub ambient_light_color: Vec3,
    /// Flat "cell" shading instead of smooth phong.
    pub flat_shading: bool,
    /// Vehicle speed in [0, 1], pushed from the UI.
    pub car_speed: f32,
    /// Current vehicle heading on the track, read by chase cameras and
    /// headlights.
    pub vehicle_heading: f32,
}

impl FrameContext {
    /// Ambient light color of the demo scene.
    pub const AMBIENT: Vec3 = Vec3::new(0.4, 0.4, 0.4);
}
