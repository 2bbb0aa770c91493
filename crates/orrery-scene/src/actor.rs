//! Renderable scene entities and their update behavior.
//!
//! Actors are a closed set of kinds rather than arbitrary update closures:
//! every kind computes its transform purely from its own state and the frame
//! context, so updates are order-independent within a bucket.

use glam::{Mat4, Vec3};

use crate::context::FrameContext;
use crate::track::surface_transform;
use crate::vehicle::VehicleState;

/// Handle to a mesh owned by the render backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshHandle(pub usize);

/// Orbit parameters for a body circling the scene origin.
#[derive(Debug, Clone, Copy)]
pub struct OrbitParams {
    /// Orbit radius in world units.
    pub radius: f32,
    /// Orbit angular rate in radians per second.
    pub angular_rate: f32,
    /// Starting angle on the orbit.
    pub phase: f32,
    /// Tilt of the orbit plane around the x axis.
    pub inclination: f32,
    /// Self-rotation rate in radians per second.
    pub spin_rate: f32,
    /// Uniform scale applied to the mesh.
    pub scale: f32,
}

/// The closed set of actor behaviors in the demo.
#[derive(Debug, Clone)]
pub enum ActorKind {
    /// Planets, satellites, the sun: circle the origin.
    OrbitingBody(OrbitParams),
    /// The car on the planet track.
    GroundVehicle(VehicleState),
    /// Trees and alien figures: placed once, never move.
    StaticProp,
}

/// A renderable, independently updatable entity.
#[derive(Debug, Clone)]
pub struct Actor {
    /// Mesh drawn for this actor.
    pub mesh: MeshHandle,
    /// World transform, refreshed by `update_simulation` every frame.
    pub transform: Mat4,
    kind: ActorKind,
}

impl Actor {
    /// Create an orbiting body.
    pub fn orbiting(mesh: MeshHandle, params: OrbitParams) -> Self {
        Self {
            mesh,
            transform: orbit_transform(&params, 0.0),
            kind: ActorKind::OrbitingBody(params),
        }
    }

    /// Create the ground vehicle.
    pub fn vehicle(mesh: MeshHandle, state: VehicleState) -> Self {
        Self {
            mesh,
            transform: surface_transform(1.0, state.tot_angle, 0.0),
            kind: ActorKind::GroundVehicle(state),
        }
    }

    /// Create a static prop with a fixed transform.
    pub fn static_prop(mesh: MeshHandle, transform: Mat4) -> Self {
        Self {
            mesh,
            transform,
            kind: ActorKind::StaticProp,
        }
    }

    /// Recompute the transform for the context's instant.
    pub fn update_simulation(&mut self, ctx: &FrameContext) {
        match &mut self.kind {
            ActorKind::OrbitingBody(params) => {
                self.transform = orbit_transform(params, ctx.sim_time);
            }
            ActorKind::GroundVehicle(state) => {
                state.update(ctx.sim_time);
                self.transform = surface_transform(1.0, state.tot_angle, 0.0);
            }
            ActorKind::StaticProp => {}
        }
    }

    /// Vehicle state, if this actor is the vehicle.
    pub fn vehicle_state(&self) -> Option<&VehicleState> {
        match &self.kind {
            ActorKind::GroundVehicle(state) => Some(state),
            _ => None,
        }
    }

    /// Mutable vehicle state, if this actor is the vehicle.
    pub fn vehicle_state_mut(&mut self) -> Option<&mut VehicleState> {
        match &mut self.kind {
            ActorKind::GroundVehicle(state) => Some(state),
            _ => None,
        }
    }
}

fn orbit_transform(params: &OrbitParams, sim_time: f32) -> Mat4 {
    let angle = params.phase + params.angular_rate * sim_time;
    let position = Vec3::new(
        params.radius * angle.cos(),
        params.radius * angle.sin(),
        0.0,
    );
    Mat4::from_rotation_x(params.inclination)
        * Mat4::from_translation(position)
        * Mat4::from_rotation_z(params.spin_rate * sim_time)
        * Mat4::from_scale(Vec3::splat(params.scale))
}
