//! Actor buckets and the per-frame update orchestration.
//!
//! Each bucket is drawn by a different pass, so they stay separate vectors.
//! Bucket membership is fixed at creation; actors never migrate.

use crate::actor::Actor;
use crate::context::FrameContext;

/// Typed collections of actors, grouped by render pass.
#[derive(Debug, Default)]
pub struct ActorRegistry {
    /// Ambient-then-phong shaded actors (planet, rocket, satellite, props).
    pub plain: Vec<Actor>,
    /// Procedurally ("perlin") shaded actors.
    pub procedural: Vec<Actor>,
    /// Bloom-shaded actors (the sun).
    pub bloom: Vec<Actor>,
    /// The car, drawn with the plain group but updated last so the external
    /// speed can be pushed in first.
    pub vehicle: Vec<Actor>,
}

impl ActorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The plain group as the passes consume it: plain actors plus the car.
    pub fn plain_with_vehicle(&self) -> Vec<Actor> {
        let mut combined = self.plain.clone();
        combined.extend(self.vehicle.iter().cloned());
        combined
    }

    /// Advance every bucket to the context's instant. The vehicle bucket
    /// receives the externally controlled speed first.
    pub fn update_all(&mut self, ctx: &FrameContext) {
        update_simulation(ctx, &mut self.plain);
        update_simulation(ctx, &mut self.procedural);
        update_simulation(ctx, &mut self.bloom);
        update_car_speed(ctx.car_speed, &mut self.vehicle);
        update_simulation(ctx, &mut self.vehicle);
    }

    /// Current heading of the vehicle, for chase cameras and headlights.
    pub fn vehicle_heading(&self) -> f32 {
        vehicle_heading(&self.vehicle)
    }
}

/// Invoke each actor's update with the shared context, in list order.
///
/// Updates must not depend on another actor's post-update state; buckets are
/// updated in separate sequential calls.
pub fn update_simulation(ctx: &FrameContext, actors: &mut [Actor]) {
    for actor in actors {
        actor.update_simulation(ctx);
    }
}

/// Push the externally controlled speed into the vehicle's kinematic state.
pub fn update_car_speed(speed: f32, actors: &mut [Actor]) {
    for actor in actors {
        if let Some(state) = actor.vehicle_state_mut() {
            state.speed = speed;
        }
    }
}

/// Recompute the vehicle heading immediately, outside the frame cadence.
///
/// Called from the speed-change key handler so chase views reading the
/// heading stay responsive; the rebase also anchors the distance travelled
/// under the old speed before the new one takes effect.
pub fn update_car_angle(ctx: &FrameContext, actors: &mut [Actor]) {
    for actor in actors {
        if let Some(state) = actor.vehicle_state_mut() {
            state.rebase(ctx.sim_time);
        }
    }
}

/// Heading of the first vehicle actor, or 0 when there is none.
pub fn vehicle_heading(actors: &[Actor]) -> f32 {
    actors
        .iter()
        .find_map(|a| a.vehicle_state())
        .map_or(0.0, |state| state.tot_angle)
}
