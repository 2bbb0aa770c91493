//! Ground vehicle kinematics on the circular track.
//!
//! The heading is derived analytically from a base angle, a base time and the
//! current speed, instead of integrating per frame. Rebasing at a speed
//! change makes the heading immediately consistent for chase cameras even
//! when the change happens in a key handler rather than the frame loop.

/// Heading change per second at full speed, in radians.
pub const FULL_SPEED_ANGULAR_RATE: f32 = 0.6;

/// Speed added or removed per key press.
pub const SPEED_STEP: f32 = 0.1;

/// Lowest allowed speed.
pub const MIN_CAR_SPEED: f32 = 0.0;

/// Highest allowed speed.
pub const MAX_CAR_SPEED: f32 = 1.0;

/// Speed the vehicle starts the demo with.
pub const DEFAULT_CAR_SPEED: f32 = 0.4;

/// Kinematic state of the vehicle actor.
#[derive(Debug, Clone, Copy)]
pub struct VehicleState {
    /// Normalized speed in [0, 1].
    pub speed: f32,
    /// Heading at the last rebase.
    base_angle: f32,
    /// Simulation time of the last rebase.
    base_time: f32,
    /// Heading as of the last update, read by chase views and headlights.
    pub tot_angle: f32,
}

impl VehicleState {
    pub fn new(speed: f32) -> Self {
        Self {
            speed,
            base_angle: 0.0,
            base_time: 0.0,
            tot_angle: 0.0,
        }
    }

    /// Heading at an arbitrary simulation time under the current speed.
    pub fn heading_at(&self, sim_time: f32) -> f32 {
        self.base_angle + self.speed * FULL_SPEED_ANGULAR_RATE * (sim_time - self.base_time)
    }

    /// Advance the cached heading to `sim_time`.
    pub fn update(&mut self, sim_time: f32) {
        self.tot_angle = self.heading_at(sim_time);
    }

    /// Re-anchor the heading extrapolation at `sim_time`.
    ///
    /// Must run before a speed change so the distance already travelled under
    /// the old speed is baked into the base angle.
    pub fn rebase(&mut self, sim_time: f32) {
        self.base_angle = self.heading_at(sim_time);
        self.base_time = sim_time;
        self.tot_angle = self.base_angle;
    }
}

impl Default for VehicleState {
    fn default() -> Self {
        Self::new(DEFAULT_CAR_SPEED)
    }
}

/// Apply one discrete speed step and clamp to the legal range.
///
/// Speeds move on a 0.1 grid; the result is snapped back onto it so repeated
/// float additions can never creep past the ceiling.
pub fn bump_speed(speed: f32, delta: f32) -> f32 {
    let stepped = (speed + delta).clamp(MIN_CAR_SPEED, MAX_CAR_SPEED);
    (stepped / SPEED_STEP).round() * SPEED_STEP
}
