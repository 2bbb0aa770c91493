//! Scene state for the orrery demo: actors, buckets, vehicle kinematics,
//! the simulation clock, and the per-frame context.
//!
//! Everything here is plain CPU state. GPU resources live in `orrery-render`;
//! this crate only decides *where* things are each frame.

mod actor;
mod clock;
mod context;
mod modes;
mod registry;
mod track;
mod vehicle;

pub use actor::{Actor, ActorKind, MeshHandle, OrbitParams};
pub use clock::SimClock;
pub use context::FrameContext;
pub use modes::{FrameToggles, ModeState};
pub use registry::{
    ActorRegistry, update_car_angle, update_car_speed, update_simulation, vehicle_heading,
};
pub use track::{PLANET_RADIUS, TRACK_EPSILON, polar_offset, surface_transform};
pub use vehicle::{
    DEFAULT_CAR_SPEED, MAX_CAR_SPEED, MIN_CAR_SPEED, SPEED_STEP, VehicleState, bump_speed,
};
