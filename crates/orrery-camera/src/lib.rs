//! Camera control for the orrery demo: free orbit, fixed chase views, and
//! the shared perspective projection.

mod chase;
mod mode;
mod orbit;
mod projection;

pub use chase::{chase_up_vector, chase_view};
pub use mode::CameraMode;
pub use orbit::{CAM_DISTANCE_BASE, DISTANCE_FACTOR_RANGE, OrbitCamera, WHEEL_FACTOR};
pub use projection::{FAR_PLANE, FOV_Y_DEGREES, NEAR_PLANE, perspective_projection};
