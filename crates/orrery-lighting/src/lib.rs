//! Dynamic point lights for the orrery demo.
//!
//! Each light carries its own motion behavior and GPU uniform layout; the
//! [`LightRig`] keys active lights by role so the headlight pair can be
//! toggled without any positional bookkeeping in the light list.

mod light;
mod rig;
mod shadow;

pub use light::{
    HEADLIGHT_COLOR, HEADLIGHT_INTENSITY, HEADLIGHT_LATERAL_OFFSET, Light, LightMotion,
    LightUniform, SUN_ANGULAR_RATE, SUN_ORBIT_RADIUS, headlight_pair, sun_light,
};
pub use rig::{LightRig, LightRole};
pub use shadow::{SHADOW_MAP_RESOLUTION, ShadowMapTarget, light_view_projection};
