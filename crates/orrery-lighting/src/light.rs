//! Point light state and per-frame motion.
//!
//! Motion is a closed variant set instead of an update closure: every variant
//! computes the new position purely from the frame context, which keeps light
//! updates independently testable.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use orrery_scene::{FrameContext, polar_offset};

/// Orbit radius of the sun light.
pub const SUN_ORBIT_RADIUS: f32 = 35.0;

/// Angular rate of the sun orbit in radians per second.
pub const SUN_ANGULAR_RATE: f32 = 0.05;

/// Warm yellow of the car headlights.
pub const HEADLIGHT_COLOR: Vec3 = Vec3::new(1.0, 0.9, 0.2);

/// Headlight intensity; small because the lights sit right on the scene.
pub const HEADLIGHT_INTENSITY: f32 = 0.65;

/// Sideways displacement of each headlight from the car's center line.
pub const HEADLIGHT_LATERAL_OFFSET: f32 = 0.75;

/// Track placement of the headlight pair, ahead of the car.
const HEADLIGHT_TRACK_OFFSET: (f32, f32) = (1.1, 0.25);

/// How a light moves each frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightMotion {
    /// Circles the scene origin in the x-y plane.
    Orbiting {
        /// Orbit radius in world units.
        radius: f32,
        /// Radians per second.
        angular_rate: f32,
    },
    /// Rides ahead of the vehicle on the track, shifted sideways.
    Headlight {
        /// Signed sideways offset along the planet axis.
        lateral_offset: f32,
    },
}

/// CPU-side point light.
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    /// World position, rewritten every frame by [`update_simulation`](Self::update_simulation).
    pub position: Vec3,
    /// Linear RGB base color.
    pub color: Vec3,
    /// Scalar intensity; divides out with squared distance in the shader.
    pub intensity: f32,
    /// Motion behavior.
    pub motion: LightMotion,
}

impl Light {
    /// Move the light to its position for the context's instant.
    pub fn update_simulation(&mut self, ctx: &FrameContext) {
        self.position = match self.motion {
            LightMotion::Orbiting {
                radius,
                angular_rate,
            } => {
                let angle = ctx.sim_time * angular_rate;
                Vec3::new(radius * angle.cos(), radius * angle.sin(), 0.0)
            }
            LightMotion::Headlight { lateral_offset } => {
                let yz = polar_offset(
                    HEADLIGHT_TRACK_OFFSET.0,
                    HEADLIGHT_TRACK_OFFSET.1,
                    ctx.vehicle_heading,
                );
                Vec3::new(lateral_offset, yz.x, yz.y)
            }
        };
    }

    /// GPU uniform for this light, with its shadow matrix.
    pub fn to_uniform(&self, light_view_proj: glam::Mat4) -> LightUniform {
        LightUniform {
            light_view_proj: light_view_proj.to_cols_array_2d(),
            position: [self.position.x, self.position.y, self.position.z, 1.0],
            color_intensity: [self.color.x, self.color.y, self.color.z, self.intensity],
        }
    }
}

/// Per-light GPU data, 96 bytes: shadow matrix, position, color+intensity.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct LightUniform {
    /// Light-space view-projection matrix for shadow lookup.
    pub light_view_proj: [[f32; 4]; 4],
    /// xyz = world position, w = 1.
    pub position: [f32; 4],
    /// xyz = linear RGB, w = intensity.
    pub color_intensity: [f32; 4],
}

/// The white sun light orbiting far outside the scene.
pub fn sun_light() -> Light {
    Light {
        position: Vec3::new(SUN_ORBIT_RADIUS, 0.0, 0.0),
        color: Vec3::ONE,
        intensity: 100.0,
        motion: LightMotion::Orbiting {
            radius: SUN_ORBIT_RADIUS,
            angular_rate: SUN_ANGULAR_RATE,
        },
    }
}

/// The matched (left, right) headlight pair.
pub fn headlight_pair() -> (Light, Light) {
    let make = |lateral_offset: f32| Light {
        position: Vec3::ZERO,
        color: HEADLIGHT_COLOR,
        intensity: HEADLIGHT_INTENSITY,
        motion: LightMotion::Headlight { lateral_offset },
    };
    (
        make(HEADLIGHT_LATERAL_OFFSET),
        make(-HEADLIGHT_LATERAL_OFFSET),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Mat4;

    fn ctx(sim_time: f32, vehicle_heading: f32) -> FrameContext {
        FrameContext {
            sim_time,
            view: Mat4::IDENTITY,
            scene_view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            ambient_light_color: FrameContext::AMBIENT,
            flat_shading: false,
            car_speed: 0.0,
            vehicle_heading,
        }
    }

    #[test]
    fn test_sun_stays_on_its_orbit() {
        let mut sun = sun_light();
        for step in 0..10 {
            sun.update_simulation(&ctx(step as f32 * 7.0, 0.0));
            assert!((sun.position.length() - SUN_ORBIT_RADIUS).abs() < 1e-3);
            assert_eq!(sun.position.z, 0.0);
        }
    }

    #[test]
    fn test_sun_angle_follows_rate() {
        let mut sun = sun_light();
        sun.update_simulation(&ctx(10.0, 0.0));
        let expected = 10.0 * SUN_ANGULAR_RATE;
        assert!((sun.position.y.atan2(sun.position.x) - expected).abs() < 1e-4);
    }

    #[test]
    fn test_headlights_flank_the_center_line() {
        let (mut right, mut left) = headlight_pair();
        let c = ctx(0.0, 1.2);
        right.update_simulation(&c);
        left.update_simulation(&c);
        assert_eq!(right.position.x, HEADLIGHT_LATERAL_OFFSET);
        assert_eq!(left.position.x, -HEADLIGHT_LATERAL_OFFSET);
        // Same track point apart from the lateral shift.
        assert_eq!(right.position.y, left.position.y);
        assert_eq!(right.position.z, left.position.z);
    }

    #[test]
    fn test_headlights_follow_heading_not_time() {
        let (mut light, _) = headlight_pair();
        light.update_simulation(&ctx(0.0, 0.5));
        let at_half = light.position;
        light.update_simulation(&ctx(99.0, 0.5));
        assert_eq!(light.position, at_half);
        light.update_simulation(&ctx(99.0, 1.5));
        assert_ne!(light.position, at_half);
    }

    #[test]
    fn test_uniform_layout_size() {
        assert_eq!(std::mem::size_of::<LightUniform>(), 96);
    }

    #[test]
    fn test_uniform_packs_color_and_intensity() {
        let sun = sun_light();
        let u = sun.to_uniform(Mat4::IDENTITY);
        assert_eq!(u.color_intensity, [1.0, 1.0, 1.0, 100.0]);
    }
}
