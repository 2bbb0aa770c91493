//! Geometry of the circular track the vehicle drives on.
//!
//! The track is the great circle of the planet in the y-z plane. Both the
//! chase cameras and the headlights place themselves relative to a heading
//! angle on this circle, so the polar-offset helper lives here and is shared.

use glam::{Mat4, Vec2, Vec3};

/// World radius of the planet carrying the track.
pub const PLANET_RADIUS: f32 = 12.0;

/// Small inset so points computed on the track sit just below the nominal
/// radius instead of exactly on it.
pub const TRACK_EPSILON: f32 = 0.1;

/// Compute a (y, z) offset on the track circle for a given heading.
///
/// `radius_factor` scales the effective radius `PLANET_RADIUS - TRACK_EPSILON`;
/// `angle_offset` is added to the heading before projecting. Values above 1.0
/// float above the surface, values below sink toward it.
pub fn polar_offset(radius_factor: f32, angle_offset: f32, heading: f32) -> Vec2 {
    let r = radius_factor * (PLANET_RADIUS - TRACK_EPSILON);
    Vec2::new(
        -r * (heading + angle_offset).sin(),
        r * (heading + angle_offset).cos(),
    )
}

/// World transform for an object standing on the planet surface at `heading`,
/// shifted by `lateral_x` along the planet's axis.
///
/// The object's local +Z ends up pointing away from the planet center.
pub fn surface_transform(radius_factor: f32, heading: f32, lateral_x: f32) -> Mat4 {
    let yz = polar_offset(radius_factor, 0.0, heading);
    Mat4::from_translation(Vec3::new(lateral_x, yz.x, yz.y)) * Mat4::from_rotation_x(heading)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polar_offset_at_zero_heading_points_up_z() {
        let yz = polar_offset(1.0, 0.0, 0.0);
        assert!(yz.x.abs() < 1e-6);
        assert!((yz.y - (PLANET_RADIUS - TRACK_EPSILON)).abs() < 1e-6);
    }

    #[test]
    fn test_polar_offset_radius_factor_scales_linearly() {
        let near = polar_offset(1.0, 0.2, 1.3);
        let far = polar_offset(2.0, 0.2, 1.3);
        assert!((far.length() - 2.0 * near.length()).abs() < 1e-4);
    }

    #[test]
    fn test_polar_offset_stays_on_circle() {
        for i in 0..16 {
            let heading = i as f32 * std::f32::consts::TAU / 16.0;
            let yz = polar_offset(1.0, 0.0, heading);
            assert!((yz.length() - (PLANET_RADIUS - TRACK_EPSILON)).abs() < 1e-4);
        }
    }

    #[test]
    fn test_angle_offset_equivalent_to_heading_shift() {
        let a = polar_offset(1.1, 0.25, 0.5);
        let b = polar_offset(1.1, 0.0, 0.75);
        assert!((a - b).length() < 1e-5);
    }

    #[test]
    fn test_surface_transform_translation_sits_on_track() {
        let m = surface_transform(1.0, 0.7, -0.75);
        let pos = m.col(3).truncate();
        assert!((pos.x - (-0.75)).abs() < 1e-6);
        let yz = Vec2::new(pos.y, pos.z);
        assert!((yz.length() - (PLANET_RADIUS - TRACK_EPSILON)).abs() < 1e-4);
    }
}
