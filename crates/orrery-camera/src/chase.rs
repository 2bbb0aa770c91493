//! Chase views locked to the vehicle's heading on the track.
//!
//! Both views bypass the orbit state entirely: camera position and look-at
//! target are derived from the heading through the shared polar-offset
//! helper. The up vector points away from the planet center, because a fixed
//! world-up would roll the horizon as the car rounds the planet.

use glam::{Mat4, Vec3};
use orrery_scene::polar_offset;

use crate::mode::CameraMode;

/// Radius factor and angle offset of the look-at point on the track.
const TARGET_OFFSET: (f32, f32) = (0.95, 0.35);

/// Camera placement ahead of the vehicle for the front view.
const FRONT_OFFSET: (f32, f32) = (1.15, 0.05);

/// Camera placement behind the vehicle for the back view.
const BACK_OFFSET: (f32, f32) = (1.35, -0.15);

/// Up vector for a chase camera at the given track offset.
///
/// Normalized direction from the planet center to the camera's own (y, z).
pub fn chase_up_vector(cam_y: f32, cam_z: f32) -> Vec3 {
    Vec3::new(0.0, cam_y, cam_z).normalize()
}

/// World-to-camera matrix for a chase view, or `None` in orbit mode.
pub fn chase_view(mode: CameraMode, heading: f32) -> Option<Mat4> {
    let (radius_factor, angle_offset) = match mode {
        CameraMode::ChaseFront => FRONT_OFFSET,
        CameraMode::ChaseBack => BACK_OFFSET,
        CameraMode::Orbit => return None,
    };
    let cam = polar_offset(radius_factor, angle_offset, heading);
    let target = polar_offset(TARGET_OFFSET.0, TARGET_OFFSET.1, heading);
    let eye = Vec3::new(0.0, cam.x, cam.y);
    Some(Mat4::look_at_rh(
        eye,
        Vec3::new(0.0, target.x, target.y),
        chase_up_vector(cam.x, cam.y),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrery_scene::{PLANET_RADIUS, TRACK_EPSILON};

    #[test]
    fn test_orbit_mode_has_no_chase_view() {
        assert!(chase_view(CameraMode::Orbit, 1.0).is_none());
    }

    #[test]
    fn test_front_and_back_views_differ() {
        let front = chase_view(CameraMode::ChaseFront, 0.8).unwrap();
        let back = chase_view(CameraMode::ChaseBack, 0.8).unwrap();
        assert_ne!(front, back);
    }

    #[test]
    fn test_chase_views_are_invertible() {
        for step in 0..12 {
            let heading = step as f32 * 0.6;
            for mode in [CameraMode::ChaseFront, CameraMode::ChaseBack] {
                let m = chase_view(mode, heading).unwrap();
                assert!(m.determinant().abs() > 1e-6);
            }
        }
    }

    #[test]
    fn test_front_camera_floats_above_track() {
        let m = chase_view(CameraMode::ChaseFront, 0.0).unwrap();
        let eye = m.inverse().col(3).truncate();
        let radial = (eye.y * eye.y + eye.z * eye.z).sqrt();
        assert!((radial - 1.15 * (PLANET_RADIUS - TRACK_EPSILON)).abs() < 1e-3);
    }

    #[test]
    fn test_up_vector_is_radial_and_unit_length() {
        for heading in [0.0_f32, 0.7, 2.1, 4.9] {
            let cam = polar_offset(1.15, 0.05, heading);
            let up = chase_up_vector(cam.x, cam.y);
            assert!((up.length() - 1.0).abs() < 1e-6);
            assert_eq!(up.x, 0.0);
            // Collinear with the camera's own radial direction.
            let cross = up.y * cam.y - up.z * cam.x;
            assert!(cross.abs() < 1e-4);
        }
    }

    #[test]
    fn test_view_tracks_heading() {
        let a = chase_view(CameraMode::ChaseBack, 0.0).unwrap();
        let b = chase_view(CameraMode::ChaseBack, 0.5).unwrap();
        assert_ne!(a, b);
    }
}
