//! Free orbit camera: azimuth/elevation/distance around a pannable target.

use glam::{Mat2, Mat4, Vec2, Vec3};

/// Distance from the target at `distance_factor == 1.0`.
pub const CAM_DISTANCE_BASE: f32 = 15.0;

/// Allowed range of the zoom factor.
pub const DISTANCE_FACTOR_RANGE: (f32, f32) = (0.1, 4.0);

/// Zoom ratio applied per wheel notch.
pub const WHEEL_FACTOR: f32 = 1.08;

/// Radians of orbit per pixel of pointer drag.
const ORBIT_SENSITIVITY: f32 = 0.005;

/// World units of pan per pixel of shift-drag.
const PAN_SENSITIVITY: f32 = 0.01;

/// Orbit camera state and its cached world-to-camera matrix.
///
/// The matrix is recomputed eagerly on every mutation, not lazily, so any
/// reader between events sees a view consistent with the current state.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    /// Orbit angle around the world z axis.
    pub azimuth: f32,
    /// Orbit tilt toward the world z axis.
    pub elevation: f32,
    /// Zoom factor, clamped to [`DISTANCE_FACTOR_RANGE`].
    pub distance_factor: f32,
    /// Point the camera orbits and looks at.
    pub target: Vec3,
    world_to_cam: Mat4,
}

impl OrbitCamera {
    /// Starting pose of the demo camera.
    pub fn new() -> Self {
        let mut cam = Self {
            azimuth: std::f32::consts::PI / 5.0,
            elevation: -std::f32::consts::PI / 6.0,
            distance_factor: 1.0,
            target: Vec3::ZERO,
            world_to_cam: Mat4::IDENTITY,
        };
        cam.update_transform();
        cam
    }

    /// Recompute and return the world-to-camera matrix.
    ///
    /// Composition order is load-bearing: the look-at from a fixed point on
    /// the x axis is applied after the elevation rotation, which is applied
    /// after the azimuth rotation (offset by 180 degrees). Swapping the
    /// rotations flips the orbit handedness.
    pub fn update_transform(&mut self) -> Mat4 {
        let dist = CAM_DISTANCE_BASE * self.distance_factor;
        let look_at = Mat4::look_at_rh(Vec3::new(dist, 0.0, 0.0), self.target, Vec3::Z);
        let rot_elevation = Mat4::from_rotation_y(-self.elevation);
        let rot_azimuth = Mat4::from_rotation_z(self.azimuth + std::f32::consts::PI);
        self.world_to_cam = look_at * rot_elevation * rot_azimuth;
        self.world_to_cam
    }

    /// Cached world-to-camera matrix.
    pub fn view_matrix(&self) -> Mat4 {
        self.world_to_cam
    }

    /// Pointer drag with left or middle button held.
    ///
    /// Plain drag orbits; with the modifier held the drag pans the target
    /// instead. The pan offset is rotated by the negated azimuth so panning
    /// is camera-relative rather than world-relative.
    pub fn on_drag(&mut self, dx: f32, dy: f32, pan: bool) {
        if pan {
            let rot = Mat2::from_angle(-self.azimuth);
            let offset = rot * Vec2::new(dy, dx) * -PAN_SENSITIVITY;
            self.target.x += offset.x;
            self.target.y += offset.y;
        } else {
            self.azimuth += dx * ORBIT_SENSITIVITY;
            self.elevation -= dy * ORBIT_SENSITIVITY;
        }
        self.update_transform();
    }

    /// Wheel zoom. Positive deltas zoom out, negative zoom in; the factor is
    /// clamped so the camera can neither enter the scene nor drift away.
    pub fn on_wheel(&mut self, delta_y: f32) {
        let factor = if delta_y > 0.0 {
            WHEEL_FACTOR
        } else {
            1.0 / WHEEL_FACTOR
        };
        let (lo, hi) = DISTANCE_FACTOR_RANGE;
        self.distance_factor = (self.distance_factor * factor).clamp(lo, hi);
        self.update_transform();
    }

    /// Current camera distance from the target.
    pub fn distance(&self) -> f32 {
        CAM_DISTANCE_BASE * self.distance_factor
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_matrix_is_invertible_over_parameter_sweep() {
        let mut cam = OrbitCamera::new();
        for az_step in 0..8 {
            for el_step in -3..4 {
                for factor in [0.1_f32, 0.5, 1.0, 2.0, 4.0] {
                    cam.azimuth = az_step as f32 * 0.8;
                    cam.elevation = el_step as f32 * 0.4;
                    cam.distance_factor = factor;
                    let m = cam.update_transform();
                    assert!(m.determinant().abs() > 1e-6);
                }
            }
        }
    }

    #[test]
    fn test_camera_world_position_matches_distance() {
        let mut cam = OrbitCamera::new();
        for factor in [0.1_f32, 0.7, 1.0, 3.2, 4.0] {
            cam.distance_factor = factor;
            let m = cam.update_transform();
            // The camera's own world position maps to the view-space origin,
            // so it is the translation column of the inverse view.
            let cam_pos = m.inverse().col(3).truncate();
            assert!((cam_pos.length() - CAM_DISTANCE_BASE * factor).abs() < 1e-2);
        }
    }

    #[test]
    fn test_drag_adjusts_azimuth_not_elevation() {
        let mut cam = OrbitCamera::new();
        let initial_view = cam.view_matrix();
        let initial_elevation = cam.elevation;
        cam.on_drag(100.0, 0.0, false);
        assert!((cam.azimuth - (std::f32::consts::PI / 5.0 + 0.5)).abs() < 1e-6);
        assert_eq!(cam.elevation, initial_elevation);
        assert_ne!(cam.view_matrix(), initial_view);
    }

    #[test]
    fn test_vertical_drag_adjusts_elevation() {
        let mut cam = OrbitCamera::new();
        let initial = cam.elevation;
        cam.on_drag(0.0, 40.0, false);
        assert!((cam.elevation - (initial - 0.2)).abs() < 1e-6);
    }

    #[test]
    fn test_pan_moves_target_camera_relative() {
        let mut cam = OrbitCamera::new();
        cam.azimuth = 0.0;
        cam.update_transform();
        cam.on_drag(50.0, 0.0, true);
        // With zero azimuth a horizontal pan moves the target along y only.
        assert!(cam.target.x.abs() < 1e-6);
        assert!((cam.target.y - (-0.5)).abs() < 1e-6);
    }

    #[test]
    fn test_wheel_clamps_to_range() {
        let mut cam = OrbitCamera::new();
        for _ in 0..100 {
            cam.on_wheel(1.0);
        }
        assert!((cam.distance_factor - DISTANCE_FACTOR_RANGE.1).abs() < 1e-6);
        for _ in 0..200 {
            cam.on_wheel(-1.0);
        }
        assert!((cam.distance_factor - DISTANCE_FACTOR_RANGE.0).abs() < 1e-6);
    }

    #[test]
    fn test_wheel_is_monotonic_per_direction() {
        let mut cam = OrbitCamera::new();
        let mut prev = cam.distance_factor;
        for _ in 0..10 {
            cam.on_wheel(3.0);
            assert!(cam.distance_factor >= prev);
            prev = cam.distance_factor;
        }
        for _ in 0..10 {
            cam.on_wheel(-3.0);
            assert!(cam.distance_factor <= prev);
            prev = cam.distance_factor;
        }
    }

    #[test]
    fn test_distance_factor_never_leaves_range() {
        let mut cam = OrbitCamera::new();
        let deltas = [3.0, -1.0, 5.0, -7.0, 2.0, 2.0, -4.0, 9.0, -9.0, 1.0];
        for _ in 0..50 {
            for &d in &deltas {
                cam.on_wheel(d);
                assert!(cam.distance_factor >= DISTANCE_FACTOR_RANGE.0);
                assert!(cam.distance_factor <= DISTANCE_FACTOR_RANGE.1);
            }
        }
    }
}
