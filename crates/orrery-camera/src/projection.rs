//! Perspective projection shared by every pass.

use glam::Mat4;

/// Vertical field of view in degrees.
pub const FOV_Y_DEGREES: f32 = 60.0;

/// Near clip plane.
pub const NEAR_PLANE: f32 = 0.01;

/// Far clip plane.
pub const FAR_PLANE: f32 = 100.0;

/// Build the frame's projection matrix from the framebuffer size.
///
/// Recomputed every frame because the aspect ratio changes on resize.
pub fn perspective_projection(framebuffer_width: u32, framebuffer_height: u32) -> Mat4 {
    let aspect = framebuffer_width.max(1) as f32 / framebuffer_height.max(1) as f32;
    Mat4::perspective_rh(FOV_Y_DEGREES.to_radians(), aspect, NEAR_PLANE, FAR_PLANE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn test_projection_is_finite_and_invertible() {
        let proj = perspective_projection(1280, 720);
        for col in 0..4 {
            for row in 0..4 {
                assert!(proj.col(col)[row].is_finite());
            }
        }
        assert!(proj.determinant().abs() > 1e-9);
    }

    #[test]
    fn test_aspect_follows_framebuffer() {
        let wide = perspective_projection(1920, 1080);
        let square = perspective_projection(800, 800);
        // x scale shrinks as the aspect ratio grows.
        assert!(wide.col(0)[0] < square.col(0)[0]);
    }

    #[test]
    fn test_zero_size_framebuffer_does_not_panic() {
        let proj = perspective_projection(0, 0);
        assert!(proj.col(0)[0].is_finite());
    }

    #[test]
    fn test_point_at_far_plane_maps_inside_clip_volume() {
        let proj = perspective_projection(1000, 1000);
        let p = proj * Vec4::new(0.0, 0.0, -FAR_PLANE, 1.0);
        let ndc_z = p.z / p.w;
        assert!((ndc_z - 1.0).abs() < 1e-3);
    }
}
