//! Primary ray generation.

use lumo_math::Ray;
use lumo_scene::{Camera, Scene};

/// Generate the camera ray through pixel coordinates `(px, py)`.
///
/// Coordinates are continuous: integer parts select the pixel, fractional
/// parts place the sample inside its footprint. The image plane spans
/// `fov_x` horizontally; the vertical extent follows from the aspect
/// ratio. `py` grows downward, matching raster order.
pub fn primary_ray(camera: &Camera, width: u32, height: u32, px: f32, py: f32) -> Ray {
    let aspect_ratio = width as f32 / height as f32;
    let tan_fov_x = (camera.fov_x / 2.0).tan();
    let tan_fov_y = tan_fov_x / aspect_ratio;

    let x = (2.0 * px / width as f32 - 1.0) * tan_fov_x;
    let y = -(2.0 * py / height as f32 - 1.0) * tan_fov_y;

    let direction = (x * camera.right + y * camera.up + camera.forward).normalize();
    Ray::new(camera.position, direction)
}

/// Convenience wrapper taking dimensions from the scene.
pub fn scene_ray(scene: &Scene, px: f32, py: f32) -> Ray {
    primary_ray(&scene.camera, scene.width, scene.height, px, py)
}
