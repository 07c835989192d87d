//! Render driver: per-pixel sampling and the parallel bucket loop.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use lumo_math::Color;
use lumo_scene::Scene;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;

use crate::bucket::{generate_buckets, Bucket, DEFAULT_BUCKET_SIZE};
use crate::camera::scene_ray;
use crate::integrator::radiance;
use crate::sampler::sample_square;

/// Render invocation settings.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Seed for all sampling; equal seeds give bit-identical renders
    pub seed: u64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { seed: 0 }
    }
}

/// Accumulated per-pixel radiance for one render.
pub struct RadianceBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl RadianceBuffer {
    /// Create a new buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; (width * height) as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[(y * self.width + x) as usize] = color;
    }
}

/// Derive the per-pixel generator from the render seed and pixel index.
///
/// Seeding by pixel rather than by worker keeps the image independent of
/// bucket scheduling and thread count.
fn pixel_rng(seed: u64, pixel_index: u64) -> StdRng {
    StdRng::seed_from_u64(seed ^ pixel_index.wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

/// Drop non-finite and negative radiance before it reaches the buffer.
///
/// Degenerate geometry can produce NaN directions; one poisoned sample
/// must not blacken a pixel's whole average.
fn sanitize(color: Color) -> Color {
    let keep = |c: f32| if c.is_finite() && c > 0.0 { c } else { 0.0 };
    Color::new(keep(color.x), keep(color.y), keep(color.z))
}

/// Render a single pixel with multi-sampling.
pub fn render_pixel(scene: &Scene, x: u32, y: u32, rng: &mut dyn RngCore) -> Color {
    let mut pixel_color = Color::ZERO;

    for _ in 0..scene.samples {
        let (jx, jy) = sample_square(rng);
        let ray = scene_ray(scene, x as f32 + jx, y as f32 + jy);
        pixel_color += sanitize(radiance(scene, &ray, scene.ray_depth, rng));
    }

    pixel_color / scene.samples as f32
}

/// Render one bucket, or bail out early when the stop flag is raised.
fn render_bucket(
    scene: &Scene,
    bucket: &Bucket,
    options: &RenderOptions,
    stop: &AtomicBool,
) -> Option<Vec<Color>> {
    let mut pixels = Vec::with_capacity(bucket.pixel_count() as usize);

    for local_y in 0..bucket.height {
        for local_x in 0..bucket.width {
            if stop.load(Ordering::Relaxed) {
                return None;
            }
            let x = bucket.x + local_x;
            let y = bucket.y + local_y;
            let pixel_index = (y as u64) * scene.width as u64 + x as u64;
            let mut rng = pixel_rng(options.seed, pixel_index);
            pixels.push(render_pixel(scene, x, y, &mut rng));
        }
    }

    Some(pixels)
}

/// Render the scene across the rayon pool.
///
/// Returns `None` only when `stop` was raised before completion; a
/// cancelled render produces no partial image.
pub fn render_cancellable(
    scene: &Scene,
    options: &RenderOptions,
    stop: &AtomicBool,
) -> Option<RadianceBuffer> {
    let buckets = generate_buckets(scene.width, scene.height, DEFAULT_BUCKET_SIZE);
    let done = AtomicUsize::new(0);

    log::info!(
        "rendering {}x{} @ {} spp, depth {}, {} buckets",
        scene.width,
        scene.height,
        scene.samples,
        scene.ray_depth,
        buckets.len()
    );

    let results: Vec<Option<Vec<Color>>> = buckets
        .par_iter()
        .map(|bucket| {
            let pixels = render_bucket(scene, bucket, options, stop)?;
            let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
            log::debug!("bucket {}/{} done", finished, buckets.len());
            Some(pixels)
        })
        .collect();

    let mut buffer = RadianceBuffer::new(scene.width, scene.height);
    for (bucket, pixels) in buckets.iter().zip(results) {
        let pixels = pixels?;
        for (i, color) in pixels.into_iter().enumerate() {
            let x = bucket.x + i as u32 % bucket.width;
            let y = bucket.y + i as u32 / bucket.width;
            buffer.set(x, y, color);
        }
    }

    Some(buffer)
}

/// Render the scene to completion.
pub fn render(scene: &Scene, options: &RenderOptions) -> RadianceBuffer {
    let stop = AtomicBool::new(false);
    render_cancellable(scene, options, &stop)
        .expect("render without a stop flag cannot be cancelled")
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec3};
    use lumo_scene::{parse_scene, Camera, Material, Primitive, Shape, Surface};

    fn background_scene(width: u32, height: u32) -> Scene {
        Scene {
            width,
            height,
            ray_depth: 4,
            samples: 2,
            background: Color::new(0.25, 0.5, 0.75),
            camera: Camera {
                position: Vec3::new(0.0, 0.0, 15.0),
                right: Vec3::X,
                up: Vec3::Y,
                forward: Vec3::NEG_Z,
                fov_x: 1.0,
            },
            primitives: Vec::new(),
        }
    }

    #[test]
    fn test_empty_scene_is_background() {
        let scene = background_scene(8, 6);
        let buffer = render(&scene, &RenderOptions::default());

        for y in 0..6 {
            for x in 0..8 {
                assert_eq!(buffer.get(x, y), scene.background);
            }
        }
    }

    #[test]
    fn test_full_view_plane_leaves_no_background() {
        let mut scene = background_scene(16, 16);
        scene.primitives.push(Primitive {
            shape: Shape::Plane { normal: Vec3::Z },
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            material: Material {
                albedo: Color::ZERO,
                emission: Color::new(1.0, 0.0, 0.0),
                surface: Surface::Diffuse,
            },
        });

        let buffer = render(&scene, &RenderOptions::default());
        for pixel in &buffer.pixels {
            assert_eq!(*pixel, Color::new(1.0, 0.0, 0.0));
        }
    }

    #[test]
    fn test_render_is_deterministic() {
        let text = "\
DIMENSIONS 24 16
RAY_DEPTH 3
SAMPLES 4
BG_COLOR 0.1 0.1 0.1
CAMERA_POSITION 0 0 15
CAMERA_RIGHT 1 0 0
CAMERA_UP 0 1 0
CAMERA_FORWARD 0 0 -1
CAMERA_FOV_X 0.927295218
NEW_PRIMITIVE
SPHERE 3
COLOR 0.7 0.6 0.5
NEW_PRIMITIVE
PLANE 0 1 0
POSITION 0 -4 0
COLOR 0.9 0.9 0.9
";
        let scene_a = parse_scene(text).unwrap();
        let scene_b = parse_scene(text).unwrap();
        let options = RenderOptions { seed: 11 };

        let a = render(&scene_a, &options);
        let b = render(&scene_b, &options);
        assert_eq!(a.pixels, b.pixels);

        // A different seed moves the sample positions
        let c = render(&scene_a, &RenderOptions { seed: 12 });
        assert_ne!(a.pixels, c.pixels);
    }

    #[test]
    fn test_cancelled_render_returns_none() {
        let scene = background_scene(32, 32);
        let stop = AtomicBool::new(true);

        assert!(render_cancellable(&scene, &RenderOptions::default(), &stop).is_none());
    }

    #[test]
    fn test_buffer_indexing() {
        let mut buffer = RadianceBuffer::new(4, 3);
        buffer.set(3, 2, Color::ONE);

        assert_eq!(buffer.get(3, 2), Color::ONE);
        assert_eq!(buffer.pixels.len(), 12);
        assert_eq!(*buffer.pixels.last().unwrap(), Color::ONE);
    }
}
