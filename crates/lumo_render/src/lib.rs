//! LUMO Renderer - CPU Path Tracing
//!
//! A Monte Carlo path tracer over the LUMO scene model:
//! - Closed-set primitive intersection (plane, box, sphere, ellipsoid)
//! - Recursive light transport with configurable depth
//! - Seeded per-pixel sampling for bit-reproducible renders
//! - Bucketed parallel rendering over the rayon pool

mod bucket;
mod camera;
mod compare;
mod film;
mod hit;
mod integrator;
mod intersect;
mod renderer;
mod sampler;

pub use bucket::{generate_buckets, Bucket, DEFAULT_BUCKET_SIZE};
pub use camera::{primary_ray, scene_ray};
pub use compare::{compare, CompareReport, DimensionMismatchError};
pub use film::{save_image, tone_map, tone_map_to_rgb8, ImageWriteError};
pub use hit::Hit;
pub use integrator::radiance;
pub use intersect::{primitive_hit, scene_hit};
pub use renderer::{render, render_cancellable, render_pixel, RadianceBuffer, RenderOptions};

/// Re-export common math types from lumo_math
pub use lumo_math::{Color, Interval, Ray, Vec3, RAY_EPSILON};
