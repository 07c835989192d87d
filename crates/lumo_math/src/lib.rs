// Re-export glam for convenience
pub use glam::*;

// LUMO math types
mod interval;
mod ray;
mod vector;

pub use interval::Interval;
pub use ray::Ray;
pub use vector::{reflect, refract, try_normalize, DegenerateVectorError};

/// Color type alias (RGB values, linear, typically 0-1 before tone mapping)
pub type Color = Vec3;

/// Tolerance used to avoid self-intersection and parallel-ray degeneracies.
pub const RAY_EPSILON: f32 = 1e-4;
