//! Scene types for LUMO.
//!
//! This module defines the renderer-facing scene representation that the
//! text-format loader produces. A `Scene` is immutable once loaded and is
//! shared by reference for the duration of one render.

use lumo_math::{try_normalize, Color, DegenerateVectorError, Quat, Vec3};

/// How a surface responds to an incoming ray.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Surface {
    /// Cosine-weighted scatter about the surface normal.
    Diffuse,
    /// Perfect mirror reflection.
    Metallic,
    /// Refraction with Fresnel-weighted reflection.
    Dielectric {
        /// Index of refraction (1.0 = air, 1.5 = glass)
        ior: f32,
    },
}

/// Surface appearance of one primitive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    /// Diffuse/albedo color (RGB, 0-1)
    pub albedo: Color,

    /// Emitted radiance (RGB, >= 0, unbounded)
    pub emission: Color,

    /// Scattering behavior
    pub surface: Surface,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            albedo: Color::ZERO,
            emission: Color::ZERO,
            surface: Surface::Diffuse,
        }
    }
}

impl Material {
    /// Check if this material emits light.
    pub fn is_emissive(&self) -> bool {
        self.emission.length_squared() > 0.0
    }
}

/// Geometric shape of one primitive, in its local frame.
///
/// The closed set of variants matches the scene format's shape keywords;
/// the intersection engine dispatches on it exhaustively.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    /// Infinite plane through the local origin with the given unit normal.
    Plane { normal: Vec3 },
    /// Axis-aligned box spanning `-half_extents..=half_extents`.
    Box { half_extents: Vec3 },
    /// Sphere of the given radius about the local origin.
    Sphere { radius: f32 },
    /// Axis-aligned ellipsoid with the given semi-axes.
    Ellipsoid { radii: Vec3 },
}

/// A renderable shape with placement and material.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Primitive {
    pub shape: Shape,

    /// World-space position of the local origin
    pub position: Vec3,

    /// Local-to-world rotation
    pub rotation: Quat,

    pub material: Material,
}

/// Pinhole camera described by a position, a basis, and a horizontal fov.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub right: Vec3,
    pub up: Vec3,
    pub forward: Vec3,

    /// Horizontal field of view in radians, in (0, pi)
    pub fov_x: f32,
}

impl Camera {
    /// Return a copy with a normalized, mutually orthogonal basis.
    ///
    /// Scene files routinely carry hand-written basis vectors that are
    /// only approximately orthonormal; the loader accepts them and
    /// Gram-Schmidt corrects here. Collinear vectors cannot be repaired
    /// and fail.
    pub fn orthonormalized(&self) -> Result<Camera, DegenerateVectorError> {
        let forward = try_normalize(self.forward)?;
        let right = try_normalize(self.right - forward * self.right.dot(forward))?;
        let up = try_normalize(
            self.up - forward * self.up.dot(forward) - right * self.up.dot(right),
        )?;

        Ok(Camera {
            position: self.position,
            right,
            up,
            forward,
            fov_x: self.fov_x,
        })
    }
}

/// A complete scene: render settings, camera, and primitives.
///
/// Primitive order is load order; the intersection engine uses it to
/// break exact-distance ties deterministically.
#[derive(Clone, Debug)]
pub struct Scene {
    /// Output width in pixels
    pub width: u32,

    /// Output height in pixels
    pub height: u32,

    /// Maximum ray bounce depth
    pub ray_depth: u32,

    /// Samples per pixel
    pub samples: u32,

    /// Radiance returned by rays that leave the scene
    pub background: Color,

    pub camera: Camera,

    pub primitives: Vec<Primitive>,
}

impl Scene {
    /// Get total pixel count.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}
