//! Intersection record shared by the intersection engine and integrator.

use lumo_math::Vec3;
use lumo_scene::Material;

/// Record of a ray-primitive intersection.
#[derive(Clone, Copy)]
pub struct Hit<'a> {
    /// Ray parameter where the intersection occurs
    pub t: f32,

    /// Point of intersection in world space
    pub point: Vec3,

    /// Unit surface normal at the intersection, facing the ray
    pub normal: Vec3,

    /// Whether the ray started inside the surface
    pub inside: bool,

    /// Material of the hit primitive
    pub material: &'a Material,
}
