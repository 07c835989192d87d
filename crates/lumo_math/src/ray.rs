use crate::{Vec3, RAY_EPSILON};

/// A ray in 3D space with an origin and a direction.
///
/// Rays represent a half-line starting at `origin` and traveling along
/// `direction`, parameterized by `t >= 0`. Directions are expected to be
/// normalized at construction sites.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Advance the origin a small step along the direction.
    ///
    /// Secondary rays spawned at a surface must start slightly off it,
    /// otherwise they re-intersect the surface they left.
    #[inline]
    pub fn offset(&self) -> Ray {
        Ray::new(self.origin + self.direction * RAY_EPSILON, self.direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_creation() {
        let origin = Vec3::new(1.0, 2.0, 3.0);
        let direction = Vec3::new(0.0, 1.0, 0.0);
        let ray = Ray::new(origin, direction);

        assert_eq!(ray.origin, origin);
        assert_eq!(ray.direction, direction);
    }

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        assert_eq!(ray.at(0.0), Vec3::ZERO);
        assert_eq!(ray.at(1.0), Vec3::X);
        assert_eq!(ray.at(2.0), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(ray.at(-1.0), Vec3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn test_ray_offset() {
        let ray = Ray::new(Vec3::ZERO, Vec3::Y);
        let stepped = ray.offset();

        assert_eq!(stepped.direction, ray.direction);
        assert!(stepped.origin.y > 0.0);
        assert!(stepped.origin.y < 1e-3);
    }
}
