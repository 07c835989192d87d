//! Fallible and geometric helpers on top of glam's Vec3.

use glam::Vec3;
use thiserror::Error;

/// Error returned when a zero-length vector is asked to normalize.
///
/// Treated as a logic error in geometry setup: whatever produced the
/// vector fed degenerate data into the math kernel.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("cannot normalize a zero-length vector")]
pub struct DegenerateVectorError;

/// Normalize a vector, failing on degenerate input.
///
/// Rejects zero-length vectors as well as non-finite ones, both of which
/// would otherwise poison every downstream dot product with NaN.
pub fn try_normalize(v: Vec3) -> Result<Vec3, DegenerateVectorError> {
    v.try_normalize().ok_or(DegenerateVectorError)
}

/// Reflect a vector about a unit normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a unit vector through a surface with relative index `eta`.
///
/// `n` is the unit normal on the incident side. Returns `None` on total
/// internal reflection.
#[inline]
pub fn refract(v: Vec3, n: Vec3, eta: f32) -> Option<Vec3> {
    let cos_theta = (-v).dot(n).min(1.0);
    let k = 1.0 - eta * eta * (1.0 - cos_theta * cos_theta);
    if k < 0.0 {
        return None;
    }
    Some(eta * v + (eta * cos_theta - k.sqrt()) * n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_normalize() {
        let v = try_normalize(Vec3::new(3.0, 0.0, 0.0)).unwrap();
        assert_eq!(v, Vec3::X);
    }

    #[test]
    fn test_try_normalize_zero() {
        assert_eq!(try_normalize(Vec3::ZERO), Err(DegenerateVectorError));
    }

    #[test]
    fn test_try_normalize_non_finite() {
        assert!(try_normalize(Vec3::new(f32::NAN, 0.0, 0.0)).is_err());
        assert!(try_normalize(Vec3::new(f32::INFINITY, 0.0, 0.0)).is_err());
    }

    #[test]
    fn test_reflect() {
        // 45 degree bounce off the ground plane
        let v = Vec3::new(1.0, -1.0, 0.0).normalize();
        let r = reflect(v, Vec3::Y);
        assert!((r - Vec3::new(1.0, 1.0, 0.0).normalize()).length() < 1e-6);
    }

    #[test]
    fn test_refract_straight_through() {
        // Normal incidence is unchanged regardless of eta
        let v = Vec3::new(0.0, -1.0, 0.0);
        let r = refract(v, Vec3::Y, 1.5).unwrap();
        assert!((r - v).length() < 1e-6);
    }

    #[test]
    fn test_refract_total_internal_reflection() {
        // Grazing exit from a dense medium has no refracted ray
        let v = Vec3::new(0.9, -0.1, 0.0).normalize();
        assert!(refract(v, Vec3::Y, 1.5).is_none());
    }

    #[test]
    fn test_refract_bends_toward_normal() {
        // Entering a denser medium bends the ray toward the normal
        let v = Vec3::new(1.0, -1.0, 0.0).normalize();
        let r = refract(v, Vec3::Y, 1.0 / 1.5).unwrap();
        assert!(r.x.abs() < v.x.abs());
        assert!(r.y < 0.0);
    }
}
