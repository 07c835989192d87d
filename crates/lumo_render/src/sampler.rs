//! Random direction sampling for the integrator.
//!
//! All sampling goes through an explicit `RngCore` handle so renders are
//! reproducible from a seed; nothing here touches ambient randomness.

use lumo_math::Vec3;
use rand::RngCore;

/// Uniform f32 in [0, 1) from the raw generator.
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    // 24 high bits: the full f32 mantissa, no rounding bias
    (rng.next_u32() >> 8) as f32 * (1.0 / (1u32 << 24) as f32)
}

/// Uniform sub-pixel jitter in [0, 1) x [0, 1).
#[inline]
pub fn sample_square(rng: &mut dyn RngCore) -> (f32, f32) {
    (gen_f32(rng), gen_f32(rng))
}

/// Uniformly distributed unit vector, by rejection sampling the cube.
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let v = Vec3::new(
            gen_f32(rng) * 2.0 - 1.0,
            gen_f32(rng) * 2.0 - 1.0,
            gen_f32(rng) * 2.0 - 1.0,
        );
        let len_sq = v.length_squared();
        if len_sq > 1e-6 && len_sq <= 1.0 {
            return v / len_sq.sqrt();
        }
    }
}

/// Cosine-weighted direction on the hemisphere about `normal`.
///
/// Offsetting a uniform sphere point by the unit normal yields the
/// cosine density directly, so a diffuse bounce weights by plain albedo.
pub fn cosine_hemisphere(normal: Vec3, rng: &mut dyn RngCore) -> Vec3 {
    let direction = normal + random_unit_vector(rng);

    // Catch the antipodal sample that cancels the normal
    if direction.length_squared() < 1e-8 {
        return normal;
    }

    direction.normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_gen_f32_range() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1000 {
            let x = gen_f32(&mut rng);
            assert!((0.0..1.0).contains(&x));
        }
    }

    #[test]
    fn test_random_unit_vector_is_unit() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let v = random_unit_vector(&mut rng);
            assert!((v.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_cosine_hemisphere_faces_normal() {
        let mut rng = StdRng::seed_from_u64(42);
        let normal = Vec3::Y;
        for _ in 0..100 {
            let v = cosine_hemisphere(normal, &mut rng);
            assert!(v.dot(normal) >= 0.0);
            assert!((v.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_sampling_is_seeded() {
        let mut a = StdRng::seed_from_u64(7);
        let mut b = StdRng::seed_from_u64(7);
        for _ in 0..10 {
            assert_eq!(random_unit_vector(&mut a), random_unit_vector(&mut b));
        }
    }
}
