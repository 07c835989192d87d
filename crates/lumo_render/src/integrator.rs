//! Recursive light transport.
//!
//! Estimates outgoing radiance along a ray by bouncing it through the
//! scene until it escapes, is absorbed by the depth limit, or terminates
//! on the background.

use lumo_math::{reflect, refract, Color, Ray};
use lumo_scene::{Scene, Surface};
use rand::RngCore;

use crate::hit::Hit;
use crate::intersect::scene_hit;
use crate::sampler::{cosine_hemisphere, gen_f32};

/// Estimate radiance arriving along `ray` with `depth` bounces remaining.
///
/// Depth 0 contributes nothing; emission at a surface is collected by
/// the bounce that reaches it, not by the terminating level.
pub fn radiance(scene: &Scene, ray: &Ray, depth: u32, rng: &mut dyn RngCore) -> Color {
    if depth == 0 {
        return Color::ZERO;
    }

    let Some(hit) = scene_hit(&scene.primitives, ray) else {
        return scene.background;
    };

    match hit.material.surface {
        Surface::Diffuse => {
            let direction = cosine_hemisphere(hit.normal, rng);
            let bounced = Ray::new(hit.point, direction).offset();
            // Cosine-weighted sampling folds the BRDF and pdf into the albedo
            hit.material.emission + hit.material.albedo * radiance(scene, &bounced, depth - 1, rng)
        }
        Surface::Metallic => {
            let direction = reflect(ray.direction, hit.normal);
            let bounced = Ray::new(hit.point, direction).offset();
            hit.material.emission + hit.material.albedo * radiance(scene, &bounced, depth - 1, rng)
        }
        Surface::Dielectric { ior } => {
            hit.material.emission + dielectric_radiance(scene, ray, &hit, ior, depth, rng)
        }
    }
}

/// Fresnel-weighted choice between reflection and refraction.
fn dielectric_radiance(
    scene: &Scene,
    ray: &Ray,
    hit: &Hit,
    ior: f32,
    depth: u32,
    rng: &mut dyn RngCore,
) -> Color {
    let (eta1, eta2) = if hit.inside { (ior, 1.0) } else { (1.0, ior) };
    let eta = eta1 / eta2;

    let cos_theta = (-ray.direction).dot(hit.normal).min(1.0);
    let reflectance = schlick(cos_theta, eta1, eta2);

    match refract(ray.direction, hit.normal, eta) {
        Some(refracted) if gen_f32(rng) >= reflectance => {
            let through = Ray::new(hit.point, refracted.normalize()).offset();
            let color = radiance(scene, &through, depth - 1, rng);
            // Tint on the way in; the inner surface passes light unchanged
            if hit.inside {
                color
            } else {
                hit.material.albedo * color
            }
        }
        // Total internal reflection or the Fresnel coin-flip
        _ => {
            let reflected = Ray::new(hit.point, reflect(ray.direction, hit.normal)).offset();
            radiance(scene, &reflected, depth - 1, rng)
        }
    }
}

/// Schlick's approximation for reflectance at a dielectric boundary.
fn schlick(cos_theta: f32, eta1: f32, eta2: f32) -> f32 {
    let r0 = ((eta1 - eta2) / (eta1 + eta2)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cos_theta).powi(5)
}
