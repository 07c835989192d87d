//! Ray-primitive intersection engine.
//!
//! Rays are transformed into each primitive's local frame (inverse
//! rotation about its position), tested against the shape there, and the
//! resulting normal is rotated back to world space. Shapes are a closed
//! enum, so the dispatch below is checked for exhaustiveness at compile
//! time.

use lumo_math::{Interval, Ray, Vec3, RAY_EPSILON};
use lumo_scene::{Primitive, Shape};

use crate::hit::Hit;

/// Intersection candidate in the primitive's local frame.
struct LocalHit {
    t: f32,
    normal: Vec3,
}

/// Test a ray against one primitive within the given t range.
///
/// Returns the nearest valid intersection with a world-space normal
/// facing the ray, or `None`.
pub fn primitive_hit<'a>(prim: &'a Primitive, ray: &Ray, ray_t: Interval) -> Option<Hit<'a>> {
    let inv_rotation = prim.rotation.inverse();
    let local = Ray::new(
        inv_rotation * (ray.origin - prim.position),
        inv_rotation * ray.direction,
    );

    let LocalHit { t, normal } = match prim.shape {
        Shape::Plane { normal } => hit_plane(&local, normal, ray_t)?,
        Shape::Box { half_extents } => hit_box(&local, half_extents, ray_t)?,
        Shape::Sphere { radius } => hit_sphere(&local, radius, ray_t)?,
        Shape::Ellipsoid { radii } => hit_ellipsoid(&local, radii, ray_t)?,
    };

    // Normals face the ray; a back-face hit means the ray started inside.
    let inside = local.direction.dot(normal) > 0.0;
    let oriented = if inside { -normal } else { normal };

    Some(Hit {
        t,
        point: ray.at(t),
        normal: (prim.rotation * oriented).normalize(),
        inside,
        material: &prim.material,
    })
}

fn hit_plane(ray: &Ray, normal: Vec3, ray_t: Interval) -> Option<LocalHit> {
    let denom = ray.direction.dot(normal);
    if denom.abs() < RAY_EPSILON {
        // Parallel rays graze forever without crossing
        return None;
    }

    let t = -ray.origin.dot(normal) / denom;
    if !ray_t.surrounds(t) {
        return None;
    }

    Some(LocalHit { t, normal })
}

fn hit_box(ray: &Ray, half_extents: Vec3, ray_t: Interval) -> Option<LocalHit> {
    // Slab method: per-axis entry and exit, overlapped across all three
    let t_lo = (-half_extents - ray.origin) / ray.direction;
    let t_hi = (half_extents - ray.origin) / ray.direction;
    let t_entry = t_lo.min(t_hi).max_element();
    let t_exit = t_lo.max(t_hi).min_element();

    if t_entry > t_exit || t_exit < ray_t.min {
        return None;
    }

    // Entry behind the origin means the ray starts inside the box
    let t = if t_entry < ray_t.min { t_exit } else { t_entry };
    if !ray_t.surrounds(t) {
        return None;
    }

    Some(LocalHit {
        t,
        normal: box_normal(ray.at(t) / half_extents),
    })
}

/// Face normal from the dominant component of the unit-box hit point.
fn box_normal(p: Vec3) -> Vec3 {
    let a = p.abs();
    if a.x >= a.y && a.x >= a.z {
        Vec3::new(p.x.signum(), 0.0, 0.0)
    } else if a.y >= a.z {
        Vec3::new(0.0, p.y.signum(), 0.0)
    } else {
        Vec3::new(0.0, 0.0, p.z.signum())
    }
}

fn hit_sphere(ray: &Ray, radius: f32, ray_t: Interval) -> Option<LocalHit> {
    let oc = -ray.origin;
    let a = ray.direction.length_squared();
    let h = ray.direction.dot(oc);
    let c = oc.length_squared() - radius * radius;

    let discriminant = h * h - a * c;
    if discriminant < 0.0 {
        return None;
    }
    let sqrtd = discriminant.sqrt();

    // Nearest root in range, falling back to the far root from inside
    let mut root = (h - sqrtd) / a;
    if !ray_t.surrounds(root) {
        root = (h + sqrtd) / a;
        if !ray_t.surrounds(root) {
            return None;
        }
    }

    Some(LocalHit {
        t: root,
        normal: ray.at(root) / radius,
    })
}

fn hit_ellipsoid(ray: &Ray, radii: Vec3, ray_t: Interval) -> Option<LocalHit> {
    // Quadratic for the radius-scaled ray against the unit sphere
    let o = ray.origin / radii;
    let d = ray.direction / radii;
    let a = d.length_squared();
    let half_b = o.dot(d);
    let c = o.length_squared() - 1.0;

    let discriminant = half_b * half_b - a * c;
    if discriminant < 0.0 {
        return None;
    }
    let sqrtd = discriminant.sqrt();

    let mut root = (-half_b - sqrtd) / a;
    if !ray_t.surrounds(root) {
        root = (-half_b + sqrtd) / a;
        if !ray_t.surrounds(root) {
            return None;
        }
    }

    Some(LocalHit {
        t: root,
        normal: (ray.at(root) / (radii * radii)).normalize(),
    })
}

/// Find the nearest intersection across an ordered primitive list.
///
/// Later primitives replace the current best only when closer by more
/// than `RAY_EPSILON`, so exact and near-exact distance ties resolve to
/// the earliest declaration. Renders stay reproducible across runs.
pub fn scene_hit<'a>(primitives: &'a [Primitive], ray: &Ray) -> Option<Hit<'a>> {
    let mut nearest: Option<Hit<'a>> = None;
    let mut closest_max = f32::INFINITY;

    for prim in primitives {
        let range = Interval::new(RAY_EPSILON, closest_max);
        if let Some(hit) = primitive_hit(prim, ray, range) {
            closest_max = hit.t - RAY_EPSILON;
            nearest = Some(hit);
        }
    }

    nearest
}
