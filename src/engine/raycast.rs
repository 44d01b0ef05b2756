use bevy::prelude::*;

use crate::constants::PLANE_PARALLEL_EPSILON;
use super::SketchError;

/// Infinite plane given by a unit normal and any coplanar point.
#[derive(Debug, Clone, Copy)]
pub struct WorldPlane {
    pub normal: Dir3,
    pub point: Vec3,
}

impl WorldPlane {
    pub fn new(normal: Dir3, point: Vec3) -> Self {
        Self { normal, point }
    }

    /// Build a plane from an arbitrary (non-zero) normal.
    pub fn from_normal(normal: Vec3, point: Vec3) -> Result<Self, SketchError> {
        let normal = Dir3::new(normal).map_err(|_| SketchError::DegenerateProjection)?;
        Ok(Self { normal, point })
    }

    /// Signed distance from a point to the plane, positive on the normal side.
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        (point - self.point).dot(*self.normal)
    }

    /// Perpendicular foot of a point on the plane.
    pub fn project(&self, point: Vec3) -> Vec3 {
        point - *self.normal * self.signed_distance(point)
    }
}

/// Sphere used as the sky dome projection target.
#[derive(Debug, Clone, Copy)]
pub struct SkySphere {
    pub center: Vec3,
    pub radius: f32,
}

impl SkySphere {
    pub fn new(center: Vec3, radius: f32) -> Result<Self, SketchError> {
        if radius <= 0.0 {
            return Err(SketchError::InvalidConfiguration(
                "sphere radius must be positive",
            ));
        }
        Ok(Self { center, radius })
    }
}

/// Forward intersection of a ray with a plane.
///
/// Returns `None` when the ray is parallel to the plane or the crossing lies
/// behind the ray origin.
pub fn intersect_plane(ray: &Ray3d, plane: &WorldPlane) -> Option<Vec3> {
    let denom = ray.direction.dot(*plane.normal);
    if denom.abs() < PLANE_PARALLEL_EPSILON {
        return None;
    }

    let t = (plane.point - ray.origin).dot(*plane.normal) / denom;
    if t < 0.0 {
        return None;
    }
    Some(ray.origin + ray.direction * t)
}

/// Nearest forward intersection of a ray with a sphere, `None` on a miss.
pub fn intersect_sphere(ray: &Ray3d, sphere: &SkySphere) -> Option<Vec3> {
    let to_origin = ray.origin - sphere.center;
    let half_b = to_origin.dot(*ray.direction);
    let c = to_origin.length_squared() - sphere.radius * sphere.radius;

    let discriminant = half_b * half_b - c;
    if discriminant < 0.0 {
        return None;
    }

    // Prefer the nearer root; fall back to the far one when the origin is
    // inside the sphere.
    let sqrt_d = discriminant.sqrt();
    let mut t = -half_b - sqrt_d;
    if t < 0.0 {
        t = -half_b + sqrt_d;
    }
    if t < 0.0 {
        return None;
    }
    Some(ray.origin + ray.direction * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn down_ray(origin: Vec3) -> Ray3d {
        Ray3d::new(origin, Dir3::NEG_Y)
    }

    #[test]
    fn plane_forward_hit() {
        let plane = WorldPlane::new(Dir3::Y, Vec3::ZERO);
        let hit = intersect_plane(&down_ray(Vec3::new(2.0, 5.0, -1.0)), &plane).unwrap();
        assert!(hit.distance(Vec3::new(2.0, 0.0, -1.0)) < 1e-5);
    }

    #[test]
    fn plane_behind_origin_misses() {
        let plane = WorldPlane::new(Dir3::Y, Vec3::ZERO);
        let ray = Ray3d::new(Vec3::new(0.0, -3.0, 0.0), Dir3::NEG_Y);
        assert!(intersect_plane(&ray, &plane).is_none());
    }

    #[test]
    fn plane_parallel_ray_misses() {
        let plane = WorldPlane::new(Dir3::Y, Vec3::ZERO);
        let ray = Ray3d::new(Vec3::new(0.0, 1.0, 0.0), Dir3::X);
        assert!(intersect_plane(&ray, &plane).is_none());
    }

    #[test]
    fn sphere_nearest_hit_wins() {
        let sphere = SkySphere::new(Vec3::ZERO, 2.0).unwrap();
        let ray = Ray3d::new(Vec3::new(0.0, 10.0, 0.0), Dir3::NEG_Y);
        let hit = intersect_sphere(&ray, &sphere).unwrap();
        assert!(hit.distance(Vec3::new(0.0, 2.0, 0.0)) < 1e-4);
    }

    #[test]
    fn sphere_from_inside_hits_far_side() {
        let sphere = SkySphere::new(Vec3::ZERO, 5.0).unwrap();
        let ray = Ray3d::new(Vec3::ZERO, Dir3::X);
        let hit = intersect_sphere(&ray, &sphere).unwrap();
        assert!(hit.distance(Vec3::new(5.0, 0.0, 0.0)) < 1e-4);
    }

    #[test]
    fn sphere_miss() {
        let sphere = SkySphere::new(Vec3::ZERO, 1.0).unwrap();
        let ray = Ray3d::new(Vec3::new(0.0, 10.0, 5.0), Dir3::NEG_Y);
        assert!(intersect_sphere(&ray, &sphere).is_none());
    }

    #[test]
    fn sphere_rejects_bad_radius() {
        assert!(matches!(
            SkySphere::new(Vec3::ZERO, 0.0),
            Err(SketchError::InvalidConfiguration(_))
        ));
    }
}
