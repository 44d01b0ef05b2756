use bevy::prelude::*;

use super::SketchError;
use super::camera::CameraSnapshot;
use super::ground::GroundMesh;
use super::silhouette::{SilhouetteCurve, build_silhouette, reshape_plane};

/// Sculpt a terrain height field along a gestured silhouette.
///
/// Builds the vertical reshape plane through the stroke's ground anchors,
/// projects the screen path onto it, then blends every ground vertex toward
/// the curve-implied height with a falloff that vanishes `influence_radius`
/// away from the plane. Callers resync normals, bounds and any outline
/// geometry afterwards.
pub fn reshape(
    ground: &mut GroundMesh,
    screen_path: &[Vec2],
    start: Vec3,
    end: Vec3,
    camera: &CameraSnapshot,
    influence_radius: f32,
) -> Result<(), SketchError> {
    if screen_path.is_empty() {
        return Err(SketchError::InvalidConfiguration(
            "screen path must not be empty",
        ));
    }
    if influence_radius <= 0.0 {
        return Err(SketchError::InvalidConfiguration(
            "influence radius must be positive",
        ));
    }

    let plane = reshape_plane(start, end)?;
    let curve = build_silhouette(screen_path, &plane, camera)?;

    // Plane-local frame: Y is world up, X runs along the stroke in the plane.
    let plane_x = Vec3::Y.cross(*plane.normal).normalize();
    let origin = curve[0];

    for vertex in ground.positions_mut() {
        let distance = plane.signed_distance(*vertex);
        let weight = 1.0 - (distance / influence_radius).powi(2);
        if weight <= 0.0 {
            continue;
        }

        let closest = *vertex - *plane.normal * distance;
        if let Some(correction) = compute_h(closest, &curve, plane_x, origin) {
            vertex.y = (1.0 - weight) * vertex.y + weight * correction;
        }
    }

    Ok(())
}

/// Curve-implied height correction for a point on the reshape plane.
///
/// Scans consecutive curve segments in order and linearly interpolates the
/// world Y of the first segment whose plane-local X interval brackets the
/// point (ascending or descending; the curve need not be monotonic in X).
/// Returns `None` when the point lies outside the curve's horizontal span —
/// distinct from a legitimate zero correction, which still blends.
pub fn compute_h(
    closest: Vec3,
    curve: &SilhouetteCurve,
    plane_x: Vec3,
    origin: Vec3,
) -> Option<f32> {
    let x_target = (closest - origin).dot(plane_x);

    for pair in curve.windows(2) {
        let x0 = (pair[0] - origin).dot(plane_x);
        let x1 = (pair[1] - origin).dot(plane_x);

        let brackets = (x0 <= x_target && x_target <= x1) || (x1 <= x_target && x_target <= x0);
        if !brackets {
            continue;
        }

        let span = x1 - x0;
        let alpha = if span.abs() > f32::EPSILON {
            (x_target - x0) / span
        } else {
            0.0
        };
        let interpolated_y = pair[0].y + (pair[1].y - pair[0].y) * alpha;
        return Some(interpolated_y - closest.y);
    }

    None
}
