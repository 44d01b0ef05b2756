use bevy::prelude::*;

use super::SketchError;
use super::camera::CameraSnapshot;
use super::raycast::{WorldPlane, intersect_plane};

/// Ordered 2D pointer trace in device-normalized coordinates.
pub type ScreenPath = Vec<Vec2>;

/// Ordered 3D curve lying on a reshape plane, one point per screen sample.
/// Transient: built once per deformation and discarded.
pub type SilhouetteCurve = Vec<Vec3>;

/// Vertical plane through a stroke's ground anchors.
///
/// The normal lies in the horizontal plane and is perpendicular to the
/// stroke's ground-projected direction; the plane passes through `start`.
pub fn reshape_plane(start: Vec3, end: Vec3) -> Result<WorldPlane, SketchError> {
    WorldPlane::from_normal((end - start).cross(Vec3::Y), start)
}

/// Project every screen sample onto the plane through the camera, in input
/// order.
///
/// A sample whose ray is parallel to the plane (or crosses it behind the
/// camera) aborts the whole build with `DegenerateProjection`; a partial
/// curve would silently shift the deformer's bracketing, so no sample is
/// ever skipped or substituted.
pub fn build_silhouette(
    path: &[Vec2],
    plane: &WorldPlane,
    camera: &CameraSnapshot,
) -> Result<SilhouetteCurve, SketchError> {
    let mut curve = Vec::with_capacity(path.len());
    for &sample in path {
        let ray = camera.unproject(sample)?;
        let hit = intersect_plane(&ray, plane).ok_or(SketchError::DegenerateProjection)?;
        curve.push(hit);
    }
    Ok(curve)
}
