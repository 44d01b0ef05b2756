use bevy::prelude::*;

use crate::constants::LIVE_STROKE_NDC_DEPTH;
use super::SketchError;
use super::camera::CameraSnapshot;
use super::raycast::{SkySphere, WorldPlane, intersect_plane, intersect_sphere};
use super::ribbon::RibbonMesh;

/// Re-expresses a 2D-authored ribbon as 3D geometry against one of four
/// anchors: the camera near plane, a camera-facing world plane, another
/// stroke's local frame, or the sky dome.
///
/// Every mode rewrites the ribbon's vertex buffer in place (rebuilt from the
/// accepted path, so modes can be reapplied freely) and returns the
/// `Transform` the stroke entity should adopt, or `None` as a benign no-op
/// when the ribbon has no vertices. Callers refresh the mesh asset and its
/// bounding volume afterwards.

/// Pin the ribbon to the camera: vertices re-expressed through the inverse
/// projection at a fixed depth, anchor at the camera's position and
/// orientation. Used live while a stroke is mid-draw.
pub fn project_to_near_plane(
    ribbon: &mut RibbonMesh,
    camera: &CameraSnapshot,
) -> Option<Transform> {
    if ribbon.vertices().is_empty() {
        return None;
    }

    let view_from_clip = camera.clip_from_view.inverse();
    let vertices = ribbon
        .strip_2d()
        .into_iter()
        .map(|p| view_from_clip.project_point3(p.extend(LIVE_STROKE_NDC_DEPTH)))
        .collect();
    ribbon.set_vertices(vertices);

    Some(Transform::from_translation(camera.position).with_rotation(camera.rotation))
}

/// Drop the ribbon onto a camera-facing plane through `world_origin`.
///
/// Vertices are stored as pre-rotation world offsets from `world_origin` and
/// the returned anchor carries identity rotation; `world_plane_facing` gives
/// the matching parent-level orientation.
pub fn project_to_world_plane(
    ribbon: &mut RibbonMesh,
    camera: &CameraSnapshot,
    world_origin: Vec3,
) -> Result<Option<Transform>, SketchError> {
    if ribbon.vertices().is_empty() {
        return Ok(None);
    }

    let plane = WorldPlane::from_normal(camera.forward(), world_origin)?;
    let vertices = cast_onto_plane(ribbon, camera, &plane)?
        .into_iter()
        .map(|hit| hit - world_origin)
        .collect();
    ribbon.set_vertices(vertices);

    Ok(Some(Transform::from_translation(world_origin)))
}

/// Parent-level orientation for a world-plane stroke: the billboard turns to
/// face the point directly beneath the camera on the ground.
pub fn world_plane_facing(world_origin: Vec3, camera: &CameraSnapshot) -> Quat {
    let beneath_camera = Vec3::new(camera.position.x, world_origin.y, camera.position.z);
    Transform::from_translation(world_origin)
        .looking_at(beneath_camera, Vec3::Y)
        .rotation
}

/// Attach the ribbon to another stroke's frame of reference: same plane math
/// as the world-plane mode, anchored at this stroke's `world_origin`, with
/// every hit converted into the target's local coordinates. The stroke
/// entity is expected to be re-parented under the target with the returned
/// (identity) transform.
pub fn project_to_billboard(
    ribbon: &mut RibbonMesh,
    camera: &CameraSnapshot,
    world_origin: Vec3,
    target: &GlobalTransform,
) -> Result<Option<Transform>, SketchError> {
    if ribbon.vertices().is_empty() {
        return Ok(None);
    }

    let plane = WorldPlane::from_normal(camera.forward(), world_origin)?;
    let world_to_target = target.affine().inverse();
    let vertices = cast_onto_plane(ribbon, camera, &plane)?
        .into_iter()
        .map(|hit| world_to_target.transform_point3(hit))
        .collect();
    ribbon.set_vertices(vertices);

    Ok(Some(Transform::IDENTITY))
}

/// Paint the ribbon onto the sky: each vertex ray intersects a fixed sphere
/// at the world origin instead of a plane, and hits are expressed in the sky
/// entity's local frame.
pub fn project_to_sky(
    ribbon: &mut RibbonMesh,
    camera: &CameraSnapshot,
    sky: &GlobalTransform,
    sky_radius: f32,
) -> Result<Option<Transform>, SketchError> {
    if ribbon.vertices().is_empty() {
        return Ok(None);
    }

    let sphere = SkySphere::new(Vec3::ZERO, sky_radius)?;
    let world_to_sky = sky.affine().inverse();

    let mut vertices = Vec::with_capacity(ribbon.vertices().len());
    for point in ribbon.strip_2d() {
        let ray = camera.unproject(point)?;
        let hit = intersect_sphere(&ray, &sphere).ok_or(SketchError::DegenerateProjection)?;
        vertices.push(world_to_sky.transform_point3(hit));
    }
    ribbon.set_vertices(vertices);

    Ok(Some(Transform::IDENTITY))
}

fn cast_onto_plane(
    ribbon: &RibbonMesh,
    camera: &CameraSnapshot,
    plane: &WorldPlane,
) -> Result<Vec<Vec3>, SketchError> {
    let mut hits = Vec::with_capacity(ribbon.vertices().len());
    for point in ribbon.strip_2d() {
        let ray = camera.unproject(point)?;
        let hit = intersect_plane(&ray, plane).ok_or(SketchError::DegenerateProjection)?;
        hits.push(hit);
    }
    Ok(hits)
}
