use bevy::prelude::*;

use super::SketchError;

/// Immutable snapshot of a camera's position, orientation and projection.
///
/// Every unprojection call takes one of these explicitly instead of reaching
/// for ambient engine state, so the geometry core stays a pure function of
/// its inputs and is trivially testable without a render world.
#[derive(Debug, Clone, Copy)]
pub struct CameraSnapshot {
    pub position: Vec3,
    pub rotation: Quat,
    /// Projection matrix (view space to clip space, reverse-z).
    pub clip_from_view: Mat4,
}

impl CameraSnapshot {
    pub fn new(position: Vec3, rotation: Quat, clip_from_view: Mat4) -> Self {
        Self {
            position,
            rotation,
            clip_from_view,
        }
    }

    /// Capture the current state of a live Bevy camera.
    pub fn from_camera(camera: &Camera, camera_transform: &GlobalTransform) -> Self {
        Self {
            position: camera_transform.translation(),
            rotation: camera_transform.rotation(),
            clip_from_view: camera.clip_from_view(),
        }
    }

    /// World-space forward direction (cameras look down -Z in view space).
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// View space to world space.
    pub fn world_from_view(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position)
    }

    /// Clip space to world space.
    pub fn world_from_ndc(&self) -> Mat4 {
        self.world_from_view() * self.clip_from_view.inverse()
    }

    /// World space to clip space.
    pub fn ndc_from_world(&self) -> Mat4 {
        self.clip_from_view * self.world_from_view().inverse()
    }

    /// Cast a world-space ray from the camera through a device-normalized
    /// point ([-1,1] per axis).
    ///
    /// The ray originates on the near plane (NDC z = 1 under reverse-z) and
    /// passes through the matching far-plane point, the same construction
    /// Bevy's `Camera::viewport_to_world` uses.
    pub fn unproject(&self, ndc: Vec2) -> Result<Ray3d, SketchError> {
        let world_from_ndc = self.world_from_ndc();
        let near = world_from_ndc.project_point3(ndc.extend(1.0));
        let far = world_from_ndc.project_point3(ndc.extend(f32::EPSILON));

        let direction =
            Dir3::new(far - near).map_err(|_| SketchError::DegenerateProjection)?;
        Ok(Ray3d::new(near, direction))
    }
}

/// Convert a window cursor position (pixels, origin top-left) into
/// device-normalized coordinates (origin centre, Y up).
pub fn cursor_to_ndc(cursor: Vec2, window_size: Vec2) -> Vec2 {
    let normalized = cursor / window_size;
    Vec2::new(normalized.x * 2.0 - 1.0, 1.0 - normalized.y * 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn top_down_camera(height: f32) -> CameraSnapshot {
        CameraSnapshot::new(
            Vec3::new(0.0, height, 0.0),
            Quat::from_rotation_x(-std::f32::consts::FRAC_PI_2),
            Mat4::perspective_infinite_reverse_rh(1.0, 1.0, 0.1),
        )
    }

    #[test]
    fn unproject_centre_follows_forward() {
        let camera = top_down_camera(10.0);
        let ray = camera.unproject(Vec2::ZERO).unwrap();

        assert!(ray.direction.distance(camera.forward()) < 1e-4);
        // Origin sits on the near plane directly below the camera.
        assert!(ray.origin.distance(Vec3::new(0.0, 9.9, 0.0)) < 1e-3);
    }

    #[test]
    fn unproject_offsets_tilt_the_ray() {
        let camera = top_down_camera(10.0);
        let centre = camera.unproject(Vec2::ZERO).unwrap();
        let right = camera.unproject(Vec2::new(0.5, 0.0)).unwrap();

        assert!(right.direction.x > centre.direction.x);
        assert!(right.direction.y < 0.0);
    }

    #[test]
    fn ndc_round_trip_through_world() {
        let camera = CameraSnapshot::new(
            Vec3::new(3.0, 4.0, 5.0),
            Quat::from_euler(EulerRot::YXZ, 0.7, -0.4, 0.0),
            Mat4::perspective_infinite_reverse_rh(1.2, 16.0 / 9.0, 0.1),
        );

        let ndc = Vec2::new(-0.3, 0.6);
        let ray = camera.unproject(ndc).unwrap();
        let sample = ray.origin + ray.direction * 7.0;
        let back = camera.ndc_from_world().project_point3(sample);

        assert!((back.x - ndc.x).abs() < 1e-3);
        assert!((back.y - ndc.y).abs() < 1e-3);
    }

    #[test]
    fn cursor_conversion_flips_y() {
        let size = Vec2::new(800.0, 600.0);
        assert!(cursor_to_ndc(Vec2::new(400.0, 300.0), size).distance(Vec2::ZERO) < 1e-6);
        assert!(
            cursor_to_ndc(Vec2::new(800.0, 0.0), size).distance(Vec2::new(1.0, 1.0)) < 1e-6
        );
        assert!(
            cursor_to_ndc(Vec2::new(0.0, 600.0), size).distance(Vec2::new(-1.0, -1.0)) < 1e-6
        );
    }
}
