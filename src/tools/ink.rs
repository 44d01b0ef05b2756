use bevy::prelude::*;
use bevy::render::mesh::MeshAabb;
use bevy::window::PrimaryWindow;
use serde::{Deserialize, Serialize};

use crate::SketchConfig;
use crate::engine::billboard::{
    project_to_billboard, project_to_near_plane, project_to_sky, project_to_world_plane,
    world_plane_facing,
};
use crate::engine::camera::{CameraSnapshot, cursor_to_ndc};
use crate::engine::raycast::{WorldPlane, intersect_plane};
use crate::engine::ribbon::RibbonMesh;

/// Anchor a finished ink stroke can be pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InkAnchor {
    /// Stays glued to the camera (the live, mid-draw state).
    NearPlane,
    /// Dropped onto a camera-facing plane at the stroke's ground point.
    WorldPlane,
    /// Attached to the most recently completed stroke's frame.
    Billboard,
    /// Painted onto the sky dome.
    Sky,
}

impl InkAnchor {
    pub fn label(&self) -> &'static str {
        match self {
            Self::NearPlane => "near-plane",
            Self::WorldPlane => "world",
            Self::Billboard => "billboard",
            Self::Sky => "sky",
        }
    }
}

/// Marker for the application's sky dome entity; sky-anchored strokes are
/// expressed in (and parented to) its frame.
#[derive(Component)]
pub struct SkyDome;

/// An ink stroke entity: the ribbon it owns plus its chosen anchor.
#[derive(Component)]
pub struct InkStroke {
    pub id: u32,
    pub ribbon: RibbonMesh,
    pub world_origin: Vec3,
    pub anchor: InkAnchor,
}

/// Completion record for frontend interchange.
#[derive(Event, Debug, Clone, Serialize, Deserialize)]
pub struct StrokeCompleted {
    pub id: u32,
    pub anchor: InkAnchor,
    pub world_origin: [f32; 3],
    pub point_count: usize,
}

/// Interactive ink drawing state.
///
/// A stroke in progress lives on the camera near plane and is reprojected
/// every frame; releasing the button pins it to the selected anchor.
#[derive(Resource)]
pub struct InkTool {
    pub is_active: bool,
    pub anchor: InkAnchor,
    current: Option<Entity>,
    last_completed: Option<Entity>,
    next_id: u32,
}

impl Default for InkTool {
    fn default() -> Self {
        Self {
            is_active: false,
            anchor: InkAnchor::WorldPlane,
            current: None,
            last_completed: None,
            next_id: 0,
        }
    }
}

impl InkTool {
    pub fn set_active(&mut self, active: bool) {
        self.is_active = active;
        if !active {
            self.current = None;
        }
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }
}

pub struct InkToolPlugin;
impl Plugin for InkToolPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<InkTool>()
            .add_event::<StrokeCompleted>()
            .add_systems(Update, (select_anchor_system, ink_tool_system).chain());
    }
}

/// Digit keys 1-4 choose where the next stroke lands.
pub fn select_anchor_system(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut tool: ResMut<InkTool>,
) {
    if !tool.is_active() {
        return;
    }
    let selected = if keyboard.just_pressed(KeyCode::Digit1) {
        Some(InkAnchor::NearPlane)
    } else if keyboard.just_pressed(KeyCode::Digit2) {
        Some(InkAnchor::WorldPlane)
    } else if keyboard.just_pressed(KeyCode::Digit3) {
        Some(InkAnchor::Billboard)
    } else if keyboard.just_pressed(KeyCode::Digit4) {
        Some(InkAnchor::Sky)
    } else {
        None
    };
    if let Some(anchor) = selected {
        tool.anchor = anchor;
        info!("Ink anchor: {}", anchor.label());
    }
}

/// Draw while the button is held, pin the stroke on release.
pub fn ink_tool_system(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut tool: ResMut<InkTool>,
    config: Res<SketchConfig>,
    mouse: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
    mut strokes: Query<(&mut InkStroke, &Mesh3d, &mut Transform)>,
    frames: Query<&GlobalTransform, With<InkStroke>>,
    sky: Query<(Entity, &GlobalTransform), With<SkyDome>>,
    mut completed: EventWriter<StrokeCompleted>,
) {
    if !tool.is_active() {
        return;
    }
    let Ok(window) = windows.single() else {
        return;
    };
    let Ok((camera, camera_transform)) = cameras.single() else {
        return;
    };
    let snapshot = CameraSnapshot::from_camera(camera, camera_transform);

    if mouse.just_pressed(MouseButton::Left) {
        if let Some(cursor) = window.cursor_position() {
            let ndc = cursor_to_ndc(cursor, window.size());
            begin_stroke(
                &mut commands,
                &mut meshes,
                &mut materials,
                &mut tool,
                &config,
                &snapshot,
                ndc,
            );
        }
        return;
    }

    if mouse.pressed(MouseButton::Left) {
        let Some(entity) = tool.current else {
            return;
        };
        let Ok((mut stroke, mesh_handle, mut transform)) = strokes.get_mut(entity) else {
            return;
        };
        if let Some(cursor) = window.cursor_position() {
            stroke.ribbon.add_point(cursor_to_ndc(cursor, window.size()));
        }
        // Reproject every frame so the live stroke tracks camera motion.
        if let Some(anchor) = project_to_near_plane(&mut stroke.ribbon, &snapshot) {
            *transform = anchor;
            refresh_stroke_mesh(&mut commands, &mut meshes, entity, &stroke.ribbon, mesh_handle);
        }
        return;
    }

    if mouse.just_released(MouseButton::Left) {
        let Some(entity) = tool.current.take() else {
            return;
        };
        finish_stroke(
            &mut commands,
            &mut meshes,
            &mut tool,
            &config,
            &snapshot,
            entity,
            &mut strokes,
            &frames,
            &sky,
            &mut completed,
        );
    }
}

fn begin_stroke(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    tool: &mut InkTool,
    config: &SketchConfig,
    snapshot: &CameraSnapshot,
    ndc: Vec2,
) {
    let mut ribbon = match RibbonMesh::new(ndc, config.stroke_width) {
        Ok(ribbon) => ribbon,
        Err(err) => {
            warn!("Ink stroke not started: {err}");
            return;
        }
    };

    // The stroke's world origin: its first sample cast onto the ground,
    // or a point out along the ray when the gesture starts above the horizon.
    let ground_plane = WorldPlane::new(Dir3::Y, Vec3::ZERO);
    let world_origin = snapshot
        .unproject(ndc)
        .ok()
        .map(|ray| {
            intersect_plane(&ray, &ground_plane).unwrap_or_else(|| ray.origin + ray.direction * 10.0)
        })
        .unwrap_or(snapshot.position);

    let anchor = project_to_near_plane(&mut ribbon, snapshot).unwrap_or_default();
    let id = tool.next_id;
    tool.next_id += 1;

    let entity = commands
        .spawn((
            Mesh3d(meshes.add(ribbon.to_mesh())),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: Color::srgb(0.1, 0.1, 0.12),
                unlit: true,
                cull_mode: None,
                ..default()
            })),
            anchor,
            InkStroke {
                id,
                ribbon,
                world_origin,
                anchor: InkAnchor::NearPlane,
            },
        ))
        .id();
    tool.current = Some(entity);
}

fn finish_stroke(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    tool: &mut InkTool,
    config: &SketchConfig,
    snapshot: &CameraSnapshot,
    entity: Entity,
    strokes: &mut Query<(&mut InkStroke, &Mesh3d, &mut Transform)>,
    frames: &Query<&GlobalTransform, With<InkStroke>>,
    sky: &Query<(Entity, &GlobalTransform), With<SkyDome>>,
    completed: &mut EventWriter<StrokeCompleted>,
) {
    let Ok((mut stroke, mesh_handle, mut transform)) = strokes.get_mut(entity) else {
        return;
    };

    // Strokes with no accepted segment are dropped rather than pinned.
    if stroke.ribbon.point_count() < 2 {
        commands.entity(entity).despawn();
        return;
    }

    let world_origin = stroke.world_origin;
    let mut anchor_mode = tool.anchor;

    let projected = match anchor_mode {
        InkAnchor::NearPlane => Ok(project_to_near_plane(&mut stroke.ribbon, snapshot)),
        InkAnchor::WorldPlane => {
            project_to_world_plane(&mut stroke.ribbon, snapshot, world_origin).map(|anchor| {
                anchor.map(|a| a.with_rotation(world_plane_facing(world_origin, snapshot)))
            })
        }
        InkAnchor::Billboard => {
            let target = tool
                .last_completed
                .and_then(|target| frames.get(target).ok().map(|frame| (target, *frame)));
            match target {
                Some((target_entity, frame)) => {
                    let result =
                        project_to_billboard(&mut stroke.ribbon, snapshot, world_origin, &frame);
                    if result.is_ok() {
                        commands.entity(entity).insert(ChildOf(target_entity));
                    }
                    result
                }
                None => {
                    // No stroke to attach to yet; fall back to the world plane.
                    anchor_mode = InkAnchor::WorldPlane;
                    project_to_world_plane(&mut stroke.ribbon, snapshot, world_origin).map(
                        |anchor| {
                            anchor.map(|a| {
                                a.with_rotation(world_plane_facing(world_origin, snapshot))
                            })
                        },
                    )
                }
            }
        }
        InkAnchor::Sky => match sky.single() {
            Ok((sky_entity, sky_frame)) => {
                let result =
                    project_to_sky(&mut stroke.ribbon, snapshot, sky_frame, config.sky_radius);
                if result.is_ok() {
                    commands.entity(entity).insert(ChildOf(sky_entity));
                }
                result
            }
            Err(_) => project_to_sky(
                &mut stroke.ribbon,
                snapshot,
                &GlobalTransform::IDENTITY,
                config.sky_radius,
            ),
        },
    };

    match projected {
        Ok(Some(anchor)) => {
            *transform = anchor;
            stroke.anchor = anchor_mode;
            refresh_stroke_mesh(commands, meshes, entity, &stroke.ribbon, mesh_handle);
            tool.last_completed = Some(entity);

            completed.write(StrokeCompleted {
                id: stroke.id,
                anchor: anchor_mode,
                world_origin: world_origin.to_array(),
                point_count: stroke.ribbon.point_count(),
            });
            info!(
                "Ink stroke {} pinned to {} anchor ({} points)",
                stroke.id,
                anchor_mode.label(),
                stroke.ribbon.point_count()
            );
        }
        Ok(None) => {
            commands.entity(entity).despawn();
        }
        Err(err) => {
            warn!("Ink stroke {} discarded: {err}", stroke.id);
            commands.entity(entity).despawn();
        }
    }
}

/// Rewrite the stroke's mesh asset from its ribbon and refresh the bounding
/// volume used for frustum culling.
fn refresh_stroke_mesh(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    entity: Entity,
    ribbon: &RibbonMesh,
    mesh_handle: &Mesh3d,
) {
    let Some(mesh) = meshes.get_mut(&mesh_handle.0) else {
        return;
    };
    *mesh = ribbon.to_mesh();
    if let Some(aabb) = mesh.compute_aabb() {
        commands.entity(entity).insert(aabb);
    }
}
