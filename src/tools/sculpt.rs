use bevy::prelude::*;
use bevy::render::mesh::MeshAabb;
use bevy::window::PrimaryWindow;

use crate::SketchConfig;
use crate::constants::SCULPT_SAMPLE_SPACING;
use crate::engine::camera::{CameraSnapshot, cursor_to_ndc};
use crate::engine::deform::reshape;
use crate::engine::ground::GroundMesh;
use crate::engine::raycast::{WorldPlane, intersect_plane};

/// The sculptable terrain entity: owns the height field behind its mesh asset.
#[derive(Component)]
pub struct Terrain {
    pub ground: GroundMesh,
}

/// Fired after a sculpt stroke lands, so outline/grid visuals that trace the
/// terrain can rebuild themselves.
#[derive(Event, Debug, Clone, Copy)]
pub struct TerrainReshaped {
    pub samples: usize,
}

/// Gesture capture state for terrain sculpting.
///
/// While the left button is held the tool records device-normalized cursor
/// samples; on release the whole gesture becomes one `reshape` call.
#[derive(Resource, Default)]
pub struct SculptTool {
    pub is_active: bool,
    pub screen_path: Vec<Vec2>,
}

impl SculptTool {
    pub fn set_active(&mut self, active: bool) {
        self.is_active = active;
        if !active {
            self.screen_path.clear();
        }
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }
}

pub struct SculptToolPlugin;
impl Plugin for SculptToolPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SculptTool>()
            .add_event::<TerrainReshaped>()
            .add_systems(Startup, spawn_terrain)
            .add_systems(Update, sculpt_tool_system);
    }
}

/// Spawn the ground plate from the configured size and resolution.
fn spawn_terrain(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    config: Res<SketchConfig>,
) {
    let ground = match GroundMesh::build(config.ground_size, config.ground_segments) {
        Ok(ground) => ground,
        Err(err) => {
            warn!("Terrain not spawned: {err}");
            return;
        }
    };

    commands.spawn((
        Mesh3d(meshes.add(ground.to_mesh())),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.45, 0.55, 0.35),
            perceptual_roughness: 0.95,
            ..default()
        })),
        Transform::IDENTITY,
        Terrain { ground },
    ));
}

/// Capture the gesture while the button is held; sculpt on release.
pub fn sculpt_tool_system(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut tool: ResMut<SculptTool>,
    config: Res<SketchConfig>,
    mouse: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
    mut terrain: Query<(Entity, &mut Terrain, &Mesh3d)>,
    mut reshaped: EventWriter<TerrainReshaped>,
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

    if mouse.just_pressed(MouseButton::Left) {
        tool.screen_path.clear();
    }

    if mouse.pressed(MouseButton::Left) {
        if let Some(cursor) = window.cursor_position() {
            let ndc = cursor_to_ndc(cursor, window.size());
            let moved_enough = tool
                .screen_path
                .last()
                .is_none_or(|last| last.distance(ndc) > SCULPT_SAMPLE_SPACING);
            if moved_enough {
                tool.screen_path.push(ndc);
            }
        }
        return;
    }

    if !mouse.just_released(MouseButton::Left) || tool.screen_path.len() < 2 {
        return;
    }
    let path = std::mem::take(&mut tool.screen_path);

    let Ok((entity, mut terrain, mesh_handle)) = terrain.single_mut() else {
        return;
    };
    let snapshot = CameraSnapshot::from_camera(camera, camera_transform);

    // Ground anchors of the gesture: first and last samples cast onto the
    // resting ground plane.
    let ground_plane = WorldPlane::new(Dir3::Y, Vec3::ZERO);
    let anchors = (|| {
        let first = intersect_plane(&snapshot.unproject(path[0]).ok()?, &ground_plane)?;
        let last =
            intersect_plane(&snapshot.unproject(*path.last()?).ok()?, &ground_plane)?;
        Some((first, last))
    })();
    let Some((start, end)) = anchors else {
        warn!("Sculpt stroke discarded: gesture does not reach the ground");
        return;
    };

    match reshape(
        &mut terrain.ground,
        &path,
        start,
        end,
        &snapshot,
        config.influence_radius,
    ) {
        Ok(()) => {
            sync_terrain_mesh(&mut commands, &mut meshes, entity, &terrain.ground, mesh_handle);
            reshaped.write(TerrainReshaped {
                samples: path.len(),
            });
            info!("Terrain reshaped along {} gesture samples", path.len());
        }
        Err(err) => warn!("Sculpt stroke discarded: {err}"),
    }
}

/// Push the mutated height field back into the render mesh: positions,
/// recomputed normals and a fresh bounding volume.
fn sync_terrain_mesh(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    entity: Entity,
    ground: &GroundMesh,
    mesh_handle: &Mesh3d,
) {
    let Some(mesh) = meshes.get_mut(&mesh_handle.0) else {
        return;
    };
    *mesh = ground.to_mesh();
    if let Some(aabb) = mesh.compute_aabb() {
        commands.entity(entity).insert(aabb);
    }
}
