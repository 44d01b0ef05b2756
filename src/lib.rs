//! Sketch-based 3D sculpting and annotation on top of Bevy.
//!
//! 2D pointer gestures become 3D geometry two ways: sculpt strokes reshape
//! a grid terrain's height field along their silhouette, and ink strokes
//! become constant-width ribbons pinned to the camera, a world plane,
//! another stroke or the sky dome. `SketchSculptPlugin` wires the whole
//! toolset into an app; the `engine` modules are usable standalone.

use bevy::prelude::*;

pub mod constants;
pub mod engine;
pub mod tools;

pub use engine::SketchError;
pub use engine::billboard::{
    project_to_billboard, project_to_near_plane, project_to_sky, project_to_world_plane,
    world_plane_facing,
};
pub use engine::camera::CameraSnapshot;
pub use engine::deform::reshape;
pub use engine::ground::GroundMesh;
pub use engine::raycast::{SkySphere, WorldPlane, intersect_plane, intersect_sphere};
pub use engine::ribbon::RibbonMesh;
pub use engine::silhouette::{build_silhouette, reshape_plane};
pub use tools::ink::{InkAnchor, InkStroke, InkTool, InkToolPlugin, SkyDome, StrokeCompleted};
pub use tools::sculpt::{SculptTool, SculptToolPlugin, Terrain, TerrainReshaped};
pub use tools::tool_manager::{ToolManager, ToolType};

use crate::constants::{
    DEFAULT_GROUND_SEGMENTS, DEFAULT_GROUND_SIZE, DEFAULT_INFLUENCE_RADIUS, DEFAULT_STROKE_WIDTH,
    SKY_DOME_RADIUS,
};

/// Tunable parameters shared by the tools.
#[derive(Resource, Debug, Clone)]
pub struct SketchConfig {
    /// Side length of the square ground plate, world units.
    pub ground_size: f32,
    /// Quad cells along each ground edge.
    pub ground_segments: u32,
    /// Ink ribbon width in device-normalized units.
    pub stroke_width: f32,
    /// Sculpt falloff radius, world units.
    pub influence_radius: f32,
    /// Radius of the sky dome sky-anchored strokes land on.
    pub sky_radius: f32,
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            ground_size: DEFAULT_GROUND_SIZE,
            ground_segments: DEFAULT_GROUND_SEGMENTS,
            stroke_width: DEFAULT_STROKE_WIDTH,
            influence_radius: DEFAULT_INFLUENCE_RADIUS,
            sky_radius: SKY_DOME_RADIUS,
        }
    }
}

/// Registers the terrain and ink tools plus the shared tool manager.
pub struct SketchSculptPlugin;

impl Plugin for SketchSculptPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SketchConfig>()
            .init_resource::<ToolManager>()
            .add_plugins((SculptToolPlugin, InkToolPlugin))
            .add_systems(Update, tools::tool_manager::handle_tool_shortcuts);
    }
}
