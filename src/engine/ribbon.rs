use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};

use super::SketchError;

/// Append-only constant-width triangulated strip following a 2D stroke.
///
/// The strip is authored in device-normalized space; the billboard projector
/// re-expresses the vertex buffer in 3D from the accepted path. Invariants:
/// the vertex count is always even (one left/right pair per accepted point),
/// indices only ever reference vertices already appended, and every accepted
/// point after the first adds exactly two vertices and two triangles.
#[derive(Debug, Clone)]
pub struct RibbonMesh {
    path: Vec<Vec2>,
    vertices: Vec<Vec3>,
    indices: Vec<u32>,
    stroke_width: f32,
}

impl RibbonMesh {
    /// Seed a stroke at its first pointer sample: one accepted point and a
    /// coincident vertex pair, no triangles yet.
    pub fn new(origin: Vec2, stroke_width: f32) -> Result<Self, SketchError> {
        if stroke_width <= 0.0 {
            return Err(SketchError::InvalidConfiguration(
                "stroke width must be positive",
            ));
        }

        let seed = origin.extend(0.0);
        Ok(Self {
            path: vec![origin],
            vertices: vec![seed, seed],
            indices: Vec::new(),
            stroke_width,
        })
    }

    pub fn path(&self) -> &[Vec2] {
        &self.path
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn stroke_width(&self) -> f32 {
        self.stroke_width
    }

    /// Append a pointer sample to the stroke.
    ///
    /// Samples closer than half the stroke width to the last accepted point
    /// are resampled away (returns `false`, buffers untouched) so the strip
    /// never contains near-zero-length segments. Accepted samples emit a
    /// perpendicular vertex pair and two triangles joining it to the
    /// previous pair.
    pub fn add_point(&mut self, point: Vec2) -> bool {
        let Some(&last) = self.path.last() else {
            return false;
        };
        if point.distance(last) <= self.stroke_width * 0.5 {
            return false;
        }

        let tangent = (point - last).normalize();
        let offset = Vec2::new(-tangent.y, tangent.x) * (self.stroke_width * 0.5);

        let base = self.vertices.len() as u32;
        self.vertices.push((point - offset).extend(0.0));
        self.vertices.push((point + offset).extend(0.0));
        self.indices.extend_from_slice(&[base - 2, base, base - 1]);
        self.indices.extend_from_slice(&[base - 1, base, base + 1]);
        self.path.push(point);
        true
    }

    /// Number of accepted path points.
    pub fn point_count(&self) -> usize {
        self.path.len()
    }

    /// Rebuild the full 2D vertex strip from the accepted path.
    ///
    /// Projection modes map these through a camera rather than reusing
    /// `vertices`, which a previous projection may already have rewritten
    /// into some 3D frame.
    pub(crate) fn strip_2d(&self) -> Vec<Vec2> {
        let mut strip = Vec::with_capacity(self.path.len() * 2);
        strip.push(self.path[0]);
        strip.push(self.path[0]);

        for pair in self.path.windows(2) {
            let tangent = (pair[1] - pair[0]).normalize();
            let offset = Vec2::new(-tangent.y, tangent.x) * (self.stroke_width * 0.5);
            strip.push(pair[1] - offset);
            strip.push(pair[1] + offset);
        }
        strip
    }

    /// Overwrite the vertex buffer with projected positions.
    /// The replacement must preserve the pair-per-point layout.
    pub(crate) fn set_vertices(&mut self, vertices: Vec<Vec3>) {
        debug_assert_eq!(vertices.len(), self.vertices.len());
        self.vertices = vertices;
    }

    /// Build a renderable Bevy mesh from the current vertex buffer.
    ///
    /// Ink strokes render unlit and double-sided, so normals are a constant
    /// +Z rather than recomputed (the seed pair makes the first two
    /// triangles zero-area, which face-normal accumulation dislikes).
    pub fn to_mesh(&self) -> Mesh {
        let positions: Vec<[f32; 3]> = self.vertices.iter().map(|v| v.to_array()).collect();
        let normals = vec![[0.0, 0.0, 1.0]; self.vertices.len()];

        let mut mesh = Mesh::new(
            PrimitiveTopology::TriangleList,
            RenderAssetUsages::default(),
        );
        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
        mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
        mesh.insert_indices(Indices::U32(self.indices.clone()));
        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_state_has_a_coincident_pair_and_no_triangles() {
        let ribbon = RibbonMesh::new(Vec2::ZERO, 0.1).unwrap();
        assert_eq!(ribbon.point_count(), 1);
        assert_eq!(ribbon.vertices().len(), 2);
        assert!(ribbon.indices().is_empty());
        assert_eq!(ribbon.vertices()[0], ribbon.vertices()[1]);
    }

    #[test]
    fn accepted_points_grow_buffers_by_fixed_amounts() {
        let mut ribbon = RibbonMesh::new(Vec2::ZERO, 0.1).unwrap();
        for i in 1..=4 {
            assert!(ribbon.add_point(Vec2::new(i as f32, 0.0)));
            let n = ribbon.point_count();
            assert_eq!(ribbon.vertices().len(), 2 * n);
            assert_eq!(ribbon.indices().len(), 6 * (n - 1));
        }
    }

    #[test]
    fn close_points_are_resampled_away() {
        let mut ribbon = RibbonMesh::new(Vec2::ZERO, 0.2).unwrap();
        assert!(ribbon.add_point(Vec2::new(1.0, 0.0)));

        let vertices_before = ribbon.vertices().len();
        let indices_before = ribbon.indices().len();

        // Within half a stroke width of the last accepted point: a no-op,
        // idempotent under repetition.
        assert!(!ribbon.add_point(Vec2::new(1.05, 0.0)));
        assert!(!ribbon.add_point(Vec2::new(1.05, 0.0)));
        assert!(!ribbon.add_point(Vec2::new(1.0, 0.0)));

        assert_eq!(ribbon.vertices().len(), vertices_before);
        assert_eq!(ribbon.indices().len(), indices_before);
        assert_eq!(ribbon.point_count(), 2);
    }

    #[test]
    fn indices_never_reference_unappended_vertices() {
        let mut ribbon = RibbonMesh::new(Vec2::ZERO, 0.1).unwrap();
        let samples = [
            Vec2::new(1.0, 0.2),
            Vec2::new(2.0, -0.3),
            Vec2::new(2.5, 1.0),
        ];
        for p in samples {
            ribbon.add_point(p);
        }

        let max = ribbon.vertices().len() as u32;
        assert!(ribbon.indices().iter().all(|&i| i < max));
    }

    #[test]
    fn three_point_stroke_has_consistent_winding() {
        let mut ribbon = RibbonMesh::new(Vec2::ZERO, 0.1).unwrap();
        assert!(ribbon.add_point(Vec2::new(1.0, 0.0)));
        assert!(ribbon.add_point(Vec2::new(2.0, 0.5)));

        assert_eq!(ribbon.vertices().len(), 6);
        assert_eq!(ribbon.indices().len(), 12);

        // Skip the zero-area triangles on the seed pair; every other
        // triangle must face the same way.
        for tri in ribbon.indices().chunks(3) {
            let [a, b, c] = [
                ribbon.vertices()[tri[0] as usize],
                ribbon.vertices()[tri[1] as usize],
                ribbon.vertices()[tri[2] as usize],
            ];
            let z = (b - a).cross(c - a).z;
            if z.abs() > 1e-9 {
                assert!(z > 0.0);
            }
        }
    }

    #[test]
    fn strip_rebuild_matches_incremental_vertices() {
        let mut ribbon = RibbonMesh::new(Vec2::new(-0.2, 0.1), 0.05).unwrap();
        ribbon.add_point(Vec2::new(0.3, 0.2));
        ribbon.add_point(Vec2::new(0.6, -0.4));

        let rebuilt = ribbon.strip_2d();
        assert_eq!(rebuilt.len(), ribbon.vertices().len());
        for (flat, v) in rebuilt.iter().zip(ribbon.vertices()) {
            assert!(flat.distance(v.truncate()) < 1e-5);
        }
    }

    #[test]
    fn rejects_non_positive_width() {
        assert!(matches!(
            RibbonMesh::new(Vec2::ZERO, 0.0),
            Err(SketchError::InvalidConfiguration(_))
        ));
    }
}
