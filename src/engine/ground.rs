use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};

use super::SketchError;

/// Fixed-topology grid terrain whose vertex heights the deformer mutates.
///
/// Vertices are laid out row-major (`index = row * (segments + 1) + col`) on
/// a uniform grid spanning `[-size/2, size/2]` in X and Z. Only the Y
/// component of a vertex changes after construction; the index buffer covers
/// each cell with two counter-clockwise triangles and never changes.
#[derive(Debug, Clone)]
pub struct GroundMesh {
    pub size: f32,
    pub segments: u32,
    positions: Vec<Vec3>,
    indices: Vec<u32>,
}

impl GroundMesh {
    pub fn build(size: f32, segments: u32) -> Result<Self, SketchError> {
        if size <= 0.0 {
            return Err(SketchError::InvalidConfiguration(
                "ground size must be positive",
            ));
        }
        if segments == 0 {
            return Err(SketchError::InvalidConfiguration(
                "ground segments must be at least 1",
            ));
        }

        let side = segments + 1;
        let step = size / segments as f32;
        let half = size * 0.5;

        let mut positions = Vec::with_capacity((side * side) as usize);
        for row in 0..side {
            for col in 0..side {
                positions.push(Vec3::new(
                    -half + col as f32 * step,
                    0.0,
                    -half + row as f32 * step,
                ));
            }
        }

        let mut indices = Vec::with_capacity((segments * segments * 6) as usize);
        for row in 0..segments {
            for col in 0..segments {
                let tl = row * side + col;
                let tr = tl + 1;
                let bl = tl + side;
                let br = bl + 1;

                indices.extend_from_slice(&[tl, bl, tr]);
                indices.extend_from_slice(&[tr, bl, br]);
            }
        }

        Ok(Self {
            size,
            segments,
            positions,
            indices,
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Mutable access to vertex positions for the height-field deformer.
    /// X and Z are part of the grid topology and must not be touched.
    pub(crate) fn positions_mut(&mut self) -> &mut [Vec3] {
        &mut self.positions
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn height_at(&self, row: u32, col: u32) -> f32 {
        self.positions[(row * (self.segments + 1) + col) as usize].y
    }

    /// Build a renderable Bevy mesh from the current height field.
    ///
    /// Normals are recomputed from scratch; planar UVs span the plate.
    pub fn to_mesh(&self) -> Mesh {
        let positions: Vec<[f32; 3]> = self.positions.iter().map(|p| p.to_array()).collect();
        let uvs: Vec<[f32; 2]> = self
            .positions
            .iter()
            .map(|p| {
                [
                    p.x / self.size + 0.5,
                    p.z / self.size + 0.5,
                ]
            })
            .collect();

        let mut mesh = Mesh::new(
            PrimitiveTopology::TriangleList,
            RenderAssetUsages::default(),
        );
        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
        mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
        mesh.insert_indices(Indices::U32(self.indices.clone()));
        mesh.compute_normals();
        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_counts_match_resolution() {
        for segments in 1..6 {
            let ground = GroundMesh::build(10.0, segments).unwrap();
            let side = (segments + 1) as usize;
            assert_eq!(ground.vertex_count(), side * side);
            assert_eq!(ground.indices().len(), (segments * segments * 6) as usize);
            assert!(
                ground
                    .indices()
                    .iter()
                    .all(|&i| (i as usize) < ground.vertex_count())
            );
        }
    }

    #[test]
    fn two_segment_plate_scenario() {
        let ground = GroundMesh::build(10.0, 2).unwrap();
        assert_eq!(ground.vertex_count(), 9);
        assert_eq!(ground.indices().len(), 24);
    }

    #[test]
    fn grid_spans_half_size_each_way() {
        let ground = GroundMesh::build(10.0, 2).unwrap();
        let first = ground.positions()[0];
        let last = *ground.positions().last().unwrap();
        assert!(first.distance(Vec3::new(-5.0, 0.0, -5.0)) < 1e-5);
        assert!(last.distance(Vec3::new(5.0, 0.0, 5.0)) < 1e-5);
    }

    #[test]
    fn triangles_wind_counter_clockwise_seen_from_above() {
        let ground = GroundMesh::build(4.0, 3).unwrap();
        for tri in ground.indices().chunks(3) {
            let [a, b, c] = [
                ground.positions()[tri[0] as usize],
                ground.positions()[tri[1] as usize],
                ground.positions()[tri[2] as usize],
            ];
            let normal = (b - a).cross(c - a);
            assert!(normal.y > 0.0);
        }
    }

    #[test]
    fn rejects_invalid_configuration() {
        assert!(matches!(
            GroundMesh::build(0.0, 4),
            Err(SketchError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            GroundMesh::build(-1.0, 4),
            Err(SketchError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            GroundMesh::build(10.0, 0),
            Err(SketchError::InvalidConfiguration(_))
        ));
    }
}
