//! Grid mesh topology for a height field
//!
//! The mesh is flat: every vertex sits at `y = 0` and the renderer displaces
//! it by sampling the height texture. Topology therefore depends only on the
//! terrain size and resolution, never on height values.

use bytemuck::{Pod, Zeroable};

/// Interleaved vertex of the unrolled triangle list
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Zeroable, Pod)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

/// Indexed triangle grid of `resolution²` vertices
///
/// Vertex `(i, j)` is stored at `i * resolution + j`, where `i` runs along
/// world x and `j` along world z.
#[derive(Clone, Debug, PartialEq)]
pub struct GridMesh {
    pub size: f32,
    pub resolution: usize,
    pub positions: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

impl GridMesh {
    /// Build the grid for a terrain spanning `[-size, size]²`
    ///
    /// Each interior quad emits `topLeft, bottomLeft, topRight` then
    /// `topRight, bottomLeft, bottomRight`.
    pub fn build(size: f32, resolution: usize) -> Self {
        let n = resolution;
        let quads = n.saturating_sub(1) * n.saturating_sub(1);
        let step = if n > 1 { 1.0 / (n - 1) as f32 } else { 0.0 };

        let mut positions = Vec::with_capacity(n * n);
        let mut uvs = Vec::with_capacity(n * n);
        let mut indices = Vec::with_capacity(quads * 6);

        for i in 0..n {
            let u = i as f32 * step;
            let x = u * size * 2.0 - size;
            for j in 0..n {
                let v = j as f32 * step;
                let z = v * size * 2.0 - size;
                positions.push([x, 0.0, z]);
                uvs.push([u, v]);

                if i + 1 < n && j + 1 < n {
                    let top_left = (i * n + j) as u32;
                    let top_right = top_left + 1;
                    let bottom_left = ((i + 1) * n + j) as u32;
                    let bottom_right = bottom_left + 1;

                    indices.extend_from_slice(&[top_left, bottom_left, top_right]);
                    indices.extend_from_slice(&[top_right, bottom_left, bottom_right]);
                }
            }
        }

        Self {
            size,
            resolution,
            positions,
            uvs,
            indices,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Flatten into a duplicated-vertex triangle list in index order, for
    /// render paths without an index buffer
    pub fn unrolled(&self) -> Vec<MeshVertex> {
        self.indices
            .iter()
            .map(|&index| {
                let index = index as usize;
                MeshVertex {
                    position: self.positions[index],
                    uv: self.uvs[index],
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        for r in [2usize, 3, 10, 64] {
            let mesh = GridMesh::build(50.0, r);
            assert_eq!(mesh.vertex_count(), r * r);
            assert_eq!(mesh.uvs.len(), r * r);
            assert_eq!(mesh.triangle_count(), (r - 1) * (r - 1) * 2);
            assert_eq!(mesh.unrolled().len(), mesh.triangle_count() * 3);
        }
    }

    #[test]
    fn test_positions_span_terrain() {
        let mesh = GridMesh::build(10.0, 5);
        assert_eq!(mesh.positions[0], [-10.0, 0.0, -10.0]);
        assert_eq!(mesh.positions[4], [-10.0, 0.0, 10.0]);
        assert_eq!(mesh.positions[24], [10.0, 0.0, 10.0]);
        assert_eq!(mesh.positions[12], [0.0, 0.0, 0.0]);
        assert_eq!(mesh.uvs[0], [0.0, 0.0]);
        assert_eq!(mesh.uvs[24], [1.0, 1.0]);
        assert!(mesh.positions.iter().all(|p| p[1] == 0.0));
    }

    #[test]
    fn test_first_quad_winding() {
        let mesh = GridMesh::build(1.0, 3);
        // topLeft 0, topRight 1, bottomLeft 3, bottomRight 4
        assert_eq!(&mesh.indices[0..6], &[0, 3, 1, 1, 3, 4]);
    }

    #[test]
    fn test_consistent_winding() {
        let mesh = GridMesh::build(8.0, 6);
        for tri in mesh.indices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| mesh.positions[i as usize]);
            // y component of (b - a) x (c - a)
            let cross_y = (b[2] - a[2]) * (c[0] - a[0]) - (b[0] - a[0]) * (c[2] - a[2]);
            assert!(cross_y < 0.0);
        }
    }

    #[test]
    fn test_unrolled_follows_indices() {
        let mesh = GridMesh::build(4.0, 4);
        let unrolled = mesh.unrolled();
        for (vertex, &index) in unrolled.iter().zip(&mesh.indices) {
            assert_eq!(vertex.position, mesh.positions[index as usize]);
            assert_eq!(vertex.uv, mesh.uvs[index as usize]);
        }
        let bytes: &[u8] = bytemuck::cast_slice(&unrolled);
        assert_eq!(bytes.len(), unrolled.len() * 20);
    }

    #[test]
    fn test_degenerate_resolution() {
        let mesh = GridMesh::build(4.0, 1);
        assert_eq!(mesh.vertex_count(), 1);
        assert_eq!(mesh.triangle_count(), 0);
    }
}
