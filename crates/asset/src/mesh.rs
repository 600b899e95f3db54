//! CPU-side mesh representation used by loaders.

/// Vertex with position/normal/uv. Values are in object space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl MeshVertex {
    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }
}

/// Indexed triangle mesh with tightly-packed vertices.
///
/// The loader never welds vertices: every face corner gets a fresh record,
/// so `indices` is simply `0..vertices.len()` in emission order. The index
/// buffer is kept anyway because the draw path is indexed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new(vertices: Vec<MeshVertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Non-empty, whole triangles only, and every index in bounds.
    pub fn is_valid(&self) -> bool {
        !self.vertices.is_empty()
            && !self.indices.is_empty()
            && self.indices.len() % 3 == 0
            && self
                .indices
                .iter()
                .all(|&i| (i as usize) < self.vertices.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mesh_data_validity() {
        let verts = vec![MeshVertex::default(); 3];
        let data = MeshData::new(verts, vec![0, 1, 2]);
        assert!(data.is_valid());
        assert_eq!(data.triangle_count(), 1);
    }

    #[test]
    fn partial_triangle_is_invalid() {
        let verts = vec![MeshVertex::default(); 2];
        let data = MeshData::new(verts, vec![0, 1]);
        assert!(!data.is_valid());
    }

    #[test]
    fn out_of_bounds_index_is_invalid() {
        let verts = vec![MeshVertex::default(); 3];
        let data = MeshData::new(verts, vec![0, 1, 3]);
        assert!(!data.is_valid());
    }
}
