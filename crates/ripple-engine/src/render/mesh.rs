/// Index list of a square grid plane with one vertex per height texel.
///
/// Vertices are not stored: the vertex shader derives the grid position from
/// `vertex_index` (`x = i % side`, `y = i / side`). Two CCW triangles per quad
/// as seen from +Y.
#[derive(Debug, Clone)]
pub struct PlaneMesh {
    side: u32,
    indices: Vec<u32>,
}

impl PlaneMesh {
    pub fn new(side: u32) -> Self {
        let quads = side.saturating_sub(1);
        let mut indices = Vec::with_capacity(quads as usize * quads as usize * 6);

        for y in 0..quads {
            for x in 0..quads {
                let i0 = y * side + x;
                let i1 = i0 + 1;
                let i2 = i0 + side;
                let i3 = i2 + 1;
                // Grid +y is world -z; this winding faces +Y.
                indices.extend_from_slice(&[i0, i1, i3, i0, i3, i2]);
            }
        }

        Self { side, indices }
    }

    pub fn side(&self) -> u32 {
        self.side
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    pub fn vertex_count(&self) -> u32 {
        self.side * self.side
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_triangles_per_quad() {
        let m = PlaneMesh::new(4);
        assert_eq!(m.index_count(), 3 * 3 * 6);
        assert_eq!(m.vertex_count(), 16);
        assert!(m.indices().iter().all(|&i| i < 16));
    }

    #[test]
    fn first_quad_winding() {
        let m = PlaneMesh::new(3);
        assert_eq!(&m.indices()[..6], &[0, 1, 4, 0, 4, 3]);
    }

    #[test]
    fn degenerate_side_has_no_triangles() {
        assert_eq!(PlaneMesh::new(1).index_count(), 0);
    }
}
