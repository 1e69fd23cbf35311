//! Triangle-mesh data model.
//!
//! A [`Mesh`] is a decoded triangle soup: flat vertex/normal/index buffers in
//! a layout a GPU rendering surface can consume directly. STL emits one fresh
//! vertex per triangle corner, never sharing or deduplicating vertices, so
//! normals are flat per-triangle-vertex and `indices` counts `0..3n` in
//! construction order. The index array is retained anyway for interface
//! uniformity with indexed renderers.

// =============================================================================
// Mesh
// =============================================================================

/// Decoded triangle surface.
///
/// Invariants, enforced by the STL decoder:
/// - `vertices.len() == normals.len()`, both divisible by 3 and grouped as
///   (x, y, z) triples
/// - `triangle_count == indices.len() / 3 == vertices.len() / 9`
/// - every coordinate is finite
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    /// Vertex positions, flat (x, y, z) triples.
    pub vertices: Vec<f32>,
    /// Per-vertex normals, same layout and length as `vertices`.
    pub normals: Vec<f32>,
    /// Triangle corner indices, flat triples in construction order.
    pub indices: Vec<u32>,
    /// Number of triangles.
    pub triangle_count: usize,
}

impl Mesh {
    /// Axis-aligned bounding box over all vertices.
    ///
    /// Returns `None` for an empty vertex list.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        if self.vertices.len() < 3 {
            return None;
        }

        let mut min = [self.vertices[0], self.vertices[1], self.vertices[2]];
        let mut max = min;

        for triple in self.vertices.chunks_exact(3) {
            for axis in 0..3 {
                if triple[axis] < min[axis] {
                    min[axis] = triple[axis];
                }
                if triple[axis] > max[axis] {
                    max[axis] = triple[axis];
                }
            }
        }

        Some(BoundingBox { min, max })
    }
}

// =============================================================================
// BoundingBox
// =============================================================================

/// Axis-aligned bounding box of a mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl BoundingBox {
    /// Geometric center of the box.
    pub fn center(&self) -> [f32; 3] {
        [
            (self.min[0] + self.max[0]) / 2.0,
            (self.min[1] + self.max[1]) / 2.0,
            (self.min[2] + self.max[2]) / 2.0,
        ]
    }

    /// Extent along each axis.
    pub fn size(&self) -> [f32; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }
}

// =============================================================================
// Tests
// =============================================================================
