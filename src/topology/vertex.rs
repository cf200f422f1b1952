use crate::math::{Point3, Vector3};

slotmap::new_key_type! {
    /// Unique identifier for a vertex in the mesh.
    pub struct VertexId;
}

/// Data associated with a mesh vertex.
#[derive(Debug, Clone)]
pub struct VertexData {
    /// The 3D position of the vertex.
    pub point: Point3,
    /// The unit surface normal at the vertex.
    pub normal: Vector3,
}

impl VertexData {
    /// Creates a new vertex at the given point and normal.
    #[must_use]
    pub fn new(point: Point3, normal: Vector3) -> Self {
        Self { point, normal }
    }
}
