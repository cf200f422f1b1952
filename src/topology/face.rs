use super::edge::EdgeId;
use super::vertex::VertexId;

slotmap::new_key_type! {
    /// Unique identifier for a face in the mesh.
    pub struct FaceId;
}

/// Data associated with a mesh face.
///
/// `edges[i]` joins `vertices[i]` and `vertices[(i + 1) % n]`.
#[derive(Debug, Clone)]
pub struct FaceData {
    /// The ordered vertex cycle (at least three vertices).
    pub vertices: Vec<VertexId>,
    /// The side edges, in cycle order.
    pub edges: Vec<EdgeId>,
}

impl FaceData {
    /// Returns the number of sides.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns `true` if the face has no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Iterates over the sides as `(start, end, edge)` triples.
    pub fn sides(&self) -> impl Iterator<Item = (VertexId, VertexId, EdgeId)> + '_ {
        let n = self.vertices.len();
        self.edges
            .iter()
            .enumerate()
            .map(move |(i, &e)| (self.vertices[i], self.vertices[(i + 1) % n], e))
    }
}
