use super::vertex::VertexId;

slotmap::new_key_type! {
    /// Unique identifier for an edge in the mesh.
    ///
    /// Stable for the lifetime of the edge and independent of its position
    /// in any flattened array.
    pub struct EdgeId;
}

/// Data associated with a mesh edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeData {
    /// First endpoint.
    pub v0: VertexId,
    /// Second endpoint.
    pub v1: VertexId,
}

impl EdgeData {
    /// Creates a new edge between two vertices.
    #[must_use]
    pub fn new(v0: VertexId, v1: VertexId) -> Self {
        Self { v0, v1 }
    }

    /// Returns the canonical key of this edge.
    #[must_use]
    pub fn key(&self) -> EdgeKey {
        EdgeKey::new(self.v0, self.v1)
    }

    /// Returns `true` if `v` is one of the endpoints.
    #[must_use]
    pub fn has_vertex(&self, v: VertexId) -> bool {
        self.v0 == v || self.v1 == v
    }
}

/// Unordered vertex pair used to look edges up by their endpoints.
///
/// The two ids are stored sorted, so `EdgeKey::new(a, b) == EdgeKey::new(b, a)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey(VertexId, VertexId);

impl EdgeKey {
    /// Creates the canonical key for the pair `(a, b)`.
    #[must_use]
    pub fn new(a: VertexId, b: VertexId) -> Self {
        if a <= b {
            Self(a, b)
        } else {
            Self(b, a)
        }
    }

    /// Returns the endpoints in canonical order.
    #[must_use]
    pub fn vertices(&self) -> (VertexId, VertexId) {
        (self.0, self.1)
    }
}
