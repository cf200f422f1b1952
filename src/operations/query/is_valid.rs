use tracing::debug;

use crate::topology::{EdgeKey, Mesh};

/// Validates the topological consistency of a mesh.
///
/// Checks that every face side refers to an existing edge joining the same
/// two vertices, that every edge refers to existing vertices, and that the
/// edge index matches the stored edges.
#[derive(Debug, Default)]
pub struct IsValid;

impl IsValid {
    /// Creates a new `IsValid` query.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Executes the validation, returning `true` if the mesh is valid.
    #[must_use]
    pub fn execute(&self, mesh: &Mesh) -> bool {
        for (id, edge) in mesh.edges() {
            if mesh.vertex(edge.v0).is_err() || mesh.vertex(edge.v1).is_err() {
                debug!(?id, "edge references a missing vertex");
                return false;
            }
            if mesh.edge_between(edge.v0, edge.v1) != Some(id) {
                debug!(?id, "edge is missing from the edge index");
                return false;
            }
        }
        if mesh.edge_index().len() != mesh.num_edges() {
            debug!("edge index has stale entries");
            return false;
        }

        for (id, face) in mesh.faces() {
            if face.len() < 3 || face.edges.len() != face.len() {
                debug!(?id, "face has a malformed cycle");
                return false;
            }
            for (start, end, e) in face.sides() {
                match mesh.edge(e) {
                    Ok(edge) if edge.key() == EdgeKey::new(start, end) => {}
                    _ => {
                        debug!(?id, "face side does not match its edge");
                        return false;
                    }
                }
            }
        }
        true
    }
}
