use slotmap::SecondaryMap;
use tracing::debug;

use crate::error::{FieldError, Result, TopologyError};
use crate::math::{Point3, Vector3};
use crate::topology::{EdgeId, FaceId, Mesh, VertexId};

use super::FieldNames;

/// An edge of the snapshot: endpoint indices (`a < b`) and the edge id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexedEdge {
    pub a: usize,
    pub b: usize,
    pub id: EdgeId,
}

/// A face of the snapshot with its side edges in cycle order.
#[derive(Debug, Clone)]
pub struct FaceRecord {
    pub id: FaceId,
    pub edges: Vec<EdgeId>,
}

/// Flattened, read-only view of a mesh and its weight fields.
///
/// All per-vertex arrays are index-parallel with `vertex_ids`.
#[derive(Debug, Clone, Default)]
pub struct MeshFields {
    pub vertex_ids: Vec<VertexId>,
    pub positions: Vec<Point3>,
    pub normals: Vec<Vector3>,
    pub edges: Vec<IndexedEdge>,
    pub faces: Vec<FaceRecord>,
    pub contour: Vec<f64>,
    pub pattern: Vec<f64>,
    pub bevel: Vec<f64>,
    /// `true` when `bevel` comes from a weight group rather than the default.
    pub variable_bevel: bool,
}

impl MeshFields {
    /// Number of vertices in the snapshot.
    #[must_use]
    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    /// Checks that every per-vertex array matches `positions` and that every
    /// edge endpoint is in range.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::LengthMismatch`] for a short or long array and
    /// [`TopologyError::EntityNotFound`] for an out-of-range edge endpoint.
    pub fn check(&self) -> Result<()> {
        let expected = self.num_vertices();
        for actual in [
            self.vertex_ids.len(),
            self.normals.len(),
            self.contour.len(),
            self.pattern.len(),
            self.bevel.len(),
        ] {
            if actual != expected {
                return Err(FieldError::LengthMismatch { expected, actual }.into());
            }
        }
        if self.edges.iter().any(|e| e.a >= expected || e.b >= expected) {
            return Err(TopologyError::EntityNotFound("edge endpoint".into()).into());
        }
        Ok(())
    }
}

/// Reads positions, normals, edges, faces and weight arrays out of a mesh.
pub struct ReadFields<'a> {
    names: &'a FieldNames,
}

impl<'a> ReadFields<'a> {
    /// Creates a new `ReadFields` operation.
    #[must_use]
    pub fn new(names: &'a FieldNames) -> Self {
        Self { names }
    }

    /// Executes the read.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::MissingContourField`] if the contour group does
    /// not exist, or a topology error if an edge references a missing vertex.
    pub fn execute(&self, mesh: &Mesh) -> Result<MeshFields> {
        let contour_field = mesh.weight_group(&self.names.contour).ok_or_else(|| {
            FieldError::MissingContourField {
                name: self.names.contour.clone(),
            }
        })?;

        let n = mesh.num_vertices();
        let mut vertex_ids = Vec::with_capacity(n);
        let mut positions = Vec::with_capacity(n);
        let mut normals = Vec::with_capacity(n);
        let mut index_of: SecondaryMap<VertexId, usize> = SecondaryMap::with_capacity(n);
        for (id, data) in mesh.vertices() {
            index_of.insert(id, vertex_ids.len());
            vertex_ids.push(id);
            positions.push(data.point);
            normals.push(data.normal);
        }

        let mut edges = Vec::with_capacity(mesh.num_edges());
        for (id, data) in mesh.edges() {
            let i0 = index_of
                .get(data.v0)
                .copied()
                .ok_or_else(|| TopologyError::EntityNotFound("edge endpoint".into()))?;
            let i1 = index_of
                .get(data.v1)
                .copied()
                .ok_or_else(|| TopologyError::EntityNotFound("edge endpoint".into()))?;
            edges.push(IndexedEdge {
                a: i0.min(i1),
                b: i0.max(i1),
                id,
            });
        }

        let faces = mesh
            .faces()
            .map(|(id, face)| FaceRecord {
                id,
                edges: face.edges.clone(),
            })
            .collect();

        let contour = contour_field.resolve(&vertex_ids);

        let pattern = match self.names.pattern.as_deref().and_then(|name| mesh.weight_group(name)) {
            Some(field) => field.resolve(&vertex_ids),
            None => {
                debug!(group = ?self.names.pattern, "no pattern group, displacement disabled");
                vec![0.0; n]
            }
        };

        let (bevel, variable_bevel) =
            match self.names.bevel.as_deref().and_then(|name| mesh.weight_group(name)) {
                Some(field) => (field.resolve(&vertex_ids), true),
                None => {
                    debug!(group = ?self.names.bevel, "no bevel group, using constant bevel");
                    (vec![1.0; n], false)
                }
            };

        Ok(MeshFields {
            vertex_ids,
            positions,
            normals,
            edges,
            faces,
            contour,
            pattern,
            bevel,
            variable_bevel,
        })
    }
}
