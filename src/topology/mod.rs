pub mod edge;
pub mod face;
pub mod vertex;

pub use edge::{EdgeData, EdgeId, EdgeKey};
pub use face::{FaceData, FaceId};
pub use vertex::{VertexData, VertexId};

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::error::TopologyError;
use crate::field::WeightField;
use slotmap::SlotMap;

/// Central arena that owns all mesh entities.
///
/// Entities reference each other via typed IDs (generational indices), so
/// an id stays valid while other elements are inserted or removed. Edges are
/// unique per unordered vertex pair and indexed by [`EdgeKey`].
#[derive(Debug, Default, Clone)]
pub struct Mesh {
    vertices: SlotMap<VertexId, VertexData>,
    edges: SlotMap<EdgeId, EdgeData>,
    faces: SlotMap<FaceId, FaceData>,
    edge_index: HashMap<EdgeKey, EdgeId>,
    weight_groups: BTreeMap<String, WeightField>,
}

impl Mesh {
    /// Creates a new, empty mesh.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Vertex operations ---

    /// Inserts a vertex and returns its ID.
    pub fn add_vertex(&mut self, data: VertexData) -> VertexId {
        self.vertices.insert(data)
    }

    /// Returns a reference to the vertex data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the mesh.
    pub fn vertex(&self, id: VertexId) -> Result<&VertexData, TopologyError> {
        self.vertices
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("vertex".into()))
    }

    /// Returns a mutable reference to the vertex data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the mesh.
    pub fn vertex_mut(&mut self, id: VertexId) -> Result<&mut VertexData, TopologyError> {
        self.vertices
            .get_mut(id)
            .ok_or_else(|| TopologyError::EntityNotFound("vertex".into()))
    }

    /// Iterates over all vertices in storage order.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &VertexData)> {
        self.vertices.iter()
    }

    /// Returns the number of vertices.
    #[must_use]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    // --- Edge operations ---

    /// Returns the edge joining `a` and `b`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if either vertex is missing or `a == b`.
    pub fn add_edge(&mut self, a: VertexId, b: VertexId) -> Result<EdgeId, TopologyError> {
        if a == b {
            return Err(TopologyError::InvalidTopology(
                "edge endpoints must be distinct".into(),
            ));
        }
        self.vertex(a)?;
        self.vertex(b)?;

        let key = EdgeKey::new(a, b);
        if let Some(&id) = self.edge_index.get(&key) {
            return Ok(id);
        }
        let id = self.edges.insert(EdgeData::new(a, b));
        self.edge_index.insert(key, id);
        Ok(id)
    }

    /// Returns a reference to the edge data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the mesh.
    pub fn edge(&self, id: EdgeId) -> Result<&EdgeData, TopologyError> {
        self.edges
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("edge".into()))
    }

    /// Looks up the edge joining `a` and `b`, in either direction.
    #[must_use]
    pub fn edge_between(&self, a: VertexId, b: VertexId) -> Option<EdgeId> {
        self.edge_index.get(&EdgeKey::new(a, b)).copied()
    }

    /// Removes an edge and returns its data.
    ///
    /// Faces still referencing the edge are not touched; remove them first.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the mesh.
    pub fn remove_edge(&mut self, id: EdgeId) -> Result<EdgeData, TopologyError> {
        let data = self
            .edges
            .remove(id)
            .ok_or_else(|| TopologyError::EntityNotFound("edge".into()))?;
        self.edge_index.remove(&data.key());
        Ok(data)
    }

    /// Iterates over all edges in storage order.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &EdgeData)> {
        self.edges.iter()
    }

    /// Returns the number of edges.
    #[must_use]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    // --- Face operations ---

    /// Inserts a face over the given vertex cycle, creating missing side edges.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::DegenerateFace`] if the cycle has fewer than
    /// three vertices or repeats a vertex, and [`TopologyError::EntityNotFound`]
    /// if a vertex is missing.
    pub fn add_face(&mut self, vertices: Vec<VertexId>) -> Result<FaceId, TopologyError> {
        if vertices.len() < 3 {
            return Err(TopologyError::DegenerateFace(format!(
                "{} vertices, need at least 3",
                vertices.len()
            )));
        }
        let mut seen = HashSet::with_capacity(vertices.len());
        for &v in &vertices {
            self.vertex(v)?;
            if !seen.insert(v) {
                return Err(TopologyError::DegenerateFace("repeated vertex".into()));
            }
        }

        let n = vertices.len();
        let mut edges = Vec::with_capacity(n);
        for i in 0..n {
            edges.push(self.add_edge(vertices[i], vertices[(i + 1) % n])?);
        }
        Ok(self.faces.insert(FaceData { vertices, edges }))
    }

    /// Returns a reference to the face data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the mesh.
    pub fn face(&self, id: FaceId) -> Result<&FaceData, TopologyError> {
        self.faces
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("face".into()))
    }

    /// Removes a face and returns its data. Its edges are kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the mesh.
    pub fn remove_face(&mut self, id: FaceId) -> Result<FaceData, TopologyError> {
        self.faces
            .remove(id)
            .ok_or_else(|| TopologyError::EntityNotFound("face".into()))
    }

    /// Iterates over all faces in storage order.
    pub fn faces(&self) -> impl Iterator<Item = (FaceId, &FaceData)> {
        self.faces.iter()
    }

    /// Returns the number of faces.
    #[must_use]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    // --- Weight groups ---

    /// Stores a named weight group, replacing any previous group of that name.
    pub fn add_weight_group(&mut self, name: impl Into<String>, field: WeightField) {
        self.weight_groups.insert(name.into(), field);
    }

    /// Returns the named weight group, if present.
    #[must_use]
    pub fn weight_group(&self, name: &str) -> Option<&WeightField> {
        self.weight_groups.get(name)
    }

    /// Returns the named weight group mutably, if present.
    pub fn weight_group_mut(&mut self, name: &str) -> Option<&mut WeightField> {
        self.weight_groups.get_mut(name)
    }

    /// Iterates over weight group names in sorted order.
    pub fn weight_group_names(&self) -> impl Iterator<Item = &str> {
        self.weight_groups.keys().map(String::as_str)
    }

    pub(crate) fn edge_index(&self) -> &HashMap<EdgeKey, EdgeId> {
        &self.edge_index
    }
}
