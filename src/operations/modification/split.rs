use std::collections::HashMap;

use tracing::{info, warn};

use crate::error::{FieldError, Result, TopologyError};
use crate::field::{FieldNames, ReadFields};
use crate::math::TOLERANCE;
use crate::operations::contour::{ExtractCrossings, IsoLevels};
use crate::topology::{EdgeId, FaceData, FaceId, Mesh, VertexData, VertexId};

/// A rebuilt polygon the mesh rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct MissedFace {
    /// The face it was cut from (already removed from the mesh).
    pub source: FaceId,
    pub vertices: Vec<VertexId>,
    pub reason: TopologyError,
}

/// Summary of one split.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitReport {
    pub iso: f64,
    /// One vertex per crossed edge, weighted `iso` in the contour group.
    pub new_vertices: Vec<VertexId>,
    pub removed_faces: usize,
    pub added_faces: Vec<FaceId>,
    pub missed_faces: Vec<MissedFace>,
}

/// Result of [`SplitAtIso`].
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub enum SplitOutcome {
    /// No edge crosses the iso-value; the mesh is untouched.
    Unchanged,
    Split(SplitReport),
}

/// Cuts every face crossed by an iso-line of a weight group.
///
/// A vertex is inserted on each crossed edge, each crossed face is replaced
/// by the sub-polygons on either side of the iso-line, and the new vertices
/// get weight `iso`, so the mesh can be split again at another level.
pub struct SplitAtIso {
    group: String,
    iso: f64,
}

impl SplitAtIso {
    /// Creates a new `SplitAtIso` operation on the named contour group.
    #[must_use]
    pub fn new(group: impl Into<String>, iso: f64) -> Self {
        Self {
            group: group.into(),
            iso,
        }
    }

    /// Executes the split.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::MissingContourField`] if the group does not
    /// exist, or an error if the iso-value is not finite. Rejected polygons
    /// are not errors; they are listed in [`SplitReport::missed_faces`].
    pub fn execute(&self, mesh: &mut Mesh) -> Result<SplitOutcome> {
        let names = FieldNames::contour(self.group.clone());
        let fields = ReadFields::new(&names).execute(mesh)?;
        let Some(crossings) = ExtractCrossings::new(self.iso, 0)
            .execute(&fields)?
            .crossed()
        else {
            info!(iso = self.iso, group = %self.group, "no crossings, mesh unchanged");
            return Ok(SplitOutcome::Unchanged);
        };

        let mut on_edge: HashMap<EdgeId, VertexId> = HashMap::with_capacity(crossings.len());
        let mut new_vertices = Vec::with_capacity(crossings.len());
        for c in crossings.crossings() {
            let normal = c
                .normal
                .try_normalize(TOLERANCE)
                .unwrap_or(fields.normals[c.a]);
            let id = mesh.add_vertex(VertexData::new(c.position, normal));
            on_edge.insert(c.edge, id);
            new_vertices.push(id);
        }

        let crossed_faces: Vec<FaceId> = fields
            .faces
            .iter()
            .filter(|f| f.edges.iter().any(|e| on_edge.contains_key(e)))
            .map(|f| f.id)
            .collect();

        let mut rebuilt = Vec::new();
        for &source in &crossed_faces {
            let face = mesh.remove_face(source)?;
            rebuilt.extend(
                split_face(&face, &on_edge)
                    .into_iter()
                    .map(|polygon| (source, polygon)),
            );
        }
        for edge in crossings.crossed_edges() {
            mesh.remove_edge(edge)?;
        }

        let (added_faces, missed_faces) = insert_polygons(mesh, rebuilt);

        let group = mesh
            .weight_group_mut(&self.group)
            .ok_or_else(|| FieldError::MissingContourField {
                name: self.group.clone(),
            })?;
        for &v in &new_vertices {
            group.set(v, self.iso);
        }

        info!(
            iso = self.iso,
            new_vertices = new_vertices.len(),
            removed_faces = crossed_faces.len(),
            added_faces = added_faces.len(),
            missed_faces = missed_faces.len(),
            "Split mesh at iso-value"
        );

        Ok(SplitOutcome::Split(SplitReport {
            iso: self.iso,
            new_vertices,
            removed_faces: crossed_faces.len(),
            added_faces,
            missed_faces,
        }))
    }
}

/// Splits a mesh at every level of an [`IsoLevels`], lowest first.
pub struct SplitAtLevels {
    group: String,
    levels: IsoLevels,
}

impl SplitAtLevels {
    /// Creates a new `SplitAtLevels` operation on the named contour group.
    #[must_use]
    pub fn new(group: impl Into<String>, levels: IsoLevels) -> Self {
        Self {
            group: group.into(),
            levels,
        }
    }

    /// Executes one [`SplitAtIso`] per level.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a level.
    pub fn execute(&self, mesh: &mut Mesh) -> Result<Vec<SplitOutcome>> {
        self.levels
            .values()
            .into_iter()
            .map(|iso| SplitAtIso::new(self.group.clone(), iso).execute(mesh))
            .collect()
    }
}

/// Rebuilds one crossed face into the polygons on either side of the cut.
///
/// Walks the vertex cycle with two output slots. Each crossed side inserts
/// its new vertex into the active slot, closes that slot if the other one is
/// already open, and continues in the other slot starting from the same new
/// vertex.
fn split_face(face: &FaceData, on_edge: &HashMap<EdgeId, VertexId>) -> Vec<Vec<VertexId>> {
    let mut polygons = Vec::new();
    let mut slots: [Vec<VertexId>; 2] = [Vec::new(), Vec::new()];
    let mut active = 0usize;

    for (start, _, edge) in face.sides() {
        slots[active].push(start);
        if let Some(&cut) = on_edge.get(&edge) {
            slots[active].push(cut);
            if !slots[1 - active].is_empty() {
                polygons.push(std::mem::take(&mut slots[active]));
            }
            active = 1 - active;
            slots[active].push(cut);
        }
    }

    let [first, second] = slots;
    let (open, other) = if active == 0 {
        (first, second)
    } else {
        (second, first)
    };
    if !other.is_empty() {
        polygons.push(other);
    }
    if !open.is_empty() {
        polygons.push(open);
    }
    polygons
}

fn insert_polygons(
    mesh: &mut Mesh,
    polygons: Vec<(FaceId, Vec<VertexId>)>,
) -> (Vec<FaceId>, Vec<MissedFace>) {
    let mut added = Vec::with_capacity(polygons.len());
    let mut missed = Vec::new();
    for (source, vertices) in polygons {
        match mesh.add_face(vertices.clone()) {
            Ok(id) => added.push(id),
            Err(reason) => {
                warn!(?source, %reason, "dropped rebuilt polygon");
                missed.push(MissedFace {
                    source,
                    vertices,
                    reason,
                });
            }
        }
    }
    (added, missed)
}
