use crate::error::{OperationError, Result};
use crate::math::{Point3, Vector3, TOLERANCE};
use crate::topology::{Mesh, VertexData, VertexId};

/// Builds a mesh from indexed positions and polygons.
///
/// Vertex normals are taken from [`MakeMesh::with_normals`] when given;
/// otherwise each vertex gets the normalised sum of the area-weighted normals
/// of the polygons around it.
pub struct MakeMesh {
    points: Vec<Point3>,
    polygons: Vec<Vec<usize>>,
    normals: Option<Vec<Vector3>>,
}

impl MakeMesh {
    /// Creates a new `MakeMesh` operation.
    #[must_use]
    pub fn new(points: Vec<Point3>, polygons: Vec<Vec<usize>>) -> Self {
        Self {
            points,
            polygons,
            normals: None,
        }
    }

    /// Uses explicit per-vertex normals, index-parallel with the points.
    #[must_use]
    pub fn with_normals(mut self, normals: Vec<Vector3>) -> Self {
        self.normals = Some(normals);
        self
    }

    /// Executes the operation, returning the new vertex ids in input order.
    ///
    /// # Errors
    ///
    /// Returns an error if the normal count differs from the point count, a
    /// polygon references an out-of-range index, or a polygon is degenerate.
    pub fn execute(&self, mesh: &mut Mesh) -> Result<Vec<VertexId>> {
        for (i, polygon) in self.polygons.iter().enumerate() {
            if let Some(&bad) = polygon.iter().find(|&&v| v >= self.points.len()) {
                return Err(OperationError::InvalidInput(format!(
                    "polygon {i} references vertex {bad}, only {} points",
                    self.points.len()
                ))
                .into());
            }
        }

        let normals = match &self.normals {
            Some(normals) if normals.len() != self.points.len() => {
                return Err(OperationError::InvalidInput(format!(
                    "{} normals for {} points",
                    normals.len(),
                    self.points.len()
                ))
                .into());
            }
            Some(normals) => normals.clone(),
            None => vertex_normals(&self.points, &self.polygons),
        };

        let ids: Vec<VertexId> = self
            .points
            .iter()
            .zip(normals)
            .map(|(&p, n)| mesh.add_vertex(VertexData::new(p, n)))
            .collect();

        for polygon in &self.polygons {
            let cycle = polygon.iter().map(|&i| ids[i]).collect();
            mesh.add_face(cycle)?;
        }

        Ok(ids)
    }
}

/// Newell normal of a polygon; its length is twice the polygon area.
fn newell_normal(points: &[Point3], polygon: &[usize]) -> Vector3 {
    let n = polygon.len();
    let mut normal = Vector3::zeros();
    for i in 0..n {
        let cur = &points[polygon[i]];
        let next = &points[polygon[(i + 1) % n]];
        normal.x += (cur.y - next.y) * (cur.z + next.z);
        normal.y += (cur.z - next.z) * (cur.x + next.x);
        normal.z += (cur.x - next.x) * (cur.y + next.y);
    }
    normal
}

fn vertex_normals(points: &[Point3], polygons: &[Vec<usize>]) -> Vec<Vector3> {
    let mut sums = vec![Vector3::zeros(); points.len()];
    for polygon in polygons {
        let normal = newell_normal(points, polygon);
        for &v in polygon {
            sums[v] += normal;
        }
    }
    sums.into_iter()
        .map(|n| n.try_normalize(TOLERANCE).unwrap_or_else(Vector3::z))
        .collect()
}
