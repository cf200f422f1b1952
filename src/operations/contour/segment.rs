use crate::field::MeshFields;
use crate::math::Point3;

use super::crossing::CrossingSet;

/// A 2-point piece of contour joining two new vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Segment {
    pub start: usize,
    pub end: usize,
}

impl Segment {
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns the endpoint opposite to `v`, or `None` if `v` is not an endpoint.
    #[must_use]
    pub fn other(&self, v: usize) -> Option<usize> {
        if self.start == v {
            Some(self.end)
        } else if self.end == v {
            Some(self.start)
        } else {
            None
        }
    }
}

/// Links the crossings of each face into segments.
///
/// A face's edges are visited in cycle order and the first two crossed edges
/// form its segment; further crossings in the same face are ignored. Faces
/// with fewer than two crossings contribute nothing.
pub struct BuildSegments<'a> {
    crossings: &'a CrossingSet,
    offset: usize,
}

impl<'a> BuildSegments<'a> {
    /// Creates a new `BuildSegments` operation.
    #[must_use]
    pub fn new(crossings: &'a CrossingSet) -> Self {
        Self {
            crossings,
            offset: 0,
        }
    }

    /// Adds `offset` to every emitted vertex index.
    #[must_use]
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Executes the operation, returning at most one segment per face.
    #[must_use]
    pub fn execute(&self, fields: &MeshFields) -> Vec<Segment> {
        let mut segments = Vec::new();
        for face in &fields.faces {
            let mut found = face
                .edges
                .iter()
                .filter_map(|&e| self.crossings.index_of(e));
            if let (Some(first), Some(second)) = (found.next(), found.next()) {
                segments.push(Segment::new(first + self.offset, second + self.offset));
            }
        }
        segments
    }
}

/// Crossing points and segments accumulated over several contour levels.
///
/// Each level's vertex indices are offset by the number of vertices already
/// stored, so segments always index into [`ContourLayers::positions`].
#[derive(Debug, Clone, Default)]
pub struct ContourLayers {
    pub positions: Vec<Point3>,
    /// One value per position when a bevel group was read.
    pub bevel: Option<Vec<f64>>,
    pub segments: Vec<Segment>,
    pub levels: usize,
}

impl ContourLayers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one level, returning the number of segments it added.
    pub fn append(&mut self, crossings: &CrossingSet, fields: &MeshFields) -> usize {
        let offset = self.positions.len();
        let segments = BuildSegments::new(crossings)
            .with_offset(offset)
            .execute(fields);
        let added = segments.len();

        if let Some(values) = crossings.bevel() {
            self.bevel
                .get_or_insert_with(|| vec![1.0; offset])
                .extend(values);
        } else if let Some(bevel) = self.bevel.as_mut() {
            bevel.resize(offset + crossings.len(), 1.0);
        }
        self.positions.extend(crossings.positions());
        self.segments.extend(segments);
        self.levels += 1;
        added
    }

    /// Returns `true` if no segment was collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::field::{FieldNames, ReadFields, WeightField};
    use crate::operations::contour::ExtractCrossings;
    use crate::operations::creation::MakeMesh;
    use crate::topology::Mesh;

    fn p(x: f64, y: f64) -> Point3 {
        Point3::new(x, y, 0.0)
    }

    fn fields(points: Vec<Point3>, polygons: Vec<Vec<usize>>, weights: &[f64]) -> MeshFields {
        let mut mesh = Mesh::new();
        let ids = MakeMesh::new(points, polygons).execute(&mut mesh).unwrap();
        mesh.add_weight_group("contour", WeightField::from_values(&ids, weights).unwrap());
        ReadFields::new(&FieldNames::default()).execute(&mesh).unwrap()
    }

    fn crossings(fields: &MeshFields, iso: f64) -> CrossingSet {
        ExtractCrossings::new(iso, 0)
            .execute(fields)
            .unwrap()
            .crossed()
            .unwrap()
    }

    #[test]
    fn segment_other_endpoint() {
        let s = Segment::new(3, 7);
        assert_eq!(s.other(3), Some(7));
        assert_eq!(s.other(7), Some(3));
        assert_eq!(s.other(5), None);
    }

    #[test]
    fn quad_with_two_crossings_gives_one_segment() {
        let f = fields(
            vec![p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0)],
            vec![vec![0, 1, 2, 3]],
            &[0.0, 0.0, 1.0, 1.0],
        );
        let set = crossings(&f, 0.5);
        assert_eq!(set.len(), 2);
        let segments = BuildSegments::new(&set).execute(&f);
        assert_eq!(segments.len(), 1);
        let s = segments[0];
        assert_ne!(s.start, s.end);
    }

    #[test]
    fn saddle_quad_keeps_first_pair_only() {
        let f = fields(
            vec![p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0)],
            vec![vec![0, 1, 2, 3]],
            &[0.0, 1.0, 0.0, 1.0],
        );
        let set = crossings(&f, 0.5);
        assert_eq!(set.len(), 4);
        let segments = BuildSegments::new(&set).execute(&f);
        assert_eq!(segments.len(), 1);
    }

    #[test]
    fn uncrossed_faces_emit_nothing() {
        let f = fields(
            vec![p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(2.0, 0.0), p(2.0, 1.0)],
            vec![vec![0, 1, 2], vec![1, 3, 4]],
            &[0.0, 1.0, 1.0, 1.0, 1.0],
        );
        let set = crossings(&f, 0.5);
        let segments = BuildSegments::new(&set).execute(&f);
        assert_eq!(segments.len(), 1);
        assert!(segments.len() <= f.faces.len());
    }

    #[test]
    fn layers_offset_later_levels() {
        let f = fields(
            vec![p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0)],
            vec![vec![0, 1, 2, 3]],
            &[0.0, 0.0, 1.0, 1.0],
        );
        let mut layers = ContourLayers::new();
        assert_eq!(layers.append(&crossings(&f, 0.25), &f), 1);
        assert_eq!(layers.append(&crossings(&f, 0.75), &f), 1);

        assert_eq!(layers.levels, 2);
        assert_eq!(layers.positions.len(), 4);
        let second = layers.segments[1];
        assert!(second.start >= 2 && second.end >= 2);
        assert!(layers.bevel.is_none());
        assert!((layers.positions[2].y - 0.75).abs() < 1e-12);
    }
}
