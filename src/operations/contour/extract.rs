use tracing::{debug, info};

use crate::error::{OperationError, Result};
use crate::field::{FieldNames, ReadFields};
use crate::geometry::ContourCurve;
use crate::math::Axis;
use crate::topology::Mesh;

use super::crossing::{DisplaceParams, Extraction, ExtractCrossings};
use super::curve::{find_curves, select_widest};
use super::levels::IsoLevels;
use super::segment::ContourLayers;

/// Parameters controlling contour extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct ContourParams {
    /// Weight groups for the contour, pattern and bevel roles.
    pub fields: FieldNames,
    pub levels: IsoLevels,
    pub displace: DisplaceParams,
    /// Axis along which the widest curve is selected.
    pub axis: Axis,
    /// Consecutive points closer than this are merged. `None` keeps all points.
    pub merge_distance: Option<f64>,
    /// Discard open curves before selection.
    pub remove_open_curves: bool,
}

impl Default for ContourParams {
    fn default() -> Self {
        Self {
            fields: FieldNames::default(),
            levels: IsoLevels::default(),
            displace: DisplaceParams::default(),
            axis: Axis::X,
            merge_distance: Some(2.0),
            remove_open_curves: false,
        }
    }
}

impl ContourParams {
    #[must_use]
    pub fn with_fields(mut self, fields: FieldNames) -> Self {
        self.fields = fields;
        self
    }

    #[must_use]
    pub fn with_levels(mut self, levels: IsoLevels) -> Self {
        self.levels = levels;
        self
    }

    #[must_use]
    pub fn with_displace(mut self, displace: DisplaceParams) -> Self {
        self.displace = displace;
        self
    }

    #[must_use]
    pub fn with_axis(mut self, axis: Axis) -> Self {
        self.axis = axis;
        self
    }

    #[must_use]
    pub fn with_merge_distance(mut self, distance: Option<f64>) -> Self {
        self.merge_distance = distance;
        self
    }

    #[must_use]
    pub fn with_remove_open_curves(mut self, remove: bool) -> Self {
        self.remove_open_curves = remove;
        self
    }
}

/// Extracts the mask border from a weighted mesh.
///
/// Reads the weight groups, extracts crossings and segments at every iso
/// level, assembles the segments into curves and returns the one spanning
/// the widest range along the selection axis.
pub struct ExtractContour {
    params: ContourParams,
}

impl ExtractContour {
    /// Creates a new `ExtractContour` operation.
    #[must_use]
    pub fn new(params: ContourParams) -> Self {
        Self { params }
    }

    /// Executes the extraction.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::MissingContourField`](crate::error::FieldError::MissingContourField)
    /// if the contour group is absent and [`OperationError::NoCurvesProduced`]
    /// if no level yields a usable curve.
    pub fn execute(&self, mesh: &Mesh) -> Result<ContourCurve> {
        let params = &self.params;
        let fields = ReadFields::new(&params.fields).execute(mesh)?;

        info!(
            vertices = fields.num_vertices(),
            faces = fields.faces.len(),
            group = %params.fields.contour,
            "Starting contour extraction"
        );

        let mut layers = ContourLayers::new();
        for (step, iso) in params.levels.values().into_iter().enumerate() {
            let extraction = ExtractCrossings::new(iso, step)
                .with_displace(params.displace)
                .execute(&fields)?;
            match extraction {
                Extraction::Empty => {
                    debug!(iso, step, "no crossings, skipping level");
                }
                Extraction::Crossed(crossings) => {
                    let added = layers.append(&crossings, &fields);
                    debug!(iso, step, segments = added, "contour level added");
                }
            }
        }

        if layers.is_empty() {
            return Err(OperationError::NoCurvesProduced.into());
        }

        let remove_open = params.remove_open_curves;
        let curves = find_curves(&layers.segments, layers.positions.len())
            .filter(|curve| !remove_open || curve.is_closed());
        let best = select_widest(curves, &layers.positions, params.axis)
            .ok_or(OperationError::NoCurvesProduced)?;

        let mut contour =
            ContourCurve::from_curve(&best, &layers.positions, layers.bevel.as_deref());
        if let Some(distance) = params.merge_distance {
            contour = contour.merged(distance);
        }

        info!(
            levels = layers.levels,
            segments = layers.segments.len(),
            points = contour.points.len(),
            closed = contour.closed,
            "Contour extraction complete"
        );
        Ok(contour)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::{ContourError, FieldError};
    use crate::field::WeightField;
    use crate::math::Point3;
    use crate::operations::creation::MakeMesh;
    use approx::assert_relative_eq;

    /// `n x n` grid of unit quads in the XY plane, split into triangles.
    #[allow(clippy::cast_precision_loss)]
    fn grid(n: usize) -> (Vec<Point3>, Vec<Vec<usize>>) {
        let mut points = Vec::new();
        for j in 0..=n {
            for i in 0..=n {
                points.push(Point3::new(i as f64, j as f64, 0.0));
            }
        }
        let mut polygons = Vec::new();
        let row = n + 1;
        for j in 0..n {
            for i in 0..n {
                let v = j * row + i;
                polygons.push(vec![v, v + 1, v + row + 1]);
                polygons.push(vec![v, v + row + 1, v + row]);
            }
        }
        (points, polygons)
    }

    /// A grid whose contour weight is 1 inside a centred disc of `radius`.
    fn disc_mesh(n: usize, radius: f64) -> Mesh {
        let (points, polygons) = grid(n);
        #[allow(clippy::cast_precision_loss)]
        let center = n as f64 / 2.0;
        let weights: Vec<f64> = points
            .iter()
            .map(|p| {
                let d = ((p.x - center).powi(2) + (p.y - center).powi(2)).sqrt();
                if d < radius {
                    1.0
                } else {
                    0.0
                }
            })
            .collect();
        let mut mesh = Mesh::new();
        let ids = MakeMesh::new(points, polygons).execute(&mut mesh).unwrap();
        mesh.add_weight_group("contour", WeightField::from_values(&ids, &weights).unwrap());
        mesh
    }

    fn params() -> ContourParams {
        ContourParams::default()
            .with_displace(DisplaceParams::none())
            .with_merge_distance(None)
    }

    #[test]
    fn disc_gives_closed_loop() {
        let mesh = disc_mesh(8, 2.5);
        let contour = ExtractContour::new(params()).execute(&mesh).unwrap();
        assert!(contour.closed);
        assert!(contour.points.len() >= 8);
        for p in &contour.points {
            let d = ((p.x - 4.0).powi(2) + (p.y - 4.0).powi(2)).sqrt();
            assert!(d > 1.0 && d < 3.5, "point {p} too far from the disc edge");
        }
    }

    #[test]
    fn missing_contour_group_fails() {
        let mesh = disc_mesh(4, 1.5);
        let params = params().with_fields(FieldNames::contour("nope"));
        let err = ExtractContour::new(params).execute(&mesh).unwrap_err();
        assert!(matches!(
            err,
            ContourError::Field(FieldError::MissingContourField { .. })
        ));
    }

    #[test]
    fn flat_weights_produce_no_curves() {
        let (points, polygons) = grid(3);
        let mut mesh = Mesh::new();
        let ids = MakeMesh::new(points, polygons).execute(&mut mesh).unwrap();
        let flat = WeightField::from_values(&ids, &vec![0.2; ids.len()]).unwrap();
        mesh.add_weight_group("contour", flat);
        let err = ExtractContour::new(params()).execute(&mesh).unwrap_err();
        assert!(matches!(
            err,
            ContourError::Operation(OperationError::NoCurvesProduced)
        ));
    }

    #[test]
    fn widest_of_two_blobs_is_selected() {
        // weight 1 on a narrow blob on the left and a wide band on the right
        let (points, polygons) = grid(10);
        let weights: Vec<f64> = points
            .iter()
            .map(|p| {
                let narrow = (1.0..=2.0).contains(&p.x) && (4.0..=5.0).contains(&p.y);
                let wide = (4.0..=9.0).contains(&p.x) && (4.0..=5.0).contains(&p.y);
                if narrow || wide {
                    1.0
                } else {
                    0.0
                }
            })
            .collect();
        let mut mesh = Mesh::new();
        let ids = MakeMesh::new(points, polygons).execute(&mut mesh).unwrap();
        mesh.add_weight_group("contour", WeightField::from_values(&ids, &weights).unwrap());

        let contour = ExtractContour::new(params()).execute(&mesh).unwrap();
        let min_x = contour.points.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
        assert!(min_x > 3.0, "selected the narrow blob (min x = {min_x})");
    }

    #[test]
    fn open_curves_can_be_removed() {
        // weight rises along x: a single open iso-line crossing the grid
        let (points, polygons) = grid(4);
        let weights: Vec<f64> = points.iter().map(|p| p.x / 4.0).collect();
        let mut mesh = Mesh::new();
        let ids = MakeMesh::new(points, polygons).execute(&mut mesh).unwrap();
        mesh.add_weight_group("contour", WeightField::from_values(&ids, &weights).unwrap());

        let contour = ExtractContour::new(params().with_levels(IsoLevels::single(0.4)))
            .execute(&mesh)
            .unwrap();
        assert!(!contour.closed);
        for p in &contour.points {
            assert_relative_eq!(p.x, 1.6, epsilon = 1e-9);
        }

        let err = ExtractContour::new(
            params()
                .with_levels(IsoLevels::single(0.4))
                .with_remove_open_curves(true),
        )
        .execute(&mesh)
        .unwrap_err();
        assert!(matches!(
            err,
            ContourError::Operation(OperationError::NoCurvesProduced)
        ));
    }

    #[test]
    fn bevel_values_follow_points() {
        let mut mesh = disc_mesh(6, 2.0);
        let ids: Vec<_> = mesh.vertices().map(|(id, _)| id).collect();
        mesh.add_weight_group(
            "bevel",
            WeightField::from_values(&ids, &vec![0.4; ids.len()]).unwrap(),
        );
        let params = params().with_fields(FieldNames::contour("contour").with_bevel("bevel"));
        let contour = ExtractContour::new(params).execute(&mesh).unwrap();
        let bevel = contour.bevel.unwrap();
        assert_eq!(bevel.len(), contour.points.len());
        assert!(bevel.iter().all(|&b| (b - 0.4).abs() < 1e-12));
    }

    #[test]
    fn extraction_is_deterministic() {
        let mesh = disc_mesh(8, 3.0);
        let a = ExtractContour::new(params()).execute(&mesh).unwrap();
        let b = ExtractContour::new(params()).execute(&mesh).unwrap();
        assert_eq!(a, b);
    }
}
