use std::collections::HashMap;

use tracing::{debug, warn};

use crate::error::{OperationError, Result};
use crate::field::MeshFields;
use crate::math::{lerp, Point3, Vector3};
use crate::topology::EdgeId;

/// Pattern displacement applied to crossing points.
///
/// Successive contour levels alternate between an "in" band of `in_steps`
/// levels displaced by `in_displace` and an "out" band of `out_steps` levels
/// displaced by `out_displace`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplaceParams {
    pub in_steps: usize,
    pub out_steps: usize,
    pub in_displace: f64,
    pub out_displace: f64,
    /// Fade the displacement out where the surface normal points along Z.
    pub limit_z: bool,
}

impl Default for DisplaceParams {
    fn default() -> Self {
        Self {
            in_steps: 1,
            out_steps: 1,
            in_displace: 0.0,
            out_displace: 2.0,
            limit_z: false,
        }
    }
}

impl DisplaceParams {
    /// No displacement at any level.
    #[must_use]
    pub fn none() -> Self {
        Self {
            in_displace: 0.0,
            out_displace: 0.0,
            ..Self::default()
        }
    }

    /// Sets the band lengths.
    #[must_use]
    pub fn with_steps(mut self, in_steps: usize, out_steps: usize) -> Self {
        self.in_steps = in_steps;
        self.out_steps = out_steps;
        self
    }

    /// Sets the displacement strengths.
    #[must_use]
    pub fn with_strength(mut self, in_displace: f64, out_displace: f64) -> Self {
        self.in_displace = in_displace;
        self.out_displace = out_displace;
        self
    }

    /// Enables or disables the Z limit.
    #[must_use]
    pub fn with_limit_z(mut self, limit_z: bool) -> Self {
        self.limit_z = limit_z;
        self
    }

    /// Displacement multiplier for contour level `step`.
    ///
    /// With both band lengths zero there is no banding and the multiplier is zero.
    #[must_use]
    pub fn multiplier(&self, step: usize) -> f64 {
        match step.checked_rem(self.in_steps + self.out_steps) {
            Some(phase) if phase < self.in_steps => self.in_displace,
            Some(_) => self.out_displace,
            None => 0.0,
        }
    }
}

/// A new vertex created where an edge crosses the iso-value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeCrossing {
    /// The crossed edge.
    pub edge: EdgeId,
    /// Snapshot index of the edge's first endpoint.
    pub a: usize,
    /// Snapshot index of the edge's second endpoint.
    pub b: usize,
    /// Interpolation parameter from `a` towards `b`, in `[0, 1]`.
    pub t: f64,
    /// Final position, including displacement.
    pub position: Point3,
    /// Linearly interpolated (not renormalised) normal.
    pub normal: Vector3,
    pub pattern: f64,
    pub bevel: f64,
    /// Signed offset applied along `normal`.
    pub displacement: f64,
}

/// All crossings of one extraction call.
#[derive(Debug, Clone)]
pub struct CrossingSet {
    crossings: Vec<EdgeCrossing>,
    edge_index: HashMap<EdgeId, usize>,
    variable_bevel: bool,
}

impl CrossingSet {
    /// The crossings, indexed by new-vertex index.
    #[must_use]
    pub fn crossings(&self) -> &[EdgeCrossing] {
        &self.crossings
    }

    /// Number of new vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.crossings.len()
    }

    /// Always `false`: an empty extraction is reported as [`Extraction::Empty`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.crossings.is_empty()
    }

    /// New-vertex index of the crossing on `edge`, if that edge is crossed.
    #[must_use]
    pub fn index_of(&self, edge: EdgeId) -> Option<usize> {
        self.edge_index.get(&edge).copied()
    }

    /// Mapping from crossed edge to new-vertex index.
    #[must_use]
    pub fn edge_index(&self) -> &HashMap<EdgeId, usize> {
        &self.edge_index
    }

    /// Iterates over the crossed edges in new-vertex order.
    pub fn crossed_edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.crossings.iter().map(|c| c.edge)
    }

    /// New vertex positions.
    #[must_use]
    pub fn positions(&self) -> Vec<Point3> {
        self.crossings.iter().map(|c| c.position).collect()
    }

    /// Interpolated bevel values, present only when a bevel group was read.
    #[must_use]
    pub fn bevel(&self) -> Option<Vec<f64>> {
        self.variable_bevel
            .then(|| self.crossings.iter().map(|c| c.bevel).collect())
    }
}

/// Result of an extraction at one iso-value.
#[derive(Debug, Clone)]
#[must_use]
pub enum Extraction {
    /// No edge crosses the iso-value.
    Empty,
    Crossed(CrossingSet),
}

impl Extraction {
    /// Returns the crossing set, or `None` for [`Extraction::Empty`].
    #[must_use]
    pub fn crossed(self) -> Option<CrossingSet> {
        match self {
            Self::Empty => None,
            Self::Crossed(set) => Some(set),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Finds the edges whose contour weights straddle an iso-value and places a
/// new vertex on each.
///
/// An edge `(a, b)` crosses iff exactly one of `w_a < iso`, `w_b < iso`
/// holds, so a weight equal to `iso` counts as "not below" and edges with
/// equal endpoint weights never cross.
pub struct ExtractCrossings {
    iso: f64,
    step: usize,
    displace: DisplaceParams,
}

impl ExtractCrossings {
    /// Creates a new `ExtractCrossings` operation for contour level `step`.
    ///
    /// Displacement defaults to [`DisplaceParams::none`].
    #[must_use]
    pub fn new(iso: f64, step: usize) -> Self {
        Self {
            iso,
            step,
            displace: DisplaceParams::none(),
        }
    }

    /// Sets the pattern displacement.
    #[must_use]
    pub fn with_displace(mut self, displace: DisplaceParams) -> Self {
        self.displace = displace;
        self
    }

    /// Executes the extraction.
    ///
    /// # Errors
    ///
    /// Returns an error if the iso-value is not finite, or if `fields` is
    /// inconsistent (see [`MeshFields::check`]).
    ///
    /// Edges with a non-finite endpoint weight are skipped.
    pub fn execute(&self, fields: &MeshFields) -> Result<Extraction> {
        if !self.iso.is_finite() {
            return Err(
                OperationError::InvalidInput(format!("iso-value {} is not finite", self.iso))
                    .into(),
            );
        }
        fields.check()?;

        let iso = self.iso;
        let mult = self.displace.multiplier(self.step);
        let w = &fields.contour;

        let mut crossings = Vec::new();
        let mut edge_index = HashMap::new();
        let mut non_finite = 0usize;
        for edge in &fields.edges {
            let (wa, wb) = (w[edge.a], w[edge.b]);
            if !wa.is_finite() || !wb.is_finite() {
                non_finite += 1;
                continue;
            }
            if (wa < iso) == (wb < iso) {
                continue;
            }

            let t = (iso - wa) / (wb - wa);
            let normal = fields.normals[edge.a].lerp(&fields.normals[edge.b], t);
            let pattern = lerp(fields.pattern[edge.a], fields.pattern[edge.b], t);
            let bevel = lerp(fields.bevel[edge.a], fields.bevel[edge.b], t);

            let mut displacement = pattern * mult;
            if self.displace.limit_z {
                displacement *= 1.0 - normal.z.abs();
            }
            let on_edge = fields.positions[edge.a]
                .coords
                .lerp(&fields.positions[edge.b].coords, t);
            let position = Point3::from(on_edge + normal * displacement);

            edge_index.insert(edge.id, crossings.len());
            crossings.push(EdgeCrossing {
                edge: edge.id,
                a: edge.a,
                b: edge.b,
                t,
                position,
                normal,
                pattern,
                bevel,
                displacement,
            });
        }

        if non_finite > 0 {
            warn!(non_finite, "skipped edges with non-finite contour weights");
        }
        debug!(
            iso,
            step = self.step,
            crossings = crossings.len(),
            "extracted iso crossings"
        );

        if crossings.is_empty() {
            return Ok(Extraction::Empty);
        }
        Ok(Extraction::Crossed(CrossingSet {
            crossings,
            edge_index,
            variable_bevel: fields.variable_bevel,
        }))
    }
}
