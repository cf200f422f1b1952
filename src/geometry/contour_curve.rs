use crate::error::GeometryError;
use crate::math::{Point3, Vector3, TOLERANCE};
use crate::operations::contour::Curve;

/// A contour resolved to 3D points.
///
/// For closed curves the last point connects back to the first; the first
/// point is not repeated.
#[derive(Debug, Clone, PartialEq)]
pub struct ContourCurve {
    pub points: Vec<Point3>,
    /// Per-point bevel depth, when a bevel group drove the extraction.
    pub bevel: Option<Vec<f64>>,
    pub closed: bool,
}

impl ContourCurve {
    /// Creates a curve from points with no bevel values.
    #[must_use]
    pub fn from_points(points: Vec<Point3>, closed: bool) -> Self {
        Self {
            points,
            bevel: None,
            closed,
        }
    }

    /// Resolves an assembled [`Curve`] against the vertex array it indexes.
    ///
    /// `bevel`, when given, must be index-parallel with `positions`.
    #[must_use]
    pub fn from_curve(curve: &Curve, positions: &[Point3], bevel: Option<&[f64]>) -> Self {
        let indices = curve.points();
        Self {
            points: indices.iter().map(|&i| positions[i]).collect(),
            bevel: bevel.map(|values| indices.iter().map(|&i| values[i]).collect()),
            closed: curve.is_closed(),
        }
    }

    /// Returns the number of segments in this curve.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        let n = self.points.len();
        if n < 2 {
            return 0;
        }
        if self.closed {
            n
        } else {
            n - 1
        }
    }

    /// Iterates over the segments as point pairs, including the closing one.
    pub fn segments(&self) -> impl Iterator<Item = (&Point3, &Point3)> + '_ {
        let n = self.points.len();
        (0..self.segment_count()).map(move |i| (&self.points[i], &self.points[(i + 1) % n]))
    }

    /// Total polyline length.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.segments().map(|(a, b)| (b - a).norm()).sum()
    }

    /// Returns a new curve with the points in reverse order.
    #[must_use]
    pub fn reversed(&self) -> Self {
        let mut points = self.points.clone();
        points.reverse();
        let bevel = self.bevel.as_ref().map(|values| {
            let mut values = values.clone();
            values.reverse();
            values
        });
        Self {
            points,
            bevel,
            closed: self.closed,
        }
    }

    /// Merges runs of consecutive points closer than `distance`.
    ///
    /// The first point of each run is kept. On closed curves the last kept
    /// point is also dropped when it lies within `distance` of the first.
    #[must_use]
    pub fn merged(&self, distance: f64) -> Self {
        if distance <= 0.0 || self.points.len() < 2 {
            return self.clone();
        }

        let mut keep = vec![0usize];
        let mut last = self.points[0];
        for (i, p) in self.points.iter().enumerate().skip(1) {
            if (p - last).norm() >= distance {
                keep.push(i);
                last = *p;
            }
        }
        if self.closed && keep.len() > 1 {
            if let Some(&tail) = keep.last() {
                if (self.points[tail] - self.points[0]).norm() < distance {
                    keep.pop();
                }
            }
        }

        Self {
            points: keep.iter().map(|&i| self.points[i]).collect(),
            bevel: self
                .bevel
                .as_ref()
                .map(|values| keep.iter().map(|&i| values[i]).collect()),
            closed: self.closed,
        }
    }

    /// Average of the points, or `None` for an empty curve.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn centroid(&self) -> Option<Point3> {
        if self.points.is_empty() {
            return None;
        }
        let sum = self
            .points
            .iter()
            .fold(Vector3::zeros(), |acc, p| acc + p.coords);
        Some(Point3::from(sum / self.points.len() as f64))
    }

    /// Unit normal of the plane the curve winds around.
    ///
    /// Sums the cross products of consecutive points taken relative to the
    /// centroid, so the direction follows the winding order.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::Degenerate`] for fewer than three points and
    /// [`GeometryError::ZeroVector`] if the points are collinear.
    pub fn plane_normal(&self) -> Result<Vector3, GeometryError> {
        if self.points.len() < 3 {
            return Err(GeometryError::Degenerate(format!(
                "{} points cannot span a plane",
                self.points.len()
            )));
        }
        let centroid = self.centroid().ok_or(GeometryError::ZeroVector)?;
        let normal = self.segments().fold(Vector3::zeros(), |acc, (a, b)| {
            acc + (a - centroid).cross(&(b - centroid))
        });
        normal
            .try_normalize(TOLERANCE)
            .ok_or(GeometryError::ZeroVector)
    }

    /// [`plane_normal`](Self::plane_normal) flipped so that it does not point
    /// along `reference`.
    ///
    /// Face scans look down `-Y`, so `Vector3::y()` orients the normal out of
    /// the face.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ZeroVector`] if no plane normal exists.
    pub fn normal_against(&self, reference: &Vector3) -> Result<Vector3, GeometryError> {
        let normal = self.plane_normal()?;
        if normal.dot(reference) > 0.0 {
            Ok(-normal)
        } else {
            Ok(normal)
        }
    }
}
