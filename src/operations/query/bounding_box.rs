use crate::math::{Axis, Point3};
use crate::topology::Mesh;

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box.
    pub min: Point3,
    /// Maximum corner of the bounding box.
    pub max: Point3,
}

impl Aabb {
    /// Bounding box of a point set, or `None` if the set is empty.
    #[must_use]
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point3>,
    {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let mut aabb = Self {
            min: first,
            max: first,
        };
        for p in iter {
            aabb.min = aabb.min.inf(p);
            aabb.max = aabb.max.sup(p);
        }
        Some(aabb)
    }

    /// Size of the box along `axis`.
    #[must_use]
    pub fn extent(&self, axis: Axis) -> f64 {
        axis.coord(&self.max) - axis.coord(&self.min)
    }
}

/// Computes the axis-aligned bounding box of a mesh's vertices.
#[derive(Debug, Default)]
pub struct BoundingBox;

impl BoundingBox {
    /// Creates a new `BoundingBox` query.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Executes the query, returning `None` for a mesh without vertices.
    #[must_use]
    pub fn execute(&self, mesh: &Mesh) -> Option<Aabb> {
        Aabb::from_points(mesh.vertices().map(|(_, v)| &v.point))
    }
}
