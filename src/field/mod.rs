//! Per-vertex scalar fields and the flattened mesh snapshot they are read into.

mod accessor;

pub use accessor::{FaceRecord, IndexedEdge, MeshFields, ReadFields};

use slotmap::SecondaryMap;

use crate::error::FieldError;
use crate::topology::VertexId;

/// A per-vertex scalar field ("weight group").
///
/// Vertices without an explicit value read as `0.0`.
#[derive(Debug, Clone, Default)]
pub struct WeightField {
    values: SecondaryMap<VertexId, f64>,
}

impl WeightField {
    /// Creates an empty field.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a field from index-parallel vertex ids and values.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::LengthMismatch`] if the slices differ in length
    /// and [`FieldError::NonFinite`] for a NaN or infinite value.
    pub fn from_values(ids: &[VertexId], values: &[f64]) -> Result<Self, FieldError> {
        if ids.len() != values.len() {
            return Err(FieldError::LengthMismatch {
                expected: ids.len(),
                actual: values.len(),
            });
        }
        if let Some((index, &value)) = values.iter().enumerate().find(|(_, w)| !w.is_finite()) {
            return Err(FieldError::NonFinite { index, value });
        }
        let mut field = Self::new();
        for (&id, &w) in ids.iter().zip(values) {
            field.set(id, w);
        }
        Ok(field)
    }

    /// Sets the weight of a vertex.
    pub fn set(&mut self, id: VertexId, weight: f64) {
        self.values.insert(id, weight);
    }

    /// Returns the weight of a vertex, `0.0` if unassigned.
    #[must_use]
    pub fn weight(&self, id: VertexId) -> f64 {
        self.values.get(id).copied().unwrap_or(0.0)
    }

    /// Returns `true` if the vertex has an explicit weight.
    #[must_use]
    pub fn contains(&self, id: VertexId) -> bool {
        self.values.contains_key(id)
    }

    /// Number of vertices with an explicit weight.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no vertex has an explicit weight.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Resolves the field into an array parallel to `ids`.
    #[must_use]
    pub fn resolve(&self, ids: &[VertexId]) -> Vec<f64> {
        ids.iter().map(|&id| self.weight(id)).collect()
    }
}

/// Names of the weight groups playing each role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldNames {
    /// Group thresholded for the contour. Required.
    pub contour: String,
    /// Group driving the pattern displacement. Missing means all zero.
    pub pattern: Option<String>,
    /// Group driving the variable bevel depth. Missing means all one.
    pub bevel: Option<String>,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self::contour("contour")
    }
}

impl FieldNames {
    /// Uses only a contour group.
    #[must_use]
    pub fn contour(name: impl Into<String>) -> Self {
        Self {
            contour: name.into(),
            pattern: None,
            bevel: None,
        }
    }

    /// Sets the pattern displacement group.
    #[must_use]
    pub fn with_pattern(mut self, name: impl Into<String>) -> Self {
        self.pattern = Some(name.into());
        self
    }

    /// Sets the variable bevel group.
    #[must_use]
    pub fn with_bevel(mut self, name: impl Into<String>) -> Self {
        self.bevel = Some(name.into());
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn unassigned_vertices_read_zero() {
        let mut ids: SlotMap<VertexId, ()> = SlotMap::with_key();
        let a = ids.insert(());
        let b = ids.insert(());
        let mut field = WeightField::new();
        field.set(a, 0.75);
        assert!((field.weight(a) - 0.75).abs() < 1e-12);
        assert!(field.weight(b).abs() < 1e-12);
        assert_eq!(field.resolve(&[b, a]), vec![0.0, 0.75]);
    }

    #[test]
    fn from_values_checks_lengths() {
        let mut ids: SlotMap<VertexId, ()> = SlotMap::with_key();
        let a = ids.insert(());
        assert!(matches!(
            WeightField::from_values(&[a], &[1.0, 2.0]),
            Err(FieldError::LengthMismatch { expected: 1, actual: 2 })
        ));
        assert_eq!(WeightField::from_values(&[a], &[1.0]).unwrap().len(), 1);
    }

    #[test]
    fn from_values_rejects_non_finite() {
        let mut ids: SlotMap<VertexId, ()> = SlotMap::with_key();
        let a = ids.insert(());
        let b = ids.insert(());
        assert!(matches!(
            WeightField::from_values(&[a, b], &[0.5, f64::NAN]),
            Err(FieldError::NonFinite { index: 1, .. })
        ));
        assert!(matches!(
            WeightField::from_values(&[a, b], &[f64::INFINITY, 0.5]),
            Err(FieldError::NonFinite { index: 0, .. })
        ));
    }
}
