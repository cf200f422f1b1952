/// Evenly spaced iso-values strictly inside a weight range.
///
/// Level `c` of `count` is `min + (max - min) * (c + 1) / (count + 1)`, so a
/// single level sits at the midpoint of the range. The bounds may be given
/// in either order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IsoLevels {
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

impl Default for IsoLevels {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 1.0,
            count: 1,
        }
    }
}

impl IsoLevels {
    /// Creates `count` levels between `min` and `max`.
    #[must_use]
    pub fn new(min: f64, max: f64, count: usize) -> Self {
        Self { min, max, count }
    }

    /// A single level at exactly `iso`.
    #[must_use]
    pub fn single(iso: f64) -> Self {
        Self::new(iso, iso, 1)
    }

    /// Returns the iso-values in ascending order.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn values(&self) -> Vec<f64> {
        let lo = self.min.min(self.max);
        let hi = self.min.max(self.max);
        let divisions = (self.count + 1) as f64;
        (0..self.count)
            .map(|c| lo + (hi - lo) * (c + 1) as f64 / divisions)
            .collect()
    }
}
