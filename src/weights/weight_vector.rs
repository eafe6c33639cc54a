use std::fmt;
use std::collections::BTreeMap;

use crate::criterion::Criterion;

/// Voting weights of the criteria in the pool.
///
/// Weights are non-negative and sum to one.
/// A criterion that is absent from the map has weight zero.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightVector {
    weights: BTreeMap<Criterion, f64>,
}

impl WeightVector {
    /// Equal weights over `pool`.
    pub fn uniform(pool: &[Criterion]) -> Self {
        let w = 1f64 / pool.len().max(1) as f64;
        let weights = pool.iter()
            .map(|&c| (c, w))
            .collect();
        Self { weights }
    }

    /// All the mass on `criterion`.
    pub fn single(criterion: Criterion) -> Self {
        let weights = BTreeMap::from([(criterion, 1f64)]);
        Self { weights }
    }

    /// Normalize `raw` so that the weights sum to one.
    /// Falls back to [`WeightVector::uniform`] if the mass is not positive
    /// or not finite.
    pub(crate) fn normalized(raw: BTreeMap<Criterion, f64>) -> Self {
        let total = raw.values().sum::<f64>();
        if !(total.is_finite() && total > 0f64) {
            let pool = raw.into_keys().collect::<Vec<_>>();
            return Self::uniform(&pool);
        }

        let weights = raw.into_iter()
            .map(|(c, w)| (c, w / total))
            .collect();
        Self { weights }
    }

    /// Returns the weight of `criterion`.
    #[inline]
    pub fn get(&self, criterion: Criterion) -> f64 {
        self.weights.get(&criterion).copied().unwrap_or(0f64)
    }

    /// Returns the total mass.
    pub fn sum(&self) -> f64 {
        self.weights.values().sum()
    }

    /// Returns the number of weighted criteria.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Returns `true` if no criterion is weighted.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Iterates over `(criterion, weight)` in canonical criterion order.
    pub fn iter(&self) -> impl Iterator<Item = (Criterion, f64)> + '_ {
        self.weights.iter().map(|(&c, &w)| (c, w))
    }
}

impl fmt::Display for WeightVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let line = self.weights.iter()
            .map(|(c, w)| format!("{}={w:.3}", c.name()))
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "[{line}]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_TOLERANCE: f64 = 1e-9;

    #[test]
    fn test_uniform() {
        let w = WeightVector::uniform(&Criterion::ALL);
        assert!((w.sum() - 1f64).abs() < TEST_TOLERANCE);
        assert!((w.get(Criterion::Dkm) - 1f64 / 11f64).abs() < TEST_TOLERANCE);
    }

    #[test]
    fn test_normalized() {
        let raw = BTreeMap::from([
            (Criterion::Gini, 3f64),
            (Criterion::Twoing, 1f64),
        ]);
        let w = WeightVector::normalized(raw);
        assert!((w.get(Criterion::Gini) - 0.75).abs() < TEST_TOLERANCE);
        assert_eq!(w.get(Criterion::Marshall), 0f64);
    }

    #[test]
    fn test_normalized_zero_mass_is_uniform() {
        let raw = BTreeMap::from([
            (Criterion::Gini, 0f64),
            (Criterion::Twoing, 0f64),
        ]);
        let w = WeightVector::normalized(raw);
        assert!((w.get(Criterion::Twoing) - 0.5).abs() < TEST_TOLERANCE);
    }
}
