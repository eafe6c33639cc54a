use rayon::prelude::*;
use serde::{Serialize, Deserialize};
use tracing::{debug, warn};

use std::fmt;
use std::collections::BTreeMap;

use super::cache::{FnCache, FnKey, fingerprint};
use super::weight_vector::WeightVector;

use crate::criterion::Criterion;
use crate::error::TreeError;
use crate::sample::Sample;
use crate::tree::{Depth, FixedPolicy, GrowParams, GrowStats, Grower};

/// Offset added to a false-negative count before it is inverted.
const INVERSE_EPSILON: f64 = 1e-8;

/// Converts per-criterion false-negative counts into voting weights.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightScheme {
    /// `w_i ∝ exp(-(fn_i - min_j fn_j) / T)`.
    #[default]
    Softmax,
    /// `w_i ∝ 1 / (fn_i + 1e-8)`.
    InverseFalseNegatives,
}

impl WeightScheme {
    /// Turns `false_negatives` into a weight vector.
    /// An infinite count gets weight zero;
    /// if every count is infinite the weights are uniform.
    pub fn to_weights(
        &self,
        false_negatives: &BTreeMap<Criterion, f64>,
        temperature: f64,
    ) -> WeightVector
    {
        let best = false_negatives.values()
            .copied()
            .filter(|x| x.is_finite())
            .reduce(f64::min);

        let Some(best) = best else {
            let pool = false_negatives.keys().copied().collect::<Vec<_>>();
            return WeightVector::uniform(&pool);
        };

        let raw = false_negatives.iter()
            .map(|(&c, &fn_count)| {
                let w = if !fn_count.is_finite() {
                    0f64
                } else {
                    match self {
                        Self::Softmax => {
                            (-(fn_count - best) / temperature).exp()
                        },
                        Self::InverseFalseNegatives => {
                            1f64 / (fn_count + INVERSE_EPSILON)
                        },
                    }
                };
                (c, w)
            })
            .collect();

        WeightVector::normalized(raw)
    }
}

impl fmt::Display for WeightScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Softmax => "Softmax",
            Self::InverseFalseNegatives => "Inverse false negatives",
        };
        write!(f, "{name}")
    }
}

/// Number of examples labeled `positive` that are predicted otherwise.
pub fn false_negatives(truth: &[i64], prediction: &[i64], positive: i64)
    -> usize
{
    truth.iter()
        .zip(prediction)
        .filter(|&(&y, &p)| y == positive && p != positive)
        .count()
}

/// Estimates the voting weights of a node.
///
/// For every criterion of the pool a probe tree is grown on the node's rows
/// with that criterion as the only split rule.
/// Criteria whose probe tree misses fewer positive examples
/// get a larger weight.
/// Counts are cached for the lifetime of the estimator,
/// which is one call of [`WeightedTree::fit`](crate::WeightedTree::fit).
///
/// A fit grows one probe tree per criterion at every node it splits,
/// so it costs O(criteria × nodes × probe tree).
/// [`WeightEstimator::probe_max_depth`] and
/// [`WeightEstimator::max_candidates`] bound the size of a probe tree;
/// [`WeightingMode::RootOnly`](crate::WeightingMode::RootOnly)
/// estimates at the root only.
pub struct WeightEstimator {
    pool: Vec<Criterion>,
    positive_label: i64,
    temperature: f64,
    scheme: WeightScheme,
    probe: GrowParams,
    cache: FnCache,
    probe_fits: usize,
    updates: usize,
}

impl WeightEstimator {
    /// Construct a new estimator over `pool`.
    /// The temperature defaults to `1`,
    /// the probe trees to depth `10`.
    pub fn new(pool: Vec<Criterion>, positive_label: i64) -> Self {
        Self {
            pool,
            positive_label,
            temperature: 1f64,
            scheme: WeightScheme::default(),
            probe: GrowParams::probe(),
            cache: FnCache::new(),
            probe_fits: 0,
            updates: 0,
        }
    }

    /// Set the softmax temperature.
    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the weighting scheme.
    pub fn scheme(mut self, scheme: WeightScheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Set the maximal depth of the probe trees.
    pub fn probe_max_depth(mut self, depth: usize) -> Self {
        self.probe.max_depth = depth;
        self
    }

    /// Set the number of candidate thresholds per feature
    /// of the probe trees.
    pub fn max_candidates(mut self, max_candidates: usize) -> Self {
        self.probe.max_candidates = max_candidates;
        self
    }

    /// Returns the criteria this estimator weights.
    pub fn pool(&self) -> &[Criterion] {
        &self.pool[..]
    }

    /// Number of probe trees grown so far.
    pub fn probe_fits(&self) -> usize {
        self.probe_fits
    }

    /// Number of false-negative counts served from the cache.
    pub fn cache_hits(&self) -> usize {
        self.cache.hits()
    }

    /// Number of weight vectors estimated from probe trees.
    pub fn updates(&self) -> usize {
        self.updates
    }

    /// Estimate the weights for the node holding the rows `indices`.
    ///
    /// Nodes with fewer than two rows keep `inherited`;
    /// a pool of one criterion gets all the mass without probing.
    pub fn estimate(
        &mut self,
        sample: &Sample,
        indices: &[usize],
        inherited: &WeightVector,
    ) -> WeightVector
    {
        if indices.len() < 2 {
            return inherited.clone();
        }
        if let [criterion] = self.pool[..] {
            return WeightVector::single(criterion);
        }

        let false_negatives = self.false_negatives(sample, indices);
        let weights = self.scheme.to_weights(&false_negatives, self.temperature);
        self.updates += 1;

        debug!(
            n_rows = indices.len(),
            %weights,
            "estimated voting weights",
        );
        weights
    }

    /// False-negative count of the probe tree of every pool criterion.
    /// A probe tree that cannot be grown counts as `+∞`.
    pub fn false_negatives(&mut self, sample: &Sample, indices: &[usize])
        -> BTreeMap<Criterion, f64>
    {
        let fingerprint = fingerprint(sample, indices);
        let n_rows = indices.len();

        let mut counts = BTreeMap::new();
        let mut missing = Vec::new();
        for &criterion in &self.pool {
            let key = FnKey::new(criterion, fingerprint, n_rows);
            match self.cache.get(&key) {
                Some(count) => { counts.insert(criterion, count); },
                None => { missing.push(criterion); },
            }
        }

        let classes = sample.classes();
        let fresh = missing.par_iter()
            .map(|&criterion| {
                let count = self.probe(sample, &classes, indices, criterion)
                    .unwrap_or_else(|reason| {
                        let err = TreeError::DegenerateWeightEstimate {
                            criterion,
                            reason: reason.to_string(),
                        };
                        warn!("{err}");
                        f64::INFINITY
                    });
                (criterion, count)
            })
            .collect::<Vec<_>>();

        self.probe_fits += fresh.len();
        for (criterion, count) in fresh {
            let key = FnKey::new(criterion, fingerprint, n_rows);
            self.cache.insert(key, count);
            counts.insert(criterion, count);
        }

        counts
    }

    /// Grow a single-criterion tree on `indices`
    /// and count its in-sample false negatives.
    fn probe(
        &self,
        sample: &Sample,
        classes: &[i64],
        indices: &[usize],
        criterion: Criterion,
    ) -> Result<f64, TreeError>
    {
        let grower = Grower::new(sample, classes, self.probe);
        let mut policy = FixedPolicy::new(criterion);
        let mut stats = GrowStats::default();
        let weights = WeightVector::single(criterion);

        let root = grower.grow(
            &mut policy, indices.to_vec(), Depth::from(0), &weights, &mut stats,
        )?;

        let target = sample.target();
        let truth = indices.iter()
            .map(|&i| target[i])
            .collect::<Vec<_>>();
        let prediction = indices.iter()
            .map(|&i| root.leaf(sample, i).prediction())
            .collect::<Vec<_>>();

        Ok(false_negatives(&truth, &prediction, self.positive_label) as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_TOLERANCE: f64 = 1e-9;

    fn sample() -> Sample {
        let rows = (0..8).map(|i| vec![i as f64, (i % 3) as f64])
            .collect::<Vec<_>>();
        let target = vec![0, 0, 1, 0, 1, 1, 0, 1];
        Sample::from_rows(&rows, target).unwrap()
    }

    #[test]
    fn test_false_negatives() {
        let truth = [1, 1, 0, 1, 0];
        let pred  = [1, 0, 1, 0, 0];
        assert_eq!(false_negatives(&truth, &pred, 1), 2);
        assert_eq!(false_negatives(&truth, &pred, 0), 1);
    }

    #[test]
    fn test_softmax_weights() {
        let fns = BTreeMap::from([
            (Criterion::Gini, 0f64),
            (Criterion::Twoing, 1f64),
            (Criterion::Dkm, f64::INFINITY),
        ]);
        let w = WeightScheme::Softmax.to_weights(&fns, 1f64);

        let z = 1f64 + (-1f64).exp();
        assert!((w.get(Criterion::Gini) - 1f64 / z).abs() < TEST_TOLERANCE);
        assert!((w.get(Criterion::Twoing) - (-1f64).exp() / z).abs() < TEST_TOLERANCE);
        assert_eq!(w.get(Criterion::Dkm), 0f64);
    }

    #[test]
    fn test_high_temperature_flattens_weights() {
        let fns = BTreeMap::from([
            (Criterion::Gini, 0f64),
            (Criterion::Twoing, 5f64),
        ]);
        let cold = WeightScheme::Softmax.to_weights(&fns, 0.5);
        let hot = WeightScheme::Softmax.to_weights(&fns, 100f64);
        assert!(cold.get(Criterion::Gini) > hot.get(Criterion::Gini));
        assert!((hot.get(Criterion::Gini) - 0.5).abs() < 0.05);
    }

    #[test]
    fn test_inverse_weights() {
        let fns = BTreeMap::from([
            (Criterion::Gini, 1f64),
            (Criterion::Twoing, 3f64),
        ]);
        let w = WeightScheme::InverseFalseNegatives.to_weights(&fns, 1f64);
        assert!((w.get(Criterion::Gini) - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_all_infinite_is_uniform() {
        let fns = BTreeMap::from([
            (Criterion::Gini, f64::INFINITY),
            (Criterion::Twoing, f64::INFINITY),
        ]);
        let w = WeightScheme::Softmax.to_weights(&fns, 1f64);
        assert!((w.get(Criterion::Gini) - 0.5).abs() < TEST_TOLERANCE);
    }

    #[test]
    fn test_estimate_sums_to_one() {
        let sample = sample();
        let pool = Criterion::ALL.to_vec();
        let mut estimator = WeightEstimator::new(pool.clone(), 1);

        let indices = (0..8).collect::<Vec<_>>();
        let w = estimator.estimate(&sample, &indices, &WeightVector::uniform(&pool));
        assert!((w.sum() - 1f64).abs() < TEST_TOLERANCE, "got {}", w.sum());
        assert!(w.iter().all(|(_, x)| x >= 0f64));
        assert_eq!(estimator.probe_fits(), 11);
    }

    #[test]
    fn test_small_node_keeps_inherited() {
        let sample = sample();
        let pool = vec![Criterion::Gini, Criterion::Twoing];
        let mut estimator = WeightEstimator::new(pool, 1);

        let inherited = WeightVector::single(Criterion::Twoing);
        let w = estimator.estimate(&sample, &[3], &inherited);
        assert_eq!(w, inherited);
        assert_eq!(estimator.probe_fits(), 0);
    }

    #[test]
    fn test_single_criterion_pool() {
        let sample = sample();
        let mut estimator = WeightEstimator::new(vec![Criterion::Dkm], 1);

        let indices = (0..8).collect::<Vec<_>>();
        let w = estimator.estimate(&sample, &indices, &WeightVector::uniform(&[]));
        assert_eq!(w.get(Criterion::Dkm), 1f64);
        assert_eq!(estimator.probe_fits(), 0);
    }

    #[test]
    fn test_cache_hits() {
        let sample = sample();
        let pool = vec![Criterion::Gini, Criterion::ChiSquared];
        let mut estimator = WeightEstimator::new(pool.clone(), 1);

        let indices = (0..8).collect::<Vec<_>>();
        let uniform = WeightVector::uniform(&pool);
        let first = estimator.estimate(&sample, &indices, &uniform);
        let second = estimator.estimate(&sample, &indices, &uniform);

        assert_eq!(first, second);
        assert_eq!(estimator.probe_fits(), 2);
        assert_eq!(estimator.cache_hits(), 2);
    }

    #[test]
    fn test_perfect_probe_has_no_false_negatives() {
        let rows = vec![vec![1.0], vec![2.0], vec![3.0], vec![4.0]];
        let sample = Sample::from_rows(&rows, vec![0, 0, 1, 1]).unwrap();
        let pool = vec![Criterion::Gini, Criterion::GainRatio];
        let mut estimator = WeightEstimator::new(pool, 1);

        let fns = estimator.false_negatives(&sample, &[0, 1, 2, 3]);
        assert_eq!(fns[&Criterion::Gini], 0f64);
        assert_eq!(fns[&Criterion::GainRatio], 0f64);
    }
}
