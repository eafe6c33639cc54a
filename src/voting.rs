//! Split scoring by normalized weighted voting.
//!
//! Raw criterion values live on incomparable scales,
//! so the votes are min-max normalized across the pool
//! before they are weighted.
use serde::{Serialize, Deserialize};

use std::fmt;

use crate::criterion::Criterion;
use crate::error::TreeError;
use crate::weights::WeightVector;

/// Scores a binary partition of the labels of a node.
/// Larger is better; the value lies in `[0, 1]`.
pub trait SplitScorer {
    /// Scores the partition `(left, right)` under `weights`.
    fn score(&self, weights: &WeightVector, left: &[i64], right: &[i64])
        -> f64;
}

/// How impurity criteria (lower is better) enter the vote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolarityPolicy {
    /// Negate impurities so that every vote prefers larger values.
    #[default]
    Invert,
    /// Drop Gini and DKM from the pool.
    ExcludeImpurity,
}

impl PolarityPolicy {
    /// Returns the voting pool for the enabled criteria.
    pub fn pool<I>(&self, enabled: I) -> Result<Vec<Criterion>, TreeError>
        where I: IntoIterator<Item = Criterion>,
    {
        let mut pool = enabled.into_iter()
            .filter(|c| {
                *self == Self::Invert || !c.is_impurity()
            })
            .collect::<Vec<_>>();
        pool.sort();
        pool.dedup();

        if pool.is_empty() {
            return Err(TreeError::Configuration(
                format!("no criterion is enabled under polarity policy `{self}`")
            ));
        }
        Ok(pool)
    }
}

impl fmt::Display for PolarityPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Invert => "Invert impurities",
            Self::ExcludeImpurity => "Exclude impurities",
        };
        write!(f, "{name}")
    }
}

/// Scores a partition with one criterion.
///
/// The polarity-aligned value `s` is mapped to `0.5 (1 + s / (1 + |s|))`,
/// which is strictly increasing and keeps the criterion's ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CriterionScorer {
    criterion: Criterion,
}

impl CriterionScorer {
    /// Construct a scorer for `criterion`.
    pub fn new(criterion: Criterion) -> Self {
        Self { criterion }
    }

    /// Returns the criterion of this scorer.
    pub fn criterion(&self) -> Criterion {
        self.criterion
    }
}

impl SplitScorer for CriterionScorer {
    fn score(&self, _weights: &WeightVector, left: &[i64], right: &[i64])
        -> f64
    {
        if left.is_empty() || right.is_empty() { return 0f64; }
        squash(aligned_vote(self.criterion, left, right))
    }
}

/// Weighted vote of a pool of criteria.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VotingScorer {
    pool: Vec<Criterion>,
}

impl VotingScorer {
    /// Construct a scorer that votes over `pool`.
    pub fn new(pool: Vec<Criterion>) -> Self {
        Self { pool }
    }

    /// Returns the voting criteria.
    pub fn pool(&self) -> &[Criterion] {
        &self.pool[..]
    }
}

impl SplitScorer for VotingScorer {
    fn score(&self, weights: &WeightVector, left: &[i64], right: &[i64])
        -> f64
    {
        if left.is_empty() || right.is_empty() { return 0f64; }

        // A single vote has nothing to be normalized against.
        if let [criterion] = self.pool[..] {
            return squash(aligned_vote(criterion, left, right));
        }

        let votes = self.pool.iter()
            .map(|&c| aligned_vote(c, left, right))
            .collect::<Vec<_>>();
        let votes = min_max_normalize(&votes);

        let total = self.pool.iter()
            .map(|&c| weights.get(c))
            .sum::<f64>();

        let score = if total > 0f64 {
            self.pool.iter()
                .zip(votes)
                .map(|(&c, v)| weights.get(c) * v)
                .sum::<f64>()
                / total
        } else {
            votes.iter().sum::<f64>() / votes.len() as f64
        };

        score.clamp(0f64, 1f64)
    }
}

/// Polarity-aligned value of `criterion`.
/// Failures and `NaN` count as `0`.
#[inline]
fn aligned_vote(criterion: Criterion, left: &[i64], right: &[i64]) -> f64 {
    match criterion.aligned_score(left, right) {
        Ok(s) if !s.is_nan() => s,
        _ => 0f64,
    }
}

/// Maps `s` into `[0, 1]`, keeping the order.
#[inline]
pub(crate) fn squash(s: f64) -> f64 {
    if s == f64::INFINITY { return 1f64; }
    if s == f64::NEG_INFINITY { return 0f64; }
    if s.is_nan() { return 0.5; }
    0.5 * (1f64 + s / (1f64 + s.abs()))
}

/// Min-max normalization over the finite values.
/// `+∞` maps to `1`, `-∞` to `0`,
/// and a constant input to `0.5`.
pub(crate) fn min_max_normalize(values: &[f64]) -> Vec<f64> {
    let (min, max) = values.iter()
        .copied()
        .filter(|x| x.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| {
            (lo.min(x), hi.max(x))
        });
    let range = max - min;

    values.iter()
        .map(|&x| {
            if x == f64::INFINITY {
                1f64
            } else if x == f64::NEG_INFINITY {
                0f64
            } else if !(range > 0f64) {
                0.5
            } else {
                (x - min) / range
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_TOLERANCE: f64 = 1e-9;

    #[test]
    fn test_min_max_normalize() {
        let got = min_max_normalize(&[1f64, 3f64, 2f64]);
        assert_eq!(got, vec![0f64, 1f64, 0.5]);

        let got = min_max_normalize(&[4f64, 4f64]);
        assert_eq!(got, vec![0.5, 0.5]);

        let got = min_max_normalize(&[f64::INFINITY, 0f64, 2f64, f64::NEG_INFINITY]);
        assert_eq!(got, vec![1f64, 0f64, 1f64, 0f64]);
    }

    #[test]
    fn test_squash_is_monotone() {
        let xs = [f64::NEG_INFINITY, -10f64, -0.5, 0f64, 0.5, 3f64, f64::INFINITY];
        for pair in xs.windows(2) {
            assert!(squash(pair[0]) < squash(pair[1]), "{pair:?}");
        }
        assert!((squash(0f64) - 0.5).abs() < TEST_TOLERANCE);
    }

    #[test]
    fn test_empty_side_scores_zero() {
        let scorer = VotingScorer::new(Criterion::ALL.to_vec());
        let w = WeightVector::uniform(&Criterion::ALL);
        assert_eq!(scorer.score(&w, &[0, 1], &[]), 0f64);
        assert_eq!(scorer.score(&w, &[], &[0, 1]), 0f64);
    }

    #[test]
    fn test_score_in_unit_interval() {
        let scorer = VotingScorer::new(Criterion::ALL.to_vec());
        let w = WeightVector::uniform(&Criterion::ALL);
        let partitions = [
            (vec![0, 0], vec![1, 1]),
            (vec![0, 1], vec![0, 1]),
            (vec![0, 0, 0, 1], vec![1, 2, 2]),
            (vec![5], vec![5, 5]),
        ];
        for (l, r) in partitions {
            let s = scorer.score(&w, &l, &r);
            assert!((0f64..=1f64).contains(&s), "got {s}");
        }
    }

    #[test]
    fn test_zero_weights_fall_back_to_mean() {
        let pool = vec![Criterion::Gini, Criterion::Twoing];
        let scorer = VotingScorer::new(pool);
        let w = WeightVector::single(Criterion::Marshall);

        // Aligned Gini -0.25 and Twoing 0.25 normalize to 0 and 1.
        let s = scorer.score(&w, &[0, 1], &[0, 0]);
        assert!((s - 0.5).abs() < TEST_TOLERANCE, "got {s}");
    }

    #[test]
    fn test_weights_shift_the_vote() {
        let pool = vec![Criterion::Gini, Criterion::Twoing];
        let scorer = VotingScorer::new(pool);
        let w = WeightVector::single(Criterion::Twoing);
        let s = scorer.score(&w, &[0, 1], &[0, 0]);
        assert!((s - 1f64).abs() < TEST_TOLERANCE, "got {s}");
    }

    #[test]
    fn test_single_criterion_keeps_ranking() {
        let scorer = VotingScorer::new(vec![Criterion::Gini]);
        let w = WeightVector::single(Criterion::Gini);
        let pure = scorer.score(&w, &[0, 0], &[1, 1]);
        let mixed = scorer.score(&w, &[0], &[0, 1, 1]);
        assert!(pure > mixed, "pure {pure} <= mixed {mixed}");

        let direct = CriterionScorer::new(Criterion::Gini);
        assert_eq!(pure, direct.score(&w, &[0, 0], &[1, 1]));
    }

    #[test]
    fn test_polarity_policy_pool() {
        let pool = PolarityPolicy::Invert.pool(Criterion::ALL).unwrap();
        assert_eq!(pool.len(), 11);

        let pool = PolarityPolicy::ExcludeImpurity.pool(Criterion::ALL).unwrap();
        assert_eq!(pool.len(), 9);
        assert!(!pool.contains(&Criterion::Gini));
        assert!(!pool.contains(&Criterion::Dkm));

        let res = PolarityPolicy::ExcludeImpurity
            .pool([Criterion::Gini, Criterion::Dkm]);
        assert!(matches!(res, Err(TreeError::Configuration(_))));
    }
}
