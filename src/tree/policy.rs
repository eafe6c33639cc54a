//! Split-selection policies plugged into the tree grower.
use serde::{Serialize, Deserialize};

use std::fmt;

use crate::criterion::Criterion;
use crate::sample::Sample;
use crate::voting::{CriterionScorer, SplitScorer, VotingScorer};
use crate::weights::{WeightEstimator, WeightVector};

/// When the voting weights are re-estimated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightingMode {
    /// Re-estimate at every node that is split.
    #[default]
    PerNode,
    /// Estimate once at the root and inherit everywhere.
    RootOnly,
    /// Never estimate; every criterion gets the same weight.
    Uniform,
}

impl fmt::Display for WeightingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PerNode => "Per node",
            Self::RootOnly => "Root only",
            Self::Uniform => "Uniform",
        };
        write!(f, "{name}")
    }
}

/// Decides the weights of a node and scores its candidate splits.
pub(crate) trait SplitPolicy: Sync {
    /// Called once per node before its candidates are scored.
    fn prepare(
        &mut self,
        sample: &Sample,
        indices: &[usize],
        inherited: &WeightVector,
    ) -> WeightVector;

    /// Scores one candidate partition.
    fn score(&self, weights: &WeightVector, left: &[i64], right: &[i64])
        -> f64;
}

/// Always splits by one criterion. Used by the probe trees.
pub(crate) struct FixedPolicy {
    scorer: CriterionScorer,
}

impl FixedPolicy {
    pub(crate) fn new(criterion: Criterion) -> Self {
        Self { scorer: CriterionScorer::new(criterion) }
    }
}

impl SplitPolicy for FixedPolicy {
    fn prepare(&mut self, _: &Sample, _: &[usize], inherited: &WeightVector)
        -> WeightVector
    {
        inherited.clone()
    }

    #[inline]
    fn score(&self, weights: &WeightVector, left: &[i64], right: &[i64])
        -> f64
    {
        self.scorer.score(weights, left, right)
    }
}

/// Weighted vote of the pool, with weights from a [`WeightEstimator`].
pub(crate) struct VotingPolicy {
    scorer: VotingScorer,
    estimator: WeightEstimator,
    mode: WeightingMode,
    root_weights: Option<WeightVector>,
}

impl VotingPolicy {
    pub(crate) fn new(estimator: WeightEstimator, mode: WeightingMode)
        -> Self
    {
        let scorer = VotingScorer::new(estimator.pool().to_vec());
        Self { scorer, estimator, mode, root_weights: None }
    }

    pub(crate) fn estimator(&self) -> &WeightEstimator {
        &self.estimator
    }
}

impl SplitPolicy for VotingPolicy {
    fn prepare(
        &mut self,
        sample: &Sample,
        indices: &[usize],
        inherited: &WeightVector,
    ) -> WeightVector
    {
        match self.mode {
            WeightingMode::PerNode => {
                self.estimator.estimate(sample, indices, inherited)
            },
            WeightingMode::Uniform => inherited.clone(),
            WeightingMode::RootOnly => {
                // The first node prepared is the root.
                if let Some(weights) = &self.root_weights {
                    return weights.clone();
                }
                let weights = self.estimator.estimate(sample, indices, inherited);
                self.root_weights = Some(weights.clone());
                weights
            },
        }
    }

    #[inline]
    fn score(&self, weights: &WeightVector, left: &[i64], right: &[i64])
        -> f64
    {
        self.scorer.score(weights, left, right)
    }
}
