//! Recursive growing of a tree from the rows of a `Sample`.
use rayon::prelude::*;
use tracing::debug;

use crate::criterion::ClassCounts;
use crate::error::TreeError;
use crate::sample::Sample;
use crate::weights::WeightVector;

use super::node::*;
use super::policy::SplitPolicy;
use super::splitter::*;

/// The maximal depth set as default.
pub const DEFAULT_MAX_DEPTH: usize = 5;
/// The minimal number of examples a node needs to be split.
pub const DEFAULT_MIN_SAMPLES_SPLIT: usize = 2;
/// The number of candidate thresholds per feature set as default.
pub const DEFAULT_MAX_CANDIDATES: usize = 255;
/// The maximal depth of the probe trees set as default.
pub const DEFAULT_PROBE_MAX_DEPTH: usize = 10;

/// Stopping and candidate parameters of a grower.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct GrowParams {
    pub(crate) max_depth: usize,
    pub(crate) min_samples_split: usize,
    pub(crate) max_candidates: usize,
}

impl GrowParams {
    /// Parameters of the single-criterion probe trees.
    pub(crate) fn probe() -> Self {
        Self {
            max_depth: DEFAULT_PROBE_MAX_DEPTH,
            min_samples_split: DEFAULT_MIN_SAMPLES_SPLIT,
            max_candidates: DEFAULT_MAX_CANDIDATES,
        }
    }
}

/// Counters collected while growing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct GrowStats {
    pub(crate) candidates_scored: usize,
}

/// Grows a tree over the rows of `sample`.
/// The split rule is supplied by a [`SplitPolicy`].
pub(crate) struct Grower<'a> {
    sample: &'a Sample,
    classes: &'a [i64],
    params: GrowParams,
}

impl<'a> Grower<'a> {
    pub(crate) fn new(
        sample: &'a Sample,
        classes: &'a [i64],
        params: GrowParams,
    ) -> Self
    {
        Self { sample, classes, params }
    }

    /// Grows the subtree over the rows `indices`
    /// whose root is at depth `depth`.
    pub(crate) fn grow<P>(
        &self,
        policy: &mut P,
        indices: Vec<usize>,
        depth: Depth,
        inherited: &WeightVector,
        stats: &mut GrowStats,
    ) -> Result<Box<Node>, TreeError>
        where P: SplitPolicy,
    {
        let target = self.sample.target();
        let labels = indices.iter()
            .map(|&i| target[i])
            .collect::<Vec<_>>();
        let counts = ClassCounts::from_labels(&labels);

        // Stopping conditions.
        if depth >= self.params.max_depth
            || counts.n_classes() <= 1
            || indices.len() < self.params.min_samples_split
        {
            return self.leaf(&counts);
        }

        let weights = policy.prepare(self.sample, &indices[..], inherited);

        let (n_candidates, best) = self.best_split(
            &*policy, &weights, &indices[..]
        );
        stats.candidates_scored += n_candidates;

        // No candidate threshold exists.
        let Some((splitter, score)) = best else {
            return self.leaf(&counts);
        };

        debug!(
            depth = usize::from(depth),
            n_rows = indices.len(),
            feature = splitter.feature,
            threshold = splitter.threshold,
            score,
            "split node",
        );

        let mut lindices = Vec::new();
        let mut rindices = Vec::new();
        for i in indices.into_iter() {
            match splitter.split(self.sample, i) {
                LeftRight::Left  => { lindices.push(i); },
                LeftRight::Right => { rindices.push(i); },
            }
        }

        // If the split has no meaning, construct a leaf node.
        if lindices.is_empty() || rindices.is_empty() {
            return self.leaf(&counts);
        }

        let left = self.grow(policy, lindices, depth + 1, &weights, stats)?;
        let right = self.grow(policy, rindices, depth + 1, &weights, stats)?;

        let branch = BranchNode::from_raw(splitter, left, right);
        Ok(Box::new(Node::Branch(branch)))
    }

    fn leaf(&self, counts: &ClassCounts) -> Result<Box<Node>, TreeError> {
        let prediction = counts.majority().ok_or(TreeError::EmptySample)?;
        let distribution = self.classes.iter()
            .map(|&y| counts.proportion(y))
            .collect::<Vec<_>>();

        let leaf = LeafNode::from_raw(prediction, distribution, counts.total());
        Ok(Box::new(Node::Leaf(leaf)))
    }

    /// Returns the number of candidates scored and the best split.
    /// Ties keep the first candidate, features and thresholds ascending.
    fn best_split<P>(
        &self,
        policy: &P,
        weights: &WeightVector,
        indices: &[usize],
    ) -> (usize, Option<(Splitter, f64)>)
        where P: SplitPolicy,
    {
        let (_, n_feature) = self.sample.shape();
        let per_feature = (0..n_feature).into_par_iter()
            .map(|j| self.best_threshold(policy, weights, indices, j))
            .collect::<Vec<_>>();

        let mut n_candidates = 0;
        let mut best: Option<(Splitter, f64)> = None;
        for (j, (n, found)) in per_feature.into_iter().enumerate() {
            n_candidates += n;
            let Some((threshold, score)) = found else { continue; };
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((Splitter::new(j, threshold), score));
            }
        }

        (n_candidates, best)
    }

    fn best_threshold<P>(
        &self,
        policy: &P,
        weights: &WeightVector,
        indices: &[usize],
        feature: usize,
    ) -> (usize, Option<(f64, f64)>)
        where P: SplitPolicy,
    {
        let target = self.sample.target();
        let mut pairs = indices.iter()
            .map(|&i| (self.sample.value(i, feature), target[i]))
            .collect::<Vec<_>>();
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

        let values = pairs.iter().map(|p| p.0).collect::<Vec<_>>();
        let labels = pairs.iter().map(|p| p.1).collect::<Vec<_>>();

        let mut distinct = values.clone();
        distinct.dedup();
        let thresholds = candidate_thresholds(
            &distinct, self.params.max_candidates
        );

        let mut best: Option<(f64, f64)> = None;
        for &threshold in &thresholds {
            let k = values.partition_point(|&v| v <= threshold);
            let score = policy.score(weights, &labels[..k], &labels[k..]);
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((threshold, score));
            }
        }

        (thresholds.len(), best)
    }
}
