use tracing::{info, warn};

use std::fmt;

use crate::criterion::Criterion;
use crate::error::TreeError;
use crate::report::FitReport;
use crate::sample::Sample;
use crate::weights::{WeightEstimator, WeightVector};

use super::builder::TreeConfig;
use super::classifier::WeightedTreeClassifier;
use super::grow::*;
use super::policy::VotingPolicy;
use super::splitter::Depth;

/// Decision tree whose splits are chosen by a weighted vote
/// of several criteria.
///
/// The weights prefer the criteria that, grown alone on the node,
/// miss the fewest examples of the positive class.
/// Construct it with [`WeightedTreeBuilder`](super::WeightedTreeBuilder).
#[derive(Debug, Clone)]
pub struct WeightedTree {
    config: TreeConfig,
    pool: Vec<Criterion>,
}

impl WeightedTree {
    #[inline]
    pub(super) fn from_components(config: TreeConfig, pool: Vec<Criterion>)
        -> Self
    {
        Self { config, pool }
    }

    /// Returns the configuration of this learner.
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Returns the voting criteria.
    pub fn pool(&self) -> &[Criterion] {
        &self.pool[..]
    }

    /// Grow a tree on `sample`.
    ///
    /// Every call starts from an empty false-negative cache,
    /// so fitting the same sample twice yields the same tree.
    pub fn fit(&self, sample: &Sample)
        -> Result<WeightedTreeClassifier, TreeError>
    {
        let (n_sample, n_feature) = sample.shape();
        if n_sample == 0 {
            return Err(TreeError::EmptySample);
        }
        if sample.target().len() != n_sample {
            return Err(TreeError::ShapeMismatch {
                expected: n_sample,
                found: sample.target().len(),
            });
        }

        let classes = sample.classes();
        let positive = self.config.positive_label;
        if !classes.contains(&positive) {
            warn!(
                positive,
                "the positive label does not occur; \
                 every criterion has zero false negatives",
            );
        }

        info!(
            n_sample,
            n_feature,
            n_criteria = self.pool.len(),
            max_depth = self.config.max_depth,
            "fitting weighted tree",
        );

        let estimator = WeightEstimator::new(self.pool.clone(), positive)
            .temperature(self.config.temperature)
            .scheme(self.config.scheme)
            .probe_max_depth(self.config.probe_max_depth)
            .max_candidates(self.config.max_candidates);
        let mut policy = VotingPolicy::new(estimator, self.config.weighting);

        let params = GrowParams {
            max_depth: self.config.max_depth,
            min_samples_split: self.config.min_samples_split,
            max_candidates: self.config.max_candidates,
        };
        let grower = Grower::new(sample, &classes, params);
        let mut stats = GrowStats::default();
        let uniform = WeightVector::uniform(&self.pool);

        let root = grower.grow(
            &mut policy,
            (0..n_sample).collect(),
            Depth::from(0),
            &uniform,
            &mut stats,
        )?;

        let report = FitReport::new(&root, policy.estimator(), &stats);
        info!(
            nodes = report.nodes,
            leaves = report.leaves,
            depth = report.depth,
            probe_fits = report.probe_fits,
            "fitted weighted tree",
        );

        let names = sample.features()
            .iter()
            .map(|feat| feat.name().to_string())
            .collect();
        Ok(WeightedTreeClassifier::from_components(
            *root, classes, names, report,
        ))
    }

    /// Grow a tree on a row-major feature matrix and its labels.
    pub fn fit_rows<R>(&self, rows: &[R], labels: &[i64])
        -> Result<WeightedTreeClassifier, TreeError>
        where R: AsRef<[f64]>,
    {
        let sample = Sample::from_rows(rows, labels.to_vec())?;
        self.fit(&sample)
    }
}

impl fmt::Display for WeightedTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.config;
        writeln!(
            f,
            "\
            ----------\n\
            # Weighted Split Tree\n\n\
            - Max depth: {}\n\
            - Min samples split: {}\n\
            - Positive label: {}\n\
            - Temperature: {}\n\
            - Polarity: {}\n\
            - Weighting: {} ({})\n\
            - Probe depth: {}\n\
            - Max candidates: {}\n\
            - Criteria:\
            ",
            c.max_depth,
            c.min_samples_split,
            c.positive_label,
            c.temperature,
            c.polarity,
            c.weighting,
            c.scheme,
            c.probe_max_depth,
            c.max_candidates,
        )?;

        for criterion in &self.pool {
            writeln!(f, "\t* {criterion}")?;
        }
        write!(f, "----------")
    }
}
