use serde::{Serialize, Deserialize};

use std::fs;
use std::path::Path;
use std::collections::BTreeMap;

use crate::criterion::Criterion;
use crate::error::TreeError;
use crate::voting::PolarityPolicy;
use crate::weights::WeightScheme;

use super::grow::*;
use super::policy::WeightingMode;
use super::wtree::WeightedTree;

/// The positive class set as default.
pub const DEFAULT_POSITIVE_LABEL: i64 = 1;
/// The softmax temperature set as default.
pub const DEFAULT_TEMPERATURE: f64 = 1.0;

/// Parameters of a [`WeightedTree`].
///
/// Every field has a default, so a JSON file only needs
/// to name the parameters it changes:
/// ```text
/// {
///     "max_depth": 3,
///     "criteria": { "marshall": false },
///     "polarity": "exclude_impurity"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Nodes at this depth become leaves. The root has depth `0`.
    pub max_depth: usize,
    /// Nodes with fewer examples become leaves.
    pub min_samples_split: usize,
    /// The class whose false negatives the weights penalize.
    pub positive_label: i64,
    /// Softmax temperature of [`WeightScheme::Softmax`].
    pub temperature: f64,
    /// Enable map of the criteria. Missing criteria are enabled.
    pub criteria: BTreeMap<Criterion, bool>,
    /// How impurity criteria enter the vote.
    pub polarity: PolarityPolicy,
    /// When the weights are re-estimated.
    pub weighting: WeightingMode,
    /// How false-negative counts become weights.
    pub scheme: WeightScheme,
    /// Maximal depth of the single-criterion probe trees.
    pub probe_max_depth: usize,
    /// Number of candidate thresholds per feature and node.
    pub max_candidates: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        let criteria = Criterion::ALL.into_iter()
            .map(|c| (c, true))
            .collect();
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            min_samples_split: DEFAULT_MIN_SAMPLES_SPLIT,
            positive_label: DEFAULT_POSITIVE_LABEL,
            temperature: DEFAULT_TEMPERATURE,
            criteria,
            polarity: PolarityPolicy::default(),
            weighting: WeightingMode::default(),
            scheme: WeightScheme::default(),
            probe_max_depth: DEFAULT_PROBE_MAX_DEPTH,
            max_candidates: DEFAULT_MAX_CANDIDATES,
        }
    }
}

impl TreeConfig {
    /// Parse a configuration from JSON text.
    pub fn from_json(json: &str) -> Result<Self, TreeError> {
        let config = serde_json::from_str::<Self>(json)?;
        Ok(config)
    }

    /// Read a configuration from a JSON file.
    pub fn from_json_file<P>(path: P) -> Result<Self, TreeError>
        where P: AsRef<Path>,
    {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Serialize this configuration to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, TreeError> {
        let json = serde_json::to_string_pretty(self)?;
        Ok(json)
    }

    /// Returns the enabled criteria in canonical order.
    pub fn enabled(&self) -> Vec<Criterion> {
        Criterion::ALL.into_iter()
            .filter(|c| self.criteria.get(c).copied().unwrap_or(true))
            .collect()
    }

    /// Checks the parameters and returns the voting pool.
    pub fn validate(&self) -> Result<Vec<Criterion>, TreeError> {
        if self.max_depth < 1 {
            return Err(TreeError::Configuration(
                "`max_depth` must be at least 1".into()
            ));
        }
        if self.min_samples_split < 2 {
            return Err(TreeError::Configuration(
                "`min_samples_split` must be at least 2".into()
            ));
        }
        if !(self.temperature.is_finite() && self.temperature > 0f64) {
            return Err(TreeError::Configuration(format!(
                "`temperature` must be positive, got {}", self.temperature
            )));
        }
        if self.probe_max_depth < 1 {
            return Err(TreeError::Configuration(
                "`probe_max_depth` must be at least 1".into()
            ));
        }
        if self.max_candidates < 1 {
            return Err(TreeError::Configuration(
                "`max_candidates` must be at least 1".into()
            ));
        }

        self.polarity.pool(self.enabled())
    }
}

/// A struct that builds [`WeightedTree`].
/// `WeightedTreeBuilder` keeps parameters for constructing `WeightedTree`.
///
/// # Example
///
/// ```no_run
/// use weighted_split_tree::prelude::*;
///
/// let learner = WeightedTreeBuilder::new()
///     .max_depth(3)
///     .positive_label(1)
///     .disable(Criterion::Marshall)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Default)]
pub struct WeightedTreeBuilder {
    config: TreeConfig,
}

impl WeightedTreeBuilder {
    /// Construct a new instance of [`WeightedTreeBuilder`].
    /// By default, [`WeightedTreeBuilder`] sets the parameters as follows;
    /// ```text
    /// max_depth: DEFAULT_MAX_DEPTH == 5,
    /// min_samples_split: DEFAULT_MIN_SAMPLES_SPLIT == 2,
    /// positive_label: DEFAULT_POSITIVE_LABEL == 1,
    /// temperature: DEFAULT_TEMPERATURE == 1.0,
    /// criteria: all eleven,
    /// polarity: PolarityPolicy::Invert,
    /// weighting: WeightingMode::PerNode,
    /// scheme: WeightScheme::Softmax,
    /// probe_max_depth: DEFAULT_PROBE_MAX_DEPTH == 10,
    /// max_candidates: DEFAULT_MAX_CANDIDATES == 255,
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration.
    pub fn from_config(config: TreeConfig) -> Self {
        Self { config }
    }

    /// Specify the maximal depth of the tree.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.config.max_depth = depth;
        self
    }

    /// Specify the minimal number of examples a node needs to be split.
    pub fn min_samples_split(mut self, n: usize) -> Self {
        self.config.min_samples_split = n;
        self
    }

    /// Set the class whose false negatives are penalized.
    pub fn positive_label(mut self, label: i64) -> Self {
        self.config.positive_label = label;
        self
    }

    /// Set the softmax temperature.
    pub fn temperature(mut self, temperature: f64) -> Self {
        self.config.temperature = temperature;
        self
    }

    /// Vote with exactly the given criteria.
    pub fn criteria<I>(mut self, criteria: I) -> Self
        where I: IntoIterator<Item = Criterion>,
    {
        self.config.criteria = Criterion::ALL.into_iter()
            .map(|c| (c, false))
            .collect();
        for c in criteria {
            self.config.criteria.insert(c, true);
        }
        self
    }

    /// Add `criterion` to the vote.
    pub fn enable(mut self, criterion: Criterion) -> Self {
        self.config.criteria.insert(criterion, true);
        self
    }

    /// Remove `criterion` from the vote.
    pub fn disable(mut self, criterion: Criterion) -> Self {
        self.config.criteria.insert(criterion, false);
        self
    }

    /// Set the polarity policy. Default is [`PolarityPolicy::Invert`].
    pub fn polarity(mut self, polarity: PolarityPolicy) -> Self {
        self.config.polarity = polarity;
        self
    }

    /// Set the weighting mode. Default is [`WeightingMode::PerNode`].
    pub fn weighting(mut self, weighting: WeightingMode) -> Self {
        self.config.weighting = weighting;
        self
    }

    /// Set the weighting scheme. Default is [`WeightScheme::Softmax`].
    pub fn scheme(mut self, scheme: WeightScheme) -> Self {
        self.config.scheme = scheme;
        self
    }

    /// Specify the maximal depth of the probe trees.
    pub fn probe_max_depth(mut self, depth: usize) -> Self {
        self.config.probe_max_depth = depth;
        self
    }

    /// Specify the number of candidate thresholds per feature.
    pub fn max_candidates(mut self, n: usize) -> Self {
        self.config.max_candidates = n;
        self
    }

    /// Build a [`WeightedTree`].
    /// Fails if a parameter is out of range or no criterion votes.
    pub fn build(self) -> Result<WeightedTree, TreeError> {
        let pool = self.config.validate()?;
        Ok(WeightedTree::from_components(self.config, pool))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pool() {
        let pool = TreeConfig::default().validate().unwrap();
        assert_eq!(pool, Criterion::ALL.to_vec());
    }

    #[test]
    fn test_partial_json() {
        let json = r#"{
            "max_depth": 3,
            "criteria": { "marshall": false, "gini": true },
            "polarity": "exclude_impurity",
            "scheme": "inverse_false_negatives"
        }"#;
        let config = TreeConfig::from_json(json).unwrap();
        assert_eq!(config.max_depth, 3);
        assert_eq!(config.min_samples_split, DEFAULT_MIN_SAMPLES_SPLIT);
        assert_eq!(config.scheme, WeightScheme::InverseFalseNegatives);

        let pool = config.validate().unwrap();
        assert_eq!(pool.len(), 8);
        assert!(!pool.contains(&Criterion::Marshall));
    }

    #[test]
    fn test_json_roundtrip() {
        let config = TreeConfig {
            weighting: WeightingMode::RootOnly,
            ..TreeConfig::default()
        };
        let json = config.to_json().unwrap();
        assert_eq!(TreeConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_unknown_criterion_is_rejected() {
        let json = r#"{ "criteria": { "entropy": true } }"#;
        assert!(matches!(
            TreeConfig::from_json(json),
            Err(TreeError::Json(_))
        ));
    }

    #[test]
    fn test_invalid_parameters() {
        let builders = [
            WeightedTreeBuilder::new().max_depth(0),
            WeightedTreeBuilder::new().min_samples_split(1),
            WeightedTreeBuilder::new().temperature(0.0),
            WeightedTreeBuilder::new().temperature(f64::NAN),
            WeightedTreeBuilder::new().probe_max_depth(0),
            WeightedTreeBuilder::new().max_candidates(0),
            WeightedTreeBuilder::new().criteria([]),
            WeightedTreeBuilder::new()
                .criteria([Criterion::Gini, Criterion::Dkm])
                .polarity(PolarityPolicy::ExcludeImpurity),
        ];
        for builder in builders {
            let res = builder.build();
            assert!(
                matches!(res, Err(TreeError::Configuration(_))),
                "expected a configuration error, got {res:?}",
            );
        }
    }
}
