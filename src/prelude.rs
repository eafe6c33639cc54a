//! Exports the learner, its configuration and the data types.
//!
pub use crate::criterion::{
    Criterion,
    Polarity,
};


pub use crate::sample::{
    Sample,
    Feature,
};


pub use crate::tree::{
    // Learner
    WeightedTree,
    WeightedTreeBuilder,
    TreeConfig,
    WeightingMode,

    // Trained model
    WeightedTreeClassifier,
    Node,
};


pub use crate::voting::{
    SplitScorer,
    CriterionScorer,
    VotingScorer,
    PolarityPolicy,
};


pub use crate::weights::{
    WeightEstimator,
    WeightScheme,
    WeightVector,
};


pub use crate::classifier::Classifier;
pub use crate::report::FitReport;
pub use crate::error::TreeError;
