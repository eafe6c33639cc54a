#![warn(missing_docs)]

//!
//! A crate that grows binary decision trees whose splits are chosen
//! by a weighted vote of eleven split criteria.
//!
//! At each node, every criterion is tried alone:
//! a shallow probe tree is grown with it on the node's examples,
//! and the number of positive examples the probe tree misses
//! (false negatives) decides the criterion's voting weight.
//! The candidate split with the largest normalized, weighted vote wins.
//!
//! ```no_run
//! use weighted_split_tree::prelude::*;
//!
//! let rows = vec![vec![1.0], vec![2.0], vec![3.0], vec![4.0]];
//! let labels = vec![0, 0, 1, 1];
//!
//! let learner = WeightedTreeBuilder::new()
//!     .max_depth(3)
//!     .positive_label(1)
//!     .build()
//!     .unwrap();
//! let tree = learner.fit_rows(&rows, &labels).unwrap();
//!
//! let predictions = tree.predict(&rows).unwrap();
//! tree.report().print();
//! ```

pub mod criterion;
pub mod error;
pub mod sample;
pub mod voting;
pub mod weights;
pub mod tree;
pub mod report;
pub mod classifier;

pub mod prelude;

pub use criterion::{Criterion, Polarity};
pub use error::TreeError;
pub use sample::{Sample, Feature};
pub use voting::{SplitScorer, CriterionScorer, VotingScorer, PolarityPolicy};
pub use weights::{WeightEstimator, WeightScheme, WeightVector};
pub use tree::{
    TreeConfig,
    WeightedTree,
    WeightedTreeBuilder,
    WeightedTreeClassifier,
    WeightingMode,
};
pub use report::FitReport;
pub use classifier::Classifier;
