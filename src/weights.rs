//! Per-node voting weights.
//!
//! Each criterion of the pool is weighted by how few positive examples
//! a tree grown with that criterion alone misclassifies on the node.

mod cache;
mod estimator;
mod weight_vector;

pub use estimator::{WeightEstimator, WeightScheme, false_negatives};
pub use weight_vector::WeightVector;
