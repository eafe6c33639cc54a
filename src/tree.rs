//! The weighted decision tree: growing, configuration and prediction.

mod builder;
mod classifier;
mod grow;
mod node;
mod policy;
mod splitter;
mod wtree;

pub use builder::{
    TreeConfig,
    WeightedTreeBuilder,
    DEFAULT_POSITIVE_LABEL,
    DEFAULT_TEMPERATURE,
};
pub use classifier::WeightedTreeClassifier;
pub use grow::{
    DEFAULT_MAX_DEPTH,
    DEFAULT_MIN_SAMPLES_SPLIT,
    DEFAULT_MAX_CANDIDATES,
    DEFAULT_PROBE_MAX_DEPTH,
};
pub use node::{Node, BranchNode, LeafNode};
pub use policy::WeightingMode;
pub use splitter::{Depth, LeftRight, Splitter};
pub use wtree::WeightedTree;

pub(crate) use grow::{GrowParams, GrowStats, Grower};
pub(crate) use policy::FixedPolicy;
