//! Struct `Sample` holds the training examples:
//! a dense numeric feature matrix and one class label per row.

// Provides feature struct.
pub(crate) mod feature_struct;
// Provides sample struct.
pub(crate) mod sample_struct;

pub use feature_struct::Feature;
pub use sample_struct::Sample;
