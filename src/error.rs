//! Error type shared by the whole crate.
use crate::criterion::Criterion;
use polars::prelude::PolarsError;
use thiserror::Error;

use std::io;

/// Errors produced while preparing data, configuring, or growing a tree.
///
/// Only [`TreeError::Configuration`] and [`TreeError::ShapeMismatch`]
/// (plus the data-loading variants) ever reach the caller of
/// [`WeightedTree::fit`](crate::WeightedTree::fit).
/// [`TreeError::InvalidPartition`] and
/// [`TreeError::DegenerateWeightEstimate`] are absorbed inside the
/// induction engine.
#[derive(Debug, Error)]
pub enum TreeError {
    /// Both sides of a partition are empty.
    #[error("both branches of the partition are empty")]
    InvalidPartition,

    /// A single-criterion probe tree could not be grown.
    #[error("false-negative estimate for `{criterion}` is degenerate: {reason}")]
    DegenerateWeightEstimate {
        /// The criterion of the probe tree.
        criterion: Criterion,
        /// Why the probe tree failed.
        reason:    String,
    },

    /// Invalid parameter passed to the builder.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// The number of feature rows differs from the number of labels,
    /// or a prediction row has the wrong width.
    #[error("shape mismatch: expected {expected}, got {found}")]
    ShapeMismatch {
        /// The required length.
        expected: usize,
        /// The length given.
        found:    usize,
    },

    /// The sample has no rows or no features.
    #[error("the sample is empty")]
    EmptySample,

    /// A row of the feature matrix has a different width than the first.
    #[error("row {row} has {found} features, expected {expected}")]
    RaggedRow {
        /// Index of the offending row.
        row:      usize,
        /// Width of the first row.
        expected: usize,
        /// Width of the offending row.
        found:    usize,
    },

    /// NaN or infinite feature value.
    #[error("non-finite value at row {row}, feature {feature}")]
    NonFiniteValue {
        /// Row index.
        row:     usize,
        /// Feature index.
        feature: usize,
    },

    /// A column requested by name does not exist.
    #[error("column `{0}` does not exist")]
    MissingColumn(String),

    /// Failed to parse a value from text input.
    #[error("cannot parse `{0}`")]
    Parse(String),

    /// Reading a file failed.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// A `polars` column could not be converted.
    #[error(transparent)]
    Polars(#[from] PolarsError),

    /// A JSON configuration could not be parsed.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
