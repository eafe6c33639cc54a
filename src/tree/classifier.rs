//! Defines the weighted decision tree classifier.
use crate::Classifier;
use crate::error::TreeError;
use crate::report::FitReport;
use crate::sample::Sample;

use super::node::*;

use std::path::Path;
use std::fs::File;
use std::io::prelude::*;

/// Weighted decision tree classifier.
/// Owns the root `Node` and the classes seen at fit time.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedTreeClassifier {
    root: Node,
    classes: Vec<i64>,
    feature_names: Vec<String>,
    report: FitReport,
}

impl WeightedTreeClassifier {
    #[inline]
    pub(super) fn from_components(
        root: Node,
        classes: Vec<i64>,
        feature_names: Vec<String>,
        report: FitReport,
    ) -> Self
    {
        Self { root, classes, feature_names, report }
    }

    /// Returns the root node.
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Returns the classes seen at fit time, ascending.
    pub fn classes(&self) -> &[i64] {
        &self.classes[..]
    }

    /// Returns the number of features the tree was fitted on.
    pub fn n_feature(&self) -> usize {
        self.feature_names.len()
    }

    /// Length of the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    /// Number of leaves.
    pub fn n_leaves(&self) -> usize {
        self.root.n_leaves()
    }

    /// Statistics of the fit that produced this tree.
    pub fn report(&self) -> &FitReport {
        &self.report
    }

    /// Predicts the class of every row.
    pub fn predict<R>(&self, rows: &[R]) -> Result<Vec<i64>, TreeError>
        where R: AsRef<[f64]>,
    {
        self.predict_all(rows)
    }

    /// Class frequencies of the leaf each row reaches,
    /// aligned with [`WeightedTreeClassifier::classes`].
    pub fn predict_proba<R>(&self, rows: &[R])
        -> Result<Vec<Vec<f64>>, TreeError>
        where R: AsRef<[f64]>,
    {
        rows.iter()
            .map(|row| {
                let row = self.check_width(row.as_ref())?;
                Ok(self.root.leaf_of_row(row).distribution().to_vec())
            })
            .collect()
    }

    /// Predicts the class of every example of `sample`.
    pub fn predict_sample(&self, sample: &Sample)
        -> Result<Vec<i64>, TreeError>
    {
        let (n_sample, n_feature) = sample.shape();
        if n_feature != self.n_feature() {
            return Err(TreeError::ShapeMismatch {
                expected: self.n_feature(),
                found: n_feature,
            });
        }
        let predictions = (0..n_sample)
            .map(|i| self.root.leaf(sample, i).prediction())
            .collect();
        Ok(predictions)
    }

    /// Write the current decision tree to dot file.
    #[inline]
    pub fn to_dot_file<P>(&self, path: P) -> std::io::Result<()>
        where P: AsRef<Path>
    {
        let mut f = File::create(path)?;
        f.write_all(b"graph WeightedTree {\n")?;

        let names = self.feature_names.iter()
            .map(String::as_str)
            .collect::<Vec<_>>();
        let info = self.root.to_dot_info(0, &names).0;
        for row in info {
            f.write_all(row.as_bytes())?;
        }

        f.write_all(b"}\n")?;

        Ok(())
    }

    #[inline]
    fn check_width<'a>(&self, row: &'a [f64]) -> Result<&'a [f64], TreeError> {
        if row.len() != self.n_feature() {
            return Err(TreeError::ShapeMismatch {
                expected: self.n_feature(),
                found: row.len(),
            });
        }
        Ok(row)
    }
}

impl Classifier for WeightedTreeClassifier {
    fn predict_row(&self, row: &[f64]) -> Result<i64, TreeError> {
        let row = self.check_width(row)?;
        Ok(self.root.leaf_of_row(row).prediction())
    }
}
