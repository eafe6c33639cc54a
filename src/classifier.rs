//! The prediction interface of a trained model.
use crate::error::TreeError;

/// A trait that defines the function used by trained classifiers.
pub trait Classifier {
    /// Predicts the label of the given feature vector.
    fn predict_row(&self, row: &[f64]) -> Result<i64, TreeError>;

    /// Predicts the labels of the given feature vectors.
    fn predict_all<R>(&self, rows: &[R]) -> Result<Vec<i64>, TreeError>
        where R: AsRef<[f64]>,
              Self: Sized,
    {
        rows.iter()
            .map(|row| self.predict_row(row.as_ref()))
            .collect()
    }
}
