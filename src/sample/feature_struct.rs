use std::ops::Index;
use std::slice::Iter;

use crate::error::TreeError;

/// Dense representation of a feature (a column of the feature matrix).
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    /// Feature name
    pub(crate) name: String,
    /// Feature values, one per example.
    pub(crate) values: Vec<f64>,
}

impl Feature {
    /// Construct an empty feature named `name`.
    pub fn new<T: ToString>(name: T) -> Self {
        Self { name: name.to_string(), values: Vec::new() }
    }

    /// Construct a feature from its values.
    pub fn with_values<T: ToString>(name: T, values: Vec<f64>) -> Self {
        Self { name: name.to_string(), values }
    }

    /// Get the feature name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the values of this feature.
    pub fn values(&self) -> &[f64] {
        &self.values[..]
    }

    /// Returns an iterator over the values.
    pub fn iter(&self) -> Iter<'_, f64> {
        self.values.iter()
    }

    /// Returns the number of items in this feature.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the feature has no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub(crate) fn append(&mut self, x: f64) {
        self.values.push(x);
    }

    pub(crate) fn replace_name<S: ToString>(&mut self, name: S) -> String {
        std::mem::replace(&mut self.name, name.to_string())
    }

    /// Converts this column into class labels.
    /// Every value must be an integer.
    pub(crate) fn into_target(self) -> Result<Vec<i64>, TreeError> {
        self.values.into_iter()
            .map(|x| {
                if x.is_finite() && x.trunc() == x {
                    Ok(x as i64)
                } else {
                    Err(TreeError::Parse(format!("{x} (label)")))
                }
            })
            .collect()
    }
}

impl Index<usize> for Feature {
    type Output = f64;

    fn index(&self, idx: usize) -> &Self::Output {
        &self.values[idx]
    }
}
