use std::path::Path;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::collections::{BTreeSet, HashMap};

use polars::prelude::*;
use rayon::prelude::*;

use super::feature_struct::*;
use crate::error::TreeError;

/// Struct `Sample` holds a batch of labeled examples.
/// Features are stored column by column.
#[derive(Debug, Clone)]
pub struct Sample {
    pub(super) name_to_index: HashMap<String, usize>,
    pub(super) features: Vec<Feature>,
    pub(super) target: Vec<i64>,
    pub(super) n_sample: usize,
    pub(super) n_feature: usize,
}

impl Sample {
    /// Construct a `Sample` from a row-major feature matrix
    /// and one label per row.
    /// Features are named `Feat. [1]`, `Feat. [2]`, ...
    pub fn from_rows<R>(rows: &[R], target: Vec<i64>)
        -> Result<Self, TreeError>
        where R: AsRef<[f64]>,
    {
        let n_sample = rows.len();
        if n_sample != target.len() {
            return Err(TreeError::ShapeMismatch {
                expected: n_sample,
                found: target.len(),
            });
        }
        let n_feature = rows.first()
            .map(|row| row.as_ref().len())
            .ok_or(TreeError::EmptySample)?;

        let mut features = (1..=n_feature)
            .map(|i| Feature::new(format!("Feat. [{i}]")))
            .collect::<Vec<_>>();

        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != n_feature {
                return Err(TreeError::RaggedRow {
                    row: i,
                    expected: n_feature,
                    found: row.len(),
                });
            }
            for (feat, &x) in features.iter_mut().zip(row) {
                feat.append(x);
            }
        }

        Self::from_features(features, target)
    }

    /// Construct a `Sample` from named columns.
    pub fn from_columns(features: Vec<Feature>, target: Vec<i64>)
        -> Result<Self, TreeError>
    {
        Self::from_features(features, target)
    }

    /// Convert `polars::DataFrame` and `polars::Series` into `Sample`.
    /// Every column of `data` is cast to `f64`,
    /// `target` is cast to `i64`.
    pub fn from_dataframe(data: DataFrame, target: Series)
        -> Result<Self, TreeError>
    {
        let target = target.cast(&DataType::Int64)?
            .i64()?
            .into_iter()
            .enumerate()
            .map(|(i, y)| {
                y.ok_or_else(|| TreeError::Parse(format!("null label at row {i}")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let features = data.get_columns()
            .par_iter()
            .map(|series| -> Result<Feature, TreeError> {
                let name = series.name().to_string();
                let values = series.cast(&DataType::Float64)?
                    .f64()?
                    .into_iter()
                    .enumerate()
                    .map(|(i, x)| {
                        x.ok_or_else(|| {
                            TreeError::Parse(format!("null in `{name}` at row {i}"))
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Feature::with_values(name, values))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_features(features, target)
    }

    /// Read a CSV format file to `Sample` type.
    /// The target column is not set;
    /// call [`Sample::set_target`] afterwards.
    pub fn from_csv<P>(file: P, has_header: bool) -> Result<Self, TreeError>
        where P: AsRef<Path>,
    {
        let file = File::open(file)?;
        Self::from_reader(BufReader::new(file), has_header)
    }

    /// Read CSV text from `reader`.
    /// The target column is not set;
    /// call [`Sample::set_target`] afterwards.
    pub fn from_reader<R>(reader: R, has_header: bool)
        -> Result<Self, TreeError>
        where R: BufRead,
    {
        let mut lines = reader.lines();

        let mut features = Vec::new();
        if has_header {
            let line = lines.next().ok_or(TreeError::EmptySample)??;
            features = line.split(',')
                .map(|name| Feature::new(name.trim()))
                .collect::<Vec<_>>();
        }

        for (row, line) in lines.enumerate() {
            let line = line?;
            if line.trim().is_empty() { continue; }

            let xs = line.split(',')
                .enumerate()
                .map(|(feature, x)| {
                    let x = x.trim();
                    let value = x.parse::<f64>()
                        .map_err(|_| TreeError::Parse(x.to_string()))?;
                    if !value.is_finite() {
                        return Err(TreeError::NonFiniteValue { row, feature });
                    }
                    Ok(value)
                })
                .collect::<Result<Vec<_>, _>>()?;

            // If the header does not exist,
            // construct a dummy header.
            if features.is_empty() {
                features = (1..=xs.len())
                    .map(|i| Feature::new(format!("Feat. [{i}]")))
                    .collect();
            }

            if xs.len() != features.len() {
                return Err(TreeError::RaggedRow {
                    row,
                    expected: features.len(),
                    found: xs.len(),
                });
            }

            for (feat, x) in features.iter_mut().zip(xs) {
                feat.append(x);
            }
        }

        let n_sample = features.first().map_or(0, Feature::len);
        let n_feature = features.len();
        let name_to_index = index_names(&features);

        Ok(Self {
            name_to_index,
            features,
            target: Vec::with_capacity(0),
            n_sample,
            n_feature,
        })
    }

    /// Set the feature of name `target` to `self.target`.
    /// The old target is dropped.
    /// The remaining columns are checked like [`Sample::from_columns`].
    pub fn set_target<S: AsRef<str>>(mut self, target: S)
        -> Result<Self, TreeError>
    {
        let target = target.as_ref();
        let pos = self.features.iter()
            .position(|feat| feat.name() == target)
            .ok_or_else(|| TreeError::MissingColumn(target.to_string()))?;

        let target = self.features.remove(pos).into_target()?;
        Self::from_features(self.features, target)
    }

    fn from_features(features: Vec<Feature>, target: Vec<i64>)
        -> Result<Self, TreeError>
    {
        let n_feature = features.len();
        let n_sample = features.first()
            .map(Feature::len)
            .ok_or(TreeError::EmptySample)?;
        if n_sample == 0 {
            return Err(TreeError::EmptySample);
        }

        for (j, feat) in features.iter().enumerate() {
            if feat.len() != n_sample {
                return Err(TreeError::ShapeMismatch {
                    expected: n_sample,
                    found: feat.len(),
                });
            }
            if let Some(row) = feat.iter().position(|x| !x.is_finite()) {
                return Err(TreeError::NonFiniteValue { row, feature: j });
            }
        }

        if target.len() != n_sample {
            return Err(TreeError::ShapeMismatch {
                expected: n_sample,
                found: target.len(),
            });
        }

        let name_to_index = index_names(&features);
        Ok(Self { name_to_index, features, target, n_sample, n_feature })
    }

    /// Returns the class labels.
    pub fn target(&self) -> &[i64] {
        &self.target[..]
    }

    /// Returns a slice of type `Feature`.
    pub fn features(&self) -> &[Feature] {
        &self.features[..]
    }

    /// Returns the feature named `name`.
    pub fn feature<S: AsRef<str>>(&self, name: S) -> Option<&Feature> {
        self.name_to_index.get(name.as_ref())
            .map(|&k| &self.features[k])
    }

    /// Returns the pair of the number of examples and
    /// the number of features
    pub fn shape(&self) -> (usize, usize) {
        (self.n_sample, self.n_feature)
    }

    /// Returns the value of feature `feature` at row `row`.
    #[inline]
    pub fn value(&self, row: usize, feature: usize) -> f64 {
        self.features[feature][row]
    }

    /// Returns the feature vector of the `idx`-th instance.
    pub fn row(&self, idx: usize) -> Vec<f64> {
        self.features.iter()
            .map(|feat| feat[idx])
            .collect::<Vec<f64>>()
    }

    /// Returns the distinct labels in ascending order.
    pub fn classes(&self) -> Vec<i64> {
        self.target.iter()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Set the feature (column) names and return the old ones.
    pub fn replace_names<S, T>(&mut self, names: T)
        -> Result<Vec<String>, TreeError>
        where S: ToString,
              T: AsRef<[S]>,
    {
        let names = names.as_ref();
        if names.len() != self.n_feature {
            return Err(TreeError::ShapeMismatch {
                expected: self.n_feature,
                found: names.len(),
            });
        }

        let old_names = names.iter()
            .zip(&mut self.features[..])
            .map(|(name, feature)| feature.replace_name(name.to_string()))
            .collect();

        self.name_to_index = index_names(&self.features);
        Ok(old_names)
    }
}

fn index_names(features: &[Feature]) -> HashMap<String, usize> {
    features.iter()
        .enumerate()
        .map(|(i, f)| (f.name().to_string(), i))
        .collect()
}
