use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::criterion::Criterion;
use crate::sample::Sample;

/// Identifies the rows a probe tree was fitted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct FnKey {
    criterion:   Criterion,
    fingerprint: u64,
    n_rows:      usize,
}

impl FnKey {
    pub(crate) fn new(criterion: Criterion, fingerprint: u64, n_rows: usize)
        -> Self
    {
        Self { criterion, fingerprint, n_rows }
    }
}

/// False-negative counts of the probe trees grown during one fit.
#[derive(Debug, Default)]
pub(crate) struct FnCache {
    counts: HashMap<FnKey, f64>,
    hits: usize,
}

impl FnCache {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn get(&mut self, key: &FnKey) -> Option<f64> {
        let value = self.counts.get(key).copied();
        if value.is_some() { self.hits += 1; }
        value
    }

    pub(crate) fn insert(&mut self, key: FnKey, false_negatives: f64) {
        self.counts.insert(key, false_negatives);
    }

    pub(crate) fn hits(&self) -> usize {
        self.hits
    }
}

/// Hash of the feature values and labels of the rows `indices`.
pub(crate) fn fingerprint(sample: &Sample, indices: &[usize]) -> u64 {
    let target = sample.target();
    let mut hasher = DefaultHasher::new();
    for &i in indices {
        for feature in sample.features() {
            feature[i].to_bits().hash(&mut hasher);
        }
        target[i].hash(&mut hasher);
    }
    hasher.finish()
}
