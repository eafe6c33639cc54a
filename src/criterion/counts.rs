//! Class histograms and contingency tables over label slices.
use std::collections::BTreeMap;

/// Histogram of class labels.
/// Labels are kept in ascending order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ClassCounts {
    counts: BTreeMap<i64, usize>,
    total:  usize,
}

impl ClassCounts {
    pub(crate) fn from_labels(labels: &[i64]) -> Self {
        let mut counts = BTreeMap::new();
        for &y in labels {
            *counts.entry(y).or_insert(0_usize) += 1;
        }
        Self { counts, total: labels.len() }
    }

    #[inline]
    pub(crate) fn total(&self) -> usize {
        self.total
    }

    #[inline]
    pub(crate) fn get(&self, label: i64) -> usize {
        self.counts.get(&label).copied().unwrap_or(0)
    }

    /// Number of distinct labels.
    #[inline]
    pub(crate) fn n_classes(&self) -> usize {
        self.counts.len()
    }

    #[inline]
    pub(crate) fn iter(&self) -> impl Iterator<Item = (i64, usize)> + '_ {
        self.counts.iter().map(|(&y, &c)| (y, c))
    }

    /// Relative frequency of `label`, `0` on an empty histogram.
    #[inline]
    pub(crate) fn proportion(&self, label: i64) -> f64 {
        if self.total == 0 { return 0f64; }
        self.get(label) as f64 / self.total as f64
    }

    /// The most frequent label. Ties go to the smallest label.
    pub(crate) fn majority(&self) -> Option<i64> {
        let mut best: Option<(i64, usize)> = None;
        for (y, c) in self.iter() {
            match best {
                Some((_, bc)) if bc >= c => {},
                _ => { best = Some((y, c)); },
            }
        }
        best.map(|(y, _)| y)
    }

    /// Ascending union of the labels of `self` and `other`.
    pub(crate) fn union(&self, other: &Self) -> Vec<i64> {
        let mut labels = self.counts.keys()
            .chain(other.counts.keys())
            .copied()
            .collect::<Vec<_>>();
        labels.sort_unstable();
        labels.dedup();
        labels
    }
}

/// A `2 × k` table of observed counts, rows are the branches.
#[derive(Debug, Clone)]
pub(crate) struct Contingency {
    pub(crate) observed: [Vec<f64>; 2],
    pub(crate) row_totals: [f64; 2],
    pub(crate) col_totals: Vec<f64>,
    pub(crate) total: f64,
}

impl Contingency {
    pub(crate) fn from_partition(left: &[i64], right: &[i64]) -> Self {
        let left = ClassCounts::from_labels(left);
        let right = ClassCounts::from_labels(right);
        let labels = left.union(&right);

        let observed = [
            labels.iter().map(|&y| left.get(y) as f64).collect::<Vec<_>>(),
            labels.iter().map(|&y| right.get(y) as f64).collect::<Vec<_>>(),
        ];
        let row_totals = [left.total() as f64, right.total() as f64];
        let col_totals = observed[0].iter()
            .zip(&observed[1])
            .map(|(l, r)| l + r)
            .collect::<Vec<_>>();
        let total = row_totals[0] + row_totals[1];

        Self { observed, row_totals, col_totals, total }
    }

    /// Expected count of cell `(row, col)` under independence.
    #[inline]
    pub(crate) fn expected(&self, row: usize, col: usize) -> f64 {
        if self.total <= 0f64 { return 0f64; }
        self.row_totals[row] * self.col_totals[col] / self.total
    }

    /// Iterates over `(observed, expected)` pairs of all cells.
    pub(crate) fn cells(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        (0..2).flat_map(move |row| {
            (0..self.col_totals.len())
                .map(move |col| (self.observed[row][col], self.expected(row, col)))
        })
    }
}
