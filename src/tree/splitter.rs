//! Tools shared by the main tree and the probe trees.
use std::{fmt, cmp, ops};

use crate::sample::Sample;

/// Struct `Depth` is the depth of a node; the root has depth `0`.
/// This is just a wrapper for `usize`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(transparent)]
pub struct Depth(usize);

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let depth = self.0;
        write!(f, "{depth}")
    }
}

impl From<usize> for Depth {
    fn from(depth: usize) -> Self {
        Self(depth)
    }
}

impl From<Depth> for usize {
    fn from(depth: Depth) -> Self {
        depth.0
    }
}

impl ops::Add<usize> for Depth {
    type Output = Self;
    #[inline]
    fn add(self, other: usize) -> Self::Output {
        Self(self.0.saturating_add(other))
    }
}

impl cmp::PartialEq<usize> for Depth {
    #[inline]
    fn eq(&self, rhs: &usize) -> bool {
        self.0.eq(rhs)
    }
}

impl cmp::PartialOrd<usize> for Depth {
    #[inline]
    fn partial_cmp(&self, other: &usize) -> Option<cmp::Ordering> {
        self.0.partial_cmp(other)
    }
}

/// The output of [`Splitter::split`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeftRight {
    /// `x[feature] <= threshold`.
    Left,
    /// `x[feature] > threshold`.
    Right,
}

/// Binary threshold test on one feature.
/// `x[feature] <= threshold` goes left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Splitter {
    pub(crate) feature: usize,
    pub(crate) threshold: f64,
}

impl Splitter {
    /// Construct the test `x[feature] <= threshold`.
    #[inline]
    pub fn new(feature: usize, threshold: f64) -> Self {
        Self { feature, threshold }
    }

    /// Returns the index of the tested feature.
    pub fn feature(&self) -> usize {
        self.feature
    }

    /// Returns the threshold.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Defines the splitting of the `row`-th example of `sample`.
    #[inline]
    pub fn split(&self, sample: &Sample, row: usize) -> LeftRight {
        self.split_value(sample.value(row, self.feature))
    }

    /// Defines the splitting of a raw feature vector.
    #[inline]
    pub fn split_row(&self, row: &[f64]) -> LeftRight {
        self.split_value(row[self.feature])
    }

    #[inline]
    fn split_value(&self, value: f64) -> LeftRight {
        if value <= self.threshold { LeftRight::Left } else { LeftRight::Right }
    }
}

/// Candidate thresholds over the sorted distinct values of a feature.
///
/// One midpoint per adjacent pair; a midpoint that rounds up to
/// the upper value is replaced by the lower value.
/// If there are more than `max_candidates` midpoints,
/// `max_candidates` evenly spaced ones are kept.
pub(crate) fn candidate_thresholds(distinct: &[f64], max_candidates: usize)
    -> Vec<f64>
{
    let midpoints = distinct.windows(2)
        .map(|pair| {
            let (lo, hi) = (pair[0], pair[1]);
            let mid = lo + (hi - lo) / 2f64;
            if mid < hi { mid } else { lo }
        })
        .collect::<Vec<_>>();

    let m = midpoints.len();
    if m <= max_candidates {
        return midpoints;
    }
    if max_candidates <= 1 {
        return midpoints.get(m / 2).copied().into_iter().collect();
    }

    (0..max_candidates)
        .map(|i| midpoints[i * (m - 1) / (max_candidates - 1)])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_add() {
        let d1 = Depth::from(3);
        let res = d1 + 1;
        let exp = Depth::from(4);
        assert_eq!(exp, res, "expected {exp:?}, got {res:?}.");
    }

    #[test]
    fn test_depth_cmp() {
        let d1 = Depth::from(2);
        assert!(d1 < 3, "failed for {d1:?} < 3.");
        assert!(d1 >= 2, "failed for {d1:?} >= 2.");
        assert!(!(d1 < 2), "failed for !({d1:?} < 2).");
    }

    #[test]
    fn test_split_is_inclusive_on_the_left() {
        let splitter = Splitter::new(1, 2.5);
        assert_eq!(splitter.split_row(&[9.0, 2.5]), LeftRight::Left);
        assert_eq!(splitter.split_row(&[0.0, 2.6]), LeftRight::Right);
    }

    #[test]
    fn test_midpoints() {
        let got = candidate_thresholds(&[1.0, 2.0, 4.0], 255);
        assert_eq!(got, vec![1.5, 3.0]);
        assert!(candidate_thresholds(&[7.0], 255).is_empty());
    }

    #[test]
    fn test_midpoint_rounding() {
        let lo: f64 = 1.0;
        let hi = f64::from_bits(lo.to_bits() + 1);
        let got = candidate_thresholds(&[lo, hi], 255);
        assert_eq!(got, vec![lo]);
    }

    #[test]
    fn test_candidate_cap() {
        let distinct = (0..101).map(|i| i as f64).collect::<Vec<_>>();
        let got = candidate_thresholds(&distinct, 5);
        assert_eq!(got, vec![0.5, 24.5, 49.5, 74.5, 99.5]);

        let got = candidate_thresholds(&distinct, 1);
        assert_eq!(got, vec![50.5]);
    }
}
