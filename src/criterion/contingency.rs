//! Criteria computed from the `2 × k` contingency table
//! of a binary split.
use super::counts::{ClassCounts, Contingency};
use super::check_partition;
use crate::error::TreeError;

/// Marshall's reduction in Gini diversity for binary labels,
/// `C D / N - a b / A - c d / B`, where
/// `a, b` (`c, d`) are the counts of the smaller and the larger label
/// in the left (right) branch.
///
/// Returns `0` for partitions with more than two labels
/// or with an empty side.
pub fn marshall(left: &[i64], right: &[i64]) -> Result<f64, TreeError> {
    check_partition(left, right)?;
    if left.is_empty() || right.is_empty() { return Ok(0f64); }

    let left = ClassCounts::from_labels(left);
    let right = ClassCounts::from_labels(right);
    let labels = left.union(&right);
    if labels.len() > 2 { return Ok(0f64); }

    let negative = labels[0];
    let positive = labels.get(1).copied();
    let count = |counts: &ClassCounts, label: Option<i64>| {
        label.map_or(0f64, |y| counts.get(y) as f64)
    };

    let a = left.get(negative) as f64;
    let b = count(&left, positive);
    let c = right.get(negative) as f64;
    let d = count(&right, positive);

    let n_left = a + b;
    let n_right = c + d;
    let n_negative = a + c;
    let n_positive = b + d;
    let n = n_left + n_right;

    let score = n_negative * n_positive / n
        - a * b / n_left
        - c * d / n_right;
    Ok(score)
}

/// Log-likelihood ratio statistic `2 Σ O ln(O / E)`.
/// Cells with a zero observed or expected count are skipped.
pub fn g_statistic(left: &[i64], right: &[i64])
    -> Result<f64, TreeError>
{
    check_partition(left, right)?;
    if left.is_empty() || right.is_empty() { return Ok(0f64); }

    let table = Contingency::from_partition(left, right);
    let g = table.cells()
        .filter(|&(o, e)| o > 0f64 && e > 0f64)
        .map(|(o, e)| o * (o / e).ln())
        .sum::<f64>();

    // Rounding can push a zero statistic slightly below zero.
    Ok((2f64 * g).max(0f64))
}

/// Pearson's chi-squared statistic `Σ (O - E)^2 / E`
/// over the cells with a positive expected count.
pub fn chi_squared(left: &[i64], right: &[i64])
    -> Result<f64, TreeError>
{
    check_partition(left, right)?;

    let table = Contingency::from_partition(left, right);
    let chi2 = table.cells()
        .filter(|&(_, e)| e > 0f64)
        .map(|(o, e)| (o - e).powi(2) / e)
        .sum::<f64>();

    Ok(chi2)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_TOLERANCE: f64 = 1e-9;

    fn assert_close(expected: f64, got: f64) {
        assert!(
            (expected - got).abs() < TEST_TOLERANCE,
            "expected {expected}, got {got}.",
        );
    }

    #[test]
    fn test_marshall() {
        assert_close(1f64, marshall(&[0, 0], &[1, 1]).unwrap());
        assert_close(0f64, marshall(&[0, 1], &[0, 1]).unwrap());
        // Works with `{-1, +1}` labels as well.
        assert_close(1f64, marshall(&[-1, -1], &[1, 1]).unwrap());
    }

    #[test]
    fn test_marshall_is_binary_only() {
        assert_close(0f64, marshall(&[0, 1], &[2, 2]).unwrap());
    }

    #[test]
    fn test_marshall_single_class() {
        assert_close(0f64, marshall(&[1, 1], &[1]).unwrap());
    }

    #[test]
    fn test_g_statistic() {
        // Every observed cell is 2 with expectation 1.
        let expected = 2f64 * (2f64 * 2f64 * 2f64.ln());
        assert_close(expected, g_statistic(&[0, 0], &[1, 1]).unwrap());
        assert_close(0f64, g_statistic(&[0, 1], &[1, 0]).unwrap());
    }

    #[test]
    fn test_chi_squared() {
        // Four cells, each |O - E| = 1 with E = 1.
        assert_close(4f64, chi_squared(&[0, 0], &[1, 1]).unwrap());
        assert_close(0f64, chi_squared(&[0, 1], &[1, 0]).unwrap());
        assert_close(0f64, chi_squared(&[0, 1, 1], &[]).unwrap());
    }
}
