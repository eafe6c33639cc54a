//! Impurity and entropy based criteria.
use super::counts::ClassCounts;
use super::check_partition;
use crate::error::TreeError;

/// Smoothing added inside `log2` by the gain ratio.
const ENTROPY_EPSILON: f64 = 1e-10;

/// Returns the weighted Gini impurity of the split.
/// **Lower is better.**
///
/// A single empty side contributes nothing, so the result is the
/// impurity of the other side.
pub fn gini(left: &[i64], right: &[i64]) -> Result<f64, TreeError> {
    check_partition(left, right)?;
    let left = ClassCounts::from_labels(left);
    let right = ClassCounts::from_labels(right);

    let total = (left.total() + right.total()) as f64;
    let lp = left.total() as f64 / total;
    let rp = right.total() as f64 / total;

    Ok(lp * gini_impurity(&left) + rp * gini_impurity(&right))
}

/// Returns the gini-impurity of the given histogram.
#[inline(always)]
fn gini_impurity(counts: &ClassCounts) -> f64 {
    let total = counts.total() as f64;
    if total <= 0f64 { return 0f64; }

    let correct = counts.iter()
        .map(|(_, c)| (c as f64 / total).powi(2))
        .sum::<f64>();

    (1f64 - correct).max(0f64)
}

/// Entropy in bits, without smoothing.
#[inline(always)]
fn entropy(counts: &ClassCounts) -> f64 {
    let total = counts.total() as f64;
    if total <= 0f64 { return 0f64; }

    counts.iter()
        .map(|(_, c)| {
            let p = c as f64 / total;
            if p <= 0f64 { 0f64 } else { -p * p.log2() }
        })
        .sum::<f64>()
}

/// Entropy in bits with `log2(p + ε)`.
#[inline(always)]
fn smoothed_entropy(counts: &ClassCounts) -> f64 {
    let total = counts.total() as f64;
    if total <= 0f64 { return 0f64; }

    -counts.iter()
        .map(|(_, c)| {
            let p = c as f64 / total;
            p * (p + ENTROPY_EPSILON).log2()
        })
        .sum::<f64>()
}

/// Information gain of the split divided by its intrinsic value.
///
/// Returns `0` when the intrinsic value is `0`,
/// i.e., when one side is empty.
pub fn gain_ratio(left: &[i64], right: &[i64]) -> Result<f64, TreeError> {
    check_partition(left, right)?;
    let parent = ClassCounts::from_labels(&[left, right].concat());
    let left = ClassCounts::from_labels(left);
    let right = ClassCounts::from_labels(right);

    let total = parent.total() as f64;
    let mut children = 0f64;
    let mut intrinsic = 0f64;
    for branch in [&left, &right] {
        let n = branch.total() as f64;
        if n <= 0f64 { continue; }
        let p = n / total;
        children += p * smoothed_entropy(branch);
        intrinsic -= p * p.log2();
    }

    if intrinsic <= 0f64 { return Ok(0f64); }

    let gain = smoothed_entropy(&parent) - children;
    Ok(gain / intrinsic)
}

/// Information gain normalized by `log2(#branches)`.
/// Binary splits have two branches, so this is the information gain
/// clipped at `0`.
pub fn normalized_gain(left: &[i64], right: &[i64])
    -> Result<f64, TreeError>
{
    const N_BRANCHES: f64 = 2f64;

    check_partition(left, right)?;
    if left.is_empty() || right.is_empty() { return Ok(0f64); }

    let parent = ClassCounts::from_labels(&[left, right].concat());
    let left = ClassCounts::from_labels(left);
    let right = ClassCounts::from_labels(right);

    let total = parent.total() as f64;
    let lp = left.total() as f64 / total;
    let rp = right.total() as f64 / total;

    let gain = entropy(&parent)
        - lp * entropy(&left)
        - rp * entropy(&right);

    if gain <= 0f64 { return Ok(0f64); }
    Ok(gain / N_BRANCHES.log2())
}

/// `sqrt(q (1 - q))`, `0` outside the open unit interval.
#[inline(always)]
fn dkm_g(q: f64) -> f64 {
    if q <= 0f64 || q >= 1f64 { return 0f64; }
    (q * (1f64 - q)).sqrt()
}

/// One-vs-rest DKM value of a branch,
/// averaged over the classes present in the branch.
#[inline(always)]
fn dkm_branch(counts: &ClassCounts) -> f64 {
    let n_classes = counts.n_classes();
    if n_classes == 0 { return 0f64; }

    let total = counts.total() as f64;
    let sum = counts.iter()
        .map(|(_, c)| dkm_g(c as f64 / total))
        .sum::<f64>();
    sum / n_classes as f64
}

/// Returns the weighted DKM impurity of the split.
/// **Lower is better.**
pub fn dkm(left: &[i64], right: &[i64]) -> Result<f64, TreeError> {
    check_partition(left, right)?;
    if left.is_empty() || right.is_empty() { return Ok(0f64); }

    let left = ClassCounts::from_labels(left);
    let right = ClassCounts::from_labels(right);

    let total = (left.total() + right.total()) as f64;
    let lp = left.total() as f64 / total;
    let rp = right.total() as f64 / total;

    Ok(lp * dkm_branch(&left) + rp * dkm_branch(&right))
}

/// Binary DKM impurity. `q` is the share of the largest label
/// of the partition in each branch, so `{0, 1}` and `{-1, +1}` labels
/// both treat the larger label as the positive one.
pub fn dkm_binary(left: &[i64], right: &[i64]) -> Result<f64, TreeError> {
    check_partition(left, right)?;
    if left.is_empty() || right.is_empty() { return Ok(0f64); }

    let left = ClassCounts::from_labels(left);
    let right = ClassCounts::from_labels(right);
    let positive = match left.union(&right).last() {
        Some(&y) => y,
        None => return Ok(0f64),
    };

    let total = (left.total() + right.total()) as f64;
    let lp = left.total() as f64 / total;
    let rp = right.total() as f64 / total;

    Ok(
        lp * dkm_g(left.proportion(positive))
        + rp * dkm_g(right.proportion(positive))
    )
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
    fn test_gini_01() {
        assert_close(0f64, gini(&[0, 0], &[1, 1]).unwrap());
        assert_close(0.5, gini(&[0, 1], &[0, 1]).unwrap());
    }

    #[test]
    fn test_gini_02() {
        // left: 1 - (1/9 + 4/9) = 4/9, weight 3/4.
        let expected = 0.75 * (4f64 / 9f64);
        assert_close(expected, gini(&[0], &[0, 1, 1]).unwrap());
    }

    #[test]
    fn test_gini_one_side_empty() {
        assert_close(0.5, gini(&[0, 1], &[]).unwrap());
    }

    #[test]
    fn test_gain_ratio_perfect_split() {
        let score = gain_ratio(&[0, 0], &[1, 1]).unwrap();
        assert!((score - 1f64).abs() < 1e-6, "got {score}");
    }

    #[test]
    fn test_gain_ratio_one_side_empty() {
        assert_close(0f64, gain_ratio(&[0, 1, 1], &[]).unwrap());
    }

    #[test]
    fn test_normalized_gain() {
        assert_close(1f64, normalized_gain(&[0, 0], &[1, 1]).unwrap());
        assert_close(0f64, normalized_gain(&[0, 1], &[0, 1]).unwrap());

        // H(parent) = 1, H(left) = 0, H(right) = H(1/3, 2/3).
        let h = -(1f64 / 3f64) * (1f64 / 3f64).log2()
            - (2f64 / 3f64) * (2f64 / 3f64).log2();
        let expected = 1f64 - 0.75 * h;
        assert_close(expected, normalized_gain(&[0], &[0, 1, 1]).unwrap());
    }

    #[test]
    fn test_dkm() {
        assert_close(0f64, dkm(&[0, 0], &[1, 1]).unwrap());
        assert_close(0.5, dkm(&[0, 1], &[0, 1]).unwrap());
    }

    #[test]
    fn test_dkm_binary() {
        assert_close(0f64, dkm_binary(&[-1, -1], &[1, 1]).unwrap());
        let expected = 0.5 * (0.25f64 * 0.75).sqrt() + 0.5 * 0f64;
        assert_close(
            expected,
            dkm_binary(&[0, 0, 0, 1], &[1, 1, 1, 1]).unwrap(),
        );
    }
}
