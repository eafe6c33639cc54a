//! Criteria that measure how different the class distributions
//! of the two branches are.
use super::counts::ClassCounts;
use super::check_partition;
use crate::error::TreeError;

/// Laplace smoothing used by the Bhattacharyya distance.
const BHATTACHARYYA_EPSILON: f64 = 1e-10;

/// Breiman's twoing rule,
/// `(p_L p_R / 4) (Σ_c |p(c|L) - p(c|R)|)^2`.
/// Takes values in `[0, 0.5]`.
pub fn twoing(left: &[i64], right: &[i64]) -> Result<f64, TreeError> {
    check_partition(left, right)?;
    if left.is_empty() || right.is_empty() { return Ok(0f64); }

    let left = ClassCounts::from_labels(left);
    let right = ClassCounts::from_labels(right);

    let pl = left.total() as f64;
    let pr = right.total() as f64;
    let pt = pl + pr;

    let mut score = 0f64;
    for y in left.union(&right) {
        score += (left.proportion(y) - right.proportion(y)).abs();
    }
    score = score.powi(2) * pl * pr / (2f64 * pt).powi(2);

    Ok(score)
}

/// `0.5 Σ_c (sqrt(p(c|L)) - sqrt(p(c|R)))^2`.
/// Takes values in `[0, 1]`.
pub fn multi_class_hellinger(left: &[i64], right: &[i64])
    -> Result<f64, TreeError>
{
    check_partition(left, right)?;
    if left.is_empty() || right.is_empty() { return Ok(0f64); }

    let left = ClassCounts::from_labels(left);
    let right = ClassCounts::from_labels(right);

    let sum = left.union(&right)
        .into_iter()
        .map(|y| {
            let diff = left.proportion(y).sqrt() - right.proportion(y).sqrt();
            diff * diff
        })
        .sum::<f64>();

    Ok(0.5 * sum)
}

/// Bhattacharyya distance `-ln Σ_c sqrt(p(c|L) p(c|R))`
/// with Laplace-smoothed class frequencies.
///
/// Returns `+∞` if the Bhattacharyya coefficient vanishes.
pub fn bhattacharyya(left: &[i64], right: &[i64])
    -> Result<f64, TreeError>
{
    check_partition(left, right)?;
    if left.is_empty() || right.is_empty() { return Ok(0f64); }

    let left = ClassCounts::from_labels(left);
    let right = ClassCounts::from_labels(right);
    let labels = left.union(&right);

    let k = labels.len() as f64;
    let eps = BHATTACHARYYA_EPSILON;
    let nl = left.total() as f64 + k * eps;
    let nr = right.total() as f64 + k * eps;

    let coefficient = labels.into_iter()
        .map(|y| {
            let p = (left.get(y) as f64 + eps) / nl;
            let q = (right.get(y) as f64 + eps) / nr;
            (p * q).sqrt()
        })
        .sum::<f64>();

    if coefficient <= 0f64 { return Ok(f64::INFINITY); }

    // Identical distributions can give a coefficient of `1 + ulp`.
    Ok((-coefficient.ln()).max(0f64))
}

/// Kolmogorov-Smirnov distance between the empirical CDFs
/// of the labels of the two branches,
/// evaluated at every label observed in either branch.
///
/// The CDFs are step functions. Between observed labels they are not
/// interpolated, so gaps in the label values do not change the distance.
pub fn kolmogorov_smirnov(left: &[i64], right: &[i64])
    -> Result<f64, TreeError>
{
    check_partition(left, right)?;
    if left.is_empty() || right.is_empty() { return Ok(0f64); }

    let left = ClassCounts::from_labels(left);
    let right = ClassCounts::from_labels(right);

    let nl = left.total() as f64;
    let nr = right.total() as f64;

    let mut cum_left = 0_usize;
    let mut cum_right = 0_usize;
    let mut distance = 0f64;
    for y in left.union(&right) {
        cum_left += left.get(y);
        cum_right += right.get(y);
        let diff = (cum_left as f64 / nl - cum_right as f64 / nr).abs();
        distance = distance.max(diff);
    }

    Ok(distance)
}
