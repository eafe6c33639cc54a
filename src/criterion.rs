//! Split-quality criteria.
//!
//! Every criterion is a pure function of the two label slices produced by
//! a binary split. The functions themselves live in the sub-modules;
//! [`Criterion`] names them and dispatches to them.
use serde::{Serialize, Deserialize};

use std::fmt;
use std::str::FromStr;

use crate::error::TreeError;

mod counts;
mod impurity;
mod distance;
mod contingency;

pub(crate) use counts::ClassCounts;

pub use impurity::{gini, gain_ratio, normalized_gain, dkm, dkm_binary};
pub use distance::{
    twoing,
    multi_class_hellinger,
    bhattacharyya,
    kolmogorov_smirnov,
};
pub use contingency::{marshall, g_statistic, chi_squared};

/// Tells whether a larger criterion value means a better split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Polarity {
    /// Gains, divergences and test statistics.
    HigherIsBetter,
    /// Impurities.
    LowerIsBetter,
}

/// The eleven split-quality criteria.
///
/// The serialized form (and [`Criterion::name`]) is the snake_case key
/// used in configuration files, e.g. `"multi_class_hellinger"`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
    Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    /// Weighted Gini impurity of the two branches.
    Gini,
    /// Information gain divided by the split entropy.
    GainRatio,
    /// Breiman's twoing rule.
    Twoing,
    /// Information gain normalized by `log2` of the branch count.
    NormalizedGain,
    /// Hellinger distance between the class distributions of the branches.
    MultiClassHellinger,
    /// Marshall's reduction in variance over a 2×2 table.
    Marshall,
    /// Log-likelihood ratio statistic.
    GStatistic,
    /// Dietterich–Kearns–Mansour impurity.
    Dkm,
    /// Pearson's chi-squared statistic.
    ChiSquared,
    /// Bhattacharyya distance with Laplace smoothing.
    Bhattacharyya,
    /// Kolmogorov–Smirnov distance between the label ECDFs.
    KolmogorovSmirnov,
}

impl Criterion {
    /// All criteria in their canonical order.
    pub const ALL: [Criterion; 11] = [
        Criterion::Gini,
        Criterion::GainRatio,
        Criterion::Twoing,
        Criterion::NormalizedGain,
        Criterion::MultiClassHellinger,
        Criterion::Marshall,
        Criterion::GStatistic,
        Criterion::Dkm,
        Criterion::ChiSquared,
        Criterion::Bhattacharyya,
        Criterion::KolmogorovSmirnov,
    ];

    /// Returns the configuration key of this criterion.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Gini                => "gini",
            Self::GainRatio           => "gain_ratio",
            Self::Twoing              => "twoing",
            Self::NormalizedGain      => "normalized_gain",
            Self::MultiClassHellinger => "multi_class_hellinger",
            Self::Marshall            => "marshall",
            Self::GStatistic          => "g_statistic",
            Self::Dkm                 => "dkm",
            Self::ChiSquared          => "chi_squared",
            Self::Bhattacharyya       => "bhattacharyya",
            Self::KolmogorovSmirnov   => "kolmogorov_smirnov",
        }
    }

    /// Gini and DKM return an impurity, the rest a gain or a distance.
    pub fn polarity(&self) -> Polarity {
        match self {
            Self::Gini | Self::Dkm => Polarity::LowerIsBetter,
            _ => Polarity::HigherIsBetter,
        }
    }

    /// Returns `true` for the impurity-style criteria.
    #[inline]
    pub fn is_impurity(&self) -> bool {
        self.polarity() == Polarity::LowerIsBetter
    }

    /// Scores the partition `(left, right)`.
    ///
    /// Fails with [`TreeError::InvalidPartition`]
    /// only if both slices are empty.
    pub fn score(&self, left: &[i64], right: &[i64])
        -> Result<f64, TreeError>
    {
        match self {
            Self::Gini                => gini(left, right),
            Self::GainRatio           => gain_ratio(left, right),
            Self::Twoing              => twoing(left, right),
            Self::NormalizedGain      => normalized_gain(left, right),
            Self::MultiClassHellinger => multi_class_hellinger(left, right),
            Self::Marshall            => marshall(left, right),
            Self::GStatistic          => g_statistic(left, right),
            Self::Dkm                 => dkm(left, right),
            Self::ChiSquared          => chi_squared(left, right),
            Self::Bhattacharyya       => bhattacharyya(left, right),
            Self::KolmogorovSmirnov   => kolmogorov_smirnov(left, right),
        }
    }

    /// Scores the partition so that a larger value is always better.
    #[inline]
    pub fn aligned_score(&self, left: &[i64], right: &[i64])
        -> Result<f64, TreeError>
    {
        let score = self.score(left, right)?;
        match self.polarity() {
            Polarity::HigherIsBetter => Ok(score),
            Polarity::LowerIsBetter  => Ok(-score),
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Gini                => "Gini index",
            Self::GainRatio           => "Gain ratio",
            Self::Twoing              => "Twoing rule",
            Self::NormalizedGain      => "Normalized gain",
            Self::MultiClassHellinger => "Multi-class Hellinger",
            Self::Marshall            => "Marshall's G",
            Self::GStatistic          => "G-statistic",
            Self::Dkm                 => "DKM",
            Self::ChiSquared          => "Chi-squared",
            Self::Bhattacharyya       => "Bhattacharyya distance",
            Self::KolmogorovSmirnov   => "Kolmogorov-Smirnov distance",
        };

        write!(f, "{name}")
    }
}

impl FromStr for Criterion {
    type Err = TreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL.into_iter()
            .find(|criterion| criterion.name() == key)
            .ok_or_else(|| {
                TreeError::Configuration(format!("unknown criterion `{s}`"))
            })
    }
}

/// Rejects the only partition no criterion accepts.
#[inline(always)]
pub(crate) fn check_partition(left: &[i64], right: &[i64])
    -> Result<(), TreeError>
{
    if left.is_empty() && right.is_empty() {
        return Err(TreeError::InvalidPartition);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_TOLERANCE: f64 = 1e-9;

    fn partitions() -> Vec<(Vec<i64>, Vec<i64>)> {
        vec![
            (vec![0, 0, 1], vec![1, 1, 0, 1]),
            (vec![0, 0, 0], vec![1, 1, 1]),
            (vec![0, 1, 2, 2], vec![2, 1]),
            (vec![3], vec![3, 3, 3, 1]),
            (vec![1, 1], vec![1, 1, 1]),
        ]
    }

    #[test]
    fn test_both_empty_is_rejected() {
        for criterion in Criterion::ALL {
            let res = criterion.score(&[], &[]);
            assert!(
                matches!(res, Err(TreeError::InvalidPartition)),
                "{criterion} accepted an empty partition",
            );
        }
    }

    #[test]
    fn test_one_empty_side_is_neutral() {
        let y = [0, 1, 1, 2, 0];
        for criterion in Criterion::ALL {
            for (l, r) in [(&y[..], &[][..]), (&[][..], &y[..])] {
                let score = criterion.score(l, r).unwrap();
                assert!(
                    score.is_finite() && score >= 0f64,
                    "{criterion} returned {score} for a one-sided partition",
                );
            }
        }
    }

    #[test]
    fn test_symmetry() {
        for criterion in Criterion::ALL {
            for (l, r) in partitions() {
                let lr = criterion.score(&l, &r).unwrap();
                let rl = criterion.score(&r, &l).unwrap();
                assert!(
                    (lr - rl).abs() < TEST_TOLERANCE,
                    "{criterion} is not symmetric: {lr} vs {rl}",
                );
            }
        }
    }

    #[test]
    fn test_no_nan() {
        for criterion in Criterion::ALL {
            for (l, r) in partitions() {
                let score = criterion.score(&l, &r).unwrap();
                assert!(!score.is_nan(), "{criterion} returned NaN");
            }
        }
    }

    #[test]
    fn test_name_roundtrip() {
        for criterion in Criterion::ALL {
            let parsed = criterion.name().parse::<Criterion>().unwrap();
            assert_eq!(criterion, parsed);
        }
        assert_eq!(
            "Kolmogorov-Smirnov".parse::<Criterion>().unwrap(),
            Criterion::KolmogorovSmirnov,
        );
        assert!("entropy".parse::<Criterion>().is_err());
    }

    #[test]
    fn test_polarity() {
        let lower = Criterion::ALL.into_iter()
            .filter(|c| c.polarity() == Polarity::LowerIsBetter)
            .collect::<Vec<_>>();
        assert_eq!(lower, vec![Criterion::Gini, Criterion::Dkm]);
    }

    #[test]
    fn test_aligned_score_prefers_pure_split() {
        let pure = (vec![0, 0], vec![1, 1]);
        let mixed = (vec![0, 1], vec![0, 1]);
        for criterion in Criterion::ALL {
            let p = criterion.aligned_score(&pure.0, &pure.1).unwrap();
            let m = criterion.aligned_score(&mixed.0, &mixed.1).unwrap();
            assert!(p > m, "{criterion}: pure {p} <= mixed {m}");
        }
    }
}
