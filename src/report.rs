//! Statistics of one fit.
use colored::Colorize;

use std::fmt;

use crate::tree::Node;
use crate::tree::GrowStats;
use crate::weights::WeightEstimator;

const FULL_WIDTH: usize = 60;
const STAT_WIDTH: usize = (FULL_WIDTH - 4) / 2;

/// Size of the grown tree and the work spent on it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FitReport {
    /// Number of nodes.
    pub nodes: usize,
    /// Number of leaves.
    pub leaves: usize,
    /// Length of the longest root-to-leaf path.
    pub depth: usize,
    /// Weight vectors estimated from probe trees.
    pub weight_updates: usize,
    /// Single-criterion probe trees grown.
    pub probe_fits: usize,
    /// False-negative counts served from the cache.
    pub cache_hits: usize,
    /// Candidate splits scored by the main tree.
    pub candidates_scored: usize,
}

impl FitReport {
    pub(crate) fn new(
        root: &Node,
        estimator: &WeightEstimator,
        stats: &GrowStats,
    ) -> Self
    {
        Self {
            nodes: root.n_nodes(),
            leaves: root.n_leaves(),
            depth: root.depth(),
            weight_updates: estimator.updates(),
            probe_fits: estimator.probe_fits(),
            cache_hits: estimator.cache_hits(),
            candidates_scored: stats.candidates_scored,
        }
    }

    fn rows(&self) -> [(&'static str, usize); 7] {
        [
            ("Nodes", self.nodes),
            ("Leaves", self.leaves),
            ("Depth", self.depth),
            ("Weight updates", self.weight_updates),
            ("Probe fits", self.probe_fits),
            ("Cache hits", self.cache_hits),
            ("Candidates scored", self.candidates_scored),
        ]
    }

    /// Print the statistics to the standard output.
    pub fn print(&self) {
        let header = format!(
            "{:=>FULL_WIDTH$}\n{:^FULL_WIDTH$}\n{:->FULL_WIDTH$}",
            "", "STATS".bold(), "",
        );
        println!("\n{header}");

        for (key, val) in self.rows() {
            println!(
                "+ {:<STAT_WIDTH$}\t{:>STAT_WIDTH$}",
                key.bold(),
                val.to_string().bold().green(),
            );
        }

        println!("{:=>FULL_WIDTH$}", "");
    }
}

impl fmt::Display for FitReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let line = self.rows()
            .into_iter()
            .map(|(key, val)| format!("{key}: {val}"))
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{line}")
    }
}
