//! Defines the inner representation
//! of the weighted decision tree.
use crate::sample::Sample;
use super::splitter::{LeftRight, Splitter};

/// Enumeration of `BranchNode` and `LeafNode`.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A node that have two childrens.
    Branch(BranchNode),

    /// A node that have no child.
    Leaf(LeafNode),
}

/// Represents the branch nodes of decision tree.
/// Each `BranchNode` must have two childrens
#[derive(Debug, Clone, PartialEq)]
pub struct BranchNode {
    pub(super) splitter: Splitter,
    pub(super) left: Box<Node>,
    pub(super) right: Box<Node>,
}

impl BranchNode {
    #[inline]
    pub(super) fn from_raw(
        splitter: Splitter,
        left: Box<Node>,
        right: Box<Node>
    ) -> Self
    {
        Self { splitter, left, right, }
    }

    /// Returns the splitting rule of this node.
    pub fn splitter(&self) -> &Splitter {
        &self.splitter
    }

    /// The subtree of the examples with `x[feature] <= threshold`.
    pub fn left(&self) -> &Node {
        &self.left
    }

    /// The subtree of the other examples.
    pub fn right(&self) -> &Node {
        &self.right
    }
}

/// Represents the leaf nodes of decision tree.
#[derive(Debug, Clone, PartialEq)]
pub struct LeafNode {
    pub(super) prediction: i64,
    pub(super) distribution: Vec<f64>,
    pub(super) n_sample: usize,
}

impl LeafNode {
    #[inline]
    pub(super) fn from_raw(
        prediction: i64,
        distribution: Vec<f64>,
        n_sample: usize,
    ) -> Self
    {
        Self { prediction, distribution, n_sample }
    }

    /// The majority label of the training examples of this leaf.
    #[inline]
    pub fn prediction(&self) -> i64 {
        self.prediction
    }

    /// Class frequencies, aligned with the classes of the model.
    #[inline]
    pub fn distribution(&self) -> &[f64] {
        &self.distribution[..]
    }

    /// Number of training examples that reached this leaf.
    pub fn n_sample(&self) -> usize {
        self.n_sample
    }
}

impl Node {
    /// Returns the leaf that the `row`-th example of `sample` reaches.
    pub fn leaf(&self, sample: &Sample, row: usize) -> &LeafNode {
        match self {
            Node::Branch(b) => match b.splitter.split(sample, row) {
                LeftRight::Left  => b.left.leaf(sample, row),
                LeftRight::Right => b.right.leaf(sample, row),
            },
            Node::Leaf(l) => l,
        }
    }

    /// Returns the leaf that the feature vector `row` reaches.
    pub fn leaf_of_row(&self, row: &[f64]) -> &LeafNode {
        match self {
            Node::Branch(b) => match b.splitter.split_row(row) {
                LeftRight::Left  => b.left.leaf_of_row(row),
                LeftRight::Right => b.right.leaf_of_row(row),
            },
            Node::Leaf(l) => l,
        }
    }

    /// Length of the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        match self {
            Node::Branch(b) => 1 + b.left.depth().max(b.right.depth()),
            Node::Leaf(_) => 0,
        }
    }

    /// Number of leaves.
    pub fn n_leaves(&self) -> usize {
        match self {
            Node::Branch(b) => b.left.n_leaves() + b.right.n_leaves(),
            Node::Leaf(_) => 1,
        }
    }

    /// Number of nodes.
    pub fn n_nodes(&self) -> usize {
        match self {
            Node::Branch(b) => 1 + b.left.n_nodes() + b.right.n_nodes(),
            Node::Leaf(_) => 1,
        }
    }

    pub(super) fn to_dot_info(&self, id: usize, names: &[&str])
        -> (Vec<String>, usize)
    {
        match self {
            Node::Branch(b) => {
                let feat = names.get(b.splitter.feature)
                    .copied()
                    .unwrap_or("?");
                let b_info = format!(
                    "\tnode_{id} [ label = \"{feat} <= {thr:.2} ?\" ];\n",
                    thr = b.splitter.threshold
                );

                let (l_info, next_id) = b.left.to_dot_info(id + 1, names);
                let (mut r_info, ret_id) = b.right.to_dot_info(next_id, names);

                let mut info = l_info;
                info.push(b_info);
                info.append(&mut r_info);

                let l_edge = format!(
                    "\tnode_{id} -- node_{l_id} [ label = \"Yes\" ];\n",
                    l_id = id + 1
                );
                let r_edge = format!(
                    "\tnode_{id} -- node_{r_id} [ label = \"No\" ];\n",
                    r_id = next_id
                );

                info.push(l_edge);
                info.push(r_edge);

                (info, ret_id)
            },
            Node::Leaf(l) => {
                let info = format!(
                    "\tnode_{id} [ \
                     label = \"{p} ({n})\", \
                     shape = box, \
                     ];\n",
                    p = l.prediction,
                    n = l.n_sample,
                );

                (vec![info], id + 1)
            }
        }
    }
}
