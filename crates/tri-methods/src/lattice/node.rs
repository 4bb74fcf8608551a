//! Lattice nodes and levels.
//!
//! Each level owns its nodes in a contiguous arena. A node is addressed by
//! its offset `j` from the trunk; its children are the nodes at offsets
//! `j − 1`, `j` and `j + 1` of the next level, unless the level carries its
//! own [`Branching`].

use tri_core::{Price, Probability, Real, Size, Time};

/// One lattice point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    /// Underlying price at this node.
    pub spot_value: Real,
    /// Probability of reaching this node from the root.
    pub path_probability: Probability,
    /// Discounted expected value of the children.
    pub continuation_value: Price,
    /// Option value after the exercise decision.
    pub option_value: Price,
    /// Early exercise is optimal here (American only).
    pub is_exercised: bool,
    /// Dropped by the pruning policy; never expanded or priced.
    pub pruned: bool,
}

impl Node {
    /// A live node at `spot_value` with the given path probability.
    pub fn new(spot_value: Real, path_probability: Probability) -> Self {
        Self {
            spot_value,
            path_probability,
            ..Self::default()
        }
    }

    /// `true` unless pruned.
    #[inline]
    pub fn is_live(&self) -> bool {
        !self.pruned
    }
}

/// Per-node branching of a level whose children are not the uniform
/// `j − 1, j, j + 1` triple.
///
/// Only the level before the dividend crossing has one: each parent's
/// middle child is the ex-dividend node closest to its forward, and the
/// probabilities are solved against that node.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Branching {
    /// Offset of each node's middle child, indexed like [`Level::nodes`].
    pub mid: Vec<i32>,
    /// `[p_down, p_mid, p_up]` per node.
    pub probs: Vec<[Probability; 3]>,
}

impl Branching {
    /// Middle-child offset and `[p_down, p_mid, p_up]` of the node at arena
    /// index `k`.
    #[inline]
    pub fn branch(&self, k: usize) -> (i32, [Probability; 3]) {
        (self.mid[k], self.probs[k])
    }
}

/// All nodes of one time step.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Level {
    /// Level index `i` (0 is the root).
    pub index: Size,
    /// Time of the level in years from the trade date.
    pub time: Time,
    /// Offset of `nodes[0]` from the trunk.
    pub min_offset: i32,
    /// Node arena, ordered by increasing offset.
    pub nodes: Vec<Node>,
    /// Non-uniform branching into the next level, if any.
    pub branching: Option<Branching>,
}

impl Level {
    /// An empty level (reached after pruning removed every node above it).
    pub fn empty(index: Size, time: Time) -> Self {
        Self {
            index,
            time,
            min_offset: 0,
            nodes: Vec::new(),
            branching: None,
        }
    }

    /// Offset of the last node, or `None` for an empty level.
    pub fn max_offset(&self) -> Option<i32> {
        if self.nodes.is_empty() {
            None
        } else {
            Some(self.min_offset + self.nodes.len() as i32 - 1)
        }
    }

    /// Node at `offset`, if it exists in the arena.
    #[inline]
    pub fn node(&self, offset: i32) -> Option<&Node> {
        let idx = offset - self.min_offset;
        if idx < 0 {
            return None;
        }
        self.nodes.get(idx as usize)
    }

    /// Node at `offset`, if it exists and is not pruned.
    #[inline]
    pub fn live_node(&self, offset: i32) -> Option<&Node> {
        self.node(offset).filter(|n| n.is_live())
    }

    /// Option value at `offset`; zero when the node is pruned or absent.
    #[inline]
    pub fn value_at(&self, offset: i32) -> Price {
        self.live_node(offset).map_or(0.0, |n| n.option_value)
    }

    /// Iterator over `(offset, node)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (i32, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(move |(k, n)| (self.min_offset + k as i32, n))
    }

    /// Number of nodes that are not pruned.
    pub fn live_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_live()).count()
    }

    /// Middle-child offset and `[p_down, p_mid, p_up]` of the node at arena
    /// index `k`, with `uniform` probabilities when the level has no
    /// [`Branching`].
    #[inline]
    pub fn branch(&self, k: usize, uniform: [Probability; 3]) -> (i32, [Probability; 3]) {
        match &self.branching {
            Some(b) => b.branch(k),
            None => (self.min_offset + k as i32, uniform),
        }
    }

    /// Smallest and largest offsets of live nodes.
    pub fn live_span(&self) -> Option<(i32, i32)> {
        let mut live = self.iter().filter(|(_, n)| n.is_live()).map(|(j, _)| j);
        let lo = live.next()?;
        let hi = live.last().unwrap_or(lo);
        Some((lo, hi))
    }
}
