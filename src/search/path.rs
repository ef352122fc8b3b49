use serde::{Deserialize, Serialize};

use crate::ids::NodeId;

/// A simple path through the street graph with its two objective values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Path {
    pub nodes: Vec<NodeId>,
    pub length: f64,
    pub coverage: f64,
}

impl Path {
    /// The zero-cost path that stays at `node`.
    pub fn trivial(node: NodeId) -> Self {
        Self { nodes: vec![node], length: 0.0, coverage: 0.0 }
    }

    /// Check whether `self` is at least as short and as covered as `other`,
    /// and strictly better in one of the two.
    pub fn dominates(&self, other: &Path) -> bool {
        dominates((self.length, self.coverage), (other.length, other.coverage))
    }

    /// First node of the path.
    #[inline] pub fn start(&self) -> Option<NodeId> { self.nodes.first().copied() }

    /// Last node of the path.
    #[inline] pub fn goal(&self) -> Option<NodeId> { self.nodes.last().copied() }
}

/// `(length, coverage)` dominance: shorter-or-equal and covered-or-equal,
/// with at least one strict inequality.
#[inline]
pub(crate) fn dominates(a: (f64, f64), b: (f64, f64)) -> bool {
    a.0 <= b.0 && a.1 >= b.1 && (a.0 < b.0 || a.1 > b.1)
}

/// The non-dominated paths of one `(start, goal, level)` query, sorted by
/// length ascending (and so by coverage ascending).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParetoFrontier {
    pub start: NodeId,
    pub goal: NodeId,
    pub level: usize,
    /// Set when the labels-per-node cap discarded labels, so that the
    /// frontier may be incomplete.
    pub truncated: bool,
    pub paths: Vec<Path>,
}

impl ParetoFrontier {
    #[inline] pub fn len(&self) -> usize { self.paths.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.paths.is_empty() }

    #[inline] pub fn paths(&self) -> &[Path] { &self.paths }

    /// The minimum-length path.
    #[inline] pub fn shortest(&self) -> Option<&Path> { self.paths.first() }

    /// The maximum-coverage path.
    #[inline] pub fn most_covered(&self) -> Option<&Path> { self.paths.last() }
}
