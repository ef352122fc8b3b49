use ahash::AHashSet;

use crate::{ids::NodeId, network::StreetGraph};

use super::path::dominates;

/// A partial path ending at `node`, linked to its predecessor label.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct Label {
    pub node: usize,
    pub length: f64,
    pub coverage: f64,
    pub pred: Option<usize>,
    pub alive: bool,
}

impl Label {
    pub fn root(node: usize) -> Self {
        Self { node, length: 0.0, coverage: 0.0, pred: None, alive: true }
    }

    pub fn extend(pred: usize, node: usize, length: f64, coverage: f64) -> Self {
        Self { node, length, coverage, pred: Some(pred), alive: true }
    }

    #[inline] fn cost(&self) -> (f64, f64) { (self.length, self.coverage) }
}

/// Result of offering a label to a node's label set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Offer {
    Inserted(usize),
    /// Inserted into a full label set in place of its longest label.
    Displaced(usize),
    /// Dominated by, or a tie that loses to, an existing label.
    Rejected,
    /// The node's label set is at capacity and holds no longer label.
    Full,
}

/// Label storage: every label ever created, plus the live non-dominated
/// label indices of each node.
#[derive(Debug)]
pub(super) struct LabelArena {
    labels: Vec<Label>,
    at: Vec<Vec<usize>>,
}

impl LabelArena {
    pub fn new(nodes: usize) -> Self {
        Self { labels: Vec::new(), at: vec![Vec::new(); nodes] }
    }

    #[inline] pub fn len(&self) -> usize { self.labels.len() }

    #[inline] pub fn label(&self, idx: usize) -> &Label { &self.labels[idx] }

    /// Live label indices at a node, in insertion order.
    #[inline] pub fn at(&self, node: usize) -> &[usize] { &self.at[node] }

    /// Offer `candidate` to its node's label set.
    ///
    /// A label beats another when its cost dominates, or when the costs are
    /// equal and its node-id sequence is lexicographically smaller. Away from
    /// `goal` the winner must also visit a subset of the loser's nodes. Goal
    /// labels are never extended, so cost alone decides there.
    ///
    /// Labels the candidate beats are evicted before the capacity check. A
    /// full set gives up its longest label to a strictly shorter candidate.
    pub fn offer(&mut self, graph: &StreetGraph, candidate: Label, goal: usize, cap: Option<usize>) -> Offer {
        let node = candidate.node;
        let cost = candidate.cost();
        let at_goal = node == goal;

        let mut visited = candidate.pred.map(|p| self.visited(p)).unwrap_or_default();
        visited.insert(node);

        let mut proposed = None;
        let mut beaten = Vec::new();
        for &j in &self.at[node] {
            let other = self.labels[j].cost();
            let (loses, wins) = if other == cost {
                let existing = self.route_ids(graph, j);
                let proposed = proposed.get_or_insert_with(|| self.extended_route(graph, &candidate));
                (existing <= *proposed, existing > *proposed)
            } else {
                (dominates(other, cost), dominates(cost, other))
            };
            if !loses && !wins { continue }

            if at_goal {
                if loses { return Offer::Rejected }
                beaten.push(j);
                continue
            }

            let covered = self.visited(j);
            if loses && covered.is_subset(&visited) { return Offer::Rejected }
            if wins && visited.is_subset(&covered) { beaten.push(j) }
        }
        for j in beaten { self.evict(j) }

        let mut displaced = false;
        if cap.is_some_and(|cap| self.at[node].len() >= cap) {
            let longest = self.at[node].iter().copied()
                .max_by(|&a, &b| self.labels[a].length.total_cmp(&self.labels[b].length));
            match longest {
                Some(j) if candidate.length < self.labels[j].length => {
                    self.evict(j);
                    displaced = true;
                }
                _ => return Offer::Full,
            }
        }

        let idx = self.labels.len();
        self.labels.push(candidate);
        self.at[node].push(idx);
        if displaced { Offer::Displaced(idx) } else { Offer::Inserted(idx) }
    }

    fn evict(&mut self, idx: usize) {
        let label = &mut self.labels[idx];
        label.alive = false;
        let node = label.node;
        self.at[node].retain(|&j| j != idx);
    }

    /// Check whether the path of label `idx` already visits `node`.
    pub fn visits(&self, idx: usize, node: usize) -> bool {
        let mut cursor = Some(idx);
        while let Some(i) = cursor {
            let label = &self.labels[i];
            if label.node == node { return true }
            cursor = label.pred;
        }
        false
    }

    /// Node indices on the path of label `idx`.
    fn visited(&self, idx: usize) -> AHashSet<usize> {
        let mut nodes = AHashSet::new();
        let mut cursor = Some(idx);
        while let Some(i) = cursor {
            nodes.insert(self.labels[i].node);
            cursor = self.labels[i].pred;
        }
        nodes
    }

    /// External node ids of a label that is not yet in the arena.
    fn extended_route(&self, graph: &StreetGraph, candidate: &Label) -> Vec<NodeId> {
        let mut route = candidate.pred.map(|p| self.route_ids(graph, p)).unwrap_or_default();
        route.push(graph.node(candidate.node).id);
        route
    }

    /// Node indices of the path of label `idx`, from the root label.
    pub fn route(&self, idx: usize) -> Vec<usize> {
        let mut nodes = Vec::new();
        let mut cursor = Some(idx);
        while let Some(i) = cursor {
            nodes.push(self.labels[i].node);
            cursor = self.labels[i].pred;
        }
        nodes.reverse();
        nodes
    }

    /// External node ids of the path of label `idx`.
    pub fn route_ids(&self, graph: &StreetGraph, idx: usize) -> Vec<NodeId> {
        self.route(idx).into_iter().map(|node| graph.node(node).id).collect()
    }
}
