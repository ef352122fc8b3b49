use std::{cmp::Reverse, collections::BinaryHeap};

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::{
    config::SearchConfig,
    error::{NoPathError, SearchError},
    ids::NodeId,
    network::StreetGraph,
};

use super::{
    dijkstra::{distances, resolve},
    label::{Label, LabelArena, Offer},
    path::{ParetoFrontier, Path},
};

/// Relative slack on the length bound, absorbing summation-order rounding.
const LENGTH_SLACK: f64 = 1e-9;

/// Queue key: (length + lower bound, length, coverage descending, label index).
/// All values are non-negative, so their bit patterns order like the values.
type Entry = Reverse<(u64, u64, Reverse<u64>, usize)>;

fn entry(label: &Label, to_goal: f64, idx: usize) -> Entry {
    Reverse(((label.length + to_goal).to_bits(), label.length.to_bits(), Reverse(label.coverage.to_bits()), idx))
}

/// Pareto-optimal simple paths from `start` to `goal`, minimising length and
/// maximising coverage at resolution `level`.
///
/// Label-setting search guided by exact shortest distances to the goal.
/// Labels are expanded in order of optimistic total length; goal labels are
/// final. The frontier holds the goal's non-dominated labels sorted by length.
pub fn pareto_paths(
    graph: &StreetGraph,
    start: NodeId,
    goal: NodeId,
    level: usize,
    config: &SearchConfig,
) -> Result<ParetoFrontier, SearchError> {
    let levels = graph.num_levels();
    if level >= levels { return Err(SearchError::InvalidLevel { level, levels }) }

    let (s, g) = (resolve(graph, start)?, resolve(graph, goal)?);
    let frontier = |paths, truncated| ParetoFrontier { start, goal, level, truncated, paths };
    if s == g { return Ok(frontier(vec![Path::trivial(start)], false)) }

    let to_goal = distances(graph, g);
    let shortest = to_goal[s];
    if !shortest.is_finite() { return Err(NoPathError { start, goal }.into()) }

    let limit = config.max_length_ratio.map_or(f64::INFINITY, |ratio| ratio * shortest * (1.0 + LENGTH_SLACK));
    let cap = config.max_labels_per_node;

    let mut arena = LabelArena::new(graph.node_count());
    let mut queue: BinaryHeap<Entry> = BinaryHeap::new();
    let mut truncated = false;

    match arena.offer(graph, Label::root(s), g, cap) {
        Offer::Inserted(root) | Offer::Displaced(root) => queue.push(entry(arena.label(root), shortest, root)),
        Offer::Full => truncated = true,
        Offer::Rejected => {}
    }

    while let Some(Reverse((key, _, _, idx))) = queue.pop() {
        let label = *arena.label(idx);
        if !label.alive { continue } // Evicted after being queued
        if f64::from_bits(key) > limit { break }
        if label.node == g { continue }

        for (next, edge) in graph.neighbors(label.node) {
            let remaining = to_goal[next];
            if !remaining.is_finite() || arena.visits(idx, next) { continue }

            let edge = graph.edge(edge);
            let length = label.length + edge.length;
            if length + remaining > limit { continue }

            let candidate = Label::extend(idx, next, length, label.coverage + edge.coverage_at(level));
            match arena.offer(graph, candidate, g, cap) {
                Offer::Inserted(j) => queue.push(entry(arena.label(j), remaining, j)),
                Offer::Displaced(j) => {
                    truncated = true;
                    queue.push(entry(arena.label(j), remaining, j));
                }
                Offer::Full => truncated = true,
                Offer::Rejected => {}
            }
        }
    }

    let mut paths = arena.at(g).iter()
        .map(|&i| {
            let label = arena.label(i);
            Path { nodes: arena.route_ids(graph, i), length: label.length, coverage: label.coverage }
        })
        .collect::<Vec<_>>();
    paths.sort_by(|a, b| {
        a.length.total_cmp(&b.length)
            .then(b.coverage.total_cmp(&a.coverage))
            .then_with(|| a.nodes.cmp(&b.nodes))
    });

    debug!(%start, %goal, level, labels = arena.len(), paths = paths.len(), "[search] frontier closed");
    if truncated {
        warn!(%start, %goal, cap = ?cap, "[search] label cap reached, frontier may be incomplete");
    } else if paths.is_empty() {
        return Err(NoPathError { start, goal }.into())
    }

    Ok(frontier(paths, truncated))
}

/// Run independent queries in parallel over the shared graph.
pub fn pareto_paths_many(
    graph: &StreetGraph,
    queries: &[(NodeId, NodeId)],
    level: usize,
    config: &SearchConfig,
) -> Vec<Result<ParetoFrontier, SearchError>> {
    queries.par_iter()
        .map(|&(start, goal)| pareto_paths(graph, start, goal, level, config))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{GraphEdge, GraphNode};

    /// Unit square 1-2-3-4 with zero coverage.
    fn square() -> StreetGraph {
        StreetGraph::new(
            vec![
                GraphNode::new(1, 0.0, 0.0),
                GraphNode::new(2, 1.0, 0.0),
                GraphNode::new(3, 1.0, 1.0),
                GraphNode::new(4, 0.0, 1.0),
            ],
            vec![
                GraphEdge::new(1, 2, 1.0),
                GraphEdge::new(2, 3, 1.0),
                GraphEdge::new(3, 4, 1.0),
                GraphEdge::new(4, 1, 1.0),
            ],
        ).unwrap()
    }

    /// A short uncovered road and a long covered detour between 1 and 4,
    /// plus a middle option.
    fn tradeoff() -> StreetGraph {
        StreetGraph::new(
            (1..=5).map(|i| GraphNode::new(i, i as f64, 0.0)).collect(),
            vec![
                GraphEdge::new(1, 4, 2.0),
                GraphEdge::new(1, 2, 1.5).with_coverage(vec![1.0]),
                GraphEdge::new(2, 4, 1.5).with_coverage(vec![1.0]),
                GraphEdge::new(1, 3, 3.0).with_coverage(vec![2.0]),
                GraphEdge::new(3, 4, 3.0).with_coverage(vec![3.0]),
                // Strictly worse than 1-2-4.
                GraphEdge::new(2, 5, 2.0),
                GraphEdge::new(5, 4, 2.0),
            ],
        ).unwrap()
    }

    #[test]
    fn uniform_square_has_a_single_shortest_path() {
        let frontier = pareto_paths(&square(), NodeId(1), NodeId(3), 0, &SearchConfig::default()).unwrap();
        assert_eq!(frontier.len(), 1);
        assert_eq!(frontier.paths[0].length, 2.0);
        assert_eq!(frontier.paths[0].coverage, 0.0);
        assert_eq!(frontier.paths[0].nodes, vec![NodeId(1), NodeId(2), NodeId(3)]);
        assert!(!frontier.truncated);
    }

    #[test]
    fn frontier_trades_length_for_coverage() {
        let frontier = pareto_paths(&tradeoff(), NodeId(1), NodeId(4), 0, &SearchConfig::default()).unwrap();
        let costs = frontier.paths.iter().map(|p| (p.length, p.coverage)).collect::<Vec<_>>();
        assert_eq!(costs, vec![(2.0, 0.0), (3.0, 2.0), (6.0, 5.0)]);
        assert_eq!(frontier.paths[1].nodes, vec![NodeId(1), NodeId(2), NodeId(4)]);
        assert_eq!(frontier.shortest().map(|p| p.length), Some(2.0));
        assert_eq!(frontier.most_covered().map(|p| p.coverage), Some(5.0));
    }

    #[test]
    fn length_ratio_prunes_long_detours() {
        let config = SearchConfig { max_length_ratio: Some(2.0), ..SearchConfig::default() };
        let frontier = pareto_paths(&tradeoff(), NodeId(1), NodeId(4), 0, &config).unwrap();
        let lengths = frontier.paths.iter().map(|p| p.length).collect::<Vec<_>>();
        assert_eq!(lengths, vec![2.0, 3.0]);
    }

    #[test]
    fn label_cap_sets_truncated() {
        let config = SearchConfig { max_labels_per_node: Some(1), ..SearchConfig::default() };
        let frontier = pareto_paths(&tradeoff(), NodeId(1), NodeId(4), 0, &config).unwrap();
        assert!(frontier.truncated);
        assert_eq!(frontier.len(), 1);
    }

    #[test]
    fn zero_label_cap_is_truncated_not_unreachable() {
        let config = SearchConfig { max_labels_per_node: Some(0), ..SearchConfig::default() };
        let frontier = pareto_paths(&tradeoff(), NodeId(1), NodeId(4), 0, &config).unwrap();
        assert!(frontier.truncated);
        assert!(frontier.is_empty());
    }

    /// Reaching 3 through 2 is cheaper than going direct, yet only the direct
    /// label can continue through 2.
    #[test]
    fn covered_detour_through_a_used_node_survives() {
        let graph = StreetGraph::new(
            (1..=4).map(|i| GraphNode::new(i, i as f64, 0.0)).collect(),
            vec![
                GraphEdge::new(1, 2, 1.0),
                GraphEdge::new(2, 3, 1.0).with_coverage(vec![10.0]),
                GraphEdge::new(1, 3, 3.0),
                GraphEdge::new(2, 4, 1.0),
            ],
        ).unwrap();

        let frontier = pareto_paths(&graph, NodeId(1), NodeId(4), 0, &SearchConfig::default()).unwrap();
        let summary = frontier.paths().iter()
            .map(|p| (p.nodes.iter().map(|n| n.0).collect::<Vec<_>>(), p.length, p.coverage))
            .collect::<Vec<_>>();
        assert_eq!(summary, vec![(vec![1, 2, 4], 2.0, 0.0), (vec![1, 3, 2, 4], 5.0, 10.0)]);
        assert!(!frontier.truncated);
    }

    #[test]
    fn start_equals_goal() {
        let frontier = pareto_paths(&square(), NodeId(2), NodeId(2), 0, &SearchConfig::default()).unwrap();
        assert_eq!(frontier.paths, vec![Path::trivial(NodeId(2))]);
    }

    #[test]
    fn query_errors() {
        let mut nodes = square().nodes().to_vec();
        nodes.push(GraphNode::new(9, 5.0, 5.0));
        let graph = StreetGraph::new(nodes, square().edges().to_vec()).unwrap();
        let config = SearchConfig::default();

        assert_eq!(
            pareto_paths(&graph, NodeId(1), NodeId(9), 0, &config),
            Err(SearchError::NoPath(NoPathError { start: NodeId(1), goal: NodeId(9) })),
        );
        assert_eq!(pareto_paths(&graph, NodeId(1), NodeId(7), 0, &config), Err(SearchError::UnknownNode(NodeId(7))));
        assert_eq!(
            pareto_paths(&graph, NodeId(1), NodeId(3), 1, &config),
            Err(SearchError::InvalidLevel { level: 1, levels: 1 }),
        );
    }

    #[test]
    fn many_queries_match_single_queries() {
        let graph = tradeoff();
        let queries = [(NodeId(1), NodeId(4)), (NodeId(2), NodeId(3)), (NodeId(5), NodeId(5))];
        let results = pareto_paths_many(&graph, &queries, 0, &SearchConfig::default());
        assert_eq!(results.len(), 3);
        for (&(start, goal), result) in queries.iter().zip(&results) {
            assert_eq!(result, &pareto_paths(&graph, start, goal, 0, &SearchConfig::default()));
        }
    }
}
