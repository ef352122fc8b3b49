use std::{cmp::Reverse, collections::BinaryHeap};

use crate::{
    error::{NoPathError, SearchError},
    ids::NodeId,
    network::StreetGraph,
};

/// Shortest distance from `source` to every node (infinite if unreachable).
///
/// Lengths are non-negative, so their bit patterns order like the values.
pub(crate) fn distances(graph: &StreetGraph, source: usize) -> Vec<f64> {
    let mut dist = vec![f64::INFINITY; graph.node_count()];
    let mut heap = BinaryHeap::new();

    dist[source] = 0.0;
    heap.push(Reverse((0.0f64.to_bits(), source)));

    while let Some(Reverse((bits, node))) = heap.pop() {
        let d = f64::from_bits(bits);
        if d > dist[node] { continue } // Stale entry

        for (next, edge) in graph.neighbors(node) {
            let candidate = d + graph.edge(edge).length;
            if candidate < dist[next] {
                dist[next] = candidate;
                heap.push(Reverse((candidate.to_bits(), next)));
            }
        }
    }

    dist
}

pub(crate) fn resolve(graph: &StreetGraph, id: NodeId) -> Result<usize, SearchError> {
    graph.node_index(id).ok_or(SearchError::UnknownNode(id))
}

/// Length of the shortest path between two nodes (plain Dijkstra).
pub fn shortest_path_length(graph: &StreetGraph, start: NodeId, goal: NodeId) -> Result<f64, SearchError> {
    let (s, g) = (resolve(graph, start)?, resolve(graph, goal)?);
    let length = distances(graph, s)[g];
    if length.is_finite() { Ok(length) } else { Err(NoPathError { start, goal }.into()) }
}
