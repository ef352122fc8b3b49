use ahash::AHashMap;
use geo::{LineString, Point};
use smallvec::SmallVec;

use crate::{error::InvalidEdgeError, ids::{NodeId, ZoneId}};

/// Zones a node belongs to at one resolution level; usually one, more on shared borders.
pub type ZoneSet = SmallVec<[ZoneId; 2]>;

/// A street intersection.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
    pub id: NodeId,
    pub location: Point<f64>,
    /// Zone membership per resolution level (index = level).
    pub zones: Vec<ZoneSet>,
}

impl GraphNode {
    pub fn new(id: u64, x: f64, y: f64) -> Self {
        Self { id: NodeId(id), location: Point::new(x, y), zones: Vec::new() }
    }
}

/// An undirected street segment.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphEdge {
    pub source: NodeId,
    pub target: NodeId,
    pub length: f64,
    /// Coverage score contribution per resolution level (index = level).
    pub coverage: Vec<f64>,
    pub geometry: Option<LineString<f64>>,
}

impl GraphEdge {
    /// Edge with zero coverage at a single level.
    pub fn new(source: u64, target: u64, length: f64) -> Self {
        Self { source: NodeId(source), target: NodeId(target), length, coverage: vec![0.0], geometry: None }
    }

    /// Set the per-level coverage scores.
    pub fn with_coverage(mut self, coverage: Vec<f64>) -> Self {
        self.coverage = coverage;
        self
    }

    /// Coverage score at `level` (zero if the edge has no score there).
    #[inline] pub fn coverage_at(&self, level: usize) -> f64 { self.coverage.get(level).copied().unwrap_or(0.0) }
}

/// An undirected street graph in compressed sparse row format.
/// Immutable once built, so concurrent queries can share it.
#[derive(Clone, Debug, Default)]
pub struct StreetGraph {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    offsets: Vec<u32>,
    neighbors: Vec<u32>, // Neighbor node index per adjacency slot
    incident: Vec<u32>,  // Edge index per adjacency slot
    index: AHashMap<NodeId, u32>,
    levels: usize,
}

impl StreetGraph {
    /// Construct a graph, rejecting duplicate nodes, dangling endpoints,
    /// self-loops and negative or non-finite lengths and scores.
    pub fn new(nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) -> Result<Self, InvalidEdgeError> {
        let mut index = AHashMap::with_capacity(nodes.len());
        for (i, node) in nodes.iter().enumerate() {
            if !node.location.x().is_finite() || !node.location.y().is_finite() {
                return Err(InvalidEdgeError::InvalidNode(node.id))
            }
            if index.insert(node.id, i as u32).is_some() {
                return Err(InvalidEdgeError::DuplicateNode(node.id))
            }
        }

        let mut endpoints = Vec::with_capacity(edges.len());
        for (e, edge) in edges.iter().enumerate() {
            if !edge.length.is_finite() || edge.length < 0.0 {
                return Err(InvalidEdgeError::InvalidLength { edge: e, length: edge.length })
            }
            if let Some((level, &score)) = edge.coverage.iter().enumerate().find(|(_, s)| !s.is_finite() || **s < 0.0) {
                return Err(InvalidEdgeError::InvalidScore { edge: e, level, score })
            }
            let u = *index.get(&edge.source).ok_or(InvalidEdgeError::UnknownEndpoint { edge: e, node: edge.source })?;
            let v = *index.get(&edge.target).ok_or(InvalidEdgeError::UnknownEndpoint { edge: e, node: edge.target })?;
            if u == v { return Err(InvalidEdgeError::SelfLoop { edge: e, node: edge.source }) }
            endpoints.push((u, v));
        }

        // Count degrees, then fill adjacency slots in edge order.
        let mut offsets = vec![0u32; nodes.len() + 1];
        for &(u, v) in &endpoints {
            offsets[u as usize + 1] += 1;
            offsets[v as usize + 1] += 1;
        }
        for i in 0..nodes.len() { offsets[i + 1] += offsets[i] }

        let mut cursor = offsets.clone();
        let mut neighbors = vec![0u32; 2 * endpoints.len()];
        let mut incident = vec![0u32; 2 * endpoints.len()];
        for (e, &(u, v)) in endpoints.iter().enumerate() {
            for (a, b) in [(u, v), (v, u)] {
                let slot = cursor[a as usize] as usize;
                neighbors[slot] = b;
                incident[slot] = e as u32;
                cursor[a as usize] += 1;
            }
        }

        let levels = nodes.iter().map(|n| n.zones.len())
            .chain(edges.iter().map(|e| e.coverage.len()))
            .max()
            .unwrap_or(0)
            .max(1);

        Ok(Self { nodes, edges, offsets, neighbors, incident, index, levels })
    }

    /// Get the number of nodes in the graph.
    #[inline] pub fn node_count(&self) -> usize { self.nodes.len() }

    /// Get the number of undirected edges in the graph.
    #[inline] pub fn edge_count(&self) -> usize { self.edges.len() }

    /// Get the number of resolution levels the graph is annotated with.
    #[inline] pub fn num_levels(&self) -> usize { self.levels }

    /// Get all nodes, in internal index order.
    #[inline] pub fn nodes(&self) -> &[GraphNode] { &self.nodes }

    /// Get all edges, in input order.
    #[inline] pub fn edges(&self) -> &[GraphEdge] { &self.edges }

    /// Get a node by internal index.
    #[inline] pub fn node(&self, node: usize) -> &GraphNode { &self.nodes[node] }

    /// Get an edge by index.
    #[inline] pub fn edge(&self, edge: usize) -> &GraphEdge { &self.edges[edge] }

    /// Look up the internal index of a node id.
    #[inline] pub fn node_index(&self, id: NodeId) -> Option<usize> { self.index.get(&id).map(|&i| i as usize) }

    /// Get the range of adjacency slots for a given node.
    #[inline]
    fn range(&self, node: usize) -> std::ops::Range<usize> {
        self.offsets[node] as usize .. self.offsets[node + 1] as usize
    }

    /// Get the degree (number of incident edges) of a given node.
    #[inline] pub fn degree(&self, node: usize) -> usize { self.range(node).len() }

    /// Get an iterator over the neighbors of a node, paired with the connecting edge index.
    #[inline]
    pub fn neighbors(&self, node: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.range(node).map(move |slot| (self.neighbors[slot] as usize, self.incident[slot] as usize))
    }
}
