use ahash::AHashMap;
use geo::{Coord, Euclidean, InterpolateLine, Length, LineString, Point};
use rayon::prelude::*;
use rstar::{RTree, AABB};
use smallvec::SmallVec;
use tracing::{debug, info};

use crate::{
    config::{ScoringConfig, ScoringScheme},
    error::InvalidEdgeError,
    geom::{index_shapes, BoundingBox},
    hierarchy::{ZoneHierarchy, ZoneLayer},
    ids::{NodeId, ZoneId},
};

use super::{
    graph::{GraphEdge, GraphNode, StreetGraph, ZoneSet},
    RoadNetwork,
};

/// Annotate a road network with zone membership and coverage scores at
/// every level of `hierarchy`, producing the search graph.
pub fn build_graph(network: &RoadNetwork, hierarchy: &ZoneHierarchy, scoring: &ScoringConfig) -> Result<StreetGraph, InvalidEdgeError> {
    let finest = hierarchy.finest();
    let rtree = index_shapes(&finest.zones().iter().map(|z| &z.geometry).collect::<Vec<_>>());
    let levels = hierarchy.num_levels();

    // Node membership, finest level first, then lifted through the parents.
    let nodes = network.nodes.par_iter()
        .map(|node| {
            let location = Point::new(node.x, node.y);
            let base = zones_at(finest, &rtree, location);
            GraphNode {
                id: node.id,
                location,
                zones: (0..levels).map(|level| lift(hierarchy, &base, level)).collect(),
            }
        })
        .collect::<Vec<_>>();

    let locations = network.nodes.iter()
        .map(|node| (node.id, Coord { x: node.x, y: node.y }))
        .collect::<AHashMap<_, _>>();

    // Resolve geometry first so that dangling endpoints fail before scoring.
    let lines = network.edges.iter().enumerate()
        .map(|(e, edge)| {
            let endpoint = |id: NodeId| locations.get(&id).copied()
                .ok_or(InvalidEdgeError::UnknownEndpoint { edge: e, node: id });
            let (a, b) = (endpoint(edge.from)?, endpoint(edge.to)?);
            Ok(match &edge.coords {
                Some(coords) if coords.len() >= 2 => LineString::from(coords.clone()),
                _ => LineString::new(vec![a, b]),
            })
        })
        .collect::<Result<Vec<_>, InvalidEdgeError>>()?;

    let samples = scoring.samples.max(1);
    let edges = network.edges.par_iter().zip(lines)
        .map(|(edge, line)| {
            let mut hit = SmallVec::<[ZoneId; 4]>::new();
            for point in sample_points(&line, samples) {
                hit.extend(zones_at(finest, &rtree, point));
            }
            hit.sort_unstable();
            hit.dedup();

            let coverage = (0..levels)
                .map(|level| score(hierarchy, &lift(hierarchy, &hit, level), level, scoring.scheme))
                .collect();

            GraphEdge {
                source: edge.from,
                target: edge.to,
                length: edge.length.unwrap_or_else(|| Euclidean.length(&line)),
                coverage,
                geometry: Some(line),
            }
        })
        .collect::<Vec<_>>();

    debug!(nodes = nodes.len(), edges = edges.len(), levels, samples, "[network] annotated");

    let graph = StreetGraph::new(nodes, edges)?;
    info!(nodes = graph.node_count(), edges = graph.edge_count(), "[network] built");
    Ok(graph)
}

/// Finest-level zones containing `point` (boundary inclusive), ascending.
fn zones_at(layer: &ZoneLayer, rtree: &RTree<BoundingBox>, point: Point<f64>) -> ZoneSet {
    let mut zones = rtree.locate_in_envelope_intersecting(&AABB::from_point([point.x(), point.y()]))
        .map(|b| b.idx())
        .filter(|&i| layer.zones()[i].contains(point))
        .map(|i| ZoneId(i as u32))
        .collect::<ZoneSet>();
    zones.sort_unstable();
    zones
}

/// Map finest-level zones to their distinct ancestors at `level`.
fn lift(hierarchy: &ZoneHierarchy, zones: &[ZoneId], level: usize) -> ZoneSet {
    let mut lifted = zones.iter()
        .filter_map(|&zone| hierarchy.ancestor(zone, level))
        .collect::<ZoneSet>();
    lifted.sort_unstable();
    lifted.dedup();
    lifted
}

fn score(hierarchy: &ZoneHierarchy, zones: &[ZoneId], level: usize, scheme: ScoringScheme) -> f64 {
    match scheme {
        ScoringScheme::Count => zones.len() as f64,
        ScoringScheme::Weighted => {
            let Some(layer) = hierarchy.layer(level) else { return 0.0 };
            zones.iter().filter_map(|&id| layer.zone(id)).map(|z| z.weight).sum()
        }
    }
}

/// `count` points evenly spaced by arc length, at fractions `(i + 0.5) / count`.
/// A single sample is the midpoint.
fn sample_points(line: &LineString<f64>, count: usize) -> Vec<Point<f64>> {
    let Some(&first) = line.0.first() else { return Vec::new() };
    if Euclidean.length(line) == 0.0 { return vec![first.into()] }

    (0..count)
        .filter_map(|i| Euclidean.point_at_ratio_from_start(line, (i as f64 + 0.5) / count as f64))
        .collect()
}
