//! Street network: input records, the annotated CSR graph and its builder.
mod builder;
mod graph;

use serde::{Deserialize, Serialize};

pub use crate::ids::NodeId;
pub use builder::build_graph;
pub use graph::{GraphEdge, GraphNode, StreetGraph, ZoneSet};

/// A street intersection as read from the network file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoadNode {
    pub id: NodeId,
    #[serde(alias = "lon", alias = "longitude")]
    pub x: f64,
    #[serde(alias = "lat", alias = "latitude")]
    pub y: f64,
}

/// A street segment as read from the network file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoadSegment {
    pub from: NodeId,
    pub to: NodeId,
    /// Segment length; the length of the geometry when omitted.
    #[serde(default)]
    pub length: Option<f64>,
    /// Polyline from `from` to `to`; a straight segment when omitted.
    #[serde(default)]
    pub coords: Option<Vec<[f64; 2]>>,
}

/// An undirected road network.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RoadNetwork {
    pub nodes: Vec<RoadNode>,
    #[serde(default)]
    pub edges: Vec<RoadSegment>,
}
