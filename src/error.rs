use crate::ids::{CameraId, NodeId, ZoneId};

/// Malformed point or polygon input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    #[error("polygon needs at least 3 distinct vertices, got {0}")]
    TooFewVertices(usize),

    #[error("non-finite coordinate ({x}, {y})")]
    NonFinite { x: f64, y: f64 },

    #[error("polygon has zero area")]
    ZeroArea,
}

/// Invalid camera set or corridor boundary, or a broken tessellation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PartitionError {
    #[error("at least one camera is required")]
    NoCameras,

    #[error("camera {0} has a non-finite location")]
    InvalidCamera(CameraId),

    #[error("camera {0} appears more than once in the manifest")]
    DuplicateCamera(CameraId),

    #[error("corridor boundary is not simple: segments {0} and {1} intersect")]
    NonSimpleBoundary(usize, usize),

    #[error("malformed corridor boundary: {0}")]
    Boundary(#[from] GeometryError),

    #[error("zones {a} and {b} overlap by {area}")]
    Overlap { a: ZoneId, b: ZoneId, area: f64 },

    #[error("zones cover an area of {zones}, boundary area is {boundary}")]
    CoverageMismatch { zones: f64, boundary: f64 },

    #[error("zone {zone} at level {level} lies in {matches} zones of the next coarser level")]
    NestingViolated { level: usize, zone: ZoneId, matches: usize },
}

/// Invalid street network element, rejected at graph construction.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidEdgeError {
    #[error("edge {edge} has invalid length {length}")]
    InvalidLength { edge: usize, length: f64 },

    #[error("edge {edge} has invalid coverage score {score} at level {level}")]
    InvalidScore { edge: usize, level: usize, score: f64 },

    #[error("edge {edge} references unknown node {node}")]
    UnknownEndpoint { edge: usize, node: NodeId },

    #[error("edge {edge} is a self-loop on node {node}")]
    SelfLoop { edge: usize, node: NodeId },

    #[error("node {0} is defined more than once")]
    DuplicateNode(NodeId),

    #[error("node {0} has a non-finite location")]
    InvalidNode(NodeId),
}

/// The goal is not reachable from the start.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no path from {start} to {goal}")]
pub struct NoPathError {
    pub start: NodeId,
    pub goal: NodeId,
}

/// Failures of a single path query.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SearchError {
    #[error(transparent)]
    NoPath(#[from] NoPathError),

    #[error("unknown node {0}")]
    UnknownNode(NodeId),

    #[error("resolution level {level} out of range (hierarchy has {levels})")]
    InvalidLevel { level: usize, levels: usize },
}

/// Any failure raised by the library.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Partition(#[from] PartitionError),

    #[error(transparent)]
    InvalidEdge(#[from] InvalidEdgeError),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error("projection failed: {0}")]
    Projection(String),
}

impl From<NoPathError> for Error {
    fn from(err: NoPathError) -> Self { Self::Search(err.into()) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
