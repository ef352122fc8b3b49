#![doc = "Camera-coverage zones and coverage-aware routing over street networks"]
mod camera;
mod ids;
mod model;

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod geom;
pub mod hierarchy;
pub mod io;
pub mod network;
pub mod search;
pub mod voronoi;

#[doc(inline)]
pub use camera::{Camera, CameraRecord};

#[doc(inline)]
pub use ids::{CameraId, NodeId, ZoneId};

#[doc(inline)]
pub use config::Config;

#[doc(inline)]
pub use error::{Error, Result};

#[doc(inline)]
pub use hierarchy::{CoverageZone, ZoneHierarchy, ZoneLayer};

#[doc(inline)]
pub use model::CoverageModel;

#[doc(inline)]
pub use network::{GraphEdge, GraphNode, RoadNetwork, StreetGraph};

#[doc(inline)]
pub use search::{pareto_paths, ParetoFrontier, Path};
