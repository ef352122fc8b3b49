//! Bi-objective path search: shortest length against highest camera coverage.
mod dijkstra;
mod label;
mod pareto;
mod path;

pub use dijkstra::shortest_path_length;
pub use pareto::{pareto_paths, pareto_paths_many};
pub use path::{ParetoFrontier, Path};
