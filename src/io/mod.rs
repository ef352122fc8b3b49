//! File formats: camera manifests, boundaries and networks in; GeoJSON,
//! frontier records and SVG out.
mod geojson;
mod json;
mod read;
mod svg;

use geo::Coord;

pub use geojson::{graph_to_geojson, write_json, zones_to_geojson};
pub use json::{read_frontiers, write_frontiers};
pub use read::{parse_boundary, read_boundary, read_cameras, read_network};
pub use svg::{write_svg, write_svg_with_size, SvgScene};

/// Coordinate transform applied to every exported vertex.
pub type Transform = dyn Fn(Coord<f64>) -> crate::Result<Coord<f64>>;

/// Identity transform for planar output.
pub fn planar(coord: Coord<f64>) -> crate::Result<Coord<f64>> { Ok(coord) }
