//! Planar geometry kernel: rings, clipping, adjacency and projection.
mod adjacency;
mod bbox;
mod clip;
mod proj;
mod ring;

use geo::{Intersects, MultiPolygon, Point};

pub use adjacency::shared_boundary_length;
pub(crate) use bbox::{index_shapes, BoundingBox};
pub(crate) use clip::rect_ring;
pub use clip::{clip_half_plane, clip_to_boundary, overlap_area, union};
pub use proj::Projector;
pub use ring::{distance, is_simple, signed_area, validate_ring};

/// Point-in-polygon test; points on the boundary count as inside.
#[inline]
pub fn contains_point(shape: &MultiPolygon<f64>, point: Point<f64>) -> bool {
    shape.intersects(&point)
}
