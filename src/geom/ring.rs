use geo::{Coord, Distance, Euclidean, Intersects, Line, LineIntersection, LineString, Polygon};
use geo::line_intersection::line_intersection;
use geo::orient::{Direction, Orient};

use crate::error::GeometryError;

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: Coord<f64>, b: Coord<f64>) -> f64 {
    Euclidean.distance(a, b)
}

/// Signed area of an open or closed ring (positive for counter-clockwise).
pub fn signed_area(ring: &[Coord<f64>]) -> f64 {
    if ring.len() < 3 { return 0.0 }
    let n = ring.len();
    (0..n).map(|i| {
        let (p, q) = (ring[i], ring[(i + 1) % n]);
        p.x * q.y - q.x * p.y
    }).sum::<f64>() / 2.0
}

/// Drop the closing vertex and consecutive duplicates, leaving an open ring.
pub(crate) fn open_ring(coords: &[Coord<f64>]) -> Vec<Coord<f64>> {
    let mut ring: Vec<Coord<f64>> = Vec::with_capacity(coords.len());
    for &coord in coords {
        if ring.last() != Some(&coord) { ring.push(coord) }
    }
    while ring.len() > 1 && ring.first() == ring.last() { ring.pop(); }
    ring
}

/// Validate a ring of coordinates and build a counter-clockwise polygon from it.
/// The ring may be open or closed.
pub fn validate_ring(coords: &[Coord<f64>]) -> Result<Polygon<f64>, GeometryError> {
    if let Some(bad) = coords.iter().find(|c| !c.x.is_finite() || !c.y.is_finite()) {
        return Err(GeometryError::NonFinite { x: bad.x, y: bad.y })
    }

    let ring = open_ring(coords);
    if ring.len() < 3 { return Err(GeometryError::TooFewVertices(ring.len())) }
    if signed_area(&ring) == 0.0 { return Err(GeometryError::ZeroArea) }

    Ok(Polygon::new(LineString::from(ring), vec![]).orient(Direction::Default))
}

/// Check that a ring does not intersect itself.
/// Returns the first pair of offending segment indices otherwise.
pub fn is_simple(ring: &LineString<f64>) -> Result<(), (usize, usize)> {
    let points = open_ring(&ring.0);
    let n = points.len();
    if n < 3 { return Ok(()) }

    let segment = |i: usize| Line::new(points[i], points[(i + 1) % n]);

    for i in 0..n {
        let a = segment(i);

        // Adjacent segments may only share their common vertex; a fold back
        // along the same line is a self-overlap.
        let next = (i + 1) % n;
        if let Some(LineIntersection::Collinear { .. }) = line_intersection(a, segment(next)) {
            return Err((i, next))
        }

        for j in (i + 2)..n {
            if i == 0 && j == n - 1 { continue } // closing segment is adjacent to the first
            if a.intersects(&segment(j)) { return Err((i, j)) }
        }
    }

    Ok(())
}
