use geo::{BoundingRect, Euclidean, Length, MultiPolygon};

use crate::geom::union;

/// Total boundary length of a multipolygon, holes included.
fn perimeter(shape: &MultiPolygon<f64>) -> f64 {
    shape.0.iter()
        .flat_map(|polygon| std::iter::once(polygon.exterior()).chain(polygon.interiors()))
        .map(|ring| Euclidean.length(ring))
        .sum()
}

/// Total length of boundary shared by two zone geometries with disjoint
/// interiors: whatever disappears from the two perimeters when they are
/// unioned. Lengths up to `tol` are reported as zero.
pub fn shared_boundary_length(a: &MultiPolygon<f64>, b: &MultiPolygon<f64>, tol: f64) -> f64 {
    let (Some(ra), Some(rb)) = (a.bounding_rect(), b.bounding_rect()) else { return 0.0 };
    if ra.min().x > rb.max().x + tol || rb.min().x > ra.max().x + tol
        || ra.min().y > rb.max().y + tol || rb.min().y > ra.max().y + tol {
        return 0.0
    }

    let shared = (perimeter(a) + perimeter(b) - perimeter(&union(a, b))) / 2.0;
    if shared > tol { shared } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{LineString, Polygon};

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> MultiPolygon<f64> {
        MultiPolygon(vec![Polygon::new(
            LineString::from(vec![(x0, y0), (x1, y0), (x1, y1), (x0, y1)]),
            vec![],
        )])
    }

    #[test]
    fn squares_sharing_an_edge() {
        let a = rect(0.0, 0.0, 1.0, 1.0);
        let b = rect(1.0, 0.0, 2.0, 1.0);
        assert!((shared_boundary_length(&a, &b, 1e-9) - 1.0).abs() < 1e-6);
        assert!((shared_boundary_length(&b, &a, 1e-9) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn partial_edge_overlap() {
        let a = rect(0.0, 0.0, 1.0, 1.0);
        let b = rect(1.0, 0.5, 2.0, 3.0);
        assert!((shared_boundary_length(&a, &b, 1e-9) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn corner_contact_is_not_adjacency() {
        let a = rect(0.0, 0.0, 1.0, 1.0);
        let b = rect(1.0, 1.0, 2.0, 2.0);
        assert_eq!(shared_boundary_length(&a, &b, 1e-6), 0.0);
    }

    #[test]
    fn distant_shapes_share_nothing() {
        let a = rect(0.0, 0.0, 1.0, 1.0);
        let b = rect(5.0, 5.0, 6.0, 6.0);
        assert_eq!(shared_boundary_length(&a, &b, 1e-6), 0.0);
    }

    #[test]
    fn edges_along_a_hole_count() {
        let mut ring = rect(0.0, 0.0, 3.0, 3.0);
        ring.0[0].interiors_push(LineString::from(vec![(1.0, 1.0), (2.0, 1.0), (2.0, 2.0), (1.0, 2.0)]));
        let core = rect(1.0, 1.0, 2.0, 2.0);
        assert!((shared_boundary_length(&ring, &core, 1e-9) - 4.0).abs() < 1e-6);
    }

    #[test]
    fn short_contacts_fall_under_the_tolerance() {
        let a = rect(0.0, 0.0, 1.0, 1.0);
        let b = rect(1.0, 0.99, 2.0, 2.0);
        assert!((shared_boundary_length(&a, &b, 1e-9) - 0.01).abs() < 1e-6);
        assert_eq!(shared_boundary_length(&a, &b, 0.1), 0.0);
    }
}
